/// Core data types for the mooring aggregation pipeline.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O and no pipeline logic — only types and the structural
/// error enum.

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// Variables
// ---------------------------------------------------------------------------

/// Measured variables carried by a mooring observation.
///
/// Temperature and salinity are the two variables that feed the daily /
/// climatology / anomaly chain. Dissolved oxygen is ingested and counted in
/// coverage tables but is not aggregated (no oxygen record at the 75 m level
/// for most of the time span).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    Temperature,
    Salinity,
    Oxygen,
}

impl Variable {
    /// The two variables that participate in binned aggregation.
    pub const AGGREGATED: [Variable; 2] = [Variable::Temperature, Variable::Salinity];

    /// Column-name stem used in the persisted daily-mean table,
    /// e.g. `Temperature` in `Temperature_35m`.
    pub fn column_stem(&self) -> &'static str {
        match self {
            Variable::Temperature => "Temperature",
            Variable::Salinity => "Salinity",
            Variable::Oxygen => "Oxygen",
        }
    }

    /// Unit label as reported by the source files.
    pub fn unit(&self) -> &'static str {
        match self {
            Variable::Temperature => "C",
            Variable::Salinity => "PSS-78",
            Variable::Oxygen => "mL/L",
        }
    }
}

// ---------------------------------------------------------------------------
// Instrument families
// ---------------------------------------------------------------------------

/// The two instrument families that produced the raw records, distinguished
/// by the source file suffix (`.cur` for current meters, `.ctd` for CTD
/// profilers; both appear upper- and lower-case in the archive).
///
/// The family is assigned once at ingest and carried as an explicit tag so
/// that no downstream component re-derives it from the filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrumentKind {
    CurrentMeter,
    Ctd,
}

impl InstrumentKind {
    /// Classify a source filename by its suffix. Returns `None` for files
    /// from neither family.
    pub fn from_filename(filename: &str) -> Option<InstrumentKind> {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".cur") {
            Some(InstrumentKind::CurrentMeter)
        } else if lower.ends_with(".ctd") {
            Some(InstrumentKind::Ctd)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InstrumentKind::CurrentMeter => "CUR",
            InstrumentKind::Ctd => "CTD",
        }
    }
}

// ---------------------------------------------------------------------------
// Observations
// ---------------------------------------------------------------------------

/// A single measurement record from the mooring, after temporal
/// normalization and instrument tagging.
///
/// Corresponds to one row of the concatenated CUR + CTD CSV exports, with
/// the locale-ambiguous `Date`/`Time` string pair replaced by one canonical
/// timestamp. Each variable is independently nullable — a current meter
/// typically reports temperature without salinity or oxygen.
///
/// Immutable once ingested; multiple observations may share a timestamp
/// (different depths or instruments).
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub filename: String,
    pub instrument: InstrumentKind,
    pub depth_m: f64,
    pub timestamp: NaiveDateTime,
    pub temperature: Option<f64>,
    pub salinity: Option<f64>,
    pub oxygen_ml_l: Option<f64>,
}

impl Observation {
    /// Value of one variable, if present on this record.
    pub fn value(&self, var: Variable) -> Option<f64> {
        match var {
            Variable::Temperature => self.temperature,
            Variable::Salinity => self.salinity,
            Variable::Oxygen => self.oxygen_ml_l,
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Structural errors surfaced to the caller.
///
/// Row-level problems (a malformed timestamp, an unrecognized filename
/// suffix) are not errors — they exclude the row and are reported as counts
/// in the ingest batch. These variants cover the failures that would
/// otherwise produce a misleading empty result.
#[derive(Debug, PartialEq)]
pub enum PipelineError {
    /// File could not be opened or read.
    Io(String),
    /// The CSV reader failed at the stream level (not a single bad row).
    Csv(String),
    /// The input table is missing a required column.
    MissingColumn { path: String, column: String },
    /// No usable observations remained after row-level filtering.
    EmptyInput(String),
    /// The persisted daily-mean table exists but does not match the
    /// expected shape. Callers fall back to full recomputation.
    CacheInvalid(String),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Io(msg) => write!(f, "I/O error: {}", msg),
            PipelineError::Csv(msg) => write!(f, "CSV error: {}", msg),
            PipelineError::MissingColumn { path, column } => {
                write!(f, "Missing column '{}' in {}", column, path)
            }
            PipelineError::EmptyInput(what) => {
                write!(f, "No usable observations: {}", what)
            }
            PipelineError::CacheInvalid(msg) => {
                write!(f, "Cached daily-mean table invalid: {}", msg)
            }
        }
    }
}

impl std::error::Error for PipelineError {}
