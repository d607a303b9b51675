/// CSV ingest for mooring observation exports.
///
/// Reads the current-meter and CTD CSV exports into tagged `Observation`s.
/// Required columns: `Filename`, `Date`, `Time`, `Depth`, `Temperature`,
/// `Salinity`, `Oxygen:Dissolved`. Measurement fields are independently
/// nullable (empty field).
///
/// Row-level problems — a date/time pair that does not parse after
/// separator normalization, a filename from neither instrument family, a
/// missing depth — exclude that row and are collected as `RowError`s; the
/// batch reports how many rows were read, used, and excluded. A missing
/// required column or an unreadable file is a structural `PipelineError`.

use chrono::Datelike;
use serde::Deserialize;
use std::path::Path;

use crate::logging::{self, Stage};
use crate::model::{InstrumentKind, Observation, PipelineError};
use crate::temporal;

/// Columns every observation export must carry, in no particular order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Filename",
    "Date",
    "Time",
    "Depth",
    "Temperature",
    "Salinity",
    "Oxygen:Dissolved",
];

// ---------------------------------------------------------------------------
// Raw record shape
// ---------------------------------------------------------------------------

/// One CSV row as exported, before normalization.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Filename")]
    filename: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Depth")]
    depth: Option<f64>,
    #[serde(rename = "Temperature")]
    temperature: Option<f64>,
    #[serde(rename = "Salinity")]
    salinity: Option<f64>,
    #[serde(rename = "Oxygen:Dissolved")]
    oxygen: Option<f64>,
}

// ---------------------------------------------------------------------------
// Ingest output
// ---------------------------------------------------------------------------

/// A row excluded during ingest, with its 1-based data-row line number.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output for one source file: usable observations plus an account
/// of what was excluded.
#[derive(Debug, Clone)]
pub struct IngestBatch {
    pub observations: Vec<Observation>,
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
}

impl IngestBatch {
    pub fn rows_used(&self) -> usize {
        self.observations.len()
    }

    pub fn rows_excluded(&self) -> usize {
        self.row_errors.len()
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read one observation export into a batch of tagged observations.
///
/// Malformed rows are excluded and reported in the batch, never fatal.
/// Returns a structural error if the file cannot be read or a required
/// column is absent.
pub fn read_observations(path: &Path) -> Result<IngestBatch, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| PipelineError::Io(format!("{}: {}", path.display(), e)))?;

    // Validate the header up front so a renamed or dropped column is one
    // clear error instead of a failure on every row.
    let headers = reader
        .headers()
        .map_err(|e| PipelineError::Csv(format!("{}: {}", path.display(), e)))?
        .clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(PipelineError::MissingColumn {
                path: path.display().to_string(),
                column: required.to_string(),
            });
        }
    }

    let mut batch = IngestBatch {
        observations: Vec::new(),
        rows_read: 0,
        row_errors: Vec::new(),
    };

    for (idx, result) in reader.deserialize::<RawRecord>().enumerate() {
        let line = idx + 1;
        batch.rows_read += 1;

        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                batch.row_errors.push(RowError {
                    line,
                    message: format!("unreadable row: {}", e),
                });
                continue;
            }
        };

        match normalize_record(raw) {
            Ok(obs) => batch.observations.push(obs),
            Err(message) => batch.row_errors.push(RowError { line, message }),
        }
    }

    logging::log_ingest_summary(
        &path.display().to_string(),
        batch.rows_read,
        batch.rows_used(),
        batch.rows_excluded(),
    );

    Ok(batch)
}

/// Turn one raw row into an `Observation`, or explain why it cannot be one.
fn normalize_record(raw: RawRecord) -> Result<Observation, String> {
    let instrument = InstrumentKind::from_filename(&raw.filename)
        .ok_or_else(|| format!("unrecognized instrument suffix in '{}'", raw.filename))?;

    let timestamp = temporal::parse_timestamp(&raw.date, &raw.time)?;

    let depth_m = raw
        .depth
        .ok_or_else(|| "missing depth".to_string())?;

    Ok(Observation {
        filename: raw.filename,
        instrument,
        depth_m,
        timestamp,
        temperature: raw.temperature,
        salinity: raw.salinity,
        oxygen_ml_l: raw.oxygen,
    })
}

// ---------------------------------------------------------------------------
// Source merging
// ---------------------------------------------------------------------------

/// Concatenate the current-meter and CTD records into the merged set used
/// by the daily / climatology / anomaly chain.
///
/// Current-meter observations from the cutover year onward are dropped:
/// the CTD record supersedes the current meters there, and keeping both
/// would double-count those dates. CTD observations pass unfiltered.
pub fn merge_sources(
    cur: Vec<Observation>,
    ctd: Vec<Observation>,
    cutover_year: i32,
) -> Vec<Observation> {
    let before = cur.len();
    let mut merged: Vec<Observation> = cur
        .into_iter()
        .filter(|obs| obs.timestamp.year() < cutover_year)
        .collect();
    let dropped = before - merged.len();
    if dropped > 0 {
        logging::info(
            Stage::Ingest,
            None,
            &format!(
                "Dropped {} current-meter rows from {} onward (CTD record supersedes)",
                dropped, cutover_year
            ),
        );
    }
    merged.extend(ctd);
    merged
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
