/// Persistence and reuse of the daily-mean table.
///
/// The daily aggregation is the expensive stage — decades of sub-daily
/// observations reduce to one row per date — so its output is persisted as
/// a CSV table and reused on later runs. A reused table is semantically
/// identical to a freshly computed one for every downstream consumer; the
/// climatology and anomaly stages never know which path produced their
/// input.
///
/// # Persisted format
/// Header `Datetime` followed by `<Variable>_<depth>m` columns for each
/// aggregated variable across the configured bins, one row per date,
/// ascending. Timestamps serialize as `%Y-%m-%d %H:%M:%S` and are truncated
/// to date precision (midnight) on reload; NaN cells serialize as empty
/// fields.
///
/// A table whose header or rows do not match the expected shape is
/// `CacheInvalid` — the caller recomputes from raw observations rather than
/// using partial data.

use chrono::NaiveDate;
use std::path::Path;

use crate::analysis::daily::{self, DailyRecord, DailyTable};
use crate::bins::BinSet;
use crate::logging::{self, Stage};
use crate::model::{Observation, PipelineError};

/// How the daily table was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Valid persisted table found and loaded.
    Hit,
    /// No persisted table; computed from raw observations and stored.
    Miss,
    /// Persisted table present but malformed; recomputed and overwritten.
    Invalid,
}

impl CacheOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Miss => "miss",
            CacheOutcome::Invalid => "invalid",
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Write the daily-mean table to `path`.
pub fn store_daily_table(path: &Path, table: &DailyTable) -> Result<(), PipelineError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| PipelineError::Io(format!("{}: {}", path.display(), e)))?;

    writer
        .write_record(table.bins.daily_table_header())
        .map_err(|e| PipelineError::Csv(format!("{}: {}", path.display(), e)))?;

    for record in &table.records {
        let mut row = vec![record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()];
        for cells in [&record.temperature, &record.salinity] {
            for &value in cells.iter() {
                row.push(format_cell(value));
            }
        }
        writer
            .write_record(&row)
            .map_err(|e| PipelineError::Csv(format!("{}: {}", path.display(), e)))?;
    }

    writer
        .flush()
        .map_err(|e| PipelineError::Io(format!("{}: {}", path.display(), e)))?;
    Ok(())
}

/// NaN cells persist as empty fields, matching the original table.
fn format_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Read a persisted daily-mean table, validating its shape against the
/// configured bin set.
pub fn load_daily_table(path: &Path, bins: &BinSet) -> Result<DailyTable, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| PipelineError::Io(format!("{}: {}", path.display(), e)))?;

    let expected = bins.daily_table_header();
    let headers = reader
        .headers()
        .map_err(|e| PipelineError::Csv(format!("{}: {}", path.display(), e)))?;
    let found: Vec<String> = headers.iter().map(String::from).collect();
    if found != expected {
        return Err(PipelineError::CacheInvalid(format!(
            "expected columns {:?}, found {:?}",
            expected, found
        )));
    }

    let num_bins = bins.len();
    let mut records = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 1;
        let row = result
            .map_err(|e| PipelineError::CacheInvalid(format!("row {}: {}", line, e)))?;
        if row.len() != expected.len() {
            return Err(PipelineError::CacheInvalid(format!(
                "row {}: expected {} fields, found {}",
                line,
                expected.len(),
                row.len()
            )));
        }

        // Truncate to date precision: only the date part of the stored
        // timestamp survives a reload.
        let date_part = row[0].split(&[' ', 'T']).next().unwrap_or(&row[0]);
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
            PipelineError::CacheInvalid(format!("row {}: bad Datetime '{}': {}", line, &row[0], e))
        })?;
        let timestamp = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");

        let mut cells = Vec::with_capacity(2 * num_bins);
        for (col, field) in row.iter().enumerate().skip(1) {
            cells.push(parse_cell(field).map_err(|e| {
                PipelineError::CacheInvalid(format!(
                    "row {} column '{}': {}",
                    line, expected[col], e
                ))
            })?);
        }

        records.push(DailyRecord {
            timestamp,
            temperature: cells[..num_bins].to_vec(),
            salinity: cells[num_bins..].to_vec(),
        });
    }

    Ok(DailyTable {
        bins: bins.clone(),
        records,
    })
}

/// Empty fields reload as NaN; anything else must parse as a float.
fn parse_cell(field: &str) -> Result<f64, String> {
    if field.is_empty() {
        Ok(f64::NAN)
    } else {
        field
            .parse::<f64>()
            .map_err(|e| format!("bad value '{}': {}", field, e))
    }
}

// ---------------------------------------------------------------------------
// Load-or-compute
// ---------------------------------------------------------------------------

/// Obtain the daily-mean table, preferring the persisted copy.
///
/// Cache hit: load and return. Cache miss: aggregate from the raw
/// observations and persist the result. Malformed cache: warn, recompute,
/// overwrite — never silently use partial data.
pub fn load_or_compute(
    path: &Path,
    observations: &[Observation],
    bins: &BinSet,
) -> Result<(DailyTable, CacheOutcome), PipelineError> {
    let outcome = if path.exists() {
        match load_daily_table(path, bins) {
            Ok(table) => {
                logging::info(
                    Stage::Cache,
                    Some(&path.display().to_string()),
                    &format!("Reusing persisted daily-mean table ({} rows)", table.len()),
                );
                return Ok((table, CacheOutcome::Hit));
            }
            Err(PipelineError::CacheInvalid(msg)) => {
                logging::warn(
                    Stage::Cache,
                    Some(&path.display().to_string()),
                    &format!("Persisted table invalid, recomputing: {}", msg),
                );
                CacheOutcome::Invalid
            }
            Err(other) => {
                logging::warn(
                    Stage::Cache,
                    Some(&path.display().to_string()),
                    &format!("Persisted table unreadable, recomputing: {}", other),
                );
                CacheOutcome::Miss
            }
        }
    } else {
        CacheOutcome::Miss
    };

    let table = daily::aggregate_daily(observations, bins);
    store_daily_table(path, &table)?;
    logging::info(
        Stage::Cache,
        Some(&path.display().to_string()),
        &format!("Stored daily-mean table ({} rows)", table.len()),
    );
    Ok((table, outcome))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
