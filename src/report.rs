/// Run report for the aggregation pipeline.
///
/// Assembled by the pipeline runner and consumed two ways: serialized to
/// JSON for tooling, and printed as a console summary for interactive runs.
/// Row-level exclusions surface here as counts rather than aborting the
/// run.

use serde::{Deserialize, Serialize};

// ============================================================================
// Report structures
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    /// RFC 3339 instant the run finished assembling its outputs.
    pub timestamp: String,
    pub cur_source: SourceSummary,
    pub ctd_source: SourceSummary,
    /// Current-meter rows dropped by the cutover-year filter.
    pub cur_rows_dropped_at_cutover: usize,
    /// Size of the merged observation set fed to aggregation.
    pub merged_observations: usize,
    /// How the daily table was obtained ("hit", "miss", "invalid").
    pub cache_outcome: String,
    pub daily_rows: usize,
    /// First and last dates covered by the daily table, ISO form.
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub climatology: ClimatologySummary,
    pub anomaly_rows: usize,
}

/// Ingest accounting for one source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSummary {
    pub path: String,
    pub rows_read: usize,
    pub rows_used: usize,
    pub rows_excluded: usize,
    /// Distinct instrument deployment files contributing to the merged set.
    pub distinct_files: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimatologySummary {
    pub ref_start_year: i32,
    pub ref_end_year: i32,
    /// Slots (of 365) with at least one bin populated, per variable.
    pub temperature_slots_populated: usize,
    pub salinity_slots_populated: usize,
}

// ============================================================================
// Output
// ============================================================================

impl PipelineReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub fn print_summary(report: &PipelineReport) {
    println!("═══════════════════════════════════════════════════════════");
    println!("MOORING AGGREGATION SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    for source in [&report.cur_source, &report.ctd_source] {
        println!(
            "{}:  {}/{} rows usable  ({} excluded, {} deployment files in merge)",
            source.path,
            source.rows_used,
            source.rows_read,
            source.rows_excluded,
            source.distinct_files
        );
    }
    println!(
        "Merged set:       {} observations  ({} current-meter rows past cutover dropped)",
        report.merged_observations, report.cur_rows_dropped_at_cutover
    );
    println!(
        "Daily table:      {} rows  (cache {})",
        report.daily_rows, report.cache_outcome
    );
    if let (Some(first), Some(last)) = (&report.first_date, &report.last_date) {
        println!("Date span:        {} – {}", first, last);
    }
    println!(
        "Climatology:      {}-{}  T slots {}/365, S slots {}/365",
        report.climatology.ref_start_year,
        report.climatology.ref_end_year,
        report.climatology.temperature_slots_populated,
        report.climatology.salinity_slots_populated
    );
    println!("Anomaly rows:     {}", report.anomaly_rows);
    println!("═══════════════════════════════════════════════════════════");
}
