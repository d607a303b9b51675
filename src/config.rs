/// Pipeline configuration.
///
/// All input and output locations are explicit fields here — the pipeline
/// never resolves paths through the process working directory. A config can
/// be built in code (tests do this) or loaded from a TOML file.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bins::{BinSet, DEFAULT_BIN_CENTERS_M, DEFAULT_TOLERANCE_M};
use crate::model::PipelineError;

/// Current-meter records on or after this year are dropped from the merged
/// set: the CTD record supersedes the current meters from 2008 onward.
pub const DEFAULT_CUTOVER_YEAR: i32 = 2007;

/// First year of the fixed climatology baseline.
pub const DEFAULT_REF_START_YEAR: i32 = 1990;

/// Last year of the fixed climatology baseline, inclusive.
pub const DEFAULT_REF_END_YEAR: i32 = 2020;

/// First year shown in coverage tables, shared across variables so the
/// tables line up.
pub const DEFAULT_COVERAGE_START_YEAR: i32 = 1979;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// CSV export of the current-meter record.
    pub cur_file: PathBuf,
    /// CSV export of the CTD record.
    pub ctd_file: PathBuf,
    /// Location of the persisted daily-mean table. Reused if present and
    /// valid, written after a fresh computation otherwise.
    pub daily_means_file: PathBuf,
    /// Nominal bin depths in meters.
    pub bin_centers_m: Vec<f64>,
    /// Vertical half-window around each bin center, in meters.
    pub bin_tolerance_m: f64,
    /// Climatology reference period, both ends inclusive.
    pub ref_start_year: i32,
    pub ref_end_year: i32,
    /// Current-meter records with year >= this are excluded from the merge.
    pub cutover_year: i32,
    /// First year of the coverage tables.
    pub coverage_start_year: i32,
}

impl Default for PipelineConfig {
    fn default() -> PipelineConfig {
        PipelineConfig {
            cur_file: PathBuf::from("e01_cur_data_all.csv"),
            ctd_file: PathBuf::from("e01_ctd_data.csv"),
            daily_means_file: PathBuf::from("e01_daily_mean_TS_data.csv"),
            bin_centers_m: DEFAULT_BIN_CENTERS_M.to_vec(),
            bin_tolerance_m: DEFAULT_TOLERANCE_M,
            ref_start_year: DEFAULT_REF_START_YEAR,
            ref_end_year: DEFAULT_REF_END_YEAR,
            cutover_year: DEFAULT_CUTOVER_YEAR,
            coverage_start_year: DEFAULT_COVERAGE_START_YEAR,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file. Missing keys fall back to the
    /// defaults above.
    pub fn from_toml_file(path: &Path) -> Result<PipelineConfig, PipelineError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::Io(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&text)
            .map_err(|e| PipelineError::Io(format!("{}: {}", path.display(), e)))
    }

    /// The depth-bin set configured for this run.
    pub fn bin_set(&self) -> BinSet {
        BinSet::new(&self.bin_centers_m, self.bin_tolerance_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_station_record() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.bin_centers_m, vec![35.0, 75.0, 95.0]);
        assert_eq!(cfg.bin_tolerance_m, 5.0);
        assert_eq!(cfg.ref_start_year, 1990);
        assert_eq!(cfg.ref_end_year, 2020);
        assert_eq!(cfg.cutover_year, 2007);
    }

    #[test]
    fn test_toml_overrides_merge_with_defaults() {
        let cfg: PipelineConfig = toml::from_str(
            r#"
            cur_file = "/data/e01/cur.csv"
            ref_end_year = 2010
            "#,
        )
        .expect("partial TOML should deserialize with defaults");
        assert_eq!(cfg.cur_file, PathBuf::from("/data/e01/cur.csv"));
        assert_eq!(cfg.ref_end_year, 2010);
        // Untouched keys keep their defaults.
        assert_eq!(cfg.ref_start_year, 1990);
        assert_eq!(cfg.bin_centers_m.len(), 3);
    }

    #[test]
    fn test_bin_set_reflects_configured_centers() {
        let mut cfg = PipelineConfig::default();
        cfg.bin_centers_m = vec![10.0];
        cfg.bin_tolerance_m = 1.0;
        let bins = cfg.bin_set();
        assert_eq!(bins.len(), 1);
        assert_eq!(bins.assign(10.5), Some(0));
        assert_eq!(bins.assign(35.0), None);
    }

    #[test]
    fn test_missing_config_file_is_an_io_error() {
        let err = PipelineConfig::from_toml_file(Path::new("/nonexistent/moorclim.toml"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
