/// Sampling-coverage tables.
///
/// Counts of non-null observations of one variable per (year, month),
/// split by instrument family, plus distinct-source-file counts. These
/// tables back the data-availability views of the record (heatmaps and
/// annual histograms are rendered elsewhere).

use chrono::Datelike;
use std::collections::HashSet;

use crate::model::{InstrumentKind, Observation, Variable};

/// Monthly observation counts for one variable across the record.
///
/// Rows run from `start_year` through `end_year` inclusive; the start year
/// is fixed across variables so their tables line up. Observations dated
/// before `start_year` are not counted.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageTable {
    pub variable: Variable,
    pub start_year: i32,
    pub end_year: i32,
    /// `[year - start_year][month - 1]`, current-meter observations.
    pub cur_counts: Vec<[u32; 12]>,
    /// Same layout, CTD observations.
    pub ctd_counts: Vec<[u32; 12]>,
}

impl CoverageTable {
    /// Count for one (year, month, family) cell; zero outside the table.
    pub fn count(&self, year: i32, month: u32, instrument: InstrumentKind) -> u32 {
        if year < self.start_year || year > self.end_year || !(1..=12).contains(&month) {
            return 0;
        }
        let row = (year - self.start_year) as usize;
        let col = (month - 1) as usize;
        match instrument {
            InstrumentKind::CurrentMeter => self.cur_counts[row][col],
            InstrumentKind::Ctd => self.ctd_counts[row][col],
        }
    }

    /// Per-year totals for one family, start_year..=end_year.
    pub fn annual_counts(&self, instrument: InstrumentKind) -> Vec<u32> {
        let rows = match instrument {
            InstrumentKind::CurrentMeter => &self.cur_counts,
            InstrumentKind::Ctd => &self.ctd_counts,
        };
        rows.iter().map(|months| months.iter().sum()).collect()
    }
}

/// Count non-null observations of `variable` per (year, month) and family.
///
/// The table always spans at least `start_year` itself; its last row is the
/// maximum observed year at or after `start_year`.
pub fn monthly_counts(
    observations: &[Observation],
    variable: Variable,
    start_year: i32,
) -> CoverageTable {
    let end_year = observations
        .iter()
        .map(|obs| obs.timestamp.year())
        .filter(|&y| y >= start_year)
        .max()
        .unwrap_or(start_year);
    let num_years = (end_year - start_year + 1) as usize;

    let mut cur_counts = vec![[0_u32; 12]; num_years];
    let mut ctd_counts = vec![[0_u32; 12]; num_years];

    for obs in observations {
        if obs.value(variable).is_none() {
            continue;
        }
        let year = obs.timestamp.year();
        if year < start_year {
            continue;
        }
        let row = (year - start_year) as usize;
        let col = (obs.timestamp.month() - 1) as usize;
        match obs.instrument {
            InstrumentKind::CurrentMeter => cur_counts[row][col] += 1,
            InstrumentKind::Ctd => ctd_counts[row][col] += 1,
        }
    }

    CoverageTable {
        variable,
        start_year,
        end_year,
        cur_counts,
        ctd_counts,
    }
}

/// Number of distinct source files of one family among the observations.
pub fn distinct_files(observations: &[Observation], instrument: InstrumentKind) -> usize {
    observations
        .iter()
        .filter(|obs| obs.instrument == instrument)
        .map(|obs| obs.filename.as_str())
        .collect::<HashSet<_>>()
        .len()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(
        filename: &str,
        instrument: InstrumentKind,
        year: i32,
        month: u32,
        temp: Option<f64>,
    ) -> Observation {
        Observation {
            filename: filename.to_string(),
            instrument,
            depth_m: 35.0,
            timestamp: NaiveDate::from_ymd_opt(year, month, 15)
                .unwrap()
                .and_hms_opt(6, 0, 0)
                .unwrap(),
            temperature: temp,
            salinity: None,
            oxygen_ml_l: None,
        }
    }

    #[test]
    fn test_counts_split_by_instrument_family() {
        let observations = vec![
            obs("a.cur", InstrumentKind::CurrentMeter, 1980, 3, Some(5.0)),
            obs("a.cur", InstrumentKind::CurrentMeter, 1980, 3, Some(5.5)),
            obs("b.ctd", InstrumentKind::Ctd, 1980, 3, Some(6.0)),
        ];
        let cov = monthly_counts(&observations, Variable::Temperature, 1979);
        assert_eq!(cov.count(1980, 3, InstrumentKind::CurrentMeter), 2);
        assert_eq!(cov.count(1980, 3, InstrumentKind::Ctd), 1);
        assert_eq!(cov.count(1980, 4, InstrumentKind::Ctd), 0);
    }

    #[test]
    fn test_null_values_are_not_counted() {
        let observations = vec![
            obs("a.cur", InstrumentKind::CurrentMeter, 1985, 7, None),
            obs("a.cur", InstrumentKind::CurrentMeter, 1985, 7, Some(8.0)),
        ];
        let cov = monthly_counts(&observations, Variable::Temperature, 1979);
        assert_eq!(cov.count(1985, 7, InstrumentKind::CurrentMeter), 1);
    }

    #[test]
    fn test_annual_counts_sum_months() {
        let observations = vec![
            obs("a.cur", InstrumentKind::CurrentMeter, 1979, 1, Some(1.0)),
            obs("a.cur", InstrumentKind::CurrentMeter, 1979, 12, Some(2.0)),
            obs("a.cur", InstrumentKind::CurrentMeter, 1981, 6, Some(3.0)),
        ];
        let cov = monthly_counts(&observations, Variable::Temperature, 1979);
        assert_eq!(
            cov.annual_counts(InstrumentKind::CurrentMeter),
            vec![2, 0, 1]
        );
    }

    #[test]
    fn test_observations_before_start_year_are_skipped() {
        let observations = vec![
            obs("a.cur", InstrumentKind::CurrentMeter, 1970, 5, Some(1.0)),
            obs("a.cur", InstrumentKind::CurrentMeter, 1979, 5, Some(2.0)),
        ];
        let cov = monthly_counts(&observations, Variable::Temperature, 1979);
        assert_eq!(cov.start_year, 1979);
        assert_eq!(cov.end_year, 1979);
        assert_eq!(cov.count(1979, 5, InstrumentKind::CurrentMeter), 1);
        assert_eq!(cov.count(1970, 5, InstrumentKind::CurrentMeter), 0);
    }

    #[test]
    fn test_distinct_files_counts_unique_names_per_family() {
        let observations = vec![
            obs("a.cur", InstrumentKind::CurrentMeter, 1980, 1, Some(1.0)),
            obs("a.cur", InstrumentKind::CurrentMeter, 1980, 2, Some(1.0)),
            obs("b.cur", InstrumentKind::CurrentMeter, 1981, 1, Some(1.0)),
            obs("c.ctd", InstrumentKind::Ctd, 2008, 1, Some(1.0)),
        ];
        assert_eq!(distinct_files(&observations, InstrumentKind::CurrentMeter), 2);
        assert_eq!(distinct_files(&observations, InstrumentKind::Ctd), 1);
    }
}
