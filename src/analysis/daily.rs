/// Daily mean aggregation.
///
/// Reduces the merged observation stream to one record per distinct
/// calendar date, with the per-depth-bin mean of temperature and salinity
/// in each record. A cell with no qualifying observations is NaN, never
/// zero, and a date whose observations are all unbinned still yields a
/// record — the row set is the union of dates across all bins.
///
/// The reduction is a single grouped pass: one accumulator per date,
/// created on first encounter (which also fixes the representative
/// timestamp for that date), with per-(bin, variable) running sums inside.
/// Decades of sub-daily sampling make anything that rescans the full
/// observation set per date intractable.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

use crate::bins::BinSet;
use crate::model::{Observation, Variable};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One row of the daily-mean table: a representative timestamp (the
/// first-encountered record's parsed instant for that date) and the per-bin
/// means. Cells are NaN where no observation qualified.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub timestamp: NaiveDateTime,
    pub temperature: Vec<f64>,
    pub salinity: Vec<f64>,
}

impl DailyRecord {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Cell value for an aggregated variable at a bin index.
    pub fn value(&self, var: Variable, bin_idx: usize) -> f64 {
        match var {
            Variable::Temperature => self.temperature[bin_idx],
            Variable::Salinity => self.salinity[bin_idx],
            Variable::Oxygen => f64::NAN, // not aggregated
        }
    }
}

/// The daily-mean table: records sorted ascending by date, one per distinct
/// calendar date in the input, together with the bin set that shaped them.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTable {
    pub bins: BinSet,
    pub records: Vec<DailyRecord>,
}

impl DailyTable {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// First and last dates covered, if any records exist.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some((first.date(), last.date())),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// NaN-aware running mean.
#[derive(Debug, Clone, Copy, Default)]
struct MeanAcc {
    sum: f64,
    count: u32,
}

impl MeanAcc {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Mean of the accumulated values, NaN for an empty group.
    fn finish(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Per-date accumulator, created on first encounter of the date.
struct DateAcc {
    timestamp: NaiveDateTime,
    temperature: Vec<MeanAcc>,
    salinity: Vec<MeanAcc>,
}

impl DateAcc {
    fn new(timestamp: NaiveDateTime, num_bins: usize) -> DateAcc {
        DateAcc {
            timestamp,
            temperature: vec![MeanAcc::default(); num_bins],
            salinity: vec![MeanAcc::default(); num_bins],
        }
    }
}

/// Reduce observations to the daily-mean table.
///
/// Null measurement values are ignored in the means; unbinned observations
/// contribute to no cell but still establish their date's row.
pub fn aggregate_daily(observations: &[Observation], bins: &BinSet) -> DailyTable {
    let mut groups: HashMap<NaiveDate, DateAcc> = HashMap::new();

    for obs in observations {
        let date = obs.timestamp.date();
        let acc = groups
            .entry(date)
            .or_insert_with(|| DateAcc::new(obs.timestamp, bins.len()));

        if let Some(bin_idx) = bins.assign(obs.depth_m) {
            if let Some(t) = obs.temperature {
                acc.temperature[bin_idx].add(t);
            }
            if let Some(s) = obs.salinity {
                acc.salinity[bin_idx].add(s);
            }
        }
    }

    let mut records: Vec<DailyRecord> = groups
        .into_values()
        .map(|acc| DailyRecord {
            timestamp: acc.timestamp,
            temperature: acc.temperature.iter().map(MeanAcc::finish).collect(),
            salinity: acc.salinity.iter().map(MeanAcc::finish).collect(),
        })
        .collect();
    records.sort_by_key(|r| r.date());

    DailyTable {
        bins: bins.clone(),
        records,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InstrumentKind;
    use chrono::NaiveDate;

    fn obs_at(date: (i32, u32, u32), hms: (u32, u32, u32), depth: f64, temp: Option<f64>) -> Observation {
        Observation {
            filename: "e01.ctd".to_string(),
            instrument: InstrumentKind::Ctd,
            depth_m: depth,
            timestamp: NaiveDate::from_ymd_opt(date.0, date.1, date.2)
                .unwrap()
                .and_hms_opt(hms.0, hms.1, hms.2)
                .unwrap(),
            temperature: temp,
            salinity: None,
            oxygen_ml_l: None,
        }
    }

    #[test]
    fn test_two_observations_in_one_bin_average() {
        // Depths 33 and 36 both fall in the 35 m bin; 5.0 and 7.0 → 6.0.
        let observations = vec![
            obs_at((2000, 1, 5), (10, 0, 0), 33.0, Some(5.0)),
            obs_at((2000, 1, 5), (14, 0, 0), 36.0, Some(7.0)),
        ];
        let table = aggregate_daily(&observations, &BinSet::default());
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].temperature[0], 6.0);
    }

    #[test]
    fn test_empty_bin_cell_is_nan_and_row_is_kept() {
        // All observations this date sit at 20 m — unbinned — so the date's
        // row exists with every cell NaN.
        let observations = vec![obs_at((2000, 3, 1), (8, 0, 0), 20.0, Some(9.0))];
        let table = aggregate_daily(&observations, &BinSet::default());
        assert_eq!(table.len(), 1, "unbinned-only date still yields a row");
        for bin_idx in 0..table.bins.len() {
            assert!(
                table.records[0].temperature[bin_idx].is_nan(),
                "bin {} should be NaN, not zero",
                bin_idx
            );
            assert!(table.records[0].salinity[bin_idx].is_nan());
        }
    }

    #[test]
    fn test_null_values_are_ignored_not_zeroed() {
        let observations = vec![
            obs_at((2000, 1, 5), (10, 0, 0), 35.0, Some(6.0)),
            obs_at((2000, 1, 5), (11, 0, 0), 35.0, None),
        ];
        let table = aggregate_daily(&observations, &BinSet::default());
        // Mean over the single present value, not (6.0 + 0.0) / 2.
        assert_eq!(table.records[0].temperature[0], 6.0);
    }

    #[test]
    fn test_records_sorted_ascending_regardless_of_input_order() {
        let observations = vec![
            obs_at((2001, 6, 1), (0, 0, 0), 35.0, Some(10.0)),
            obs_at((1999, 2, 1), (0, 0, 0), 35.0, Some(5.0)),
            obs_at((2000, 4, 1), (0, 0, 0), 35.0, Some(7.0)),
        ];
        let table = aggregate_daily(&observations, &BinSet::default());
        let dates: Vec<NaiveDate> = table.records.iter().map(|r| r.date()).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted, "records must be date-ascending");
    }

    #[test]
    fn test_representative_timestamp_is_first_encountered() {
        // Two records on the same date, later instant first in input order.
        let observations = vec![
            obs_at((2000, 1, 5), (16, 30, 0), 35.0, Some(6.0)),
            obs_at((2000, 1, 5), (4, 0, 0), 35.0, Some(8.0)),
        ];
        let table = aggregate_daily(&observations, &BinSet::default());
        assert_eq!(
            table.records[0].timestamp,
            NaiveDate::from_ymd_opt(2000, 1, 5).unwrap().and_hms_opt(16, 30, 0).unwrap(),
            "first-encountered instant is the representative timestamp"
        );
    }

    #[test]
    fn test_bins_aggregate_independently() {
        let observations = vec![
            obs_at((2000, 1, 5), (0, 0, 0), 35.0, Some(10.0)),
            obs_at((2000, 1, 5), (0, 0, 0), 75.0, Some(8.0)),
            obs_at((2000, 1, 5), (0, 0, 0), 95.0, Some(6.0)),
        ];
        let table = aggregate_daily(&observations, &BinSet::default());
        let rec = &table.records[0];
        assert_eq!(rec.temperature[0], 10.0);
        assert_eq!(rec.temperature[1], 8.0);
        assert_eq!(rec.temperature[2], 6.0);
    }

    #[test]
    fn test_empty_input_yields_empty_table() {
        let table = aggregate_daily(&[], &BinSet::default());
        assert!(table.is_empty());
        assert_eq!(table.date_span(), None);
    }

    #[test]
    fn test_date_span_covers_first_and_last() {
        let observations = vec![
            obs_at((1990, 1, 1), (0, 0, 0), 35.0, Some(1.0)),
            obs_at((2020, 12, 31), (0, 0, 0), 35.0, Some(2.0)),
        ];
        let table = aggregate_daily(&observations, &BinSet::default());
        let (first, last) = table.date_span().unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2020, 12, 31).unwrap());
    }
}
