/// Daily anomalies relative to the fixed climatological baseline.
///
/// One anomaly record per daily record, across the full span of the record
/// — years outside the reference period are compared against the same
/// fixed profile. Subtraction is NaN-propagating: a missing daily mean or
/// an empty climatology slot yields a NaN anomaly, and a record on ordinal
/// day 366 (December 31 of a leap year) has no climatology slot to match,
/// so all of its cells are NaN.

use chrono::NaiveDateTime;

use crate::analysis::climatology::Climatology;
use crate::analysis::daily::DailyTable;
use crate::bins::BinSet;
use crate::model::Variable;
use crate::temporal;

/// One row of the anomaly table, aligned 1:1 with the daily-mean table.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyRecord {
    pub timestamp: NaiveDateTime,
    pub temperature: Vec<f64>,
    pub salinity: Vec<f64>,
}

/// Anomaly series for the full record, same bin layout as the daily table.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyTable {
    pub bins: BinSet,
    pub records: Vec<AnomalyRecord>,
}

impl AnomalyTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Subtract the climatology from each daily record.
pub fn compute_anomalies(table: &DailyTable, clim: &Climatology) -> AnomalyTable {
    let num_bins = table.bins.len();

    let records = table
        .records
        .iter()
        .map(|record| {
            let day_of_year = temporal::clim_day_of_year(record.timestamp);
            let cell = |var: Variable, bin_idx: usize| -> f64 {
                match day_of_year {
                    // NaN operands propagate through the subtraction.
                    Some(doy) => record.value(var, bin_idx) - clim.value(var, bin_idx, doy),
                    None => f64::NAN,
                }
            };
            AnomalyRecord {
                timestamp: record.timestamp,
                temperature: (0..num_bins).map(|b| cell(Variable::Temperature, b)).collect(),
                salinity: (0..num_bins).map(|b| cell(Variable::Salinity, b)).collect(),
            }
        })
        .collect();

    AnomalyTable {
        bins: table.bins.clone(),
        records,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
