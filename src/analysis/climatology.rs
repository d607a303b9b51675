/// Fixed-baseline daily climatology.
///
/// Reduces the daily-mean table, restricted to the reference period, into a
/// 365-slot day-of-year mean profile per depth bin and variable. Slots are
/// ordinal positions within the calendar year, so leap and non-leap years
/// blend slightly misaligned dates into the same slot, and December 31 of a
/// leap year (ordinal 366) contributes to no slot at all. See
/// `temporal::clim_day_of_year`.

use chrono::Datelike;

use crate::analysis::daily::DailyTable;
use crate::model::Variable;
use crate::temporal::{self, CLIM_DAYS};

/// Day-of-year mean profile per bin for temperature and salinity.
///
/// Indexed `[bin][slot]` with slot 0 holding day-of-year 1. Slots with no
/// qualifying data are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct Climatology {
    pub ref_start_year: i32,
    pub ref_end_year: i32,
    pub temperature: Vec<Vec<f64>>,
    pub salinity: Vec<Vec<f64>>,
}

impl Climatology {
    /// Baseline value for a variable at a bin and 1-based day-of-year.
    pub fn value(&self, var: Variable, bin_idx: usize, day_of_year: u16) -> f64 {
        let slot = (day_of_year as usize) - 1;
        match var {
            Variable::Temperature => self.temperature[bin_idx][slot],
            Variable::Salinity => self.salinity[bin_idx][slot],
            Variable::Oxygen => f64::NAN,
        }
    }

    pub fn num_bins(&self) -> usize {
        self.temperature.len()
    }
}

/// Build the climatology from the daily-mean table.
///
/// Only records whose calendar year lies in `[ref_start_year, ref_end_year]`
/// inclusive contribute; NaN cells are ignored in the slot means. A single
/// pass accumulates sums and counts per (bin, variable, slot).
pub fn build_climatology(
    table: &DailyTable,
    ref_start_year: i32,
    ref_end_year: i32,
) -> Climatology {
    let num_bins = table.bins.len();

    let mut temp_sum = vec![vec![0.0_f64; CLIM_DAYS]; num_bins];
    let mut temp_count = vec![vec![0_u32; CLIM_DAYS]; num_bins];
    let mut sal_sum = vec![vec![0.0_f64; CLIM_DAYS]; num_bins];
    let mut sal_count = vec![vec![0_u32; CLIM_DAYS]; num_bins];

    for record in &table.records {
        let year = record.timestamp.year();
        if year < ref_start_year || year > ref_end_year {
            continue;
        }
        // Ordinal 366 falls outside the slot range and is skipped.
        let Some(day_of_year) = temporal::clim_day_of_year(record.timestamp) else {
            continue;
        };
        let slot = (day_of_year as usize) - 1;

        for bin_idx in 0..num_bins {
            let t = record.temperature[bin_idx];
            if !t.is_nan() {
                temp_sum[bin_idx][slot] += t;
                temp_count[bin_idx][slot] += 1;
            }
            let s = record.salinity[bin_idx];
            if !s.is_nan() {
                sal_sum[bin_idx][slot] += s;
                sal_count[bin_idx][slot] += 1;
            }
        }
    }

    let finish = |sums: Vec<Vec<f64>>, counts: Vec<Vec<u32>>| -> Vec<Vec<f64>> {
        sums.into_iter()
            .zip(counts)
            .map(|(bin_sums, bin_counts)| {
                bin_sums
                    .into_iter()
                    .zip(bin_counts)
                    .map(|(sum, count)| if count == 0 { f64::NAN } else { sum / count as f64 })
                    .collect()
            })
            .collect()
    };

    Climatology {
        ref_start_year,
        ref_end_year,
        temperature: finish(temp_sum, temp_count),
        salinity: finish(sal_sum, sal_count),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
