/// Depth-bin registry for the mooring aggregation pipeline.
///
/// Defines the canonical set of nominal instrument depths and the vertical
/// tolerance used to group observations recorded at slightly different
/// depths. This is the single source of truth for bin centers — all other
/// modules should take a `BinSet` rather than hardcoding depths, and the
/// column names of the persisted daily-mean table are derived from here.

use crate::model::Variable;

/// Nominal instrument depths on the mooring line, in meters, shallow to
/// deep. Instruments sit near but not exactly at these depths across
/// deployments.
pub const DEFAULT_BIN_CENTERS_M: [f64; 3] = [35.0, 75.0, 95.0];

/// Half-width of the vertical window around each bin center, in meters.
pub const DEFAULT_TOLERANCE_M: f64 = 5.0;

// ---------------------------------------------------------------------------
// Bin types
// ---------------------------------------------------------------------------

/// A named nominal depth with its tolerance window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthBin {
    /// Nominal depth in meters.
    pub center_m: f64,
    /// Half-width of the inclusive window `[center - tol, center + tol]`.
    pub tolerance_m: f64,
}

impl DepthBin {
    /// True if the depth falls within this bin's window, both ends
    /// inclusive.
    pub fn contains(&self, depth_m: f64) -> bool {
        depth_m >= self.center_m - self.tolerance_m && depth_m <= self.center_m + self.tolerance_m
    }
}

/// An ordered set of depth bins with disjoint windows.
///
/// Disjointness is by construction for the default set (30–40, 70–80,
/// 90–100) and asserted in tests; `assign` returns the first match, so an
/// overlapping custom set would silently prefer the shallower bin.
#[derive(Debug, Clone, PartialEq)]
pub struct BinSet {
    bins: Vec<DepthBin>,
}

impl BinSet {
    pub fn new(centers_m: &[f64], tolerance_m: f64) -> BinSet {
        BinSet {
            bins: centers_m
                .iter()
                .map(|&center_m| DepthBin {
                    center_m,
                    tolerance_m,
                })
                .collect(),
        }
    }

    pub fn bins(&self) -> &[DepthBin] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Index of the bin whose window contains `depth_m`, or `None` if the
    /// observation is unbinned. At most one bin matches in a disjoint set.
    pub fn assign(&self, depth_m: f64) -> Option<usize> {
        self.bins.iter().position(|bin| bin.contains(depth_m))
    }

    /// Column name for a (variable, bin) cell in the persisted daily-mean
    /// table, e.g. `Temperature_35m`.
    pub fn column_name(&self, var: Variable, bin_idx: usize) -> String {
        format!("{}_{}m", var.column_stem(), self.bins[bin_idx].center_m as i64)
    }

    /// Full ordered header of the persisted daily-mean table:
    /// `Datetime`, then each aggregated variable across all bins.
    pub fn daily_table_header(&self) -> Vec<String> {
        let mut header = vec!["Datetime".to_string()];
        for var in Variable::AGGREGATED {
            for bin_idx in 0..self.bins.len() {
                header.push(self.column_name(var, bin_idx));
            }
        }
        header
    }
}

impl Default for BinSet {
    fn default() -> BinSet {
        BinSet::new(&DEFAULT_BIN_CENTERS_M, DEFAULT_TOLERANCE_M)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
