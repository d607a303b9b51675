/// Temporal aggregation stages of the pipeline.
///
/// Each submodule is a pure batch transform from an immutable input table
/// to a new output table; nothing here performs I/O.
///
/// Submodules:
/// - `daily` — per-calendar-date, per-depth-bin mean reduction.
/// - `climatology` — 365-slot day-of-year baseline over the reference period.
/// - `anomaly` — daily means minus the climatological baseline.
/// - `coverage` — observation-count tables backing availability views.

pub mod anomaly;
pub mod climatology;
pub mod coverage;
pub mod daily;
