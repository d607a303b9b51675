/// Observation ingest for the mooring aggregation pipeline.
///
/// Submodules:
/// - `obs_csv` — reads the CUR/CTD CSV exports into tagged `Observation`s
///   with row-level error collection, and merges the two instrument records.

pub mod obs_csv;
