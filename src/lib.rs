//! Mooring observation aggregation pipeline.
//!
//! Ingests multi-decade temperature / salinity / dissolved-oxygen records
//! from two instrument families (current meters and CTD profilers),
//! groups them into fixed depth bins, and derives the chain of temporal
//! aggregates the station record is published from: daily means, a
//! 1990-2020 day-of-year climatology, and daily anomalies against that
//! baseline. Rendering of the resulting tables lives elsewhere.

pub mod analysis;
pub mod bins;
pub mod cache;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod temporal;
