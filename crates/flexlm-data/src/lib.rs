//! Data ingestion and aggregation for the FlexLM log analyser.
//!
//! Responsible for reading (optionally gzip-compressed) lmgrd logs, matching
//! their lines into checkout/checkin events, tracking the current date,
//! deduplicating seats and folding the result into usage statistics or a
//! concurrency time series.

pub mod aggregator;
pub mod analysis;
pub mod date_tracker;
pub mod dedup;
pub mod parser;
pub mod reader;
pub mod timeseries;

pub use flexlm_core as core;
