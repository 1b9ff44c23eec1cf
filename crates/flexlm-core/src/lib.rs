//! Shared types for the FlexLM log analyser.
//!
//! Holds the event and accumulator data model, the error type, the CLI
//! settings and the text renditions of the stats report and data tables.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{FlexlmError, Result};
