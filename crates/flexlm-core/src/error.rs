use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the FlexLM log analyser.
#[derive(Error, Debug)]
pub enum FlexlmError {
    /// A log file could not be opened, read or decompressed.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A state keyword is not one of the license checkout states.
    #[error("Unknown license state: {0}")]
    UnknownState(String),

    /// An input path given on the command line does not exist.
    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),

    /// A report artifact (data table, plot script, PDF) could not be written.
    #[error("Failed to write report file {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external plotting tool could not be run or exited with an error.
    #[error("Plotter error: {0}")]
    Plotter(String),

    /// Stats could not be serialised to JSON.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the flexlm crates.
pub type Result<T> = std::result::Result<T, FlexlmError>;
