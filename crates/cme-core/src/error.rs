use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    /// File read failure with path context
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Spreadsheet could not be opened or its sheet decoded
    #[error("Failed to read spreadsheet {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },

    /// CSV parsing failure with path context
    #[error("Failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// SQL connection or query failure
    #[error("SQL source failed: {0}")]
    Sql(String),

    /// JSON parsing failure
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Date value could not be interpreted
    #[error("Failed to parse date: {0}")]
    DateParse(String),

    /// Data directory not found
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No spreadsheet files found in the data directory
    #[error("No data files found in {0}")]
    NoDataFiles(PathBuf),

    /// Terminal/UI related errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for other errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DashboardError>;
