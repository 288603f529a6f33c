//! Error types for loading and normalizing roster data.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of a single load attempt. All are terminal for that attempt.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Transport failure: connect error, timeout, non-2xx status.
    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// Content could not be decoded as a table.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Workbook has no sheet with the requested name.
    #[error("Sheet '{sheet}' not found (available: {})", .available.join(", "))]
    MissingSheet { sheet: String, available: Vec<String> },

    /// Local file could not be read.
    #[error("Could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither a CSV nor a workbook extension.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),
}

/// Failures turning a raw table into a roster.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// Every required column absent from the table, in required order.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Anything that stops a roster from being installed.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}
