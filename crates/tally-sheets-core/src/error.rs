//! Error types for tally-sheets-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a workbook
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed cell reference notation
    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),

    /// Malformed range notation or disallowed geometry
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Operation requires a selected sheet
    #[error("No sheet selected: {0}")]
    NoSheetSelected(String),

    /// Operation requires a selected row
    #[error("No row selected: {0}")]
    NoRowSelected(String),

    /// Sheet name collision within a session
    #[error("Sheet name already exists: {0}")]
    DuplicateSheet(String),

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Finalize attempted while a declared sheet has no rows
    #[error("Sheet '{0}' has no rows")]
    EmptySheet(String),

    /// Malformed named-range identifier
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Formula attachment would create a reference cycle
    #[error("Circular reference: {}", .path.join(" -> "))]
    CircularReference {
        /// The offending cycle, in dependency order
        path: Vec<String>,
    },

    /// Structural violation not covered by a more specific variant
    #[error("{0}")]
    Builder(String),
}

impl Error {
    /// Create a new catch-all builder error with a message
    pub fn builder<S: Into<String>>(msg: S) -> Self {
        Error::Builder(msg.into())
    }
}
