//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while building a formula
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Formula started without a function name
    #[error("No function name given")]
    NoFunction,

    /// Function not present in the catalog
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },
}

impl From<FormulaError> for tally_sheets_core::Error {
    fn from(e: FormulaError) -> Self {
        tally_sheets_core::Error::Builder(e.to_string())
    }
}
