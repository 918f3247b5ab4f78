//! CLI error type.

use fixcov::{ArithmeticError, CovarianceError, TensorError};
use thiserror::Error;

/// Errors surfaced by the command-line interface
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// CSV reading error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Cell that is not a decimal number in range
    #[error("Invalid value at row {row}, column {column}: {source}")]
    Cell {
        /// Data row (0-based, header excluded)
        row: usize,
        /// Column (0-based)
        column: usize,
        /// Parse failure
        source: ArithmeticError,
    },

    /// Input could not be assembled into a matrix
    #[error("Tensor error: {0}")]
    Tensor(#[from] TensorError),

    /// Covariance computation failed
    #[error("Covariance error: {0}")]
    Covariance(#[from] CovarianceError),
}
