//! Exponentially weighted covariance estimation
//!
//! Builds EWMA weight vectors, turns them into diagonal weight matrices,
//! computes weighted covariance matrices for a block of observations, and
//! slides that computation across a full time series.

pub mod diagonal;
pub mod rolling;
pub mod weighted;
pub mod weights;

pub use diagonal::diagonalize;
pub use rolling::{
    EwmaWindowConfig, NoopObserver, RollingCovariance, TracingObserver, WindowObserver,
    rolling_covariance,
};
pub use weighted::{weighted_covariance, weighted_covariance_with};
pub use weights::{decay_factor, exponential_weights};

use crate::fixed::ArithmeticError;
use crate::tensor::TensorError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for covariance operations
pub type Result<T> = std::result::Result<T, CovarianceError>;

/// Errors that can occur during covariance estimation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CovarianceError {
    /// Input tensor has the wrong rank
    #[error("Input tensor is not {expected}D (got {actual}D)")]
    Shape {
        /// Required rank
        expected: usize,
        /// Actual rank
        actual: usize,
    },

    /// Data block rows disagree with the weight vector length
    #[error("Data/weight length mismatch: {actual} rows, {expected} weights")]
    DimensionMismatch {
        /// Weight vector length
        expected: usize,
        /// Rows in the data block
        actual: usize,
    },

    /// Window width of zero
    #[error("Invalid window: width must be at least 1")]
    EmptyWindow,

    /// Window wider than the available history
    #[error("Invalid window: width {window} exceeds {rows} available rows")]
    InvalidWindow {
        /// Requested window width
        window: usize,
        /// Rows in the data matrix
        rows: usize,
    },

    /// Decay percentage outside `0..100`
    #[error("Invalid decay parameter: {0} (must be between 0 and 99 percent)")]
    InvalidDecay(u32),

    /// Fixed-point arithmetic failure
    #[error("Arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),

    /// Tensor engine failure
    #[error("Tensor error: {0}")]
    Tensor(#[from] TensorError),
}

/// How observations are centered before the second-moment product
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CenteringMode {
    /// `centered[row, col] = weighted.flat[col] - mean[row]`, an `(n, n)` block
    ///
    /// Reproduces the historical output of this pipeline bit for bit.
    #[default]
    Reference,

    /// `centered[t, j] = x[t, j] - mean[j]`, numerator `Cᵀ · W · C`
    ///
    /// With unit weights this is the Bessel-corrected sample covariance.
    Columnwise,
}
