#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod covariance;
pub mod fixed;
pub mod tensor;

// Re-export main types
pub use covariance::{
    CenteringMode, CovarianceError, EwmaWindowConfig, RollingCovariance, WindowObserver,
    diagonalize, exponential_weights, rolling_covariance, weighted_covariance,
};
pub use fixed::{ArithmeticError, Fixed};
pub use tensor::{Tensor, TensorError};
