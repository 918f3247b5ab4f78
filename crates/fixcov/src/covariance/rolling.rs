//! Rolling-window EWMA covariance
//!
//! Slides a fixed-width window one row at a time over a `(m, n)` data matrix
//! and computes one weighted covariance matrix per window position, giving
//! `m - w + 1` matrices in window-start order. The weight vector is built
//! once and shared by every window; index 0 weights the first row of each
//! window.
//!
//! Per-window diagnostics are delivered through a [`WindowObserver`] rather
//! than from inside the numeric loop.

use super::weighted::weighted_covariance_with;
use super::weights::exponential_weights;
use super::{CenteringMode, CovarianceError, Result};
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// Rolling EWMA covariance configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EwmaWindowConfig {
    /// Decay factor as a percentage (default: 94, i.e. λ = 0.94)
    /// Higher values = longer memory
    pub decay_percent: u32,

    /// Window width in rows (default: 20)
    pub window: usize,

    /// Centering applied before the second-moment product
    #[serde(default)]
    pub centering: CenteringMode,
}

impl Default for EwmaWindowConfig {
    fn default() -> Self {
        Self {
            decay_percent: 94,
            window: 20,
            centering: CenteringMode::Reference,
        }
    }
}

/// Receives each covariance matrix as soon as its window is computed
pub trait WindowObserver {
    /// Called once per window, in increasing `start` order
    fn on_window(&mut self, start: usize, covariance: &Tensor);
}

/// Observer that ignores every window
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl WindowObserver for NoopObserver {
    fn on_window(&mut self, _start: usize, _covariance: &Tensor) {}
}

/// Observer that emits a `tracing` debug event per window
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl WindowObserver for TracingObserver {
    fn on_window(&mut self, start: usize, covariance: &Tensor) {
        tracing::debug!(start, shape = ?covariance.shape(), "covariance window computed");
    }
}

/// Rolling EWMA covariance driver
#[derive(Debug, Clone)]
pub struct RollingCovariance {
    config: EwmaWindowConfig,
    weights: Tensor,
}

impl RollingCovariance {
    /// Validate the configuration and precompute the weight vector
    ///
    /// # Errors
    /// * [`CovarianceError::InvalidDecay`] if `decay_percent >= 100`
    /// * [`CovarianceError::EmptyWindow`] if `window == 0`
    pub fn new(config: EwmaWindowConfig) -> Result<Self> {
        if config.decay_percent >= 100 {
            return Err(CovarianceError::InvalidDecay(config.decay_percent));
        }
        if config.window == 0 {
            return Err(CovarianceError::EmptyWindow);
        }

        let weights = exponential_weights(config.decay_percent, config.window)?;
        Ok(Self { config, weights })
    }

    /// Create with default configuration.
    ///
    /// # Errors
    /// Returns an error if the default configuration is invalid (should not happen).
    pub fn try_default() -> Result<Self> {
        Self::new(EwmaWindowConfig::default())
    }

    /// Configuration in use
    pub const fn config(&self) -> &EwmaWindowConfig {
        &self.config
    }

    /// Weight vector shared by every window
    pub const fn weights(&self) -> &Tensor {
        &self.weights
    }

    /// Number of windows produced for `rows` observations
    pub fn window_count(&self, rows: usize) -> usize {
        rows.checked_sub(self.config.window)
            .map_or(0, |extra| extra + 1)
    }

    /// Covariance matrix for every window position
    pub fn run(&self, data: &Tensor) -> Result<Vec<Tensor>> {
        self.run_with_observer(data, &mut NoopObserver)
    }

    /// Like [`RollingCovariance::run`], reporting each window to `observer`
    ///
    /// # Errors
    /// * [`CovarianceError::Shape`] if `data` is not 2-D
    /// * [`CovarianceError::InvalidWindow`] if the window exceeds the rows
    /// * any error from the per-window covariance
    pub fn run_with_observer<O>(&self, data: &Tensor, observer: &mut O) -> Result<Vec<Tensor>>
    where
        O: WindowObserver + ?Sized,
    {
        let (rows, cols) = match *data.shape() {
            [rows, cols] => (rows, cols),
            _ => {
                return Err(CovarianceError::Shape {
                    expected: 2,
                    actual: data.ndim(),
                });
            }
        };
        let window = self.config.window;
        if window > rows {
            return Err(CovarianceError::InvalidWindow { window, rows });
        }

        let count = self.window_count(rows);
        tracing::debug!(
            rows,
            cols,
            window,
            decay_percent = self.config.decay_percent,
            centering = ?self.config.centering,
            count,
            "computing rolling covariance"
        );

        let mut matrices = Vec::with_capacity(count);
        for start in 0..count {
            let block = data.slice_rows(start, start + window)?;
            let covariance = weighted_covariance_with(&block, &self.weights, self.config.centering)?;
            observer.on_window(start, &covariance);
            matrices.push(covariance);
        }

        Ok(matrices)
    }
}

/// Rolling covariance with reference centering
///
/// # Arguments
/// * `data` - Observations, rows are time steps and columns variables
/// * `decay_percent` - Decay as a percentage (94 means 0.94)
/// * `window` - Window width in rows, `1 <= window <= rows`
pub fn rolling_covariance(data: &Tensor, decay_percent: u32, window: usize) -> Result<Vec<Tensor>> {
    RollingCovariance::new(EwmaWindowConfig {
        decay_percent,
        window,
        ..Default::default()
    })?
    .run(data)
}
