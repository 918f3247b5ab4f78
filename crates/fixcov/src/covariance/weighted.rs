//! Weighted covariance of a single block of observations
//!
//! For a block `X` of shape `(m, n)` and weights `w` of length `m`:
//!
//! ```text
//! W      = diag(w)                       (m, m)
//! mean_j = (wᵀ X)_j / Σw                 weighted column means
//! C      = centered observations         (see CenteringMode)
//! Cov    = (Cᵀ · C) / (Σw - 1)           (n, n)
//! ```
//!
//! The `Σw - 1` denominator is a Bessel-style correction. It is zero when the
//! weights sum to exactly one, which surfaces as a division-by-zero error.

use super::diagonal::diagonalize;
use super::{CenteringMode, CovarianceError, Result};
use crate::fixed::Fixed;
use crate::tensor::Tensor;

/// Weighted covariance using [`CenteringMode::Reference`]
///
/// # Arguments
/// * `data` - Block of observations, rows are time steps and columns variables
/// * `weights` - One weight per row of `data`
///
/// # Returns
/// * Covariance matrix of shape `(n, n)`
pub fn weighted_covariance(data: &Tensor, weights: &Tensor) -> Result<Tensor> {
    weighted_covariance_with(data, weights, CenteringMode::Reference)
}

/// Weighted covariance with an explicit centering mode
///
/// # Errors
/// * [`CovarianceError::Shape`] if `data` is not 2-D or `weights` is not 1-D
/// * [`CovarianceError::DimensionMismatch`] if row and weight counts differ
/// * [`CovarianceError::Arithmetic`] on overflow or a zero denominator
pub fn weighted_covariance_with(
    data: &Tensor,
    weights: &Tensor,
    centering: CenteringMode,
) -> Result<Tensor> {
    let (m, n) = match *data.shape() {
        [m, n] => (m, n),
        _ => {
            return Err(CovarianceError::Shape {
                expected: 2,
                actual: data.ndim(),
            });
        }
    };
    if weights.ndim() != 1 {
        return Err(CovarianceError::Shape {
            expected: 1,
            actual: weights.ndim(),
        });
    }
    let l = weights.len();
    if m != l {
        return Err(CovarianceError::DimensionMismatch {
            expected: l,
            actual: m,
        });
    }

    let weight_matrix = diagonalize(weights)?;

    let weights_row = weights.reshape(&[1, l])?;
    let weighted_sum = weights_row.matmul(data)?;
    let total_weight = weights.sum()?;

    let mean = weighted_sum
        .data()
        .into_iter()
        .map(|sum| sum.checked_div(total_weight))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let numerator = match centering {
        CenteringMode::Reference => {
            let weighted = weight_matrix.matmul(data)?;
            let centered = reference_centering(&weighted, &mean)?;
            centered.transpose(&[1, 0])?.matmul(&centered)?
        }
        CenteringMode::Columnwise => {
            let centered = columnwise_centering(data, &mean)?;
            let weighted = weight_matrix.matmul(&centered)?;
            centered.transpose(&[1, 0])?.matmul(&weighted)?
        }
    };

    let denominator = total_weight.checked_sub(Fixed::ONE)?;
    let covariance = numerator
        .data()
        .into_iter()
        .map(|value| value.checked_div(denominator))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Tensor::new(&[n, n], covariance)?)
}

/// `(n, n)` block with `centered[row, col] = weighted.flat[col] - mean[row]`
///
/// Only the first `n` flat entries of `weighted` (its first row) take part.
fn reference_centering(weighted: &Tensor, mean: &[Fixed]) -> Result<Tensor> {
    let n = mean.len();
    let head: Vec<Fixed> = weighted.data().into_iter().take(n).collect();

    let mut centered = Vec::with_capacity(n * n);
    for &row_mean in mean {
        for &value in &head {
            centered.push(value.checked_sub(row_mean)?);
        }
    }

    Ok(Tensor::new(&[n, n], centered)?)
}

/// `(m, n)` block with `centered[t, j] = data[t, j] - mean[j]`
fn columnwise_centering(data: &Tensor, mean: &[Fixed]) -> Result<Tensor> {
    let centered = data
        .data()
        .into_iter()
        .zip(mean.iter().cycle())
        .map(|(value, &col_mean)| value.checked_sub(col_mean))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Tensor::new(data.shape(), centered)?)
}
