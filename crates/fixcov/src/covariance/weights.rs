//! EWMA weight generation.

use super::Result;
use crate::fixed::Fixed;
use crate::tensor::Tensor;

/// Decay factor `lambda = lambda_unscaled / 100` in fixed point
pub fn decay_factor(lambda_unscaled: u32) -> Result<Fixed> {
    let percent = Fixed::from_unscaled(lambda_unscaled, false)?;
    Ok(percent.checked_div(Fixed::from_unscaled(100, false)?)?)
}

/// Generate exponentially decaying weights.
///
/// Entry `i` is `(1 - lambda) * lambda^i` with `lambda = lambda_unscaled / 100`,
/// so index 0 carries the largest weight. The vector is not normalized.
///
/// Powers are accumulated by repeated truncating multiplication, which keeps
/// the sequence non-increasing for every `lambda < 1`.
///
/// # Arguments
/// * `lambda_unscaled` - Decay as a percentage (94 means 0.94)
/// * `len` - Number of weights
pub fn exponential_weights(lambda_unscaled: u32, len: usize) -> Result<Tensor> {
    let lambda = decay_factor(lambda_unscaled)?;
    let scale = Fixed::ONE.checked_sub(lambda)?;

    let mut weights = Vec::with_capacity(len);
    let mut power = Fixed::ONE;
    for i in 0..len {
        weights.push(scale.checked_mul(power)?);
        if i + 1 < len {
            power = power.checked_mul(lambda)?;
        }
    }

    Ok(Tensor::new(&[len], weights)?)
}
