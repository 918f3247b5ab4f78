//! Diagonal matrix construction.

use super::{CovarianceError, Result};
use crate::fixed::Fixed;
use crate::tensor::Tensor;

/// Promote a 1-D vector of length `n` to an `(n, n)` diagonal matrix
///
/// Off-diagonal entries are [`Fixed::ZERO`].
///
/// # Errors
/// Returns [`CovarianceError::Shape`] if `vector` is not 1-D.
pub fn diagonalize(vector: &Tensor) -> Result<Tensor> {
    if vector.ndim() != 1 {
        return Err(CovarianceError::Shape {
            expected: 1,
            actual: vector.ndim(),
        });
    }

    let n = vector.len();
    let mut data = vec![Fixed::ZERO; n * n];
    for (i, value) in vector.data().into_iter().enumerate() {
        data[i * n + i] = value;
    }

    Ok(Tensor::new(&[n, n], data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(s: &str) -> Fixed {
        s.parse().unwrap()
    }

    #[test]
    fn test_diagonalize_two() {
        let v = Tensor::new(&[2], vec![fx("2.0"), fx("3.0")]).unwrap();
        let d = diagonalize(&v).unwrap();
        assert_eq!(d.shape(), &[2, 2]);
        assert_eq!(d.data(), vec![fx("2"), Fixed::ZERO, Fixed::ZERO, fx("3")]);
    }

    #[test]
    fn test_diagonalize_off_diagonal_zero() {
        let values: Vec<Fixed> = (1..=4).map(|i| Fixed::from_int(i).unwrap()).collect();
        let v = Tensor::new(&[4], values.clone()).unwrap();
        let d = diagonalize(&v).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { values[i] } else { Fixed::ZERO };
                assert_eq!(d.at(&[i, j]), Some(expected));
            }
        }
    }

    #[test]
    fn test_diagonalize_empty() {
        let v = Tensor::new(&[0], Vec::new()).unwrap();
        let d = diagonalize(&v).unwrap();
        assert_eq!(d.shape(), &[0, 0]);
        assert!(d.is_empty());
    }

    #[test]
    fn test_diagonalize_rejects_matrix() {
        let m = Tensor::zeros(&[2, 2]);
        assert_eq!(
            diagonalize(&m),
            Err(CovarianceError::Shape {
                expected: 1,
                actual: 2
            })
        );
        assert_eq!(
            diagonalize(&m).unwrap_err().to_string(),
            "Input tensor is not 1D (got 2D)"
        );
    }
}
