//! Owned N-dimensional tensors of fixed-point values
//!
//! [`Tensor`] wraps an `ndarray::ArrayD<Fixed>` kept in standard (row-major)
//! layout. The shape/buffer invariant is checked once in [`Tensor::new`];
//! every operation returns a fresh, independently owned tensor.
//!
//! Reductions and products accumulate with checked fixed-point arithmetic in
//! row-major order, so results are deterministic and overflow surfaces as an
//! error instead of wrapping.

use crate::fixed::{ArithmeticError, Fixed};
use ndarray::{Array2, ArrayD, ArrayViewD, Axis, Ix2, IxDyn, Slice};
use thiserror::Error;

/// Errors raised by tensor construction and operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TensorError {
    /// Buffer length does not match the product of the shape
    #[error("Shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch {
        /// Element count implied by the shape
        expected: usize,
        /// Element count supplied
        actual: usize,
    },

    /// Operation requires a different number of dimensions
    #[error("Rank mismatch: expected a {expected}-D tensor, got {actual}-D")]
    RankMismatch {
        /// Required rank
        expected: usize,
        /// Actual rank
        actual: usize,
    },

    /// Axis index out of range
    #[error("Axis {axis} out of range for a {ndim}-D tensor")]
    InvalidAxis {
        /// Requested axis
        axis: usize,
        /// Rank of the tensor
        ndim: usize,
    },

    /// Axes are not a permutation of `0..ndim`
    #[error("Invalid axis permutation {0:?}")]
    InvalidPermutation(Vec<usize>),

    /// Inner dimensions of a matrix product disagree
    #[error("Incompatible shapes for matmul: {left:?} x {right:?}")]
    IncompatibleMatmul {
        /// Left operand shape
        left: Vec<usize>,
        /// Right operand shape
        right: Vec<usize>,
    },

    /// Row range does not lie inside the tensor
    #[error("Row range {start}..{end} out of bounds for {rows} rows")]
    RowRange {
        /// First row (inclusive)
        start: usize,
        /// Last row (exclusive)
        end: usize,
        /// Rows available
        rows: usize,
    },

    /// Fixed-point arithmetic failure
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

/// N-dimensional array of [`Fixed`] values in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tensor {
    inner: ArrayD<Fixed>,
}

impl Tensor {
    /// Build a tensor from a shape and a row-major buffer
    ///
    /// # Errors
    /// Returns [`TensorError::ShapeMismatch`] if `data.len()` differs from the
    /// product of `shape`.
    pub fn new(shape: &[usize], data: Vec<Fixed>) -> Result<Self, TensorError> {
        let expected: usize = shape.iter().product();
        let actual = data.len();
        if actual != expected {
            return Err(TensorError::ShapeMismatch { expected, actual });
        }
        let inner = ArrayD::from_shape_vec(IxDyn(shape), data)
            .map_err(|_| TensorError::ShapeMismatch { expected, actual })?;
        Ok(Self { inner })
    }

    /// Zero-filled tensor of the given shape
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            inner: ArrayD::from_elem(IxDyn(shape), Fixed::ZERO),
        }
    }

    /// Dimension sizes
    pub fn shape(&self) -> &[usize] {
        self.inner.shape()
    }

    /// Number of dimensions
    pub fn ndim(&self) -> usize {
        self.inner.ndim()
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the tensor holds no elements
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Element at a row-major flat index
    pub fn get(&self, flat: usize) -> Option<Fixed> {
        self.inner.as_slice().and_then(|s| s.get(flat)).copied()
    }

    /// Element at a multi-dimensional index
    pub fn at(&self, index: &[usize]) -> Option<Fixed> {
        self.inner.get(index).copied()
    }

    /// Row-major copy of the buffer
    pub fn data(&self) -> Vec<Fixed> {
        self.inner.iter().copied().collect()
    }

    /// Read-only view of the underlying array
    pub fn as_array(&self) -> ArrayViewD<'_, Fixed> {
        self.inner.view()
    }

    /// Values converted to `f64`, for reporting
    pub fn to_f64(&self) -> ArrayD<f64> {
        self.inner.mapv(Fixed::to_f64)
    }

    /// Same elements under a new shape of equal element count
    pub fn reshape(&self, shape: &[usize]) -> Result<Self, TensorError> {
        Self::new(shape, self.data())
    }

    /// Permute axes; `axes[k]` names the source axis that becomes axis `k`
    pub fn transpose(&self, axes: &[usize]) -> Result<Self, TensorError> {
        let ndim = self.ndim();
        let mut seen = vec![false; ndim];
        let is_permutation = axes.len() == ndim
            && axes.iter().all(|&axis| {
                axis < ndim && !std::mem::replace(&mut seen[axis], true)
            });
        if !is_permutation {
            return Err(TensorError::InvalidPermutation(axes.to_vec()));
        }

        let permuted = self.inner.view().permuted_axes(IxDyn(axes));
        Ok(Self {
            inner: permuted.as_standard_layout().into_owned(),
        })
    }

    /// Matrix product of two 2-D tensors
    pub fn matmul(&self, other: &Self) -> Result<Self, TensorError> {
        let lhs = self.as_matrix()?;
        let rhs = other.as_matrix()?;
        if lhs.ncols() != rhs.nrows() {
            return Err(TensorError::IncompatibleMatmul {
                left: self.shape().to_vec(),
                right: other.shape().to_vec(),
            });
        }

        let mut out = Array2::from_elem((lhs.nrows(), rhs.ncols()), Fixed::ZERO);
        for ((i, j), cell) in out.indexed_iter_mut() {
            let mut acc = Fixed::ZERO;
            for (a, b) in lhs.row(i).iter().zip(rhs.column(j).iter()) {
                acc = acc.checked_add(a.checked_mul(*b)?)?;
            }
            *cell = acc;
        }

        Ok(Self {
            inner: out.into_dyn(),
        })
    }

    /// Sum along `axis`, keeping it as size 1 when `keepdims` is set
    pub fn sum_axis(&self, axis: usize, keepdims: bool) -> Result<Self, TensorError> {
        let ndim = self.ndim();
        if axis >= ndim {
            return Err(TensorError::InvalidAxis { axis, ndim });
        }

        let reduced = self.inner.fold_axis(
            Axis(axis),
            Ok(Fixed::ZERO),
            |acc: &Result<Fixed, ArithmeticError>, &x| acc.clone().and_then(|a| a.checked_add(x)),
        );
        let data = reduced
            .iter()
            .cloned()
            .collect::<Result<Vec<_>, _>>()?;

        let mut shape = self.shape().to_vec();
        if keepdims {
            shape[axis] = 1;
        } else {
            shape.remove(axis);
        }
        Self::new(&shape, data)
    }

    /// Sum of every element
    pub fn sum(&self) -> Result<Fixed, TensorError> {
        Ok(self
            .inner
            .iter()
            .try_fold(Fixed::ZERO, |acc, &x| acc.checked_add(x))?)
    }

    /// Copy of rows `start..end` of a 2-D tensor
    pub fn slice_rows(&self, start: usize, end: usize) -> Result<Self, TensorError> {
        let rows = self.as_matrix()?.nrows();
        if start > end || end > rows {
            return Err(TensorError::RowRange { start, end, rows });
        }
        let block = self
            .inner
            .slice_axis(Axis(0), Slice::from(start..end))
            .as_standard_layout()
            .into_owned();
        Ok(Self { inner: block })
    }

    fn as_matrix(&self) -> Result<ndarray::ArrayView2<'_, Fixed>, TensorError> {
        self.inner
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| TensorError::RankMismatch {
                expected: 2,
                actual: self.ndim(),
            })
    }
}
