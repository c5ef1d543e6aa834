use core::fmt;
use core::ops::{Deref, Index, IndexMut, Mul};

use crate::traits::{MatrixMut, MatrixRef, Scalar};

use super::vector::Vector;
use super::{DimensionMismatch, Matrix};

/// Square matrix (wraps an N×N [`Matrix`]).
///
/// The LU factorizations take this as input, and `Q` and the explicit
/// permutation matrices come back as it. Read access to every `Matrix`
/// method goes through `Deref`; mutation is limited to element writes
/// and row/column swaps so the shape cannot change.
///
/// ```
/// use dense_factor::{Matrix, SquareMatrix};
///
/// let a = SquareMatrix::from_rows(2, &[1.0_f64, 2.0, 3.0, 4.0]);
/// assert_eq!(a.size(), 2);
/// assert_eq!(a[(1, 0)], 3.0);
///
/// let m = Matrix::<f64>::zeros(3, 3);
/// let s = SquareMatrix::try_from(m).unwrap();
/// assert_eq!(s.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix<T> {
    inner: Matrix<T>,
}

impl<T: Scalar> SquareMatrix<T> {
    /// Create an `n x n` matrix of zeros.
    pub fn zeros(n: usize) -> Self {
        Self {
            inner: Matrix::zeros(n, n),
        }
    }

    /// Create an `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        Self {
            inner: Matrix::eye(n),
        }
    }

    /// Create an `n x n` matrix from a flat slice in row-major order.
    pub fn from_rows(n: usize, row_major: &[T]) -> Self {
        Self {
            inner: Matrix::from_rows(n, n, row_major),
        }
    }

    /// Create an `n x n` matrix from a flat slice in column-major order.
    pub fn from_slice(n: usize, col_major: &[T]) -> Self {
        Self {
            inner: Matrix::from_slice(n, n, col_major),
        }
    }

    /// Overwrite with the identity.
    pub fn fill_identity(&mut self) {
        self.inner.fill_identity();
    }

    /// Transpose.
    pub fn transpose(&self) -> Self {
        Self {
            inner: self.inner.transpose(),
        }
    }

    /// Sum of diagonal elements.
    pub fn trace(&self) -> T {
        (0..self.size()).fold(T::zero(), |acc, i| acc + self.inner[(i, i)])
    }
}

#[cfg(feature = "random")]
impl<T> SquareMatrix<T>
where
    T: Scalar + PartialOrd + rand::distr::uniform::SampleUniform,
{
    /// Create an `n x n` matrix with entries drawn uniformly from `[min, max)`.
    pub fn random(n: usize, min: T, max: T, seed: u64) -> Self {
        Self {
            inner: Matrix::random(n, n, min, max, seed),
        }
    }
}

impl<T> SquareMatrix<T> {
    /// Create an `n x n` matrix by calling `f(row, col)` for each element.
    pub fn from_fn(n: usize, f: impl Fn(usize, usize) -> T) -> Self {
        Self {
            inner: Matrix::from_fn(n, n, f),
        }
    }

    /// Number of rows (and columns).
    #[inline]
    pub fn size(&self) -> usize {
        self.inner.nrows
    }

    /// Unwrap into the underlying matrix, moving the storage.
    #[inline]
    pub fn into_matrix(self) -> Matrix<T> {
        self.inner
    }

    /// Mutable column-major view of the storage.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.inner.data
    }

    /// Move the contents out, leaving an empty 0×0 matrix behind.
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }
}

impl<T: Copy> SquareMatrix<T> {
    /// Swap two rows in place.
    #[inline]
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        self.inner.swap_rows(a, b);
    }

    /// Swap two columns in place.
    #[inline]
    pub fn swap_cols(&mut self, a: usize, b: usize) {
        self.inner.swap_cols(a, b);
    }
}

impl<T> Default for SquareMatrix<T> {
    /// The empty 0×0 matrix.
    fn default() -> Self {
        Self {
            inner: Matrix::default(),
        }
    }
}

impl<T> Deref for SquareMatrix<T> {
    type Target = Matrix<T>;

    #[inline]
    fn deref(&self) -> &Matrix<T> {
        &self.inner
    }
}

impl<T> Index<(usize, usize)> for SquareMatrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: (usize, usize)) -> &T {
        &self.inner[idx]
    }
}

impl<T> IndexMut<(usize, usize)> for SquareMatrix<T> {
    #[inline]
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut T {
        &mut self.inner[idx]
    }
}

impl<T> MatrixRef<T> for SquareMatrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.inner.nrows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.inner.ncols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        self.inner.get(row, col)
    }

    #[inline]
    fn col_as_slice(&self, col: usize, row_start: usize) -> &[T] {
        self.inner.col_as_slice(col, row_start)
    }
}

impl<T> MatrixMut<T> for SquareMatrix<T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        self.inner.get_mut(row, col)
    }

    #[inline]
    fn col_as_mut_slice(&mut self, col: usize, row_start: usize) -> &mut [T] {
        self.inner.col_as_mut_slice(col, row_start)
    }

    fn swap_cols(&mut self, a: usize, b: usize)
    where
        T: Copy,
    {
        MatrixMut::swap_cols(&mut self.inner, a, b);
    }
}

// ── Conversions ─────────────────────────────────────────────────────

impl<T> From<SquareMatrix<T>> for Matrix<T> {
    #[inline]
    fn from(m: SquareMatrix<T>) -> Self {
        m.inner
    }
}

impl<T> TryFrom<Matrix<T>> for SquareMatrix<T> {
    type Error = DimensionMismatch;

    /// Adopt the storage of a matrix with `nrows == ncols`.
    fn try_from(m: Matrix<T>) -> Result<Self, Self::Error> {
        if !m.is_square() {
            return Err(DimensionMismatch {
                expected: (m.nrows, m.nrows),
                got: (m.nrows, m.ncols),
            });
        }
        Ok(Self { inner: m })
    }
}

impl<T: fmt::Display> fmt::Display for SquareMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

// ── Products ────────────────────────────────────────────────────────

impl<T: Scalar> Mul<&SquareMatrix<T>> for &SquareMatrix<T> {
    type Output = SquareMatrix<T>;

    fn mul(self, rhs: &SquareMatrix<T>) -> SquareMatrix<T> {
        SquareMatrix {
            inner: &self.inner * &rhs.inner,
        }
    }
}

impl<T: Scalar> Mul<&Matrix<T>> for &SquareMatrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        &self.inner * rhs
    }
}

impl<T: Scalar> Mul<&SquareMatrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: &SquareMatrix<T>) -> Matrix<T> {
        self * &rhs.inner
    }
}

impl<T: Scalar> Mul<&Vector<T>> for &SquareMatrix<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: &Vector<T>) -> Vector<T> {
        &self.inner * rhs
    }
}
