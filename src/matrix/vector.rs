use alloc::vec::Vec;
use core::fmt;
use core::ops::{Deref, Index, IndexMut, Mul};

use crate::traits::{MatrixMut, MatrixRef, Scalar};

use super::{DimensionMismatch, Matrix};

/// Column vector (wraps an N×1 [`Matrix`]).
///
/// Enforces the single-column shape and provides single-index access
/// `v[i]`. Converting to and from `Matrix` moves the storage without
/// copying.
///
/// # Examples
///
/// ```
/// use dense_factor::{Matrix, Vector};
///
/// let v = Vector::from_slice(&[1.0_f64, 2.0, 3.0]);
/// assert_eq!(v[0], 1.0);
/// assert_eq!(v.len(), 3);
/// assert_eq!(v.nrows(), 3);
/// assert_eq!(v.ncols(), 1);
///
/// let m: Matrix<f64> = v.into();
/// assert_eq!(m[(2, 0)], 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T> {
    inner: Matrix<T>,
}

/// Row vector (wraps a 1×N [`Matrix`]).
///
/// ```
/// use dense_factor::RowVector;
/// let r = RowVector::from_slice(&[1.0_f64, 2.0]);
/// assert_eq!(r.nrows(), 1);
/// assert_eq!(r[1], 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RowVector<T> {
    inner: Matrix<T>,
}

macro_rules! impl_vector_common {
    ($V:ident, $shape:ident) => {
        impl<T: Scalar> $V<T> {
            /// Create a vector from a flat slice.
            pub fn from_slice(data: &[T]) -> Self {
                Self::from_vec(data.to_vec())
            }

            /// Create a zero vector of length `n`.
            pub fn zeros(n: usize) -> Self {
                let (r, c) = $shape(n);
                Self {
                    inner: Matrix::zeros(r, c),
                }
            }

            /// Create a vector filled with a value.
            pub fn fill(n: usize, value: T) -> Self {
                let (r, c) = $shape(n);
                Self {
                    inner: Matrix::fill(r, c, value),
                }
            }

            /// Dot product.
            pub fn dot(&self, rhs: &Self) -> T {
                assert_eq!(self.len(), rhs.len(), "vector length mismatch");
                self.as_slice()
                    .iter()
                    .zip(rhs.as_slice())
                    .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
            }
        }

        impl<T> $V<T> {
            /// Create a vector from an owned `Vec` without copying.
            pub fn from_vec(data: Vec<T>) -> Self {
                let (r, c) = $shape(data.len());
                Self {
                    inner: Matrix {
                        data,
                        nrows: r,
                        ncols: c,
                    },
                }
            }

            /// Number of elements.
            #[inline]
            pub fn len(&self) -> usize {
                self.inner.data.len()
            }

            /// Whether the vector is empty.
            #[inline]
            pub fn is_empty(&self) -> bool {
                self.inner.data.is_empty()
            }

            /// View the vector data as a slice.
            #[inline]
            pub fn as_slice(&self) -> &[T] {
                &self.inner.data
            }

            /// View the vector data as a mutable slice.
            #[inline]
            pub fn as_mut_slice(&mut self) -> &mut [T] {
                &mut self.inner.data
            }

            /// Unwrap into the underlying matrix, moving the storage.
            #[inline]
            pub fn into_matrix(self) -> Matrix<T> {
                self.inner
            }

            /// Consume the vector, returning its elements.
            #[inline]
            pub fn into_vec(self) -> Vec<T> {
                self.inner.data
            }

            /// Move the contents out, leaving an empty vector behind.
            pub fn take(&mut self) -> Self {
                core::mem::take(self)
            }
        }

        impl<T> Default for $V<T> {
            /// The empty vector.
            fn default() -> Self {
                Self::from_vec(Vec::new())
            }
        }

        impl<T> Deref for $V<T> {
            type Target = Matrix<T>;

            #[inline]
            fn deref(&self) -> &Matrix<T> {
                &self.inner
            }
        }

        impl<T> Index<usize> for $V<T> {
            type Output = T;

            #[inline]
            fn index(&self, i: usize) -> &T {
                &self.inner.data[i]
            }
        }

        impl<T> IndexMut<usize> for $V<T> {
            #[inline]
            fn index_mut(&mut self, i: usize) -> &mut T {
                &mut self.inner.data[i]
            }
        }

        impl<T> MatrixRef<T> for $V<T> {
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

        impl<T> MatrixMut<T> for $V<T> {
            #[inline]
            fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
                self.inner.get_mut(row, col)
            }

            #[inline]
            fn col_as_mut_slice(&mut self, col: usize, row_start: usize) -> &mut [T] {
                self.inner.col_as_mut_slice(col, row_start)
            }
        }

        impl<T> From<$V<T>> for Matrix<T> {
            #[inline]
            fn from(v: $V<T>) -> Self {
                v.inner
            }
        }

        impl<T> TryFrom<Matrix<T>> for $V<T> {
            type Error = DimensionMismatch;

            fn try_from(m: Matrix<T>) -> Result<Self, Self::Error> {
                let expected = $shape(m.data.len());
                if expected != (m.nrows, m.ncols) {
                    return Err(DimensionMismatch {
                        expected,
                        got: (m.nrows, m.ncols),
                    });
                }
                Ok(Self { inner: m })
            }
        }

        impl<T: fmt::Display> fmt::Display for $V<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.inner, f)
            }
        }
    };
}

fn column_shape(n: usize) -> (usize, usize) {
    (n, 1)
}

fn row_shape(n: usize) -> (usize, usize) {
    (1, n)
}

impl_vector_common!(Vector, column_shape);
impl_vector_common!(RowVector, row_shape);

impl<T: Copy> Vector<T> {
    /// Transpose into a row vector, moving the storage.
    pub fn transpose(self) -> RowVector<T> {
        RowVector::from_vec(self.inner.data)
    }
}

impl<T: Copy> RowVector<T> {
    /// Transpose into a column vector, moving the storage.
    pub fn transpose(self) -> Vector<T> {
        Vector::from_vec(self.inner.data)
    }
}

// ── Products ────────────────────────────────────────────────────────

impl<T: Scalar> Mul<&Vector<T>> for &Matrix<T> {
    type Output = Vector<T>;

    /// `A * x`, returned as a column vector.
    fn mul(self, rhs: &Vector<T>) -> Vector<T> {
        Vector {
            inner: self * &rhs.inner,
        }
    }
}

impl<T: Scalar> Mul<&Matrix<T>> for &RowVector<T> {
    type Output = RowVector<T>;

    /// `y * A`, returned as a row vector.
    fn mul(self, rhs: &Matrix<T>) -> RowVector<T> {
        RowVector {
            inner: &self.inner * rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_is_column() {
        let v = Vector::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(v.len(), 3);
        assert_eq!(v.nrows(), 3);
        assert_eq!(v.ncols(), 1);
        assert_eq!(*v.get(2, 0), 3.0);
    }

    #[test]
    fn row_vector_shape() {
        let r = RowVector::from_vec(alloc::vec![1.0, 2.0]);
        assert_eq!(r.nrows(), 1);
        assert_eq!(r.ncols(), 2);
        assert_eq!(*r.get(0, 1), 2.0);
    }

    #[test]
    fn try_from_matrix() {
        let m = Matrix::from_rows(3, 1, &[1.0, 2.0, 3.0]);
        let v = Vector::try_from(m).unwrap();
        assert_eq!(v[1], 2.0);

        let wide = Matrix::<f64>::zeros(2, 3);
        let err = Vector::try_from(wide).unwrap_err();
        assert_eq!(err.got, (2, 3));
        assert_eq!(err.expected, (6, 1));

        let r = RowVector::try_from(Matrix::from_rows(1, 2, &[4.0, 5.0])).unwrap();
        assert_eq!(r[0], 4.0);
        assert!(RowVector::try_from(Matrix::<f64>::zeros(2, 1)).is_err());
    }

    #[test]
    fn matrix_vector_product() {
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let x = Vector::from_slice(&[1.0, 1.0]);
        let y = &a * &x;
        assert_eq!(y.as_slice(), &[3.0, 7.0]);

        let r = RowVector::from_slice(&[1.0, 1.0]);
        let z = &r * &a;
        assert_eq!(z.as_slice(), &[4.0, 6.0]);
    }

    #[test]
    fn transpose_moves() {
        let v = Vector::from_slice(&[1.0, 2.0]);
        let r = v.transpose();
        assert_eq!(r.ncols(), 2);
        let v = r.transpose();
        assert_eq!(v.nrows(), 2);
    }

    #[test]
    fn dot() {
        let a = Vector::from_slice(&[1.0, 2.0, 3.0]);
        let b = Vector::from_slice(&[4.0, 5.0, 6.0]);
        assert_eq!(a.dot(&b), 32.0);
    }
}
