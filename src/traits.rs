use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for floating-point matrix elements.
///
/// Required by the factorizations, which need `sqrt`, `abs`, `copysign`
/// and the smallest positive normal value.
pub trait FloatScalar: Scalar + Float {}

impl<T: Scalar + Float> FloatScalar for T {}

/// Read-only access to a matrix-like type.
///
/// The triangular solves and the permutation routines only touch their
/// right-hand sides through this trait, so they work for [`Matrix`],
/// [`Vector`], [`RowVector`] and [`SquareMatrix`] alike.
///
/// Storage is column-major: `col_as_slice(j, r)` is the contiguous run
/// `m[r..nrows, j]`.
///
/// [`Matrix`]: crate::Matrix
/// [`Vector`]: crate::Vector
/// [`RowVector`]: crate::RowVector
/// [`SquareMatrix`]: crate::SquareMatrix
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;
    fn col_as_slice(&self, col: usize, row_start: usize) -> &[T];
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access, enabling the in-place
/// factorization kernels and solves to work generically.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;
    fn col_as_mut_slice(&mut self, col: usize, row_start: usize) -> &mut [T];

    /// Swap two full rows.
    fn swap_rows(&mut self, a: usize, b: usize)
    where
        T: Copy,
    {
        if a == b {
            return;
        }
        for j in 0..self.ncols() {
            let tmp = *self.get(a, j);
            *self.get_mut(a, j) = *self.get(b, j);
            *self.get_mut(b, j) = tmp;
        }
    }

    /// Swap two full columns.
    fn swap_cols(&mut self, a: usize, b: usize)
    where
        T: Copy,
    {
        if a == b {
            return;
        }
        for i in 0..self.nrows() {
            let tmp = *self.get(i, a);
            *self.get_mut(i, a) = *self.get(i, b);
            *self.get_mut(i, b) = tmp;
        }
    }
}
