//! Forward and back substitution on packed triangular factors.
//!
//! Both solvers work column by column on the right-hand side and only read
//! entries of the solution that are already final, so the right-hand side
//! and the solution may share storage (the `_in_place` forms).

use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

/// Where the diagonal of an upper-triangular factor lives.
#[derive(Debug, Clone, Copy)]
pub enum UpperDiagonal<'a, T> {
    /// On the diagonal of the factor itself (LU).
    Packed,
    /// In a separate slice (QR's `R_diag`, whose storage slot is taken by
    /// the reflectors).
    Separate(&'a [T]),
}

impl<T: Copy> UpperDiagonal<'_, T> {
    #[inline]
    fn get(&self, u: &impl MatrixRef<T>, k: usize) -> T {
        match self {
            UpperDiagonal::Packed => *u.get(k, k),
            UpperDiagonal::Separate(d) => d[k],
        }
    }
}

/// Solve `L X = B` in place, where `L` is unit lower-triangular.
///
/// Only the strict lower triangle of `l` is read; its diagonal is taken
/// to be one. On entry `x` holds `B`, on return it holds `X`.
///
/// Panics if `l` is not square or `x.nrows() != l.nrows()`.
///
/// ```
/// use dense_factor::Matrix;
/// use dense_factor::linalg::triangular::forward_substitute_unit_in_place;
///
/// // L = [[1, 0], [2, 1]] stored in the lower triangle; the diagonal is ignored
/// let l = Matrix::from_rows(2, 2, &[9.0_f64, 9.0, 2.0, 9.0]);
/// let mut x = Matrix::from_rows(2, 1, &[1.0, 4.0]);
/// forward_substitute_unit_in_place(&l, &mut x);
/// assert_eq!(x.as_slice(), &[1.0, 2.0]);
/// ```
pub fn forward_substitute_unit_in_place<T: FloatScalar>(
    l: &impl MatrixRef<T>,
    x: &mut impl MatrixMut<T>,
) {
    let n = l.nrows();
    assert_eq!(n, l.ncols(), "forward substitution requires a square factor");
    assert_eq!(
        x.nrows(),
        n,
        "right-hand side has {} rows, factor has {}",
        x.nrows(),
        n,
    );

    for i in 0..x.ncols() {
        let xi = x.col_as_mut_slice(i, 0);
        for r in 0..n {
            let mut sum = xi[r];
            for c in 0..r {
                sum = sum - *l.get(r, c) * xi[c];
            }
            xi[r] = sum;
        }
    }
}

/// Solve `U X = B` in place, where `U` is upper-triangular.
///
/// `U` is the `n x n` upper triangle of `u` with `n = u.ncols()`; `u` may
/// have more rows than that (a packed QR buffer). The strict upper
/// triangle is read from `u` and the diagonal from `diag`. Only the first
/// `n` rows of `x` take part: on entry they hold `B`, on return `X`.
///
/// A zero on the diagonal produces infinities or NaNs; it is not detected.
///
/// Panics if `u.nrows() < n` or `x.nrows() < n`.
pub fn back_substitute_in_place<T: FloatScalar>(
    u: &impl MatrixRef<T>,
    diag: UpperDiagonal<'_, T>,
    x: &mut impl MatrixMut<T>,
) {
    let n = u.ncols();
    assert!(u.nrows() >= n, "back substitution requires rows >= cols");
    assert!(
        x.nrows() >= n,
        "right-hand side has {} rows, factor needs {}",
        x.nrows(),
        n,
    );
    if let UpperDiagonal::Separate(d) = diag {
        assert_eq!(d.len(), n, "diagonal length must equal the factor's columns");
    }

    for i in 0..x.ncols() {
        let xi = x.col_as_mut_slice(i, 0);
        for r in (0..n).rev() {
            let mut sum = xi[r];
            for c in (r + 1)..n {
                sum = sum - *u.get(r, c) * xi[c];
            }
            xi[r] = sum / diag.get(u, r);
        }
    }
}

/// Solve `L X = B` into a separate `x`, leaving `b` untouched.
///
/// Panics unless `b` and `x` both have the factor's row count and the same
/// number of columns.
pub fn forward_substitute_unit<T: FloatScalar>(
    l: &impl MatrixRef<T>,
    b: &impl MatrixRef<T>,
    x: &mut impl MatrixMut<T>,
) {
    copy_leading_rows(b, x, l.nrows());
    forward_substitute_unit_in_place(l, x);
}

/// Solve `U X = B` into a separate `x` with `u.ncols()` rows, reading only
/// the leading `u.ncols()` rows of `b`.
pub fn back_substitute<T: FloatScalar>(
    u: &impl MatrixRef<T>,
    diag: UpperDiagonal<'_, T>,
    b: &impl MatrixRef<T>,
    x: &mut impl MatrixMut<T>,
) {
    copy_leading_rows(b, x, u.ncols());
    back_substitute_in_place(u, diag, x);
}

fn copy_leading_rows<T: Copy>(b: &impl MatrixRef<T>, x: &mut impl MatrixMut<T>, n: usize) {
    assert_eq!(x.nrows(), n, "solution must have {} rows, has {}", n, x.nrows());
    assert!(b.nrows() >= n, "right-hand side has {} rows, needs {}", b.nrows(), n);
    assert_eq!(b.ncols(), x.ncols(), "right-hand side and solution column counts differ");
    for i in 0..b.ncols() {
        x.col_as_mut_slice(i, 0)
            .copy_from_slice(&b.col_as_slice(i, 0)[..n]);
    }
}
