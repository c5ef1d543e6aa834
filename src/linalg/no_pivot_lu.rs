use core::fmt;

use crate::linalg::triangular::{
    back_substitute_in_place, forward_substitute_unit_in_place, UpperDiagonal,
};
use crate::linalg::{print_layout, LinalgError};
use crate::matrix::write_fixed;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};
use crate::{Matrix, SquareMatrix, Vector};

/// Perform LU decomposition without pivoting, in place.
///
/// On return, `a` contains both L and U packed together:
/// - Upper triangle (including diagonal): U
/// - Lower triangle (excluding diagonal): L (diagonal of L is implicitly 1)
///
/// No row exchanges are made, so a zero pivot (for example a leading zero
/// in a nonsingular matrix) fills the trailing entries with infinities or
/// NaNs. This is logged as a warning but not reported as an error.
pub fn no_pivot_lu_in_place<T: FloatScalar>(a: &mut impl MatrixMut<T>) {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "LU decomposition requires a square matrix");
    log::trace!("no-pivot LU of {n}x{n} matrix");

    for k in 0..n {
        if *a.get(k, k) == T::zero() {
            log::warn!("zero pivot in column {k} of unpivoted LU; factors will not be finite");
        }
        eliminate_column(a, k);
    }

    log::debug!("no-pivot LU of {n}x{n} matrix complete");
}

/// One Gaussian elimination step on the packed buffer, using `a[(k, k)]`
/// as pivot.
///
/// 1. Scale the sub-column: `a[k+1.., k] /= pivot` (the multipliers of L)
/// 2. Rank-1 update of the trailing block:
///    `a[k+1.., c] -= a[k+1.., k] * a[k, c]` for every `c > k`
pub(crate) fn eliminate_column<T: FloatScalar>(a: &mut impl MatrixMut<T>, k: usize) {
    let n = a.nrows();
    let pivot = *a.get(k, k);

    for x in a.col_as_mut_slice(k, k + 1) {
        *x = *x / pivot;
    }

    for c in (k + 1)..n {
        let u_kc = *a.get(k, c);
        for i in (k + 1)..n {
            let l_ik = *a.get(i, k);
            let v = a.get_mut(i, c);
            *v = *v - l_ik * u_kc;
        }
    }
}

/// Copy the unit lower-triangular factor out of a packed LU buffer.
pub(crate) fn unpack_l<T: FloatScalar>(lu: &impl MatrixRef<T>, l: &mut impl MatrixMut<T>) {
    assert_eq!(lu.nrows(), l.nrows(), "L must have {} rows", lu.nrows());
    assert_eq!(lu.ncols(), l.ncols(), "L must have {} columns", lu.ncols());
    for c in 0..lu.ncols() {
        for r in 0..lu.nrows() {
            *l.get_mut(r, c) = if r < c {
                T::zero()
            } else if r == c {
                T::one()
            } else {
                *lu.get(r, c)
            };
        }
    }
}

/// Copy the upper-triangular factor out of a packed LU buffer.
pub(crate) fn unpack_u<T: FloatScalar>(lu: &impl MatrixRef<T>, u: &mut impl MatrixMut<T>) {
    assert_eq!(lu.nrows(), u.nrows(), "U must have {} rows", lu.nrows());
    assert_eq!(lu.ncols(), u.ncols(), "U must have {} columns", lu.ncols());
    for c in 0..lu.ncols() {
        for r in 0..lu.nrows() {
            *u.get_mut(r, c) = if r <= c { *lu.get(r, c) } else { T::zero() };
        }
    }
}

/// Turn a packed buffer into L in place: the upper triangle is zeroed and
/// the diagonal set to one.
pub(crate) fn keep_l<T: FloatScalar>(lu: &mut SquareMatrix<T>) {
    let n = lu.size();
    for c in 0..n {
        for r in 0..=c {
            lu[(r, c)] = if r == c { T::one() } else { T::zero() };
        }
    }
}

/// Turn a packed buffer into U in place: the strict lower triangle is
/// zeroed.
pub(crate) fn keep_u<T: FloatScalar>(lu: &mut SquareMatrix<T>) {
    let n = lu.size();
    for c in 0..n {
        for r in (c + 1)..n {
            lu[(r, c)] = T::zero();
        }
    }
}

/// Solve `L U X = B` in place given a packed buffer.
pub(crate) fn lu_solve_in_place<T: FloatScalar>(lu: &SquareMatrix<T>, b: &mut impl MatrixMut<T>) {
    forward_substitute_unit_in_place(lu, b);
    back_substitute_in_place(lu, UpperDiagonal::Packed, b);
}

/// Product of the diagonal of a packed buffer.
pub(crate) fn diag_product<T: FloatScalar>(lu: &SquareMatrix<T>) -> T {
    (0..lu.size()).fold(T::one(), |acc, i| acc * lu[(i, i)])
}

/// Print the "L = " and "U = " blocks of a packed buffer.
pub(crate) fn fmt_lu<T: FloatScalar + fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    lu: &SquareMatrix<T>,
) -> fmt::Result {
    let (width, precision) = print_layout(f);
    let n = lu.size();
    let mut block = SquareMatrix::zeros(n);
    unpack_l(lu, &mut block);
    writeln!(f, "L = ")?;
    write_fixed(f, &block, width, precision)?;
    unpack_u(lu, &mut block);
    writeln!(f, "U = ")?;
    write_fixed(f, &block, width, precision)
}

// ── NoPivotLu ───────────────────────────────────────────────────────

/// LU factorization `A = L U` without pivoting.
///
/// Holds the packed buffer (L strictly below the diagonal with an implicit
/// unit diagonal, U on and above it) until it is moved out with one of the
/// `into_*` methods.
///
/// Only use this on matrices known to have nonzero leading principal
/// minors (diagonally dominant or symmetric positive definite, say). For
/// anything else use [`RowPivotLu`](crate::RowPivotLu).
///
/// # Example
///
/// ```
/// use dense_factor::{NoPivotLu, SquareMatrix, Vector};
///
/// let a = SquareMatrix::from_rows(2, &[4.0_f64, 3.0, 6.0, 3.0]);
/// let lu = NoPivotLu::new_from(&a);
///
/// let b = Vector::from_slice(&[10.0, 12.0]);
/// let x = lu.solve_vector(&b).unwrap();
/// assert!((x[0] - 1.0).abs() < 1e-12);
/// assert!((x[1] - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct NoPivotLu<T> {
    lu: Option<SquareMatrix<T>>,
}

impl<T> Default for NoPivotLu<T> {
    fn default() -> Self {
        Self { lu: None }
    }
}

impl<T: FloatScalar> NoPivotLu<T> {
    /// An empty, unfactored object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Factor a copy of `a`.
    pub fn new_from(a: &SquareMatrix<T>) -> Self {
        Self::from_owned(a.clone())
    }

    /// Factor `a`, reusing its storage.
    pub fn from_owned(a: SquareMatrix<T>) -> Self {
        let mut lu = Self::new();
        lu.compute(a);
        lu
    }

    /// Factor `a` in its own storage, replacing any previous factorization.
    pub fn compute(&mut self, mut a: SquareMatrix<T>) {
        no_pivot_lu_in_place(&mut a);
        self.lu = Some(a);
    }

    /// Factor a copy of `a`, replacing any previous factorization.
    pub fn compute_copy(&mut self, a: &SquareMatrix<T>) {
        self.compute(a.clone());
    }

    /// True when a packed buffer is held.
    #[inline]
    pub fn is_factored(&self) -> bool {
        self.lu.is_some()
    }

    /// Same as [`is_factored`](Self::is_factored).
    #[inline]
    pub fn has_lu(&self) -> bool {
        self.lu.is_some()
    }

    fn packed(&self) -> Result<&SquareMatrix<T>, LinalgError> {
        self.lu.as_ref().ok_or(LinalgError::NotFactored)
    }

    /// Borrow the packed buffer.
    pub fn get_lu(&self) -> Result<&SquareMatrix<T>, LinalgError> {
        self.packed()
    }

    /// A copy of the unit lower-triangular factor.
    pub fn get_l(&self) -> Result<SquareMatrix<T>, LinalgError> {
        let lu = self.packed()?;
        let mut l = SquareMatrix::zeros(lu.size());
        unpack_l(lu, &mut l);
        Ok(l)
    }

    /// Write L into `l`, which must already have the factor's shape.
    pub fn get_l_into(&self, l: &mut impl MatrixMut<T>) -> Result<(), LinalgError> {
        unpack_l(self.packed()?, l);
        Ok(())
    }

    /// A copy of the upper-triangular factor.
    pub fn get_u(&self) -> Result<SquareMatrix<T>, LinalgError> {
        let lu = self.packed()?;
        let mut u = SquareMatrix::zeros(lu.size());
        unpack_u(lu, &mut u);
        Ok(u)
    }

    /// Write U into `u`, which must already have the factor's shape.
    pub fn get_u_into(&self, u: &mut impl MatrixMut<T>) -> Result<(), LinalgError> {
        unpack_u(self.packed()?, u);
        Ok(())
    }

    /// Move L out, rewriting the packed buffer in place.
    pub fn into_l(self) -> Result<SquareMatrix<T>, LinalgError> {
        let mut lu = self.lu.ok_or(LinalgError::NotFactored)?;
        keep_l(&mut lu);
        Ok(lu)
    }

    /// Move U out, rewriting the packed buffer in place.
    pub fn into_u(self) -> Result<SquareMatrix<T>, LinalgError> {
        let mut lu = self.lu.ok_or(LinalgError::NotFactored)?;
        keep_u(&mut lu);
        Ok(lu)
    }

    /// Move the packed buffer out.
    pub fn into_lu(self) -> Result<SquareMatrix<T>, LinalgError> {
        self.lu.ok_or(LinalgError::NotFactored)
    }

    /// Solve `A X = B` in place: forward substitution with L, then back
    /// substitution with U.
    ///
    /// Panics if `b.nrows()` differs from the factor size.
    pub fn solve_in_place(&self, b: &mut impl MatrixMut<T>) -> Result<(), LinalgError> {
        lu_solve_in_place(self.packed()?, b);
        Ok(())
    }

    /// Solve `A X = B`, leaving `b` untouched.
    pub fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        self.solve_owned(b.clone())
    }

    /// Solve `A X = B`, writing the result into `b`'s storage.
    pub fn solve_owned(&self, mut b: Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        self.solve_in_place(&mut b)?;
        Ok(b)
    }

    /// Solve `A x = b` for a single right-hand side.
    pub fn solve_vector(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        self.solve_vector_owned(b.clone())
    }

    /// Solve `A x = b`, writing the result into `b`'s storage.
    pub fn solve_vector_owned(&self, mut b: Vector<T>) -> Result<Vector<T>, LinalgError> {
        self.solve_in_place(&mut b)?;
        Ok(b)
    }

    /// Determinant: product of the diagonal of U.
    pub fn det(&self) -> Result<T, LinalgError> {
        Ok(diag_product(self.packed()?))
    }

    /// Inverse, by solving against the identity.
    pub fn inverse(&self) -> Result<SquareMatrix<T>, LinalgError> {
        let lu = self.packed()?;
        let mut inv = SquareMatrix::identity(lu.size());
        lu_solve_in_place(lu, &mut inv);
        Ok(inv)
    }
}

impl<T: FloatScalar> From<SquareMatrix<T>> for NoPivotLu<T> {
    fn from(a: SquareMatrix<T>) -> Self {
        Self::from_owned(a)
    }
}

/// Prints "Not factored." or the L and U blocks, each entry right-aligned
/// in a field of `width` (default: precision + 9, precision 6).
impl<T: FloatScalar + fmt::Display> fmt::Display for NoPivotLu<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lu {
            None => writeln!(f, "Not factored."),
            Some(lu) => fmt_lu(f, lu),
        }
    }
}
