use core::fmt;

use crate::linalg::no_pivot_lu::{
    diag_product, eliminate_column, fmt_lu, keep_l, keep_u, lu_solve_in_place, unpack_l, unpack_u,
};
use crate::linalg::{print_layout, LinalgError};
use crate::permutation::{PermutationKind, PermutationMatrix};
use crate::traits::{FloatScalar, MatrixMut};
use crate::{Matrix, SquareMatrix, Vector};

/// Perform LU decomposition with partial (row) pivoting, in place.
///
/// On return, `a` contains both L and U packed together:
/// - Upper triangle (including diagonal): U
/// - Lower triangle (excluding diagonal): L (diagonal of L is implicitly 1)
///
/// `p` is overwritten with the row permutation, stored as swaps: step `k`
/// exchanged rows `k` and `p[k]`, so that `P A = L U`. In each column the
/// pivot is the entry of largest magnitude on or below the diagonal; ties
/// go to the lowest row index.
///
/// Returns the number of row exchanges made.
///
/// ```
/// use dense_factor::{PermutationMatrix, SquareMatrix};
/// use dense_factor::linalg::row_pivot_lu_in_place;
///
/// let mut a = SquareMatrix::from_rows(2, &[1.0_f64, 2.0, 4.0, 2.0]);
/// let mut p = PermutationMatrix::default();
/// let swaps = row_pivot_lu_in_place(&mut a, &mut p);
/// assert_eq!(swaps, 1);
/// assert_eq!(p.to_permutation(), vec![1, 0]);
/// assert_eq!(a[(0, 0)], 4.0);
/// ```
pub fn row_pivot_lu_in_place<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
    p: &mut PermutationMatrix,
) -> usize {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "LU decomposition requires a square matrix");
    log::trace!("row-pivot LU of {n}x{n} matrix");

    *p = PermutationMatrix::new(n, PermutationKind::Row);
    let mut swaps = 0;

    for k in 0..n {
        // Partial pivoting: find row with largest magnitude in this column
        let mut max_row = k;
        let mut max_val = a.get(k, k).abs();
        for row in (k + 1)..n {
            let val = a.get(row, k).abs();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }

        if max_row != k {
            log::trace!("pivot column {k}: swapping rows {k} and {max_row}");
            p[k] = max_row;
            a.swap_rows(k, max_row);
            swaps += 1;
        }

        if max_val == T::zero() {
            log::warn!("column {k} has no nonzero pivot; matrix is singular");
        }

        eliminate_column(a, k);
    }

    log::debug!("row-pivot LU of {n}x{n} matrix complete with {swaps} row swaps");
    swaps
}

// ── RowPivotLu ──────────────────────────────────────────────────────

/// LU factorization with partial pivoting, `P A = L U`.
///
/// The packed L/U buffer and the permutation are held separately and can
/// be moved out independently with the `take_*` methods. The object counts
/// as factored only while it holds both.
///
/// # Example
///
/// ```
/// use dense_factor::{RowPivotLu, SquareMatrix, Vector};
///
/// let a = SquareMatrix::from_rows(3, &[
///     7.0_f64, 3.0, 4.0,
///     1.0, 2.0, 3.0,
///     6.0, 5.0, 4.0,
/// ]);
/// let lu = RowPivotLu::new_from(&a);
///
/// let b = Vector::from_slice(&[134.0, 68.0, 149.0]);
/// let x = lu.solve_vector(&b).unwrap();
/// assert!((x[0] - 7.0).abs() < 1e-12);
/// assert!((x[1] - 11.0).abs() < 1e-12);
/// assert!((x[2] - 13.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct RowPivotLu<T> {
    lu: Option<SquareMatrix<T>>,
    p: Option<PermutationMatrix>,
}

impl<T> Default for RowPivotLu<T> {
    fn default() -> Self {
        Self { lu: None, p: None }
    }
}

impl<T: FloatScalar> RowPivotLu<T> {
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
        let mut p = self.p.take().unwrap_or_default();
        row_pivot_lu_in_place(&mut a, &mut p);
        self.lu = Some(a);
        self.p = Some(p);
    }

    /// Factor a copy of `a`, replacing any previous factorization.
    pub fn compute_copy(&mut self, a: &SquareMatrix<T>) {
        self.compute(a.clone());
    }

    /// True while both the packed buffer and the permutation are held.
    #[inline]
    pub fn is_factored(&self) -> bool {
        self.lu.is_some() && self.p.is_some()
    }

    /// True while the packed buffer is held.
    #[inline]
    pub fn has_lu(&self) -> bool {
        self.lu.is_some()
    }

    /// True while the permutation is held.
    #[inline]
    pub fn has_p(&self) -> bool {
        self.p.is_some()
    }

    fn packed(&self) -> Result<&SquareMatrix<T>, LinalgError> {
        self.lu.as_ref().ok_or(LinalgError::NotFactored)
    }

    fn parts(&self) -> Result<(&SquareMatrix<T>, &PermutationMatrix), LinalgError> {
        match (&self.lu, &self.p) {
            (Some(lu), Some(p)) => Ok((lu, p)),
            _ => Err(LinalgError::NotFactored),
        }
    }

    /// Borrow the packed buffer.
    pub fn get_lu(&self) -> Result<&SquareMatrix<T>, LinalgError> {
        self.packed()
    }

    /// Borrow the row permutation.
    pub fn get_p(&self) -> Result<&PermutationMatrix, LinalgError> {
        self.p.as_ref().ok_or(LinalgError::NotFactored)
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

    /// Move L out. The packed buffer is rewritten into L, so U and LU are
    /// gone afterwards too.
    pub fn take_l(&mut self) -> Result<SquareMatrix<T>, LinalgError> {
        let mut lu = self.lu.take().ok_or(LinalgError::NotFactored)?;
        keep_l(&mut lu);
        Ok(lu)
    }

    /// Move U out. The packed buffer is rewritten into U, so L and LU are
    /// gone afterwards too.
    pub fn take_u(&mut self) -> Result<SquareMatrix<T>, LinalgError> {
        let mut lu = self.lu.take().ok_or(LinalgError::NotFactored)?;
        keep_u(&mut lu);
        Ok(lu)
    }

    /// Move the packed buffer out.
    pub fn take_lu(&mut self) -> Result<SquareMatrix<T>, LinalgError> {
        self.lu.take().ok_or(LinalgError::NotFactored)
    }

    /// Move the permutation out. L, U and LU stay accessible.
    pub fn take_p(&mut self) -> Result<PermutationMatrix, LinalgError> {
        self.p.take().ok_or(LinalgError::NotFactored)
    }

    /// Consume the factorization, returning the packed buffer and the
    /// permutation.
    pub fn into_parts(self) -> Result<(SquareMatrix<T>, PermutationMatrix), LinalgError> {
        match (self.lu, self.p) {
            (Some(lu), Some(p)) => Ok((lu, p)),
            _ => Err(LinalgError::NotFactored),
        }
    }

    /// Solve `A X = B` in place: permute the rows of `b`, then forward
    /// substitution with L and back substitution with U.
    ///
    /// Panics if `b.nrows()` differs from the factor size.
    pub fn solve_in_place(&self, b: &mut impl MatrixMut<T>) -> Result<(), LinalgError> {
        let (lu, p) = self.parts()?;
        p.permute_rows(b);
        lu_solve_in_place(lu, b);
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

    /// Determinant: product of the diagonal of U, negated for an odd
    /// number of row exchanges.
    pub fn det(&self) -> Result<T, LinalgError> {
        let (lu, p) = self.parts()?;
        let swaps = p
            .swaps()
            .iter()
            .enumerate()
            .filter(|&(k, &s)| k != s)
            .count();
        let d = diag_product(lu);
        Ok(if swaps % 2 == 0 { d } else { -d })
    }

    /// Inverse, by solving against the identity.
    pub fn inverse(&self) -> Result<SquareMatrix<T>, LinalgError> {
        let n = self.packed()?.size();
        let mut inv = SquareMatrix::identity(n);
        self.solve_in_place(&mut inv)?;
        Ok(inv)
    }
}

impl<T: FloatScalar> From<SquareMatrix<T>> for RowPivotLu<T> {
    fn from(a: SquareMatrix<T>) -> Self {
        Self::from_owned(a)
    }
}

/// Prints "Not factored." or the L, U and P blocks.
impl<T: FloatScalar + fmt::Display> fmt::Display for RowPivotLu<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok((lu, p)) = self.parts() else {
            return writeln!(f, "Not factored.");
        };
        let (width, precision) = print_layout(f);
        fmt_lu(f, lu)?;
        writeln!(f, "P = ")?;
        writeln!(f, "{:width$.precision$}", p, width = width, precision = precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec;

    const TOL: f64 = 1e-12;

    fn a3() -> SquareMatrix<f64> {
        SquareMatrix::from_rows(3, &[7.0, 3.0, 4.0, 1.0, 2.0, 3.0, 6.0, 5.0, 4.0])
    }

    #[test]
    fn pivot_rows_chosen_by_magnitude() {
        let lu = RowPivotLu::new_from(&a3());
        // |7| is already the largest in column 0; after elimination the
        // trailing column 1 is [2 - 3/7, 5 - 18/7] so rows 1 and 2 swap
        assert_eq!(lu.get_p().unwrap().to_permutation(), vec![0, 2, 1]);
        let l = lu.get_l().unwrap();
        for r in 0..3 {
            for c in 0..r {
                assert!(l[(r, c)].abs() <= 1.0);
            }
        }
    }

    #[test]
    fn reconstruct_pa() {
        let a = a3();
        let lu = RowPivotLu::new_from(&a);
        let l = lu.get_l().unwrap();
        let u = lu.get_u().unwrap();
        let pa = lu.get_p().unwrap() * &a;
        assert!((&l * &u).max_abs_diff(&pa) < TOL);
    }

    #[test]
    fn tie_breaks_on_lowest_row() {
        let a = SquareMatrix::from_rows(3, &[1.0, 0.0, 0.0, -3.0, 1.0, 0.0, 3.0, 0.0, 1.0]);
        let lu = RowPivotLu::new_from(&a);
        assert_eq!(lu.get_p().unwrap().swaps()[0], 1);
    }

    #[test]
    fn det_with_swap_parity() {
        let a = SquareMatrix::from_rows(2, &[0.0_f64, 1.0, 1.0, 0.0]);
        assert!((RowPivotLu::new_from(&a).det().unwrap() + 1.0).abs() < TOL);

        // det = 7(8-15) - 3(4-18) + 4(5-12) = -49 + 42 - 28
        assert!((RowPivotLu::new_from(&a3()).det().unwrap() + 35.0).abs() < TOL);
    }

    #[test]
    fn inverse_roundtrip() {
        let a = a3();
        let inv = RowPivotLu::new_from(&a).inverse().unwrap();
        assert!((&a * &inv).max_abs_diff(&Matrix::eye(3)) < TOL);
    }

    #[test]
    fn take_p_keeps_factors() {
        let mut lu = RowPivotLu::new_from(&a3());
        let l = lu.get_l().unwrap();
        let p = lu.take_p().unwrap();
        assert_eq!(p.kind(), PermutationKind::Row);
        assert!(!lu.is_factored());
        assert!(lu.has_lu());
        assert_eq!(lu.get_l().unwrap(), l);
        assert_eq!(lu.take_p().unwrap_err(), LinalgError::NotFactored);
        assert_eq!(
            lu.solve_vector(&Vector::zeros(3)).unwrap_err(),
            LinalgError::NotFactored
        );
    }

    #[test]
    fn take_u_consumes_packed_buffer() {
        let mut lu = RowPivotLu::new_from(&a3());
        let u = lu.get_u().unwrap();
        assert_eq!(lu.take_u().unwrap(), u);
        assert!(!lu.has_lu());
        assert!(lu.has_p());
        assert_eq!(lu.get_l().unwrap_err(), LinalgError::NotFactored);
        assert_eq!(lu.take_lu().unwrap_err(), LinalgError::NotFactored);
    }

    #[test]
    fn recompute_after_take() {
        let mut lu = RowPivotLu::new_from(&a3());
        let _ = lu.take_lu().unwrap();
        let _ = lu.take_p().unwrap();
        lu.compute_copy(&a3());
        assert!(lu.is_factored());
        let (packed, p) = lu.into_parts().unwrap();
        assert_eq!(packed.size(), 3);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn singular_column_logs_and_continues() {
        let a = SquareMatrix::from_rows(2, &[1.0, 2.0, 2.0, 4.0]);
        let lu = RowPivotLu::new_from(&a);
        assert!(lu.is_factored());
        assert_eq!(lu.get_u().unwrap()[(1, 1)], 0.0);
        assert_eq!(lu.det().unwrap(), 0.0);
    }

    #[test]
    fn display_includes_permutation() {
        let lu = RowPivotLu::new_from(&SquareMatrix::from_rows(2, &[1.0, 0.0, 2.0, 1.0]));
        let s = format!("{lu:5.1}");
        assert!(s.starts_with("L = \n"));
        assert!(s.ends_with("P = \n    1    0\n"));
        assert_eq!(format!("{}", RowPivotLu::<f64>::new()), "Not factored.\n");
    }
}
