use crate::linalg::{HouseholderQr, LinalgError, NoPivotLu, RowPivotLu};
use crate::traits::FloatScalar;

use super::{Matrix, SquareMatrix, Vector};

// ── Convenience methods on SquareMatrix ─────────────────────────────

impl<T: FloatScalar> SquareMatrix<T> {
    /// LU decomposition without pivoting.
    pub fn no_pivot_lu(&self) -> NoPivotLu<T> {
        NoPivotLu::new_from(self)
    }

    /// LU decomposition with partial pivoting.
    pub fn row_pivot_lu(&self) -> RowPivotLu<T> {
        RowPivotLu::new_from(self)
    }

    /// Solve `Ax = b` for `x` via row-pivoted LU.
    ///
    /// ```
    /// use dense_factor::{SquareMatrix, Vector};
    /// let a = SquareMatrix::from_rows(2, &[2.0_f64, 1.0, 5.0, 3.0]);
    /// let b = Vector::from_slice(&[4.0, 11.0]);
    /// let x = a.solve(&b).unwrap();
    /// assert!((x[0] - 1.0).abs() < 1e-12);
    /// assert!((x[1] - 2.0).abs() < 1e-12);
    /// ```
    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        self.row_pivot_lu().solve_vector(b)
    }

    /// Matrix inverse via row-pivoted LU.
    ///
    /// ```
    /// use dense_factor::SquareMatrix;
    /// let a = SquareMatrix::from_rows(2, &[4.0_f64, 7.0, 2.0, 6.0]);
    /// let a_inv = a.inverse().unwrap();
    /// let id = &a * &a_inv;
    /// assert!((id[(0, 0)] - 1.0).abs() < 1e-12);
    /// assert!((id[(0, 1)]).abs() < 1e-12);
    /// ```
    pub fn inverse(&self) -> Result<SquareMatrix<T>, LinalgError> {
        self.row_pivot_lu().inverse()
    }

    /// Determinant via row-pivoted LU.
    pub fn det(&self) -> Result<T, LinalgError> {
        self.row_pivot_lu().det()
    }
}

// ── Convenience methods on Matrix ───────────────────────────────────

impl<T: FloatScalar> Matrix<T> {
    /// QR decomposition using Householder reflections. Requires
    /// `nrows >= ncols`.
    pub fn householder_qr(&self) -> HouseholderQr<T> {
        HouseholderQr::new_from(self)
    }

    /// Least-squares solution of `Ax = b` via Householder QR: the `x`
    /// minimizing `‖Ax - b‖₂`.
    ///
    /// ```
    /// use dense_factor::{Matrix, Vector};
    /// let a = Matrix::from_rows(3, 1, &[1.0_f64, 1.0, 1.0]);
    /// let b = Vector::from_slice(&[1.0, 2.0, 6.0]);
    /// let x = a.solve_least_squares(&b).unwrap();
    /// assert!((x[0] - 3.0).abs() < 1e-12);
    /// ```
    pub fn solve_least_squares(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        self.householder_qr().solve_vector(b)
    }
}
