use core::fmt;

use crate::linalg::triangular::{back_substitute, back_substitute_in_place, UpperDiagonal};
use crate::linalg::{print_layout, LinalgError};
use crate::matrix::write_fixed;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};
use crate::{Matrix, SquareMatrix, Vector};

/// Householder QR decomposition in place.
///
/// For an `m x n` matrix `a` with `m >= n`, on return:
/// - Strict upper triangle of `a`: strict upper part of R
/// - Column `k` from row `k` down: the reflector `w_k`, scaled so that
///   `H_k = I - w_k w_kᵀ` (that is `‖w_k‖ = √2`)
/// - `r_diag`: the diagonal of R
///
/// A column whose remaining norm is below `2 * T::min_positive_value()`
/// gets the reflector `√2 e_k` and a zero on the diagonal of R.
pub fn householder_qr_in_place<T: FloatScalar>(a: &mut impl MatrixMut<T>, r_diag: &mut [T]) {
    let m = a.nrows();
    let n = a.ncols();
    assert!(m >= n, "QR decomposition requires rows >= cols");
    assert_eq!(r_diag.len(), n, "r_diag length must equal the column count");
    log::trace!("Householder QR of {m}x{n} matrix");

    let two = T::one() + T::one();
    let threshold = T::min_positive_value() * two;

    for k in 0..n {
        let sq_norm = a
            .col_as_slice(k, k)
            .iter()
            .fold(T::zero(), |acc, &x| acc + x * x);
        let norm = sq_norm.sqrt();

        if norm > threshold {
            // Reflect onto -sign(x0)·‖x‖·e_k, away from x
            let x0 = *a.get(k, k);
            let x_p = -norm.copysign(x0);
            let scale = (x0.abs() * norm + sq_norm).sqrt();
            *a.get_mut(k, k) = x0 - x_p;
            for x in a.col_as_mut_slice(k, k) {
                *x = *x / scale;
            }
            r_diag[k] = x_p;
        } else {
            log::debug!("column {k} has negligible norm; using identity reflector");
            *a.get_mut(k, k) = two.sqrt();
            r_diag[k] = T::zero();
        }

        // Apply H_k to the trailing columns
        for c in (k + 1)..n {
            let mut dot = T::zero();
            for r in k..m {
                dot = dot + *a.get(r, k) * *a.get(r, c);
            }
            for r in k..m {
                let w = *a.get(r, k);
                let v = a.get_mut(r, c);
                *v = *v - w * dot;
            }
        }
    }

    log::debug!("Householder QR of {m}x{n} matrix complete");
}

/// Apply `H_k = I - w wᵀ` to rows `k..` of every column of `b`.
fn reflect<T: FloatScalar>(w: &[T], k: usize, b: &mut impl MatrixMut<T>) {
    for i in 0..b.ncols() {
        let col = b.col_as_mut_slice(i, k);
        let dot = w
            .iter()
            .zip(col.iter())
            .fold(T::zero(), |acc, (&wr, &br)| acc + wr * br);
        for (x, &wr) in col.iter_mut().zip(w) {
            *x = *x - wr * dot;
        }
    }
}

#[derive(Debug, Clone)]
struct Factors<T> {
    rw: Matrix<T>,
    r_diag: Vector<T>,
}

// ── HouseholderQr ───────────────────────────────────────────────────

/// QR factorization `A = Q R` of an `m x n` matrix (`m >= n`) by
/// Householder reflections.
///
/// Q is never formed explicitly. It is applied through the stored
/// reflectors with [`apply_q`](Self::apply_q) and
/// [`apply_qt`](Self::apply_qt), or materialized on request with
/// [`get_q`](Self::get_q).
///
/// # Example
///
/// ```
/// use dense_factor::{HouseholderQr, Matrix, Vector};
///
/// // Least-squares fit of y = c0 + c1 t through three points
/// let a = Matrix::from_rows(3, 2, &[1.0_f64, 0.0, 1.0, 1.0, 1.0, 2.0]);
/// let qr = HouseholderQr::new_from(&a);
/// let y = Vector::from_slice(&[1.0, 3.0, 5.0]);
/// let c = qr.solve_vector(&y).unwrap();
/// assert_eq!(c.len(), 2);
/// assert!((c[0] - 1.0).abs() < 1e-12);
/// assert!((c[1] - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct HouseholderQr<T> {
    factors: Option<Factors<T>>,
}

impl<T> Default for HouseholderQr<T> {
    fn default() -> Self {
        Self { factors: None }
    }
}

impl<T: FloatScalar> HouseholderQr<T> {
    /// An empty, unfactored object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Factor a copy of `a`.
    pub fn new_from(a: &Matrix<T>) -> Self {
        Self::from_owned(a.clone())
    }

    /// Factor `a`, reusing its storage as the working buffer.
    pub fn from_owned(a: Matrix<T>) -> Self {
        let mut qr = Self::new();
        qr.compute(a);
        qr
    }

    /// Factor `a` in its own storage, replacing any previous factorization.
    ///
    /// Panics if `a` has fewer rows than columns.
    pub fn compute(&mut self, mut a: Matrix<T>) {
        let mut r_diag = match self.factors.take() {
            Some(f) if f.r_diag.len() == a.ncols() => f.r_diag,
            _ => Vector::zeros(a.ncols()),
        };
        householder_qr_in_place(&mut a, r_diag.as_mut_slice());
        self.factors = Some(Factors { rw: a, r_diag });
    }

    /// Factor a copy of `a`, replacing any previous factorization.
    pub fn compute_copy(&mut self, a: &Matrix<T>) {
        self.compute(a.clone());
    }

    /// True when the reflectors and R are held.
    #[inline]
    pub fn is_factored(&self) -> bool {
        self.factors.is_some()
    }

    fn factors(&self) -> Result<&Factors<T>, LinalgError> {
        self.factors.as_ref().ok_or(LinalgError::NotFactored)
    }

    /// Borrow the working buffer: strict upper part of R above the
    /// diagonal, reflectors on and below it.
    pub fn get_rw(&self) -> Result<&Matrix<T>, LinalgError> {
        Ok(&self.factors()?.rw)
    }

    /// Borrow the diagonal of R.
    pub fn get_r_diag(&self) -> Result<&Vector<T>, LinalgError> {
        Ok(&self.factors()?.r_diag)
    }

    /// Move the working buffer and the diagonal of R out.
    pub fn into_rw(self) -> Result<(Matrix<T>, Vector<T>), LinalgError> {
        let f = self.factors.ok_or(LinalgError::NotFactored)?;
        Ok((f.rw, f.r_diag))
    }

    // ── Applying Q ──────────────────────────────────────────────────

    /// Overwrite `b` with `Qᵀ b`.
    ///
    /// Panics if `b.nrows()` differs from the row count of A.
    pub fn apply_qt_in_place(&self, b: &mut impl MatrixMut<T>) -> Result<(), LinalgError> {
        let rw = &self.factors()?.rw;
        assert_eq!(b.nrows(), rw.nrows(), "Qᵀ applied to matrix with wrong row count");
        for k in 0..rw.ncols() {
            reflect(rw.col_as_slice(k, k), k, b);
        }
        Ok(())
    }

    /// `Qᵀ b`, leaving `b` untouched.
    pub fn apply_qt(&self, b: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        self.apply_qt_owned(b.clone())
    }

    /// `Qᵀ b`, written into `b`'s storage.
    pub fn apply_qt_owned(&self, mut b: Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        self.apply_qt_in_place(&mut b)?;
        Ok(b)
    }

    /// Overwrite `x` with `Q x`.
    ///
    /// Panics if `x.nrows()` differs from the row count of A.
    pub fn apply_q_in_place(&self, x: &mut impl MatrixMut<T>) -> Result<(), LinalgError> {
        let rw = &self.factors()?.rw;
        assert_eq!(x.nrows(), rw.nrows(), "Q applied to matrix with wrong row count");
        for k in (0..rw.ncols()).rev() {
            reflect(rw.col_as_slice(k, k), k, x);
        }
        Ok(())
    }

    /// `Q x`, leaving `x` untouched.
    pub fn apply_q(&self, x: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        self.apply_q_owned(x.clone())
    }

    /// `Q x`, written into `x`'s storage.
    pub fn apply_q_owned(&self, mut x: Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        self.apply_q_in_place(&mut x)?;
        Ok(x)
    }

    // ── Extracting Q and R ──────────────────────────────────────────

    /// The full `m x m` orthogonal factor.
    pub fn get_q(&self) -> Result<SquareMatrix<T>, LinalgError> {
        let mut q = SquareMatrix::identity(self.factors()?.rw.nrows());
        self.apply_q_in_place(&mut q)?;
        Ok(q)
    }

    /// Write Q into `q`, which must already be `m x m`.
    pub fn get_q_into(&self, q: &mut impl MatrixMut<T>) -> Result<(), LinalgError> {
        let m = self.factors()?.rw.nrows();
        assert_eq!((q.nrows(), q.ncols()), (m, m), "Q must be {m}x{m}");
        for c in 0..m {
            for r in 0..m {
                *q.get_mut(r, c) = if r == c { T::one() } else { T::zero() };
            }
        }
        self.apply_q_in_place(q)
    }

    /// The `m x n` upper-triangular factor.
    pub fn get_r(&self) -> Result<Matrix<T>, LinalgError> {
        let rw = &self.factors()?.rw;
        let mut r = Matrix::zeros(rw.nrows(), rw.ncols());
        self.get_r_into(&mut r)?;
        Ok(r)
    }

    /// Write R into `r`, which must already be `m x n`.
    pub fn get_r_into(&self, r: &mut impl MatrixMut<T>) -> Result<(), LinalgError> {
        let Factors { rw, r_diag } = self.factors()?;
        let (m, n) = (rw.nrows(), rw.ncols());
        assert_eq!((r.nrows(), r.ncols()), (m, n), "R must be {m}x{n}");
        for c in 0..n {
            for row in 0..m {
                *r.get_mut(row, c) = if row < c {
                    rw[(row, c)]
                } else if row == c {
                    r_diag[c]
                } else {
                    T::zero()
                };
            }
        }
        Ok(())
    }

    /// Move R out, overwriting the reflectors in the working buffer.
    pub fn into_r(self) -> Result<Matrix<T>, LinalgError> {
        let Factors { mut rw, r_diag } = self.factors.ok_or(LinalgError::NotFactored)?;
        for c in 0..rw.ncols() {
            rw[(c, c)] = r_diag[c];
            for x in rw.col_as_mut_slice(c, c + 1) {
                *x = T::zero();
            }
        }
        Ok(rw)
    }

    // ── Solving ─────────────────────────────────────────────────────

    /// Solve `A X = B` in the least-squares sense, in place.
    ///
    /// `b` is `m x k` on entry. For square A the solution is computed in
    /// `b`'s storage; otherwise `b` is replaced by a new `n x k` matrix.
    /// The `m - n` trailing rows of `Qᵀ b` are the residual and are
    /// dropped.
    pub fn solve_in_place(&self, b: &mut Matrix<T>) -> Result<(), LinalgError> {
        let Factors { rw, r_diag } = self.factors()?;
        self.apply_qt_in_place(b)?;
        let diag = UpperDiagonal::Separate(r_diag.as_slice());
        if rw.is_square() {
            back_substitute_in_place(rw, diag, b);
        } else {
            let mut x = Matrix::zeros(rw.ncols(), b.ncols());
            back_substitute(rw, diag, b, &mut x);
            *b = x;
        }
        Ok(())
    }

    /// Solve `A X = B`, leaving `b` untouched.
    pub fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        self.solve_owned(b.clone())
    }

    /// Solve `A X = B`, consuming `b`.
    pub fn solve_owned(&self, mut b: Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        self.solve_in_place(&mut b)?;
        Ok(b)
    }

    /// Solve `A x = b` for a single right-hand side.
    pub fn solve_vector(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        self.solve_vector_owned(b.clone())
    }

    /// Solve `A x = b`, consuming `b`.
    pub fn solve_vector_owned(&self, b: Vector<T>) -> Result<Vector<T>, LinalgError> {
        let x = self.solve_owned(b.into_matrix())?;
        Ok(Vector::from_vec(x.into_vec()))
    }

    /// Determinant of a square A: `(-1)^n` times the product of R's
    /// diagonal, each reflector contributing a factor of -1.
    ///
    /// Panics if A is not square.
    pub fn det(&self) -> Result<T, LinalgError> {
        let Factors { rw, r_diag } = self.factors()?;
        assert!(rw.is_square(), "determinant requires a square matrix");
        let d = r_diag.as_slice().iter().fold(T::one(), |acc, &x| acc * x);
        Ok(if rw.ncols() % 2 == 0 { d } else { -d })
    }

    /// Inverse of a square A.
    ///
    /// Panics if A is not square.
    pub fn inverse(&self) -> Result<SquareMatrix<T>, LinalgError> {
        let Factors { rw, r_diag } = self.factors()?;
        assert!(rw.is_square(), "inverse requires a square matrix");
        let mut inv = SquareMatrix::identity(rw.nrows());
        self.apply_qt_in_place(&mut inv)?;
        back_substitute_in_place(rw, UpperDiagonal::Separate(r_diag.as_slice()), &mut inv);
        Ok(inv)
    }
}

impl<T: FloatScalar> From<Matrix<T>> for HouseholderQr<T> {
    fn from(a: Matrix<T>) -> Self {
        Self::from_owned(a)
    }
}

/// Prints "Not factored." or the Q and R blocks.
impl<T: FloatScalar + fmt::Display> fmt::Display for HouseholderQr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Ok(q), Ok(r)) = (self.get_q(), self.get_r()) else {
            return writeln!(f, "Not factored.");
        };
        let (width, precision) = print_layout(f);
        writeln!(f, "Q = ")?;
        write_fixed(f, &q, width, precision)?;
        writeln!(f, "R = ")?;
        write_fixed(f, &r, width, precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    const TOL: f64 = 1e-12;

    fn a43() -> Matrix<f64> {
        Matrix::from_rows(4, 3, &[1.0, 2.0, 1.0, 3.0, 4.0, 3.0, 1.0, 2.0, 3.0, 6.0, 5.0, 4.0])
    }

    #[test]
    fn reflectors_have_norm_sqrt2() {
        let qr = HouseholderQr::new_from(&a43());
        let rw = qr.get_rw().unwrap();
        for k in 0..3 {
            let sq: f64 = rw.col_as_slice(k, k).iter().map(|x| x * x).sum();
            assert!((sq - 2.0).abs() < TOL);
        }
    }

    #[test]
    fn q_times_r() {
        let a = a43();
        let qr = HouseholderQr::new_from(&a);
        let q = qr.get_q().unwrap();
        let r = qr.get_r().unwrap();
        assert!((&q * &r).max_abs_diff(&a) < TOL);
        assert!(qr.apply_q(&r).unwrap().max_abs_diff(&a) < TOL);
        assert!(qr.apply_qt(&a).unwrap().max_abs_diff(&r) < TOL);

        let qtq = &q.transpose() * &q;
        assert!(qtq.max_abs_diff(&Matrix::eye(4)) < TOL);
    }

    #[test]
    fn r_is_upper_triangular() {
        let r = HouseholderQr::new_from(&a43()).get_r().unwrap();
        for c in 0..3 {
            for row in (c + 1)..4 {
                assert_eq!(r[(row, c)], 0.0);
            }
        }
    }

    #[test]
    fn into_r_matches_get_r() {
        let qr = HouseholderQr::new_from(&a43());
        let r = qr.get_r().unwrap();
        assert_eq!(qr.into_r().unwrap(), r);
    }

    #[test]
    fn solve_overdetermined_consistent() {
        let a = a43();
        let x_true = Vector::from_slice(&[7.0, 11.0, 13.0]);
        let b = &a * &x_true;
        let x = HouseholderQr::new_from(&a).solve_vector(&b).unwrap();
        assert_eq!(x.len(), 3);
        for i in 0..3 {
            assert!((x[i] - x_true[i]).abs() < 1e-13);
        }
    }

    #[test]
    fn square_det_and_inverse() {
        let a = Matrix::from_rows(3, 3, &[3.0_f64, 4.0, 3.0, 1.0, 2.0, 3.0, 6.0, 5.0, 4.0]);
        let qr = HouseholderQr::new_from(&a);
        // 3(8-15) - 4(4-18) + 3(5-12)
        assert!((qr.det().unwrap() - 14.0).abs() < TOL);
        let inv = qr.inverse().unwrap();
        assert!((&a * &inv).max_abs_diff(&Matrix::eye(3)) < TOL);
    }

    #[test]
    fn zero_column_uses_identity_reflector() {
        let a = Matrix::from_rows(3, 2, &[0.0, 1.0, 0.0, 2.0, 0.0, 3.0]);
        let qr = HouseholderQr::new_from(&a);
        assert_eq!(qr.get_r_diag().unwrap()[0], 0.0);
        assert_eq!(qr.get_rw().unwrap()[(0, 0)], 2.0_f64.sqrt());
        let q = qr.get_q().unwrap();
        let r = qr.get_r().unwrap();
        assert!((&q * &r).max_abs_diff(&a) < TOL);
    }

    #[test]
    fn column_at_threshold_is_negligible() {
        let tiny = 2.0 * f64::MIN_POSITIVE;
        let qr = HouseholderQr::new_from(&Matrix::from_rows(2, 1, &[tiny, 0.0]));
        assert_eq!(qr.get_r_diag().unwrap()[0], 0.0);
        assert_eq!(qr.get_rw().unwrap()[(0, 0)], 2.0_f64.sqrt());
        assert_eq!(qr.get_rw().unwrap()[(1, 0)], 0.0);
    }

    #[test]
    fn unfactored() {
        let qr = HouseholderQr::<f64>::new();
        assert_eq!(qr.get_q().unwrap_err(), LinalgError::NotFactored);
        assert_eq!(
            qr.apply_qt(&Matrix::zeros(2, 1)).unwrap_err(),
            LinalgError::NotFactored
        );
        assert_eq!(format!("{qr}"), "Not factored.\n");
    }

    #[test]
    #[should_panic(expected = "QR decomposition requires rows >= cols")]
    fn wide_matrix_panics() {
        let _ = HouseholderQr::new_from(&Matrix::<f64>::zeros(2, 3));
    }

    #[test]
    fn display_labels() {
        let qr = HouseholderQr::new_from(&Matrix::from_rows(2, 1, &[3.0, 4.0]));
        let s = format!("{qr:6.2}");
        assert!(s.starts_with("Q = \n"));
        assert!(s.contains("R = \n -5.00\n  0.00\n"));
    }
}
