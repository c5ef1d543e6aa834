pub(crate) mod householder_qr;
pub(crate) mod no_pivot_lu;
pub(crate) mod row_pivot_lu;
pub mod triangular;

pub use householder_qr::{householder_qr_in_place, HouseholderQr};
pub use no_pivot_lu::{no_pivot_lu_in_place, NoPivotLu};
pub use row_pivot_lu::{row_pivot_lu_in_place, RowPivotLu};

/// Errors from the factorization objects.
///
/// Shape mismatches are caller bugs and panic; these are the recoverable
/// conditions.
///
/// ```
/// use dense_factor::linalg::{LinalgError, NoPivotLu};
///
/// let lu = NoPivotLu::<f64>::new();
/// assert_eq!(lu.get_l().unwrap_err(), LinalgError::NotFactored);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// No factorization has been computed, or the part of it that was
    /// asked for has already been taken out of the object.
    NotFactored,
    /// An index vector is not a bijection of `0..n`.
    InvalidPermutation,
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::NotFactored => write!(f, "matrix is not factored"),
            LinalgError::InvalidPermutation => write!(f, "invalid permutation"),
        }
    }
}

impl core::error::Error for LinalgError {}

/// Default print precision of the factorization objects.
pub(crate) const DEFAULT_PRECISION: usize = 6;

/// Field width and precision for printing a factorization: the formatter's
/// own if given, otherwise precision 6 and width `precision + 9`.
pub(crate) fn print_layout(f: &core::fmt::Formatter<'_>) -> (usize, usize) {
    let precision = f.precision().unwrap_or(DEFAULT_PRECISION);
    let width = f.width().unwrap_or(precision + 9);
    (width, precision)
}
