//! Permutation matrices stored as a sequence of pairwise swaps.
//!
//! A [`PermutationMatrix`] of size `n` keeps `n` swap targets instead of
//! `n²` zeros and ones: entry `P[k] == i` means "at step `k`, swap row (or
//! column) `i` with row `k`". Applying the steps in order `0..n` gives the
//! permutation; applying them in reverse order gives its inverse, which for
//! a permutation matrix is also its transpose.
//!
//! ```
//! use dense_factor::{Matrix, PermutationKind, PermutationMatrix};
//!
//! let p = PermutationMatrix::from_permutation(&[2, 0, 1], PermutationKind::Row).unwrap();
//! let a = Matrix::from_rows(3, 1, &[10.0_f64, 20.0, 30.0]);
//!
//! let pa = &p * &a;
//! assert_eq!(pa.as_slice(), &[30.0, 10.0, 20.0]);
//!
//! let back = &p.transposed() * &pa;
//! assert_eq!(back, a);
//! ```

use alloc::vec::Vec;
use core::fmt;
use core::ops::{Index, IndexMut, Mul};

use crate::linalg::LinalgError;
use crate::matrix::{Matrix, RowVector, SquareMatrix, Vector};
use crate::traits::{MatrixMut, Scalar};

/// Which side a permutation matrix may be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermutationKind {
    /// Can permute rows or columns.
    #[default]
    Unspecified,
    /// Permutes rows only (`P * A`).
    Row,
    /// Permutes columns only (`A * P`).
    Column,
}

/// Square permutation matrix in O(n) storage.
///
/// See the [module documentation](self) for the swap-sequence encoding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PermutationMatrix {
    swaps: Vec<usize>,
    reversed: bool,
    kind: PermutationKind,
}

// ── Construction ────────────────────────────────────────────────────

impl PermutationMatrix {
    /// Create an identity permutation of size `n`.
    pub fn new(n: usize, kind: PermutationKind) -> Self {
        Self {
            swaps: identity_permutation(n),
            reversed: false,
            kind,
        }
    }

    /// Create an identity permutation of size `n` with unspecified kind.
    pub fn identity(n: usize) -> Self {
        Self::new(n, PermutationKind::Unspecified)
    }

    /// Create an empty (0×0) permutation with the given kind.
    pub fn with_kind(kind: PermutationKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Build the swap sequence that realizes the mapping `p`.
    ///
    /// `p[i]` is the index of the original row that ends up in row `i`
    /// (the MATLAB `A(p, :)` convention). Returns
    /// [`LinalgError::InvalidPermutation`] if `p` is not a bijection of
    /// `0..p.len()`.
    ///
    /// The reconstruction is a selection sort, O(n²). It is intended for
    /// tests and setup code, not hot paths.
    ///
    /// ```
    /// use dense_factor::{PermutationKind, PermutationMatrix};
    /// use dense_factor::linalg::LinalgError;
    ///
    /// let p = PermutationMatrix::from_permutation(&[1, 3, 2, 0], PermutationKind::Row).unwrap();
    /// assert_eq!(p.to_permutation(), vec![1, 3, 2, 0]);
    ///
    /// let bad = PermutationMatrix::from_permutation(&[0, 0, 1], PermutationKind::Row);
    /// assert_eq!(bad.unwrap_err(), LinalgError::InvalidPermutation);
    /// ```
    pub fn from_permutation(p: &[usize], kind: PermutationKind) -> Result<Self, LinalgError> {
        let mut out = Self::with_kind(kind);
        out.fill_from_permutation(p)?;
        Ok(out)
    }

    /// Overwrite with the swap sequence that realizes the mapping `p`.
    ///
    /// Resizes to `p.len()` and clears the reversed flag. On error the
    /// contents are unspecified but still a valid swap sequence.
    pub fn fill_from_permutation(&mut self, p: &[usize]) -> Result<(), LinalgError> {
        let n = p.len();
        self.swaps.clear();
        self.swaps.resize(n, 0);
        self.reversed = false;

        let mut work = p.to_vec();
        // Sort from the right: | unsorted | sorted |
        for i in (0..n).rev() {
            let found = work[..=i].iter().position(|&x| x == i);
            let Some(j) = found else {
                self.fill_identity();
                return Err(LinalgError::InvalidPermutation);
            };
            work.swap(i, j);
            self.swaps[i] = j;
        }
        Ok(())
    }

    /// Create a uniformly random permutation of size `n`.
    ///
    /// Reproducible for a given `seed`.
    #[cfg(feature = "random")]
    pub fn random(n: usize, kind: PermutationKind, seed: u64) -> Self {
        let mut p = Self::new(n, kind);
        p.fill_random(seed);
        p
    }

    /// Overwrite with a uniformly random permutation of the current size.
    ///
    /// Each step `k` swaps with a uniform target in `k..n`, which is the
    /// Fisher-Yates shuffle written directly as a swap sequence.
    #[cfg(feature = "random")]
    pub fn fill_random(&mut self, seed: u64) {
        use rand::{Rng, SeedableRng};
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        let n = self.len();
        for (k, s) in self.swaps.iter_mut().enumerate() {
            *s = rng.random_range(k..n);
        }
        self.reversed = false;
    }
}

// ── Size and element access ─────────────────────────────────────────

impl PermutationMatrix {
    /// Size `n` of the `n x n` matrix.
    #[inline]
    pub fn len(&self) -> usize {
        self.swaps.len()
    }

    /// Whether this is the empty 0×0 permutation.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.swaps.is_empty()
    }

    /// Number of rows (equal to [`len`](Self::len)).
    #[inline]
    pub fn nrows(&self) -> usize {
        self.len()
    }

    /// Number of columns (equal to [`len`](Self::len)).
    #[inline]
    pub fn ncols(&self) -> usize {
        self.len()
    }

    /// Resize to `n`. Steps that already existed keep their targets, new
    /// steps are identity steps.
    pub fn resize(&mut self, n: usize) {
        let old = self.swaps.len();
        self.swaps.truncate(n);
        self.swaps.extend(old..n);
    }

    /// Set every step to the identity step (`P[k] = k`).
    pub fn fill_identity(&mut self) {
        for (k, s) in self.swaps.iter_mut().enumerate() {
            *s = k;
        }
    }

    /// Set the size to zero and release the storage.
    pub fn clear(&mut self) {
        self.swaps = Vec::new();
    }

    /// The raw swap sequence.
    #[inline]
    pub fn swaps(&self) -> &[usize] {
        &self.swaps
    }

    /// Which side this permutation may be applied to.
    #[inline]
    pub fn kind(&self) -> PermutationKind {
        self.kind
    }

    /// Change which side this permutation may be applied to.
    #[inline]
    pub fn set_kind(&mut self, kind: PermutationKind) {
        self.kind = kind;
    }
}

impl Index<usize> for PermutationMatrix {
    type Output = usize;

    #[inline]
    fn index(&self, k: usize) -> &usize {
        &self.swaps[k]
    }
}

/// Writing a step is unchecked: the caller keeps every target `< len()`.
impl IndexMut<usize> for PermutationMatrix {
    #[inline]
    fn index_mut(&mut self, k: usize) -> &mut usize {
        &mut self.swaps[k]
    }
}

// ── Transposition ───────────────────────────────────────────────────

impl PermutationMatrix {
    /// Flip the order in which the swaps are applied.
    #[inline]
    pub fn reverse(&mut self) {
        self.reversed = !self.reversed;
    }

    /// Transpose (equivalently, invert) in place.
    #[inline]
    pub fn transpose_in_place(&mut self) {
        self.reverse();
    }

    /// Transpose (equivalently, invert), reusing the storage.
    #[inline]
    pub fn transpose(mut self) -> Self {
        self.transpose_in_place();
        self
    }

    /// Transposed copy.
    pub fn transposed(&self) -> Self {
        self.clone().transpose()
    }

    /// Whether the swaps are applied in reverse order.
    #[inline]
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    fn for_each_swap(&self, mut f: impl FnMut(usize, usize)) {
        let mut step = |k: usize| {
            let target = self.swaps[k];
            if target != k {
                f(k, target);
            }
        };
        if self.reversed {
            (0..self.swaps.len()).rev().for_each(&mut step);
        } else {
            (0..self.swaps.len()).for_each(&mut step);
        }
    }
}

// ── Conversion ──────────────────────────────────────────────────────

impl PermutationMatrix {
    /// The explicit mapping: row `i` of `P * A` is row `p[i]` of `A`.
    ///
    /// O(n).
    pub fn to_permutation(&self) -> Vec<usize> {
        let mut p = identity_permutation(self.len());
        self.for_each_swap(|a, b| p.swap(a, b));
        p
    }

    /// Materialize the full 0/1 matrix.
    ///
    /// `kind` selects whether the result is `P * I` (rows) or `I * P`
    /// (columns). `PermutationKind::Unspecified` falls back to the stored
    /// kind; panics if both are unspecified.
    ///
    /// ```
    /// use dense_factor::{PermutationKind, PermutationMatrix};
    /// let p = PermutationMatrix::from_permutation(&[1, 0], PermutationKind::Row).unwrap();
    /// let m = p.to_matrix::<f64>(PermutationKind::Unspecified);
    /// assert_eq!(m[(0, 1)], 1.0);
    /// assert_eq!(m[(0, 0)], 0.0);
    /// ```
    pub fn to_matrix<T: Scalar>(&self, kind: PermutationKind) -> SquareMatrix<T> {
        let kind = match kind {
            PermutationKind::Unspecified => self.kind,
            k => k,
        };
        let mut m = SquareMatrix::identity(self.len());
        match kind {
            PermutationKind::Row => self.for_each_swap(|a, b| m.swap_rows(a, b)),
            PermutationKind::Column => self.for_each_swap(|a, b| m.swap_cols(a, b)),
            PermutationKind::Unspecified => {
                panic!("to_matrix needs a row or column permutation kind")
            }
        }
        m
    }
}

// ── Application ─────────────────────────────────────────────────────

impl PermutationMatrix {
    /// Permute the rows of `a` in place: `a ← P a`.
    ///
    /// Panics if `a.nrows() != self.len()` or if this is a column
    /// permutation.
    pub fn permute_rows<T: Copy>(&self, a: &mut impl MatrixMut<T>) {
        assert_eq!(
            a.nrows(),
            self.len(),
            "row permutation of size {} applied to {} rows",
            self.len(),
            a.nrows(),
        );
        assert_ne!(
            self.kind,
            PermutationKind::Column,
            "column permutation applied to rows"
        );
        self.for_each_swap(|i, j| a.swap_rows(i, j));
    }

    /// Permute the columns of `a` in place: `a ← a P`.
    ///
    /// Panics if `a.ncols() != self.len()` or if this is a row permutation.
    pub fn permute_cols<T: Copy>(&self, a: &mut impl MatrixMut<T>) {
        assert_eq!(
            a.ncols(),
            self.len(),
            "column permutation of size {} applied to {} columns",
            self.len(),
            a.ncols(),
        );
        assert_ne!(
            self.kind,
            PermutationKind::Row,
            "row permutation applied to columns"
        );
        self.for_each_swap(|i, j| a.swap_cols(i, j));
    }
}

// ── Free functions ──────────────────────────────────────────────────

/// The identity mapping `[0, 1, ..., n-1]`.
pub fn identity_permutation(n: usize) -> Vec<usize> {
    (0..n).collect()
}

/// A uniformly random mapping of `0..n`, reproducible for a given `seed`.
///
/// ```
/// use dense_factor::permutation::random_permutation;
/// let mut p = random_permutation(16, 7);
/// assert_eq!(p, random_permutation(16, 7));
/// p.sort_unstable();
/// assert_eq!(p, (0..16).collect::<Vec<_>>());
/// ```
#[cfg(feature = "random")]
pub fn random_permutation(n: usize, seed: u64) -> Vec<usize> {
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    let mut p = identity_permutation(n);
    p.shuffle(&mut rng);
    p
}

// ── Display ─────────────────────────────────────────────────────────

/// Prints the explicit mapping on one line, each index right-aligned in a
/// field of `width` characters (default: precision + 9, precision 6).
impl fmt::Display for PermutationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = f.width().unwrap_or(f.precision().unwrap_or(6) + 9);
        for i in self.to_permutation() {
            write!(f, "{:>width$}", i, width = width)?;
        }
        Ok(())
    }
}

// ── Products ────────────────────────────────────────────────────────

macro_rules! impl_left_mul {
    ($M:ident) => {
        impl<T: Scalar> Mul<&$M<T>> for &PermutationMatrix {
            type Output = $M<T>;

            /// Row permutation of a copy of the right operand.
            fn mul(self, rhs: &$M<T>) -> $M<T> {
                self * rhs.clone()
            }
        }

        impl<T: Scalar> Mul<$M<T>> for &PermutationMatrix {
            type Output = $M<T>;

            /// Row permutation of the right operand, in place.
            fn mul(self, mut rhs: $M<T>) -> $M<T> {
                self.permute_rows(&mut rhs);
                rhs
            }
        }
    };
}

macro_rules! impl_right_mul {
    ($M:ident) => {
        impl<T: Scalar> Mul<&PermutationMatrix> for &$M<T> {
            type Output = $M<T>;

            /// Column permutation of a copy of the left operand.
            fn mul(self, rhs: &PermutationMatrix) -> $M<T> {
                self.clone() * rhs
            }
        }

        impl<T: Scalar> Mul<&PermutationMatrix> for $M<T> {
            type Output = $M<T>;

            /// Column permutation of the left operand, in place.
            fn mul(mut self, rhs: &PermutationMatrix) -> $M<T> {
                rhs.permute_cols(&mut self);
                self
            }
        }
    };
}

impl_left_mul!(Matrix);
impl_left_mul!(SquareMatrix);
impl_left_mul!(Vector);
impl_right_mul!(Matrix);
impl_right_mul!(SquareMatrix);
impl_right_mul!(RowVector);

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec;

    fn row_p(p: &[usize]) -> PermutationMatrix {
        PermutationMatrix::from_permutation(p, PermutationKind::Row).unwrap()
    }

    #[test]
    fn identity_has_no_effect() {
        let p = PermutationMatrix::new(3, PermutationKind::Row);
        assert_eq!(p.swaps(), &[0, 1, 2]);
        let a = Matrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(&p * &a, a);
    }

    #[test]
    fn swap_sequence_is_selection_sort_from_the_right() {
        let p = row_p(&[1, 3, 2, 0]);
        // i=3: value 3 at index 1 -> swap, work = [1,0,2,3]
        // i=2: value 2 at index 2
        // i=1: value 1 at index 0 -> swap
        assert_eq!(p.swaps(), &[0, 0, 2, 1]);
        assert!(!p.is_reversed());
    }

    #[test]
    fn invalid_permutation() {
        let mut p = PermutationMatrix::identity(2);
        assert_eq!(
            p.fill_from_permutation(&[0, 3, 1]),
            Err(LinalgError::InvalidPermutation)
        );
        assert_eq!(p.to_permutation(), vec![0, 1, 2]);
        assert!(PermutationMatrix::from_permutation(&[1, 1], PermutationKind::Row).is_err());
    }

    #[test]
    fn manual_steps() {
        let mut p = PermutationMatrix::identity(3);
        p[0] = 2;
        assert_eq!(p[0], 2);
        assert_eq!(p.to_permutation(), vec![2, 1, 0]);
        p[1] = 2;
        assert_eq!(p.to_permutation(), vec![2, 0, 1]);
    }

    #[test]
    fn reverse_inverts() {
        let p = row_p(&[2, 0, 3, 1]);
        let q = p.transposed().to_permutation();
        assert_eq!(q, vec![1, 3, 0, 2]);
        let mut r = p.clone();
        r.reverse();
        r.reverse();
        assert_eq!(r, p);
    }

    #[test]
    fn resize_keeps_steps() {
        let mut p = row_p(&[1, 0]);
        p.resize(4);
        assert_eq!(p.swaps(), &[0, 0, 2, 3]);
        p.resize(1);
        assert_eq!(p.swaps(), &[0]);
        p.clear();
        assert!(p.is_empty());
    }

    #[test]
    fn to_matrix_rows_and_columns() {
        let p = row_p(&[1, 2, 0]);
        let r = p.to_matrix::<f64>(PermutationKind::Row);
        let c = p.to_matrix::<f64>(PermutationKind::Column);
        assert_eq!(r, SquareMatrix::from_rows(3, &[0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0]));
        assert_eq!(c, r.transpose());

        let a = Matrix::from_rows(3, 1, &[1.0, 2.0, 3.0]);
        assert_eq!(&r * &a, &p * &a);
    }

    #[test]
    #[should_panic(expected = "needs a row or column")]
    fn to_matrix_unspecified_panics() {
        let _ = PermutationMatrix::identity(2).to_matrix::<f64>(PermutationKind::Unspecified);
    }

    #[test]
    #[should_panic(expected = "column permutation applied to rows")]
    fn kind_is_enforced() {
        let p = PermutationMatrix::new(2, PermutationKind::Column);
        let mut a = Matrix::<f64>::zeros(2, 2);
        p.permute_rows(&mut a);
    }

    #[test]
    #[should_panic(expected = "applied to 3 rows")]
    fn size_is_enforced() {
        let p = PermutationMatrix::new(2, PermutationKind::Row);
        let mut a = Matrix::<f64>::zeros(3, 2);
        p.permute_rows(&mut a);
    }

    #[test]
    fn display() {
        let p = row_p(&[2, 0, 1]);
        assert_eq!(format!("{}", p), format!("{:>15}{:>15}{:>15}", 2, 0, 1));
        assert_eq!(format!("{:3}", p), "  2  0  1");
    }

    #[cfg(feature = "random")]
    #[test]
    fn random_is_a_permutation() {
        let p = PermutationMatrix::random(128, PermutationKind::Row, 3);
        let mut q = p.to_permutation();
        q.sort_unstable();
        assert_eq!(q, identity_permutation(128));
        assert_eq!(p.kind(), PermutationKind::Row);
    }
}
