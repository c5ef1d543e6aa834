//! # dense_factor
//!
//! Dense direct factorizations for small and medium matrices, no-std
//! compatible (needs `alloc`). Aimed at embedded and desktop numerics where
//! pulling in a BLAS/LAPACK stack is not wanted.
//!
//! ## Quick start
//!
//! ```
//! use dense_factor::{Matrix, SquareMatrix, Vector};
//!
//! // Solve a square linear system Ax = b
//! let a = SquareMatrix::from_rows(3, &[
//!     2.0_f64, 1.0, -1.0,
//!     -3.0, -1.0, 2.0,
//!     -2.0, 1.0, 2.0,
//! ]);
//! let b = Vector::from_slice(&[8.0, -11.0, -3.0]);
//! let x = a.solve(&b).unwrap(); // x = [2, 3, -1]
//! assert!((x[1] - 3.0).abs() < 1e-12);
//!
//! // Least squares: the mean of the samples
//! let ones = Matrix::fill(4, 1, 1.0_f64);
//! let y = Vector::from_slice(&[1.0, 2.0, 3.0, 6.0]);
//! let m = ones.solve_least_squares(&y).unwrap();
//! assert!((m[0] - 3.0).abs() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`matrix`] — Heap-allocated, column-major `Matrix<T>` with runtime
//!   dimensions, plus the shape-restricted wrappers [`SquareMatrix`],
//!   [`Vector`] (column) and [`RowVector`]. Arithmetic, indexing, row and
//!   column swaps, printing.
//!
//! - [`permutation`] — [`PermutationMatrix`], a permutation stored as the
//!   sequence of swaps that builds it. Applying it, transposing it and
//!   building it from an index vector are all O(n) in the permutation size.
//!
//! - [`linalg`] — [`NoPivotLu`] (`A = LU`), [`RowPivotLu`] (`PA = LU`) and
//!   [`HouseholderQr`] (`A = QR`, least squares for tall A). Each is an
//!   object that owns its factors, can be recomputed, and hands them out by
//!   copy or by move. Free functions operate on `&mut impl MatrixMut<T>`
//!   for in-place use; [`linalg::triangular`] holds the shared forward and
//!   back substitution.
//!
//! - [`traits`] — Element trait hierarchy:
//!   - [`Scalar`] — all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`] — real floats (`Scalar + Float`), used by the factorizations
//!   - [`MatrixRef`] / [`MatrixMut`] — generic read/write access for algorithms
//!
//! ## Errors
//!
//! Shape mismatches are programming errors and panic. Asking a
//! factorization for something it does not hold (never computed, or
//! already moved out) returns [`LinalgError::NotFactored`].
//!
//! ## Logging
//!
//! The factorizations report through the [`log`] facade: `trace` for the
//! start of a factorization and every pivot swap, `debug` on completion and
//! for degenerate QR columns, `warn` for zero pivots.
//!
//! ## Cargo features
//!
//! | Feature   | Default  | Description |
//! |-----------|----------|-------------|
//! | `std`     | yes      | Hardware FPU via system libm |
//! | `random`  | yes      | Seeded random matrices and permutations (`rand`, `rand_chacha`) |
//! | `libm`    | baseline | Pure-Rust software float fallback for `no_std` |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod linalg;
pub mod matrix;
pub mod permutation;
pub mod traits;

pub use linalg::{HouseholderQr, LinalgError, NoPivotLu, RowPivotLu};
pub use matrix::aliases::{
    Matrixf32, Matrixf64, RowVectorf32, RowVectorf64, SquareMatrixf32, SquareMatrixf64,
    Vectorf32, Vectorf64,
};
pub use matrix::{Matrix, RowVector, SquareMatrix, Vector};
pub use permutation::{PermutationKind, PermutationMatrix};
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
