//! Pre-defined type aliases for the common float element types.

use super::{Matrix, RowVector, SquareMatrix, Vector};

/// Matrix with `f32` elements.
pub type Matrixf32 = Matrix<f32>;
/// Matrix with `f64` elements.
pub type Matrixf64 = Matrix<f64>;

/// Square matrix with `f32` elements.
pub type SquareMatrixf32 = SquareMatrix<f32>;
/// Square matrix with `f64` elements.
pub type SquareMatrixf64 = SquareMatrix<f64>;

/// Column vector with `f32` elements.
pub type Vectorf32 = Vector<f32>;
/// Column vector with `f64` elements.
pub type Vectorf64 = Vector<f64>;

/// Row vector with `f32` elements.
pub type RowVectorf32 = RowVector<f32>;
/// Row vector with `f64` elements.
pub type RowVectorf64 = RowVector<f64>;
