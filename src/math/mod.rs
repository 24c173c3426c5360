//! Dense linear algebra used by the distributions.
//!
//! Provides the crate's own row-major `Array2` (2D) and `Array1` (1D)
//! containers, the [`DenseMatrix`] / [`DenseVector`] backend traits that the
//! distribution code is written against, implementations of those traits for
//! the crate types and for `ndarray`, and the shared inversion routines.
pub mod backend;
pub mod linalg;
pub mod matrix;
mod ndarray_backend;
pub mod vector;

pub use backend::{DenseMatrix, DenseVector};
pub use matrix::{Array2, ShapeError};
pub use vector::Array1;
