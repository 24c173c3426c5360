//! `ndarray` implementation of the backend traits.
//!
//! Products, transposes and elementwise arithmetic use ndarray's own kernels;
//! inversion goes through the shared nalgebra routines in `linalg`.
use ndarray::{Array1, Array2};

use crate::error::{CsnError, CsnResult};
use crate::math::backend::check_inner;
use crate::math::{DenseMatrix, DenseVector};

impl DenseVector for Array1<f64> {
    fn zeros(len: usize) -> Self {
        Array1::zeros(len)
    }

    fn len(&self) -> usize {
        self.dim()
    }

    fn entry(&self, index: usize) -> f64 {
        self[index]
    }

    fn set_entry(&mut self, index: usize, value: f64) {
        self[index] = value;
    }

    fn scale(&self, factor: f64) -> Self {
        self * factor
    }

    fn add(&self, rhs: &Self) -> CsnResult<Self> {
        if self.dim() != rhs.dim() {
            return Err(CsnError::mismatch("vector add", (self.dim(), 1), (rhs.dim(), 1)));
        }
        Ok(self + rhs)
    }

    fn sub(&self, rhs: &Self) -> CsnResult<Self> {
        if self.dim() != rhs.dim() {
            return Err(CsnError::mismatch("vector sub", (self.dim(), 1), (rhs.dim(), 1)));
        }
        Ok(self - rhs)
    }
}

impl DenseMatrix for Array2<f64> {
    type Vector = Array1<f64>;

    fn zeros(rows: usize, cols: usize) -> Self {
        Array2::zeros((rows, cols))
    }

    fn nrows(&self) -> usize {
        self.dim().0
    }

    fn ncols(&self) -> usize {
        self.dim().1
    }

    fn entry(&self, row: usize, col: usize) -> f64 {
        self[(row, col)]
    }

    fn set_entry(&mut self, row: usize, col: usize, value: f64) {
        self[(row, col)] = value;
    }

    fn identity(n: usize) -> Self {
        Array2::eye(n)
    }

    fn transpose(&self) -> Self {
        self.t().to_owned()
    }

    fn matmul(&self, rhs: &Self) -> CsnResult<Self> {
        check_inner("matmul", self.dim(), rhs.dim())?;
        Ok(self.dot(rhs))
    }

    fn matvec(&self, rhs: &Self::Vector) -> CsnResult<Self::Vector> {
        check_inner("matvec", self.dim(), (rhs.dim(), 1))?;
        Ok(self.dot(rhs))
    }

    fn add(&self, rhs: &Self) -> CsnResult<Self> {
        if self.dim() != rhs.dim() {
            return Err(CsnError::mismatch("matrix add", self.dim(), rhs.dim()));
        }
        Ok(self + rhs)
    }

    fn sub(&self, rhs: &Self) -> CsnResult<Self> {
        if self.dim() != rhs.dim() {
            return Err(CsnError::mismatch("matrix sub", self.dim(), rhs.dim()));
        }
        Ok(self - rhs)
    }

    fn scale(&self, factor: f64) -> Self {
        self * factor
    }
}
