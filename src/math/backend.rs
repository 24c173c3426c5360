//! Backend traits for the dense linear algebra used by the distributions.
//!
//! Generic code in this crate only touches matrices and vectors through
//! [`DenseMatrix`] and [`DenseVector`]. A backend only has to provide shapes
//! plus element access. Everything else has a default built on top of those
//! primitives, which backends may override with faster native kernels.
use std::fmt::Debug;

use crate::error::{CsnError, CsnResult};
use crate::math::linalg;
use crate::math::{Array1, Array2};

pub trait DenseVector: Clone + Debug + PartialEq {
    fn zeros(len: usize) -> Self;

    fn len(&self) -> usize;

    fn entry(&self, index: usize) -> f64;

    fn set_entry(&mut self, index: usize, value: f64);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn from_values(values: &[f64]) -> Self {
        let mut out = Self::zeros(values.len());
        for (index, &value) in values.iter().enumerate() {
            out.set_entry(index, value);
        }
        out
    }

    fn to_vec(&self) -> Vec<f64> {
        (0..self.len()).map(|index| self.entry(index)).collect()
    }

    fn scale(&self, factor: f64) -> Self {
        let mut out = self.clone();
        for index in 0..self.len() {
            out.set_entry(index, self.entry(index) * factor);
        }
        out
    }

    fn add(&self, rhs: &Self) -> CsnResult<Self> {
        zip_vectors("vector add", self, rhs, |a, b| a + b)
    }

    fn sub(&self, rhs: &Self) -> CsnResult<Self> {
        zip_vectors("vector sub", self, rhs, |a, b| a - b)
    }
}

pub trait DenseMatrix: Clone + Debug + PartialEq {
    type Vector: DenseVector;

    fn zeros(rows: usize, cols: usize) -> Self;

    fn nrows(&self) -> usize;

    fn ncols(&self) -> usize;

    fn entry(&self, row: usize, col: usize) -> f64;

    fn set_entry(&mut self, row: usize, col: usize, value: f64);

    fn dims(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    fn identity(n: usize) -> Self {
        let mut out = Self::zeros(n, n);
        for i in 0..n {
            out.set_entry(i, i, 1.0);
        }
        out
    }

    /// Build a `rows` x `cols` matrix from row-major `values`.
    fn from_row_major(rows: usize, cols: usize, values: &[f64]) -> CsnResult<Self> {
        if values.len() != rows * cols {
            return Err(CsnError::mismatch(
                "from_row_major",
                (rows, cols),
                (values.len(), 1),
            ));
        }
        let mut out = Self::zeros(rows, cols);
        for (offset, &value) in values.iter().enumerate() {
            out.set_entry(offset / cols, offset % cols, value);
        }
        Ok(out)
    }

    fn transpose(&self) -> Self {
        let (rows, cols) = self.dims();
        let mut out = Self::zeros(cols, rows);
        for r in 0..rows {
            for c in 0..cols {
                out.set_entry(c, r, self.entry(r, c));
            }
        }
        out
    }

    fn matmul(&self, rhs: &Self) -> CsnResult<Self> {
        check_inner("matmul", self.dims(), rhs.dims())?;
        let (rows, inner) = self.dims();
        let cols = rhs.ncols();
        let mut out = Self::zeros(rows, cols);
        for r in 0..rows {
            for c in 0..cols {
                let value = (0..inner).map(|k| self.entry(r, k) * rhs.entry(k, c)).sum();
                out.set_entry(r, c, value);
            }
        }
        Ok(out)
    }

    fn matvec(&self, rhs: &Self::Vector) -> CsnResult<Self::Vector> {
        check_inner("matvec", self.dims(), (rhs.len(), 1))?;
        let (rows, inner) = self.dims();
        let mut out = Self::Vector::zeros(rows);
        for r in 0..rows {
            let value = (0..inner).map(|k| self.entry(r, k) * rhs.entry(k)).sum();
            out.set_entry(r, value);
        }
        Ok(out)
    }

    fn add(&self, rhs: &Self) -> CsnResult<Self> {
        zip_matrices("matrix add", self, rhs, |a, b| a + b)
    }

    fn sub(&self, rhs: &Self) -> CsnResult<Self> {
        zip_matrices("matrix sub", self, rhs, |a, b| a - b)
    }

    fn scale(&self, factor: f64) -> Self {
        let (rows, cols) = self.dims();
        let mut out = self.clone();
        for r in 0..rows {
            for c in 0..cols {
                out.set_entry(r, c, self.entry(r, c) * factor);
            }
        }
        out
    }

    /// Exact inverse; fails on non-square or singular input.
    fn inverse(&self) -> CsnResult<Self> {
        linalg::invert(self)
    }

    fn is_symmetric(&self, tolerance: f64) -> bool {
        let (rows, cols) = self.dims();
        rows == cols
            && (0..rows).all(|r| {
                (0..r).all(|c| (self.entry(r, c) - self.entry(c, r)).abs() <= tolerance)
            })
    }
}

pub(crate) fn check_inner(
    operation: &'static str,
    lhs: (usize, usize),
    rhs: (usize, usize),
) -> CsnResult<()> {
    if lhs.1 != rhs.0 {
        return Err(CsnError::mismatch(operation, (lhs.1, rhs.1), rhs));
    }
    Ok(())
}

fn zip_vectors<V, F>(operation: &'static str, lhs: &V, rhs: &V, f: F) -> CsnResult<V>
where
    V: DenseVector,
    F: Fn(f64, f64) -> f64,
{
    if lhs.len() != rhs.len() {
        return Err(CsnError::mismatch(operation, (lhs.len(), 1), (rhs.len(), 1)));
    }
    let mut out = lhs.clone();
    for index in 0..lhs.len() {
        out.set_entry(index, f(lhs.entry(index), rhs.entry(index)));
    }
    Ok(out)
}

fn zip_matrices<M, F>(operation: &'static str, lhs: &M, rhs: &M, f: F) -> CsnResult<M>
where
    M: DenseMatrix,
    F: Fn(f64, f64) -> f64,
{
    if lhs.dims() != rhs.dims() {
        return Err(CsnError::mismatch(operation, lhs.dims(), rhs.dims()));
    }
    let (rows, cols) = lhs.dims();
    let mut out = lhs.clone();
    for r in 0..rows {
        for c in 0..cols {
            out.set_entry(r, c, f(lhs.entry(r, c), rhs.entry(r, c)));
        }
    }
    Ok(out)
}

impl DenseVector for Array1<f64> {
    fn zeros(len: usize) -> Self {
        Array1::from_elem(len, 0.0)
    }

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn entry(&self, index: usize) -> f64 {
        self[index]
    }

    fn set_entry(&mut self, index: usize, value: f64) {
        self[index] = value;
    }
}

impl DenseMatrix for Array2<f64> {
    type Vector = Array1<f64>;

    fn zeros(rows: usize, cols: usize) -> Self {
        Array2::zeros(rows, cols)
    }

    fn nrows(&self) -> usize {
        self.shape().0
    }

    fn ncols(&self) -> usize {
        self.shape().1
    }

    fn entry(&self, row: usize, col: usize) -> f64 {
        self[(row, col)]
    }

    fn set_entry(&mut self, row: usize, col: usize, value: f64) {
        self[(row, col)] = value;
    }

    fn matmul(&self, rhs: &Self) -> CsnResult<Self> {
        check_inner("matmul", self.dims(), rhs.dims())?;
        let rows = self.nrows();
        let cols = rhs.ncols();
        let mut data = vec![0.0; rows * cols];
        for r in 0..rows {
            let out_row = &mut data[r * cols..(r + 1) * cols];
            for (k, &lhs) in self.row_slice(r).iter().enumerate() {
                for (out, &value) in out_row.iter_mut().zip(rhs.row_slice(k)) {
                    *out += lhs * value;
                }
            }
        }
        Ok(Array2::from_shape_vec((rows, cols), data)?)
    }

    fn scale(&self, factor: f64) -> Self {
        self.mapv(|v| v * factor)
    }
}
