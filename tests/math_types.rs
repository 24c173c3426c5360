//! Integration tests for the Array1/Array2 math types and the backend traits.

use csn_rank::math::{Array1, Array2, DenseMatrix, DenseVector};
use csn_rank::CsnError;

fn matrix(rows: usize, cols: usize, values: &[f64]) -> Array2<f64> {
    Array2::from_shape_vec((rows, cols), values.to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Array1 basics
// ---------------------------------------------------------------------------

#[test]
fn array1_from_vec_and_len() {
    let a = Array1::from_vec(vec![1.0f64, 2.0, 3.0]);
    assert_eq!(a.len(), 3);
    assert!(!a.is_empty());
}

#[test]
fn array1_zeros_and_indexing() {
    let mut a: Array1<f64> = Array1::zeros(3);
    a[1] = 4.0;
    assert_eq!(a.to_vec(), vec![0.0, 4.0, 0.0]);
}

#[test]
fn array1_mapv_and_dot() {
    let a = Array1::from_vec(vec![1.0f64, 2.0, 3.0]);
    let doubled = a.mapv(|x| x * 2.0);
    assert_eq!(doubled.to_vec(), vec![2.0, 4.0, 6.0]);
    assert_eq!(a.dot(&doubled), 28.0);
}

#[test]
fn array1_vector_arithmetic() {
    let a = Array1::from_vec(vec![1.0, 2.0]);
    let b = Array1::from_vec(vec![0.5, -1.0]);
    assert_eq!(DenseVector::add(&a, &b).unwrap().to_vec(), vec![1.5, 1.0]);
    assert_eq!(DenseVector::sub(&a, &b).unwrap().to_vec(), vec![0.5, 3.0]);
    assert_eq!(DenseVector::scale(&a, -1.0).to_vec(), vec![-1.0, -2.0]);
}

#[test]
fn array1_add_length_mismatch_errors() {
    let a = Array1::from_vec(vec![1.0, 2.0]);
    let b = Array1::from_vec(vec![1.0]);
    assert!(matches!(
        DenseVector::add(&a, &b),
        Err(CsnError::DimensionMismatch { .. })
    ));
}

// ---------------------------------------------------------------------------
// Array2 basics
// ---------------------------------------------------------------------------

#[test]
fn array2_from_shape_vec() {
    let a = Array2::from_shape_vec((2, 3), vec![1, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(a.nrows(), 2);
    assert_eq!(a.ncols(), 3);
    assert_eq!(a.shape(), (2, 3));
}

#[test]
fn array2_shape_mismatch_errors() {
    let result = Array2::<f64>::from_shape_vec((2, 3), vec![1.0, 2.0, 3.0]);
    assert!(result.is_err());
    let err: CsnError = result.unwrap_err().into();
    assert!(matches!(err, CsnError::DimensionMismatch { .. }));
}

#[test]
fn array2_from_rows() {
    let a = Array2::from_rows(vec![vec![1, 2], vec![3, 4], vec![5, 6]]).unwrap();
    assert_eq!(a.shape(), (3, 2));
    assert_eq!(a.row_slice(2), &[5, 6]);
    assert!(Array2::from_rows(vec![vec![1, 2], vec![3]]).is_err());
}

#[test]
fn array2_indexing_and_column() {
    let a = Array2::from_shape_vec((3, 2), vec![1, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(a[(1, 0)], 3);
    assert_eq!(a.column(1).to_vec(), vec![2, 4, 6]);
}

#[test]
fn array2_eye_and_zeros() {
    let eye = Array2::<f64>::eye(2);
    assert_eq!(eye.to_vec(), vec![1.0, 0.0, 0.0, 1.0]);
    let zeros = Array2::<f64>::zeros(2, 3);
    assert_eq!(zeros.shape(), (2, 3));
    assert!(zeros.as_slice().iter().all(|&v| v == 0.0));
}

// ---------------------------------------------------------------------------
// DenseMatrix operations
// ---------------------------------------------------------------------------

#[test]
fn dense_matrix_transpose() {
    let a = matrix(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let t = a.transpose();
    assert_eq!(t.shape(), (3, 2));
    assert_eq!(t.to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
}

#[test]
fn dense_matrix_matmul_and_matvec() {
    let a = matrix(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let b = matrix(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
    let product = a.matmul(&b).unwrap();
    assert_eq!(product.to_vec(), vec![58.0, 64.0, 139.0, 154.0]);

    let v = Array1::from_vec(vec![1.0, 0.0, -1.0]);
    assert_eq!(a.matvec(&v).unwrap().to_vec(), vec![-2.0, -2.0]);
}

#[test]
fn dense_matrix_matmul_shape_mismatch_errors() {
    let a = matrix(2, 3, &[0.0; 6]);
    let b = matrix(2, 2, &[0.0; 4]);
    assert!(matches!(
        a.matmul(&b),
        Err(CsnError::DimensionMismatch { .. })
    ));
    let v = Array1::from_vec(vec![1.0, 2.0]);
    assert!(a.matvec(&v).is_err());
}

#[test]
fn dense_matrix_add_sub_scale() {
    let a = matrix(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let b = matrix(2, 2, &[1.0, 1.0, 1.0, 1.0]);
    assert_eq!(DenseMatrix::add(&a, &b).unwrap().to_vec(), vec![2.0, 3.0, 4.0, 5.0]);
    assert_eq!(DenseMatrix::sub(&a, &b).unwrap().to_vec(), vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(DenseMatrix::scale(&a, 0.5).to_vec(), vec![0.5, 1.0, 1.5, 2.0]);
    assert!(DenseMatrix::add(&a, &matrix(1, 2, &[0.0, 0.0])).is_err());
}

#[test]
fn dense_matrix_inverse() {
    let a = matrix(2, 2, &[2.0, 1.0, 1.0, 1.0]);
    let inv = a.inverse().unwrap();
    for (got, want) in inv.to_vec().iter().zip([1.0, -1.0, -1.0, 2.0]) {
        assert!((got - want).abs() < 1e-12);
    }
    assert_eq!(
        matrix(2, 2, &[1.0, 1.0, 1.0, 1.0]).inverse(),
        Err(CsnError::SingularMatrix { size: 2 })
    );
}

#[test]
fn dense_matrix_inverse_rejects_nan() {
    let a = matrix(2, 2, &[1.0, 0.0, 0.0, f64::NAN]);
    assert_eq!(
        a.inverse(),
        Err(CsnError::NonFinite {
            operation: "inverse"
        })
    );
    let nd = ndarray::Array2::from_shape_vec((1, 1), vec![f64::INFINITY]).unwrap();
    assert!(matches!(
        DenseMatrix::inverse(&nd),
        Err(CsnError::NonFinite { .. })
    ));
}

#[test]
fn dense_matrix_from_row_major_and_symmetry() {
    let a = <Array2<f64> as DenseMatrix>::from_row_major(2, 2, &[1.0, 0.3, 0.3, 2.0]).unwrap();
    assert!(a.is_symmetric(0.0));
    let b = <Array2<f64> as DenseMatrix>::from_row_major(2, 2, &[1.0, 0.3, 0.2, 2.0]).unwrap();
    assert!(!b.is_symmetric(1e-3));
    assert!(<Array2<f64> as DenseMatrix>::from_row_major(2, 2, &[1.0]).is_err());
}

// ---------------------------------------------------------------------------
// ndarray backend
// ---------------------------------------------------------------------------

#[test]
fn ndarray_backend_matches_array2() {
    let values = [2.0, 0.5, 0.0, 0.5, 1.0, 0.25, 0.0, 0.25, 3.0];
    let ours = matrix(3, 3, &values);
    let theirs = ndarray::Array2::from_shape_vec((3, 3), values.to_vec()).unwrap();

    let ours_inv = ours.inverse().unwrap();
    let theirs_inv = DenseMatrix::inverse(&theirs).unwrap();
    for r in 0..3 {
        for c in 0..3 {
            let diff = ours_inv.entry(r, c) - DenseMatrix::entry(&theirs_inv, r, c);
            assert!(diff.abs() < 1e-12);
        }
    }

    let product = DenseMatrix::matmul(&theirs, &theirs_inv).unwrap();
    let eye: ndarray::Array2<f64> = DenseMatrix::identity(3);
    for r in 0..3 {
        for c in 0..3 {
            assert!((product[(r, c)] - eye[(r, c)]).abs() < 1e-12);
        }
    }
}

#[test]
fn ndarray_backend_reports_mismatch() {
    let a = ndarray::Array2::<f64>::zeros((2, 3));
    let b = ndarray::Array2::<f64>::zeros((2, 3));
    assert!(matches!(
        DenseMatrix::matmul(&a, &b),
        Err(CsnError::DimensionMismatch { .. })
    ));
}
