use ravel_core::{Csr, LayoutError};

#[test]
fn from_parts_ok() {
    let nrows = 2usize;
    let ncols = 3usize;
    let indptr = vec![0i64, 2, 3];
    let indices = vec![0i64, 2, 1];
    let data = vec![1.0f64, 2.0, 3.0];
    let csr = Csr::from_parts(nrows, ncols, indptr, indices, data, true).unwrap();
    assert_eq!(csr.nnz(), 3);
    assert_eq!(csr.shape(), (2, 3));
}

#[test]
fn indptr_first_must_be_zero() {
    // last == 1 == nnz, only the leading pointer is wrong
    let err = Csr::from_parts(1, 3, vec![1i64, 1], vec![0i64], vec![1.0f64], true).unwrap_err();
    assert_eq!(err, LayoutError::IndptrFirst);
    assert!(err.to_string().contains("must be 0"));
}

#[test]
fn nnz_and_lengths_must_match() {
    let err = Csr::from_parts(1, 3, vec![0i64, 2], vec![0i64, 1], vec![1.0f64], true).unwrap_err();
    assert!(err.to_string().contains("indices and data"));
}

#[test]
fn last_element_must_equal_nnz() {
    let err =
        Csr::from_parts(1, 3, vec![0i64, 1], vec![0i64, 1], vec![1.0f64, 2.0], true).unwrap_err();
    assert!(matches!(err, LayoutError::IndptrLast { expected: 2, found: 1 }));
}

#[test]
fn indptr_non_decreasing_per_row() {
    let err = Csr::from_parts(2, 3, vec![0i64, 2, 1], vec![0i64], vec![1.0f64], true).unwrap_err();
    assert_eq!(err, LayoutError::IndptrDecreasing);
}

#[test]
fn strict_increasing_columns_enforced() {
    let err =
        Csr::from_parts(1, 3, vec![0i64, 2], vec![1i64, 1], vec![1.0f64, 2.0], true).unwrap_err();
    assert!(err.to_string().contains("strictly increasing"));
}

#[test]
fn unchecked_skips_ordering_scan() {
    let csr = Csr::from_parts(1, 3, vec![0i64, 2], vec![2i64, 0], vec![1.0f64, 2.0], false).unwrap();
    assert!(csr.validate().is_err());
}

#[test]
fn column_index_out_of_bounds() {
    let err = Csr::from_parts(1, 3, vec![0i64, 1], vec![3i64], vec![1.0f64], true).unwrap_err();
    assert!(err.to_string().contains("out of bounds"));
}

#[test]
fn empty_has_flat_pointer() {
    let csr = Csr::empty(4, 2);
    assert_eq!(csr.indptr, vec![0i64; 5]);
    assert_eq!(csr.nnz(), 0);
    assert!(csr.validate().is_ok());
}
