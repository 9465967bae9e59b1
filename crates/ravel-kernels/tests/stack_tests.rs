use ndarray::array;
use ravel_core::{
    ArrayEntry, ArrayFamily, Bsr, Coo, Csc, Csr, Device, MixedFamilyPolicy, StackError, Tensor,
};
use ravel_kernels::*;

fn csr_row(values: &[f64]) -> ArrayEntry {
    ArrayEntry::Csr(csr_from_dense(&ndarray::Array2::from_shape_vec((1, values.len()), values.to_vec()).unwrap()))
}

#[test]
fn test_stack_csr_merges_buffers_in_order() {
    // [[1,0,2]] and [[0,3,0],[4,0,0]]
    let a = ArrayEntry::Csr(Csr::from_parts(1, 3, vec![0, 2], vec![0, 2], vec![1.0, 2.0], true).unwrap());
    let b = ArrayEntry::Csr(
        Csr::from_parts(2, 3, vec![0, 1, 2], vec![1, 0], vec![3.0, 4.0], true).unwrap(),
    );
    let out = stack(&[Some(&a), Some(&b)], ArrayFamily::SparseCsr).unwrap();
    assert_eq!(out.family(), ArrayFamily::SparseCsr);
    let ArrayEntry::Csr(m) = out.into_entry() else {
        panic!("expected csr");
    };
    assert_eq!(m.shape(), (3, 3));
    assert_eq!(m.indptr, vec![0, 2, 3, 4]);
    assert_eq!(m.indices, vec![0, 2, 1, 0]);
    assert_eq!(m.data, vec![1.0, 2.0, 3.0, 4.0]);
    assert!(m.validate().is_ok());
}

#[test]
fn test_absent_entry_becomes_zero_row() {
    let a = csr_row(&[1.0, 0.0, 0.0]);
    let c = csr_row(&[0.0, 0.0, 5.0]);
    let out = stack(&[Some(&a), None, Some(&c)], ArrayFamily::SparseCsr).unwrap();
    assert_eq!(out.row_count(), 3);
    assert_eq!(
        to_dense(out.as_entry()),
        array![[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 5.0]]
    );
    let ArrayEntry::Csr(m) = out.into_entry() else {
        panic!("expected csr");
    };
    assert_eq!(m.nnz(), 2);
}

#[test]
fn test_absent_rows_in_every_family() {
    let dense = array![[1.0, 0.0], [0.0, 2.0]];
    let entries = [
        ArrayEntry::Dense(dense.clone()),
        ArrayEntry::Tensor(tensor_from_dense(&dense, Device::Cpu)),
        ArrayEntry::Csr(csr_from_dense(&dense)),
        ArrayEntry::Csc(csc_from_dense(&dense)),
        ArrayEntry::Bsr(bsr_from_dense(&dense, (2, 1)).unwrap()),
        ArrayEntry::Coo(coo_from_dense(&dense)),
    ];
    for entry in &entries {
        let out = stack(&[None, Some(entry), None], entry.family()).unwrap();
        assert_eq!(out.family(), entry.family());
        assert_eq!(out.row_count(), 4);
        assert_eq!(
            to_dense(out.as_entry()),
            array![[0.0, 0.0], [1.0, 0.0], [0.0, 2.0], [0.0, 0.0]],
            "family {}",
            entry.family()
        );
        assert!(out.as_entry().validate().is_ok());
    }
}

#[test]
fn test_shape_mismatch_names_offending_entry() {
    let a = csr_row(&[1.0, 0.0, 2.0]);
    let b = csr_row(&[1.0, 0.0]);
    let err = stack(&[Some(&a), None, Some(&b)], ArrayFamily::SparseCsr).unwrap_err();
    assert_eq!(
        err,
        StackError::ShapeMismatch {
            index: 2,
            expected: 3,
            found: 2
        }
    );
}

#[test]
fn test_all_absent_is_indeterminate() {
    let err = stack(&[None, None], ArrayFamily::DenseGeneric).unwrap_err();
    assert_eq!(err, StackError::Indeterminate);
    let err = stack(&[], ArrayFamily::SparseCoo).unwrap_err();
    assert_eq!(err, StackError::Indeterminate);
}

#[test]
fn test_mixed_families_rejected_by_default() {
    let a = csr_row(&[1.0, 0.0]);
    let b = ArrayEntry::Coo(coo_from_dense(&array![[0.0, 2.0]]));
    let err = stack(&[Some(&a), Some(&b)], ArrayFamily::SparseCsr).unwrap_err();
    assert_eq!(
        err,
        StackError::FamilyMismatch {
            index: 1,
            expected: ArrayFamily::SparseCsr,
            found: ArrayFamily::SparseCoo
        }
    );
}

#[test]
fn test_mixed_families_promoted_to_dense() {
    let a = csr_row(&[1.0, 0.0]);
    let b = ArrayEntry::Coo(coo_from_dense(&array![[0.0, 2.0]]));
    let out = stack_with(
        &[Some(&a), None, Some(&b)],
        ArrayFamily::SparseCsr,
        MixedFamilyPolicy::PromoteDense,
    )
    .unwrap();
    assert_eq!(out.family(), ArrayFamily::DenseGeneric);
    assert_eq!(
        out.into_entry(),
        ArrayEntry::Dense(array![[1.0, 0.0], [0.0, 0.0], [0.0, 2.0]])
    );
}

#[test]
fn test_dense_and_tensor_stack_together() {
    let d = ArrayEntry::Dense(array![[1.0, 2.0]]);
    let t = ArrayEntry::Tensor(Tensor::from_vec(vec![3.0, 4.0], [1, 2], Device::Cuda(0)).unwrap());
    let out = stack(&[Some(&t), Some(&d)], ArrayFamily::DenseAccelerated).unwrap();
    let ArrayEntry::Tensor(stacked) = out.into_entry() else {
        panic!("expected tensor");
    };
    assert_eq!(stacked.device(), Device::Cuda(0));
    assert_eq!(stacked.data(), &[3.0, 4.0, 1.0, 2.0]);

    let out = stack(&[Some(&d), Some(&t)], ArrayFamily::DenseGeneric).unwrap();
    assert_eq!(out.into_entry(), ArrayEntry::Dense(array![[1.0, 2.0], [3.0, 4.0]]));
}

#[test]
fn test_tensor_device_mismatch() {
    let a = ArrayEntry::Tensor(Tensor::zeros([1, 2], Device::Cpu));
    let b = ArrayEntry::Tensor(Tensor::zeros([1, 2], Device::Cuda(1)));
    let err = stack(&[Some(&a), Some(&b)], ArrayFamily::DenseAccelerated).unwrap_err();
    assert_eq!(
        err,
        StackError::DeviceMismatch {
            index: 1,
            expected: Device::Cpu,
            found: Device::Cuda(1)
        }
    );
}

#[test]
fn test_stack_csc_interleaves_columns() {
    // [[1,0],[0,2]] over [[3,4]]
    let a = Csc::from_parts(2, 2, vec![0, 1, 2], vec![0, 1], vec![1.0, 2.0], true).unwrap();
    let b = Csc::from_parts(1, 2, vec![0, 1, 2], vec![0, 0], vec![3.0, 4.0], true).unwrap();
    let m = stack_csc(&[Some(&a), None, Some(&b)], 2);
    assert_eq!(m.shape(), (4, 2));
    assert_eq!(m.indptr, vec![0, 2, 4]);
    assert_eq!(m.indices, vec![0, 3, 1, 3]);
    assert_eq!(m.data, vec![1.0, 3.0, 2.0, 4.0]);
    assert!(m.validate().is_ok());
}

#[test]
fn test_stack_coo_shifts_rows_and_keeps_order() {
    let a = Coo::from_parts(2, 3, vec![1, 0], vec![2, 0], vec![5.0, 6.0], true).unwrap();
    let b = Coo::from_parts(1, 3, vec![0], vec![1], vec![7.0], true).unwrap();
    let m = stack_coo(&[Some(&a), None, Some(&b)], 3);
    assert_eq!(m.shape(), (4, 3));
    assert_eq!(m.row, vec![1, 0, 3]);
    assert_eq!(m.col, vec![2, 0, 1]);
    assert_eq!(m.data, vec![5.0, 6.0, 7.0]);
}

#[test]
fn test_stack_bsr_keeps_aligned_blocks() {
    let a = bsr_from_dense(&array![[1.0, 2.0], [3.0, 4.0]], (2, 2)).unwrap();
    let b = bsr_from_dense(&array![[0.0, 0.0], [0.0, 5.0]], (2, 2)).unwrap();
    let m = stack_bsr(&[Some(&a), Some(&b)], 2).unwrap();
    assert_eq!(m.blocksize, (2, 2));
    assert_eq!(m.shape(), (4, 2));
    assert_eq!(m.nblocks(), 2);
    assert_eq!(
        bsr_to_dense(&m),
        array![[1.0, 2.0], [3.0, 4.0], [0.0, 0.0], [0.0, 5.0]]
    );
}

#[test]
fn test_stack_bsr_reblocks_on_absent_entry() {
    let a = bsr_from_dense(&array![[1.0, 0.0], [0.0, 0.0]], (2, 2)).unwrap();
    let m = stack_bsr(&[Some(&a), None], 2).unwrap();
    assert_eq!(m.blocksize, (1, 2));
    assert_eq!(m.shape(), (3, 2));
    // the all-zero second sub-row is dropped
    assert_eq!(m.nblocks(), 1);
    assert!(m.validate().is_ok());
    assert_eq!(
        bsr_to_dense(&m),
        array![[1.0, 0.0], [0.0, 0.0], [0.0, 0.0]]
    );
}

#[test]
fn test_stack_bsr_column_blocksize_mismatch() {
    let a = ArrayEntry::Bsr(Bsr::empty(1, 4, (1, 2)).unwrap());
    let b = ArrayEntry::Bsr(Bsr::empty(1, 4, (1, 4)).unwrap());
    let err = stack(&[Some(&a), Some(&b)], ArrayFamily::SparseBsr).unwrap_err();
    assert_eq!(
        err,
        StackError::BlocksizeMismatch {
            index: 1,
            expected: 2,
            found: 4
        }
    );
}

#[test]
fn test_large_csc_stack_matches_dense() {
    // enough stored values to take the parallel gather path
    let n = 300usize;
    let dense = ndarray::Array2::from_shape_fn((n, 400), |(i, j)| {
        if (i + j) % 3 == 0 {
            (i * 400 + j) as f64
        } else {
            0.0
        }
    });
    let rows: Vec<ArrayEntry> = dense
        .rows()
        .into_iter()
        .map(|r| ArrayEntry::Csc(csc_from_dense(&r.to_owned().insert_axis(ndarray::Axis(0)))))
        .collect();
    let refs: Vec<Option<&ArrayEntry>> = rows.iter().map(Some).collect();
    let out = stack(&refs, ArrayFamily::SparseCsc).unwrap();
    assert!(out.as_entry().validate().is_ok());
    assert_eq!(to_dense(out.as_entry()), dense);
}
