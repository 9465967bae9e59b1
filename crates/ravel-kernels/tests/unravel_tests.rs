use ndarray::{array, Array2};
use ravel_core::{ArrayEntry, ArrayFamily, Bsr, Coo, Csc, Csr, Device, StackedArray, UnravelError};
use ravel_kernels::*;

fn sample() -> Array2<f64> {
    // A = [[1,0,2],[0,0,0],[0,3,0],[4,0,5]]
    array![[1.0, 0.0, 2.0], [0.0, 0.0, 0.0], [0.0, 3.0, 0.0], [4.0, 0.0, 5.0]]
}

#[test]
fn test_count_mismatch() {
    let stacked = StackedArray::new(ArrayEntry::Csr(csr_from_dense(&sample())));
    let err = unravel(&stacked, 3).unwrap_err();
    assert_eq!(err, UnravelError::CountMismatch { expected: 3, found: 4 });
}

#[test]
fn test_unravel_csr_slices_are_rebased() {
    let stacked = StackedArray::new(ArrayEntry::Csr(csr_from_dense(&sample())));
    let parts = unravel(&stacked, 4).unwrap();
    assert_eq!(parts.len(), 4);
    let rows: Vec<Csr<f64, i64>> = parts
        .into_iter()
        .map(|p| Csr::try_from(p).unwrap())
        .collect();
    assert_eq!(rows[0].indptr, vec![0, 2]);
    assert_eq!(rows[0].indices, vec![0, 2]);
    assert_eq!(rows[1].indptr, vec![0, 0]);
    assert_eq!(rows[1].nnz(), 0);
    assert_eq!(rows[3].data, vec![4.0, 5.0]);
    for r in &rows {
        assert_eq!(r.shape(), (1, 3));
        assert!(r.validate().is_ok());
    }
}

#[test]
fn test_zero_rows_store_nothing_in_every_sparse_family() {
    let a = sample();
    let entries = [
        ArrayEntry::Csr(csr_from_dense(&a)),
        ArrayEntry::Csc(csc_from_dense(&a)),
        ArrayEntry::Bsr(bsr_from_dense(&a, (1, 3)).unwrap()),
        ArrayEntry::Coo(coo_from_dense(&a)),
    ];
    for entry in entries {
        let family = entry.family();
        let parts = unravel(&StackedArray::new(entry), 4).unwrap();
        assert!(parts.iter().all(|p| p.family() == family));
        assert_eq!(parts[1].stored(), 0, "family {family}");
        assert!(parts[2].stored() > 0, "family {family}");
        assert_eq!(to_dense(&parts[2]), array![[0.0, 3.0, 0.0]]);
    }
}

#[test]
fn test_unravel_keeps_explicit_zeros() {
    let m = Csr::from_parts(2, 2, vec![0, 1, 2], vec![0, 1], vec![0.0, 7.0], true).unwrap();
    let parts = unravel(&StackedArray::new(ArrayEntry::Csr(m)), 2).unwrap();
    let first = Csr::try_from(parts[0].clone()).unwrap();
    assert_eq!(first.data, vec![0.0]);
}

#[test]
fn test_unravel_csc_and_coo_match_dense_rows() {
    let a = sample();
    for entry in [
        ArrayEntry::Csc(csc_from_dense(&a)),
        ArrayEntry::Coo(coo_from_dense(&a)),
    ] {
        let parts = unravel(&StackedArray::new(entry), 4).unwrap();
        for (i, part) in parts.iter().enumerate() {
            assert!(part.validate().is_ok());
            assert_eq!(to_dense(part), a.row(i).to_owned().insert_axis(ndarray::Axis(0)));
        }
    }
}

#[test]
fn test_unravel_csc_rows_are_relative() {
    let a = Csc::from_parts(3, 2, vec![0, 2, 3], vec![0, 2, 2], vec![1.0, 2.0, 3.0], true).unwrap();
    let parts = unravel(&StackedArray::new(ArrayEntry::Csc(a)), 3).unwrap();
    let last = Csc::try_from(parts[2].clone()).unwrap();
    assert_eq!(last.indptr, vec![0, 1, 2]);
    assert_eq!(last.indices, vec![0, 0]);
    assert_eq!(last.data, vec![2.0, 3.0]);
}

#[test]
fn test_unravel_coo_keeps_entry_order() {
    let a = Coo::from_parts(2, 3, vec![1, 0, 1], vec![2, 1, 0], vec![1.0, 2.0, 3.0], true).unwrap();
    let parts = unravel(&StackedArray::new(ArrayEntry::Coo(a)), 2).unwrap();
    let second = Coo::try_from(parts[1].clone()).unwrap();
    assert_eq!(second.row, vec![0, 0]);
    assert_eq!(second.col, vec![2, 0]);
    assert_eq!(second.data, vec![1.0, 3.0]);
}

#[test]
fn test_unravel_bsr_with_tall_blocks() {
    let a = sample();
    let bsr = bsr_from_dense(&a, (2, 3)).unwrap();
    assert_eq!(bsr.blocksize, (2, 3));
    let parts = unravel(&StackedArray::new(ArrayEntry::Bsr(bsr)), 4).unwrap();
    for (i, part) in parts.iter().enumerate() {
        let b = Bsr::try_from(part.clone()).unwrap();
        assert_eq!(b.blocksize, (1, 3));
        assert!(b.validate().is_ok());
        assert_eq!(bsr_to_dense(&b).row(0), a.row(i));
    }
}

#[test]
fn test_split_rows_keeps_blocksize_when_aligned() {
    let bsr = bsr_from_dense(&sample(), (2, 3)).unwrap();
    let parts = split_rows(&ArrayEntry::Bsr(bsr), &[2, 2]).unwrap();
    let second = Bsr::try_from(parts[1].clone()).unwrap();
    assert_eq!(second.blocksize, (2, 3));
    assert_eq!(bsr_to_dense(&second), array![[0.0, 3.0, 0.0], [4.0, 0.0, 5.0]]);
}

#[test]
fn test_split_rows_heights_must_cover() {
    let entry = ArrayEntry::Dense(sample());
    let err = split_rows(&entry, &[1, 2]).unwrap_err();
    assert_eq!(err, UnravelError::CountMismatch { expected: 3, found: 4 });
    let parts = split_rows(&entry, &[3, 0, 1]).unwrap();
    assert_eq!(parts[1].shape(), (0, 3));
    assert_eq!(parts[2].shape(), (1, 3));
}

#[test]
fn test_unravel_dense_and_tensor() {
    let a = sample();
    let parts = unravel(&StackedArray::new(ArrayEntry::Dense(a.clone())), 4).unwrap();
    assert_eq!(parts[3], ArrayEntry::Dense(array![[4.0, 0.0, 5.0]]));

    let t = tensor_from_dense(&a, Device::Cuda(2));
    let parts = unravel(&StackedArray::new(ArrayEntry::Tensor(t)), 4).unwrap();
    for part in &parts {
        assert_eq!(part.family(), ArrayFamily::DenseAccelerated);
    }
    let ArrayEntry::Tensor(row) = &parts[2] else {
        panic!("expected tensor");
    };
    assert_eq!(row.device(), Device::Cuda(2));
    assert_eq!(row.data(), &[0.0, 3.0, 0.0]);
}

#[test]
#[should_panic]
fn test_unravel_out_of_bounds_coo_panics() {
    // row 5 lies outside the two-row shape; validate() would reject it
    let a = Coo::from_parts_unchecked(2, 3, vec![5], vec![0], vec![1.0]);
    assert!(a.validate().is_err());
    let _ = unravel(&StackedArray::new(ArrayEntry::Coo(a)), 2);
}
