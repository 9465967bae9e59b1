//! Splitting a stacked array back into per-document entries.
//!
//! Every slice keeps the family and sub-layout of its source: a CSR stack
//! gives CSR slices, a COO stack gives COO slices. Sparse slices of all-zero
//! rows store nothing.

use ndarray::s;
use ravel_core::{ArrayEntry, Bsr, Coo, Csc, Csr, StackedArray, Tensor, UnravelError};
use tracing::{debug, trace};

use crate::convert::bsr_split_block_rows;
use crate::util::{i64_to_usize, segment_table, usize_to_i64};

/// Split `stacked` into `count` one-row entries.
///
/// # Errors
/// [`UnravelError::CountMismatch`] when `stacked` does not have exactly
/// `count` rows.
///
/// # Panics
/// - If a sparse `stacked` holds indices or pointers outside its shape; see
///   [`ArrayEntry::validate`]
pub fn unravel(stacked: &StackedArray, count: usize) -> Result<Vec<ArrayEntry>, UnravelError> {
    let rows = stacked.row_count();
    if rows != count {
        return Err(UnravelError::CountMismatch {
            expected: count,
            found: rows,
        });
    }
    debug!(count, family = %stacked.family(), "unravelling stacked array");
    split_rows(stacked.as_entry(), &vec![1; count])
}

/// Split `entry` into consecutive row blocks of the given heights.
///
/// # Errors
/// [`UnravelError::CountMismatch`] when the heights do not add up to the
/// row count of `entry`.
///
/// # Panics
/// - If a sparse `entry` holds indices or pointers outside its shape
pub fn split_rows(entry: &ArrayEntry, row_counts: &[usize]) -> Result<Vec<ArrayEntry>, UnravelError> {
    let nrows = entry.nrows();
    let total: usize = row_counts.iter().sum();
    if total != nrows {
        return Err(UnravelError::CountMismatch {
            expected: total,
            found: nrows,
        });
    }
    let (offsets, owner) = segment_table(row_counts, nrows);
    let out: Vec<ArrayEntry> = match entry {
        ArrayEntry::Dense(a) => offsets
            .windows(2)
            .map(|w| ArrayEntry::Dense(a.slice(s![w[0]..w[1], ..]).to_owned()))
            .collect(),
        ArrayEntry::Tensor(t) => split_tensor(t, &offsets)
            .into_iter()
            .map(ArrayEntry::Tensor)
            .collect(),
        ArrayEntry::Csr(a) => split_csr(a, &offsets)
            .into_iter()
            .map(ArrayEntry::Csr)
            .collect(),
        ArrayEntry::Csc(a) => split_csc(a, &offsets, &owner)
            .into_iter()
            .map(ArrayEntry::Csc)
            .collect(),
        ArrayEntry::Bsr(a) => split_bsr(a, &offsets)
            .into_iter()
            .map(ArrayEntry::Bsr)
            .collect(),
        ArrayEntry::Coo(a) => split_coo(a, &offsets, &owner)
            .into_iter()
            .map(ArrayEntry::Coo)
            .collect(),
    };
    Ok(out)
}

fn split_tensor(t: &Tensor, offsets: &[usize]) -> Vec<Tensor> {
    let cols = t.shape()[1];
    offsets
        .windows(2)
        .map(|w| {
            let mut part = Tensor::zeros([w[1] - w[0], cols], t.device());
            for i in w[0]..w[1] {
                part.row_mut(i - w[0]).copy_from_slice(t.row(i));
            }
            part
        })
        .collect()
}

/// Row slices of a CSR matrix; pointers are rebased to zero.
#[must_use]
pub(crate) fn split_csr(a: &Csr<f64, i64>, offsets: &[usize]) -> Vec<Csr<f64, i64>> {
    offsets
        .windows(2)
        .map(|w| {
            let base = a.indptr[w[0]];
            let s = i64_to_usize(base);
            let e = i64_to_usize(a.indptr[w[1]]);
            Csr::from_parts_unchecked(
                w[1] - w[0],
                a.ncols,
                a.indptr[w[0]..=w[1]].iter().map(|&p| p - base).collect(),
                a.indices[s..e].to_vec(),
                a.data[s..e].to_vec(),
            )
        })
        .collect()
}

/// Row slices of a COO matrix; entry order inside each slice is kept.
#[must_use]
pub(crate) fn split_coo(a: &Coo<f64, i64>, offsets: &[usize], owner: &[usize]) -> Vec<Coo<f64, i64>> {
    let nparts = offsets.len() - 1;
    let mut row: Vec<Vec<i64>> = vec![Vec::new(); nparts];
    let mut col: Vec<Vec<i64>> = vec![Vec::new(); nparts];
    let mut data: Vec<Vec<f64>> = vec![Vec::new(); nparts];
    for k in 0..a.nnz() {
        let i = i64_to_usize(a.row[k]);
        let seg = owner[i];
        row[seg].push(usize_to_i64(i - offsets[seg]));
        col[seg].push(a.col[k]);
        data[seg].push(a.data[k]);
    }
    row.into_iter()
        .zip(col)
        .zip(data)
        .enumerate()
        .map(|(seg, ((r, c), d))| {
            Coo::from_parts_unchecked(offsets[seg + 1] - offsets[seg], a.ncols, r, c, d)
        })
        .collect()
}

/// Row slices of a CSC matrix. Each slice keeps, per column, the entries of
/// its rows in their stored order.
#[must_use]
pub(crate) fn split_csc(a: &Csc<f64, i64>, offsets: &[usize], owner: &[usize]) -> Vec<Csc<f64, i64>> {
    let nparts = offsets.len() - 1;
    let mut indptr: Vec<Vec<i64>> = vec![vec![0]; nparts];
    let mut indices: Vec<Vec<i64>> = vec![Vec::new(); nparts];
    let mut data: Vec<Vec<f64>> = vec![Vec::new(); nparts];
    for j in 0..a.ncols {
        let s = i64_to_usize(a.indptr[j]);
        let e = i64_to_usize(a.indptr[j + 1]);
        for p in s..e {
            let i = i64_to_usize(a.indices[p]);
            let seg = owner[i];
            indices[seg].push(usize_to_i64(i - offsets[seg]));
            data[seg].push(a.data[p]);
        }
        for (ptr, idx) in indptr.iter_mut().zip(&indices) {
            ptr.push(usize_to_i64(idx.len()));
        }
    }
    indptr
        .into_iter()
        .zip(indices)
        .zip(data)
        .enumerate()
        .map(|(seg, ((p, i), d))| {
            Csc::from_parts_unchecked(offsets[seg + 1] - offsets[seg], a.ncols, p, i, d)
        })
        .collect()
}

/// Row slices of a BSR matrix. Slices aligned to block rows keep the
/// blocksize; otherwise the matrix is re-blocked to `(1, c)` first.
#[must_use]
pub(crate) fn split_bsr(a: &Bsr<f64, i64>, offsets: &[usize]) -> Vec<Bsr<f64, i64>> {
    let r = a.blocksize.0;
    if offsets.iter().any(|&o| o % r != 0) {
        trace!(row_blocksize = r, "re-blocking to single-row blocks before split");
        return split_bsr(&bsr_split_block_rows(a), offsets);
    }
    let len = a.block_len();
    offsets
        .windows(2)
        .map(|w| {
            let (b0, b1) = (w[0] / r, w[1] / r);
            let base = a.indptr[b0];
            let s = i64_to_usize(base);
            let e = i64_to_usize(a.indptr[b1]);
            Bsr::from_parts_unchecked(
                w[1] - w[0],
                a.ncols,
                a.blocksize,
                a.indptr[b0..=b1].iter().map(|&p| p - base).collect(),
                a.indices[s..e].to_vec(),
                a.data[s * len..e * len].to_vec(),
            )
        })
        .collect()
}
