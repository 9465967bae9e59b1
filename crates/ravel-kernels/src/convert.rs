//! Conversions between the dense intermediate (`Array2<f64>`) and every
//! storage family.
//!
//! `*_to_dense` never reorders rows or columns; implicit zeros are expanded and
//! duplicate coordinates add up. `*_from_dense` store no explicit zeros.
#![allow(
    clippy::many_single_char_names,
    reason = "Math kernels conventionally use i/j/k/p for indices"
)]

use ndarray::parallel::prelude::*;
use ndarray::{Array2, ArrayViewMut1, Axis};
use ravel_core::{ArrayEntry, Bsr, Coo, Csc, Csr, Device, LayoutError, Tensor};
use wide::f64x4;

use crate::util::{i64_to_usize, usize_to_i64, SMALL_NNZ_LIMIT};

/// Dense copy of any entry, shape `(rows, cols)`.
///
/// # Panics
/// - If a sparse `entry` holds indices or pointers outside its shape (only
///   possible for values built with `from_parts_unchecked`; `entry.validate()`
///   rules it out)
#[must_use]
pub fn to_dense(entry: &ArrayEntry) -> Array2<f64> {
    match entry {
        ArrayEntry::Dense(a) => a.clone(),
        ArrayEntry::Tensor(t) => tensor_to_dense(t),
        ArrayEntry::Csr(a) => csr_to_dense(a),
        ArrayEntry::Csc(a) => csc_to_dense(a),
        ArrayEntry::Bsr(a) => bsr_to_dense(a),
        ArrayEntry::Coo(a) => coo_to_dense(a),
    }
}

#[must_use]
pub fn tensor_to_dense(t: &Tensor) -> Array2<f64> {
    let [rows, cols] = t.shape();
    Array2::from_shape_fn((rows, cols), |(i, j)| t.row(i)[j])
}

#[must_use]
pub fn tensor_from_dense(a: &Array2<f64>, device: Device) -> Tensor {
    let (rows, cols) = a.dim();
    let mut t = Tensor::zeros([rows, cols], device);
    for (i, src) in a.rows().into_iter().enumerate() {
        for (dst, &v) in t.row_mut(i).iter_mut().zip(src.iter()) {
            *dst = v;
        }
    }
    t
}

/// Convert CSR -> dense
#[must_use]
pub fn csr_to_dense(a: &Csr<f64, i64>) -> Array2<f64> {
    fill_rows(a.nrows, a.ncols, a.nnz(), |i, mut row| {
        let s = i64_to_usize(a.indptr[i]);
        let e = i64_to_usize(a.indptr[i + 1]);
        for p in s..e {
            row[i64_to_usize(a.indices[p])] += a.data[p];
        }
    })
}

/// Convert BSR -> dense, expanding each stored block in place.
#[must_use]
pub fn bsr_to_dense(a: &Bsr<f64, i64>) -> Array2<f64> {
    let (r, c) = a.blocksize;
    fill_rows(a.nrows, a.ncols, a.nnz(), |i, mut row| {
        let (br, t) = (i / r, i % r);
        let s = i64_to_usize(a.indptr[br]);
        let e = i64_to_usize(a.indptr[br + 1]);
        for k in s..e {
            let base = i64_to_usize(a.indices[k]) * c;
            let sub = &a.block(k)[t * c..(t + 1) * c];
            for (q, &v) in sub.iter().enumerate() {
                row[base + q] += v;
            }
        }
    })
}

/// Convert CSC -> dense
#[must_use]
pub fn csc_to_dense(a: &Csc<f64, i64>) -> Array2<f64> {
    let mut out = Array2::<f64>::zeros((a.nrows, a.ncols));
    for j in 0..a.ncols {
        let s = i64_to_usize(a.indptr[j]);
        let e = i64_to_usize(a.indptr[j + 1]);
        for p in s..e {
            out[[i64_to_usize(a.indices[p]), j]] += a.data[p];
        }
    }
    out
}

/// Convert COO -> dense, summing duplicates.
#[must_use]
pub fn coo_to_dense(a: &Coo<f64, i64>) -> Array2<f64> {
    let mut out = Array2::<f64>::zeros((a.nrows, a.ncols));
    for ((&i, &j), &v) in a.row.iter().zip(&a.col).zip(&a.data) {
        out[[i64_to_usize(i), i64_to_usize(j)]] += v;
    }
    out
}

/// Convert dense -> CSR (f64/i64)
#[must_use]
pub fn csr_from_dense(a: &Array2<f64>) -> Csr<f64, i64> {
    let (nrows, ncols) = a.dim();
    let mut indptr = Vec::with_capacity(nrows + 1);
    let mut indices = Vec::new();
    let mut data = Vec::new();
    indptr.push(0i64);
    for row in a.rows() {
        for (j, &v) in row.iter().enumerate() {
            if v != 0.0 {
                indices.push(usize_to_i64(j));
                data.push(v);
            }
        }
        indptr.push(usize_to_i64(data.len()));
    }
    Csr::from_parts_unchecked(nrows, ncols, indptr, indices, data)
}

/// Convert dense -> CSC (f64/i64)
#[must_use]
pub fn csc_from_dense(a: &Array2<f64>) -> Csc<f64, i64> {
    let (nrows, ncols) = a.dim();
    let mut indptr = Vec::with_capacity(ncols + 1);
    let mut indices = Vec::new();
    let mut data = Vec::new();
    indptr.push(0i64);
    for col in a.columns() {
        for (i, &v) in col.iter().enumerate() {
            if v != 0.0 {
                indices.push(usize_to_i64(i));
                data.push(v);
            }
        }
        indptr.push(usize_to_i64(data.len()));
    }
    Csc::from_parts_unchecked(nrows, ncols, indptr, indices, data)
}

/// Convert dense -> COO in row-major coordinate order.
#[must_use]
pub fn coo_from_dense(a: &Array2<f64>) -> Coo<f64, i64> {
    let (nrows, ncols) = a.dim();
    let mut row = Vec::new();
    let mut col = Vec::new();
    let mut data = Vec::new();
    for ((i, j), &v) in a.indexed_iter() {
        if v != 0.0 {
            row.push(usize_to_i64(i));
            col.push(usize_to_i64(j));
            data.push(v);
        }
    }
    Coo::from_parts_unchecked(nrows, ncols, row, col, data)
}

/// Convert dense -> BSR with the given blocksize; all-zero blocks are skipped.
///
/// # Errors
/// [`LayoutError::Blocksize`] when `blocksize` does not tile the shape.
pub fn bsr_from_dense(a: &Array2<f64>, blocksize: (usize, usize)) -> Result<Bsr<f64, i64>, LayoutError> {
    let (nrows, ncols) = a.dim();
    // validates the blocksize against the shape
    let empty = Bsr::empty(nrows, ncols, blocksize)?;
    let (r, c) = blocksize;
    let mut indptr = Vec::with_capacity(empty.block_rows() + 1);
    let mut indices = Vec::new();
    let mut data = Vec::new();
    let mut block = Vec::with_capacity(r * c);
    indptr.push(0i64);
    for br in 0..nrows / r {
        for bc in 0..ncols / c {
            block.clear();
            for t in 0..r {
                block.extend(a.row(br * r + t).iter().skip(bc * c).take(c));
            }
            if !is_all_zero(&block) {
                indices.push(usize_to_i64(bc));
                data.extend_from_slice(&block);
            }
        }
        indptr.push(usize_to_i64(indices.len()));
    }
    Ok(Bsr::from_parts_unchecked(nrows, ncols, blocksize, indptr, indices, data))
}

/// Re-block a BSR matrix to `(1, c)` blocks. Each `r x c` block is cut into
/// its `r` rows; all-zero rows are not stored.
#[must_use]
pub fn bsr_split_block_rows(a: &Bsr<f64, i64>) -> Bsr<f64, i64> {
    let (r, c) = a.blocksize;
    let mut indptr = Vec::with_capacity(a.nrows + 1);
    let mut indices = Vec::with_capacity(a.nblocks() * r);
    let mut data = Vec::with_capacity(a.nnz());
    indptr.push(0i64);
    for br in 0..a.block_rows() {
        let s = i64_to_usize(a.indptr[br]);
        let e = i64_to_usize(a.indptr[br + 1]);
        for t in 0..r {
            for k in s..e {
                let sub = &a.block(k)[t * c..(t + 1) * c];
                if !is_all_zero(sub) {
                    indices.push(a.indices[k]);
                    data.extend_from_slice(sub);
                }
            }
            indptr.push(usize_to_i64(indices.len()));
        }
    }
    Bsr::from_parts_unchecked(a.nrows, a.ncols, (1, c), indptr, indices, data)
}

/// Whether every value in `values` is zero (NaN counts as non-zero).
#[must_use]
pub fn is_all_zero(values: &[f64]) -> bool {
    let mut accv = f64x4::from([0.0, 0.0, 0.0, 0.0]);
    let mut k = 0usize;
    let limit4 = values.len() & !3;
    while k < limit4 {
        let v = f64x4::from([values[k], values[k + 1], values[k + 2], values[k + 3]]);
        accv += v.abs();
        k += 4;
    }
    let arr = accv.to_array();
    let head_zero = arr.iter().all(|&x| x == 0.0);
    head_zero && values[k..].iter().all(|&x| x == 0.0)
}

/// Allocates a zeroed `(nrows, ncols)` array and lets `fill` write each row.
/// Rows are filled in parallel once `stored` reaches [`SMALL_NNZ_LIMIT`].
fn fill_rows<F>(nrows: usize, ncols: usize, stored: usize, fill: F) -> Array2<f64>
where
    F: Fn(usize, ArrayViewMut1<'_, f64>) + Sync + Send,
{
    let mut out = Array2::<f64>::zeros((nrows, ncols));
    if stored < SMALL_NNZ_LIMIT {
        out.axis_iter_mut(Axis(0))
            .enumerate()
            .for_each(|(i, row)| fill(i, row));
    } else {
        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(i, row)| fill(i, row));
    }
    out
}
