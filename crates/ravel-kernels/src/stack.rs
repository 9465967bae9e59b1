//! Row-wise stacking of per-document entries into one array.
//!
//! Sparse targets merge pointer and index buffers directly; nothing is
//! densified on the way unless the mixed-family policy asks for it. Absent
//! entries become one all-zero row each.

use ndarray::{s, Array2};
use ravel_core::{
    ArrayEntry, ArrayFamily, Bsr, Coo, Csc, Csr, MixedFamilyPolicy, StackError, StackedArray,
    Tensor,
};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::convert::{bsr_split_block_rows, to_dense};
use crate::util::{i64_to_usize, usize_to_i64, SMALL_NNZ_LIMIT};

/// Stack `entries` in order into `target`, rejecting mixed families.
///
/// # Errors
/// See [`stack_with`].
pub fn stack(
    entries: &[Option<&ArrayEntry>],
    target: ArrayFamily,
) -> Result<StackedArray, StackError> {
    stack_with(entries, target, MixedFamilyPolicy::Reject)
}

/// Stack `entries` in order into `target`.
///
/// # Errors
/// - [`StackError::Indeterminate`] when no entry is present.
/// - [`StackError::ShapeMismatch`] when column counts differ.
/// - [`StackError::FamilyMismatch`] when an entry cannot join `target` and
///   `policy` is [`MixedFamilyPolicy::Reject`].
/// - [`StackError::BlocksizeMismatch`] / [`StackError::DeviceMismatch`] for
///   BSR column blocksizes or tensor devices that disagree.
///
/// # Panics
/// - If a sparse entry holds indices or pointers outside its shape; see
///   [`ArrayEntry::validate`]
pub fn stack_with(
    entries: &[Option<&ArrayEntry>],
    target: ArrayFamily,
    policy: MixedFamilyPolicy,
) -> Result<StackedArray, StackError> {
    let ncols = infer_cols(entries)?;
    check_columns(entries, ncols)?;
    let target = match check_families(entries, target) {
        Ok(()) => target,
        Err(err) => match policy {
            MixedFamilyPolicy::Reject => return Err(err),
            MixedFamilyPolicy::PromoteDense => {
                trace!(%err, "promoting mixed entries to dense");
                ArrayFamily::DenseGeneric
            }
        },
    };
    debug!(entries = entries.len(), family = %target, ncols, "stacking entries");

    let entry = match target {
        ArrayFamily::DenseGeneric => ArrayEntry::Dense(stack_dense(entries, ncols)),
        ArrayFamily::DenseAccelerated => ArrayEntry::Tensor(stack_tensor(entries, ncols)?),
        ArrayFamily::SparseCsr => {
            let parts = pick(entries, target, |e| match e {
                ArrayEntry::Csr(a) => Some(a),
                _ => None,
            })?;
            ArrayEntry::Csr(stack_csr(&parts, ncols))
        }
        ArrayFamily::SparseCsc => {
            let parts = pick(entries, target, |e| match e {
                ArrayEntry::Csc(a) => Some(a),
                _ => None,
            })?;
            ArrayEntry::Csc(stack_csc(&parts, ncols))
        }
        ArrayFamily::SparseBsr => {
            let parts = pick(entries, target, |e| match e {
                ArrayEntry::Bsr(a) => Some(a),
                _ => None,
            })?;
            ArrayEntry::Bsr(stack_bsr(&parts, ncols)?)
        }
        ArrayFamily::SparseCoo => {
            let parts = pick(entries, target, |e| match e {
                ArrayEntry::Coo(a) => Some(a),
                _ => None,
            })?;
            ArrayEntry::Coo(stack_coo(&parts, ncols))
        }
    };
    Ok(StackedArray::new(entry))
}

/// Stack CSR matrices; `None` adds one empty row.
#[must_use]
pub fn stack_csr(parts: &[Option<&Csr<f64, i64>>], ncols: usize) -> Csr<f64, i64> {
    let nrows: usize = parts.iter().map(|p| p.map_or(1, |a| a.nrows)).sum();
    let nnz: usize = parts.iter().flatten().map(|a| a.nnz()).sum();
    let mut indptr = Vec::with_capacity(nrows + 1);
    let mut indices = Vec::with_capacity(nnz);
    let mut data = Vec::with_capacity(nnz);
    indptr.push(0i64);
    for part in parts {
        let base = usize_to_i64(data.len());
        match part {
            None => indptr.push(base),
            Some(a) => {
                indptr.extend(a.indptr[1..].iter().map(|&p| p + base));
                indices.extend_from_slice(&a.indices);
                data.extend_from_slice(&a.data);
            }
        }
    }
    Csr::from_parts_unchecked(nrows, ncols, indptr, indices, data)
}

/// Stack COO matrices by shifting row coordinates; entry order is kept.
#[must_use]
pub fn stack_coo(parts: &[Option<&Coo<f64, i64>>], ncols: usize) -> Coo<f64, i64> {
    let nnz: usize = parts.iter().flatten().map(|a| a.nnz()).sum();
    let mut row = Vec::with_capacity(nnz);
    let mut col = Vec::with_capacity(nnz);
    let mut data = Vec::with_capacity(nnz);
    let mut offset = 0usize;
    for part in parts {
        match part {
            None => offset += 1,
            Some(a) => {
                let shift = usize_to_i64(offset);
                row.extend(a.row.iter().map(|&i| i + shift));
                col.extend_from_slice(&a.col);
                data.extend_from_slice(&a.data);
                offset += a.nrows;
            }
        }
    }
    Coo::from_parts_unchecked(offset, ncols, row, col, data)
}

/// Stack CSC matrices: each output column is the concatenation, in part
/// order, of that column in every part with rows shifted by the part offset.
#[must_use]
pub fn stack_csc(parts: &[Option<&Csc<f64, i64>>], ncols: usize) -> Csc<f64, i64> {
    let mut present = Vec::with_capacity(parts.len());
    let mut offset = 0usize;
    for part in parts {
        match part {
            None => offset += 1,
            Some(a) => {
                present.push((usize_to_i64(offset), *a));
                offset += a.nrows;
            }
        }
    }
    let nnz: usize = present.iter().map(|(_, a)| a.nnz()).sum();

    let gather = |j: usize| {
        let mut rows = Vec::new();
        let mut vals = Vec::new();
        for &(shift, a) in &present {
            let s = i64_to_usize(a.indptr[j]);
            let e = i64_to_usize(a.indptr[j + 1]);
            rows.extend(a.indices[s..e].iter().map(|&i| i + shift));
            vals.extend_from_slice(&a.data[s..e]);
        }
        (rows, vals)
    };
    let columns: Vec<(Vec<i64>, Vec<f64>)> = if nnz < SMALL_NNZ_LIMIT {
        (0..ncols).map(gather).collect()
    } else {
        (0..ncols).into_par_iter().map(gather).collect()
    };

    let mut indptr = Vec::with_capacity(ncols + 1);
    let mut indices = Vec::with_capacity(nnz);
    let mut data = Vec::with_capacity(nnz);
    indptr.push(0i64);
    for (rows, vals) in columns {
        indices.extend(rows);
        data.extend(vals);
        indptr.push(usize_to_i64(data.len()));
    }
    Csc::from_parts_unchecked(offset, ncols, indptr, indices, data)
}

/// Stack BSR matrices.
///
/// Block rows are concatenated as-is when every part shares the row
/// blocksize (and absent parts can be one block row tall). Otherwise every
/// part is first re-blocked to single-row blocks.
///
/// # Errors
/// [`StackError::BlocksizeMismatch`] when column blocksizes differ.
pub fn stack_bsr(parts: &[Option<&Bsr<f64, i64>>], ncols: usize) -> Result<Bsr<f64, i64>, StackError> {
    let Some(first) = parts.iter().flatten().next() else {
        return Err(StackError::Indeterminate);
    };
    let (r, c) = first.blocksize;
    for (index, part) in parts.iter().enumerate() {
        if let Some(a) = part {
            if a.blocksize.1 != c {
                return Err(StackError::BlocksizeMismatch {
                    index,
                    expected: c,
                    found: a.blocksize.1,
                });
            }
        }
    }
    let aligned = parts
        .iter()
        .all(|p| p.map_or(r == 1, |a| a.blocksize.0 == r));
    if aligned {
        return Ok(concat_bsr(parts, (r, c), ncols));
    }

    trace!(row_blocksize = r, "re-blocking parts to single-row blocks before stacking");
    let owned: Vec<Option<Bsr<f64, i64>>> = parts
        .iter()
        .map(|p| p.map(bsr_split_block_rows))
        .collect();
    let refs: Vec<Option<&Bsr<f64, i64>>> = owned.iter().map(Option::as_ref).collect();
    Ok(concat_bsr(&refs, (1, c), ncols))
}

fn concat_bsr(parts: &[Option<&Bsr<f64, i64>>], blocksize: (usize, usize), ncols: usize) -> Bsr<f64, i64> {
    let nrows: usize = parts.iter().map(|p| p.map_or(blocksize.0, |a| a.nrows)).sum();
    let mut indptr = vec![0i64];
    let mut indices = Vec::new();
    let mut data = Vec::new();
    for part in parts {
        let base = usize_to_i64(indices.len());
        match part {
            None => indptr.push(base),
            Some(a) => {
                indptr.extend(a.indptr[1..].iter().map(|&p| p + base));
                indices.extend_from_slice(&a.indices);
                data.extend_from_slice(&a.data);
            }
        }
    }
    Bsr::from_parts_unchecked(nrows, ncols, blocksize, indptr, indices, data)
}

fn stack_dense(entries: &[Option<&ArrayEntry>], ncols: usize) -> Array2<f64> {
    let nrows: usize = entries.iter().map(|e| entry_rows(*e)).sum();
    let mut out = Array2::<f64>::zeros((nrows, ncols));
    let mut offset = 0usize;
    for entry in entries {
        let rows = entry_rows(*entry);
        if let Some(entry) = entry {
            let mut dst = out.slice_mut(s![offset..offset + rows, ..]);
            match entry {
                ArrayEntry::Dense(a) => dst.assign(a),
                other => dst.assign(&to_dense(other)),
            }
        }
        offset += rows;
    }
    out
}

fn stack_tensor(entries: &[Option<&ArrayEntry>], ncols: usize) -> Result<Tensor, StackError> {
    let mut device = None;
    for (index, entry) in entries.iter().enumerate() {
        if let Some(ArrayEntry::Tensor(t)) = entry {
            match device {
                None => device = Some(t.device()),
                Some(expected) if expected != t.device() => {
                    return Err(StackError::DeviceMismatch {
                        index,
                        expected,
                        found: t.device(),
                    });
                }
                Some(_) => {}
            }
        }
    }

    let nrows: usize = entries.iter().map(|e| entry_rows(*e)).sum();
    let mut out = Tensor::zeros([nrows, ncols], device.unwrap_or_default());
    let mut offset = 0usize;
    for entry in entries {
        match entry {
            None => offset += 1,
            Some(ArrayEntry::Tensor(t)) => {
                for i in 0..t.shape()[0] {
                    out.row_mut(offset + i).copy_from_slice(t.row(i));
                }
                offset += t.shape()[0];
            }
            Some(other) => {
                let dense = to_dense(other);
                for (i, src) in dense.rows().into_iter().enumerate() {
                    for (dst, &v) in out.row_mut(offset + i).iter_mut().zip(src.iter()) {
                        *dst = v;
                    }
                }
                offset += dense.nrows();
            }
        }
    }
    Ok(out)
}

#[inline]
fn entry_rows(entry: Option<&ArrayEntry>) -> usize {
    entry.map_or(1, ArrayEntry::nrows)
}

fn infer_cols(entries: &[Option<&ArrayEntry>]) -> Result<usize, StackError> {
    entries
        .iter()
        .flatten()
        .next()
        .map(|e| e.ncols())
        .ok_or(StackError::Indeterminate)
}

fn check_columns(entries: &[Option<&ArrayEntry>], ncols: usize) -> Result<(), StackError> {
    for (index, entry) in entries.iter().enumerate() {
        if let Some(e) = entry {
            if e.ncols() != ncols {
                return Err(StackError::ShapeMismatch {
                    index,
                    expected: ncols,
                    found: e.ncols(),
                });
            }
        }
    }
    Ok(())
}

fn check_families(entries: &[Option<&ArrayEntry>], target: ArrayFamily) -> Result<(), StackError> {
    for (index, entry) in entries.iter().enumerate() {
        if let Some(e) = entry {
            if !e.family().stacks_into(target) {
                return Err(StackError::FamilyMismatch {
                    index,
                    expected: target,
                    found: e.family(),
                });
            }
        }
    }
    Ok(())
}

fn pick<'a, T>(
    entries: &[Option<&'a ArrayEntry>],
    target: ArrayFamily,
    select: impl Fn(&'a ArrayEntry) -> Option<&'a T>,
) -> Result<Vec<Option<&'a T>>, StackError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match *entry {
            None => Ok(None),
            Some(e) => select(e).map(Some).ok_or(StackError::FamilyMismatch {
                index,
                expected: target,
                found: e.family(),
            }),
        })
        .collect()
}
