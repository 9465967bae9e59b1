//! Shared structural checks for compressed (CSR / CSC / BSR) layouts.

use crate::error::LayoutError;

/// Checks the cheap invariants every compressed layout must hold regardless of
/// the `check` flag: pointer length, first and last pointer values.
pub(crate) fn check_pointer_ends(
    indptr: &[i64],
    nmajor: usize,
    nstored: usize,
) -> Result<(), LayoutError> {
    let expected = nmajor
        .checked_add(1)
        .ok_or(LayoutError::Overflow { what: "indptr length" })?;
    if indptr.len() != expected {
        return Err(LayoutError::IndptrLength {
            expected,
            found: indptr.len(),
        });
    }
    if indptr.first().copied().unwrap_or(0) != 0 {
        return Err(LayoutError::IndptrFirst);
    }
    let last = indptr.last().copied().unwrap_or(0);
    if usize::try_from(last).ok() != Some(nstored) {
        return Err(LayoutError::IndptrLast {
            expected: nstored,
            found: last,
        });
    }
    Ok(())
}

/// Full scan: pointers non-decreasing, minor indices in bounds and strictly
/// increasing inside each major slot.
pub(crate) fn check_compressed(
    indptr: &[i64],
    indices: &[i64],
    minor_extent: usize,
    minor_axis: &'static str,
    major_axis: &'static str,
) -> Result<(), LayoutError> {
    for w in indptr.windows(2) {
        if w[0] > w[1] || w[0] < 0 {
            return Err(LayoutError::IndptrDecreasing);
        }
    }
    for w in indptr.windows(2) {
        let (Ok(start), Ok(end)) = (usize::try_from(w[0]), usize::try_from(w[1])) else {
            return Err(LayoutError::IndptrDecreasing);
        };
        let Some(slot) = indices.get(start..end) else {
            return Err(LayoutError::IndptrDecreasing);
        };
        let mut prev = -1_i64;
        for &m in slot {
            let in_bounds = usize::try_from(m).is_ok_and(|mm| mm < minor_extent);
            if !in_bounds {
                return Err(LayoutError::IndexOutOfBounds {
                    axis: minor_axis,
                    index: m,
                    extent: minor_extent,
                });
            }
            if m <= prev {
                return Err(LayoutError::UnsortedIndices {
                    axis: minor_axis,
                    within: major_axis,
                });
            }
            prev = m;
        }
    }
    Ok(())
}

pub(crate) fn check_equal_len(
    what: &'static str,
    left: usize,
    right: usize,
) -> Result<(), LayoutError> {
    if left == right {
        Ok(())
    } else {
        Err(LayoutError::LengthMismatch { what, left, right })
    }
}
