//! Index conversions and size thresholds shared by the kernels.

/// Below this many stored elements kernels stay single-threaded.
pub const SMALL_NNZ_LIMIT: usize = 32 * 1024;

/// Convert i64 to usize, asserting non-negativity.
#[inline]
#[must_use]
pub fn i64_to_usize(x: i64) -> usize {
    debug_assert!(x >= 0, "value must be non-negative");
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    {
        x as usize
    }
}

#[inline]
#[must_use]
pub fn usize_to_i64(x: usize) -> i64 {
    debug_assert!(i64::try_from(x).is_ok(), "value must fit in i64");
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    {
        x as i64
    }
}

/// Row offset of each segment plus a row -> segment lookup table.
///
/// `counts[k]` rows belong to segment `k`; the caller guarantees the counts
/// sum to `nrows`.
#[must_use]
pub(crate) fn segment_table(counts: &[usize], nrows: usize) -> (Vec<usize>, Vec<usize>) {
    let mut offsets = Vec::with_capacity(counts.len() + 1);
    let mut owner = Vec::with_capacity(nrows);
    let mut acc = 0usize;
    for (k, &n) in counts.iter().enumerate() {
        offsets.push(acc);
        owner.extend(std::iter::repeat(k).take(n));
        acc += n;
    }
    offsets.push(acc);
    (offsets, owner)
}
