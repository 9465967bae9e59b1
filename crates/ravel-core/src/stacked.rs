//! Collection-level projection produced by stacking per-document entries.

use crate::family::{ArrayEntry, ArrayFamily};

/// One array spanning every document of a collection, one row per document.
///
/// Always computed on demand and owned exclusively by the caller; it is never
/// written back as-is, only unravelled.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedArray {
    entry: ArrayEntry,
}

impl StackedArray {
    #[inline]
    #[must_use]
    pub const fn new(entry: ArrayEntry) -> Self {
        Self { entry }
    }

    #[inline]
    #[must_use]
    pub const fn family(&self) -> ArrayFamily {
        self.entry.family()
    }

    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.entry.nrows()
    }

    #[inline]
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.entry.ncols()
    }

    #[inline]
    #[must_use]
    pub const fn as_entry(&self) -> &ArrayEntry {
        &self.entry
    }

    #[inline]
    #[must_use]
    pub fn into_entry(self) -> ArrayEntry {
        self.entry
    }
}

impl From<ArrayEntry> for StackedArray {
    fn from(entry: ArrayEntry) -> Self {
        Self::new(entry)
    }
}
