//! Error taxonomy for layout validation, classification, stacking and unravel.
//!
//! Every failure is local and synchronous. Nothing here is recovered from
//! internally: callers get the error and the inputs are left untouched.

use thiserror::Error;

use crate::family::ArrayFamily;
use crate::tensor::Device;

/// Structural problem in the parts handed to a storage constructor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("indptr length must be {expected} (got {found})")]
    IndptrLength { expected: usize, found: usize },

    #[error("{what} must have equal length ({left} vs {right})")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    #[error("indptr first element must be 0")]
    IndptrFirst,

    #[error("indptr last element must equal {expected} (got {found})")]
    IndptrLast { expected: usize, found: i64 },

    #[error("indptr must be non-decreasing and non-negative")]
    IndptrDecreasing,

    #[error("{axis} index {index} out of bounds for extent {extent}")]
    IndexOutOfBounds {
        axis: &'static str,
        index: i64,
        extent: usize,
    },

    #[error("{axis} indices must be strictly increasing within each {within}")]
    UnsortedIndices {
        axis: &'static str,
        within: &'static str,
    },

    #[error("blocksize {blocksize:?} does not divide shape ({nrows}, {ncols})")]
    Blocksize {
        blocksize: (usize, usize),
        nrows: usize,
        ncols: usize,
    },

    #[error("dimension overflow while computing {what}")]
    Overflow { what: &'static str },
}

/// A value could not be mapped onto one of the six array families.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    #[error("unsupported array type `{type_name}`")]
    UnsupportedType { type_name: &'static str },

    #[error("expected a {expected} entry, found {found}")]
    WrongFamily {
        expected: ArrayFamily,
        found: ArrayFamily,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackError {
    /// Entry `index` has a column count different from the first present entry.
    #[error("entry {index} has {found} columns, expected {expected}")]
    ShapeMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// No present entry to infer the column count from.
    #[error("cannot infer column count: no entry is present")]
    Indeterminate,

    #[error("entry {index} is {found}, cannot stack into {expected}")]
    FamilyMismatch {
        index: usize,
        expected: ArrayFamily,
        found: ArrayFamily,
    },

    #[error("entry {index} has column blocksize {found}, expected {expected}")]
    BlocksizeMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("entry {index} lives on {found}, expected {expected}")]
    DeviceMismatch {
        index: usize,
        expected: Device,
        found: Device,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnravelError {
    #[error("cannot unravel {found} rows into {expected} entries")]
    CountMismatch { expected: usize, found: usize },
}
