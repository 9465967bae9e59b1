//! CSR format definitions and constructors

use crate::error::LayoutError;
use crate::validate::{check_compressed, check_equal_len, check_pointer_ends};

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Csr<T, I> {
    pub nrows: usize,
    pub ncols: usize,
    pub indptr: Vec<I>,  // row pointer, length nrows + 1
    pub indices: Vec<I>, // column indices per row
    pub data: Vec<T>,
}

impl<T, I> Csr<T, I> {
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    #[inline]
    #[must_use]
    pub const fn nnz(&self) -> usize {
        self.data.len()
    }
}

impl Csr<f64, i64> {
    /// Builds a CSR matrix from raw parts.
    ///
    /// Pointer length and end values are always checked; `check` additionally
    /// scans every row for bounds and ordering.
    ///
    /// # Errors
    /// Returns a [`LayoutError`] describing the first violated invariant.
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        indptr: Vec<i64>,
        indices: Vec<i64>,
        data: Vec<f64>,
        check: bool,
    ) -> Result<Self, LayoutError> {
        check_equal_len("indices and data", indices.len(), data.len())?;
        check_pointer_ends(&indptr, nrows, data.len())?;
        if check {
            check_compressed(&indptr, &indices, ncols, "column", "row")?;
        }
        Ok(Self::from_parts_unchecked(nrows, ncols, indptr, indices, data))
    }

    #[inline]
    #[must_use]
    pub const fn from_parts_unchecked(
        nrows: usize,
        ncols: usize,
        indptr: Vec<i64>,
        indices: Vec<i64>,
        data: Vec<f64>,
    ) -> Self {
        Self {
            nrows,
            ncols,
            indptr,
            indices,
            data,
        }
    }

    /// An all-zero matrix with no stored elements.
    #[must_use]
    pub fn empty(nrows: usize, ncols: usize) -> Self {
        Self::from_parts_unchecked(nrows, ncols, vec![0; nrows + 1], Vec::new(), Vec::new())
    }

    /// Re-runs the full structural scan on an existing matrix.
    ///
    /// # Errors
    /// Same as [`Csr::from_parts`] with `check = true`.
    pub fn validate(&self) -> Result<(), LayoutError> {
        check_equal_len("indices and data", self.indices.len(), self.data.len())?;
        check_pointer_ends(&self.indptr, self.nrows, self.data.len())?;
        check_compressed(&self.indptr, &self.indices, self.ncols, "column", "row")
    }
}
