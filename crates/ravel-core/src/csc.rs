//! CSC format definitions and constructors

use crate::error::LayoutError;
use crate::validate::{check_compressed, check_equal_len, check_pointer_ends};

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Csc<T, I> {
    pub data: Vec<T>,
    pub indices: Vec<I>, // row indices per column
    pub indptr: Vec<I>,  // column pointer, length ncols + 1
    pub ncols: usize,
    pub nrows: usize,
}

impl<T, I> Csc<T, I> {
    #[inline]
    #[must_use]
    pub const fn nnz(&self) -> usize {
        self.data.len()
    }
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }
}

impl Csc<f64, i64> {
    /// # Errors
    /// Returns a [`LayoutError`] when the parts do not describe a valid CSC
    /// matrix. Row ordering inside columns is only checked with `check`.
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        indptr: Vec<i64>,
        indices: Vec<i64>,
        data: Vec<f64>,
        check: bool,
    ) -> Result<Self, LayoutError> {
        check_equal_len("indices and data", indices.len(), data.len())?;
        check_pointer_ends(&indptr, ncols, data.len())?;
        if check {
            check_compressed(&indptr, &indices, nrows, "row", "column")?;
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
            data,
            indices,
            indptr,
            ncols,
            nrows,
        }
    }

    #[must_use]
    pub fn empty(nrows: usize, ncols: usize) -> Self {
        Self::from_parts_unchecked(nrows, ncols, vec![0; ncols + 1], Vec::new(), Vec::new())
    }

    /// # Errors
    /// Same as [`Csc::from_parts`] with `check = true`.
    pub fn validate(&self) -> Result<(), LayoutError> {
        check_equal_len("indices and data", self.indices.len(), self.data.len())?;
        check_pointer_ends(&self.indptr, self.ncols, self.data.len())?;
        check_compressed(&self.indptr, &self.indices, self.nrows, "row", "column")
    }
}
