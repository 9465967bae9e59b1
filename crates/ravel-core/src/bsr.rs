//! BSR format definitions and constructors
//!
//! A block sparse row matrix stores dense `r x c` blocks. `indptr` walks block
//! rows, `indices` holds the block column of each stored block and `data`
//! holds the blocks back to back, each one row-major.

use crate::error::LayoutError;
use crate::validate::{check_compressed, check_equal_len, check_pointer_ends};

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Bsr<T, I> {
    pub data: Vec<T>,    // nblocks * r * c
    pub indices: Vec<I>, // block column per stored block
    pub indptr: Vec<I>,  // block row pointer, length nrows / r + 1
    pub blocksize: (usize, usize),
    pub nrows: usize,
    pub ncols: usize,
}

impl<T, I> Bsr<T, I> {
    /// Stored scalars, explicit zeros inside blocks included.
    #[inline]
    #[must_use]
    pub const fn nnz(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub const fn nblocks(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    #[inline]
    #[must_use]
    pub const fn block_len(&self) -> usize {
        self.blocksize.0 * self.blocksize.1
    }

    /// Number of block rows, `nrows / r`.
    #[inline]
    #[must_use]
    pub const fn block_rows(&self) -> usize {
        self.nrows / self.blocksize.0
    }
}

impl Bsr<f64, i64> {
    /// # Errors
    /// Fails when the blocksize does not tile the shape, when the block
    /// pointer is malformed, or (with `check`) when block columns are out of
    /// bounds or unsorted.
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        blocksize: (usize, usize),
        indptr: Vec<i64>,
        indices: Vec<i64>,
        data: Vec<f64>,
        check: bool,
    ) -> Result<Self, LayoutError> {
        let bsr = Self::from_parts_unchecked(nrows, ncols, blocksize, indptr, indices, data);
        bsr.check_cheap()?;
        if check {
            check_compressed(
                &bsr.indptr,
                &bsr.indices,
                ncols / blocksize.1,
                "block column",
                "block row",
            )?;
        }
        Ok(bsr)
    }

    #[inline]
    #[must_use]
    pub const fn from_parts_unchecked(
        nrows: usize,
        ncols: usize,
        blocksize: (usize, usize),
        indptr: Vec<i64>,
        indices: Vec<i64>,
        data: Vec<f64>,
    ) -> Self {
        Self {
            data,
            indices,
            indptr,
            blocksize,
            nrows,
            ncols,
        }
    }

    /// # Errors
    /// Returns [`LayoutError::Blocksize`] when `blocksize` does not tile the shape.
    pub fn empty(nrows: usize, ncols: usize, blocksize: (usize, usize)) -> Result<Self, LayoutError> {
        check_blocksize(nrows, ncols, blocksize)?;
        Ok(Self::from_parts_unchecked(
            nrows,
            ncols,
            blocksize,
            vec![0; nrows / blocksize.0 + 1],
            Vec::new(),
            Vec::new(),
        ))
    }

    /// # Errors
    /// Same as [`Bsr::from_parts`] with `check = true`.
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.check_cheap()?;
        check_compressed(
            &self.indptr,
            &self.indices,
            self.ncols / self.blocksize.1,
            "block column",
            "block row",
        )
    }

    /// Values of stored block `k`, row-major.
    #[inline]
    #[must_use]
    pub fn block(&self, k: usize) -> &[f64] {
        let len = self.block_len();
        &self.data[k * len..(k + 1) * len]
    }

    fn check_cheap(&self) -> Result<(), LayoutError> {
        check_blocksize(self.nrows, self.ncols, self.blocksize)?;
        let expected = self
            .indices
            .len()
            .checked_mul(self.block_len())
            .ok_or(LayoutError::Overflow { what: "block data length" })?;
        check_equal_len("block data and indices * r * c", self.data.len(), expected)?;
        check_pointer_ends(&self.indptr, self.block_rows(), self.indices.len())
    }
}

fn check_blocksize(nrows: usize, ncols: usize, blocksize: (usize, usize)) -> Result<(), LayoutError> {
    let (r, c) = blocksize;
    if r == 0 || c == 0 || nrows % r != 0 || ncols % c != 0 {
        return Err(LayoutError::Blocksize {
            blocksize,
            nrows,
            ncols,
        });
    }
    Ok(())
}
