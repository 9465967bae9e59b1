//! COO format definitions and constructors

use crate::error::LayoutError;
use crate::validate::check_equal_len;

/// Coordinate list. Entry order is part of the layout; duplicate coordinates
/// are allowed and add up when densified.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Coo<T, I> {
    pub data: Vec<T>,
    pub row: Vec<I>, // length nnz
    pub col: Vec<I>, // length nnz
    pub ncols: usize,
    pub nrows: usize,
}

impl<T, I> Coo<T, I> {
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

impl Coo<f64, i64> {
    /// # Errors
    /// Fails when `row`, `col` and `data` differ in length, or (with `check`)
    /// when a coordinate falls outside the shape.
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        row: Vec<i64>,
        col: Vec<i64>,
        data: Vec<f64>,
        check: bool,
    ) -> Result<Self, LayoutError> {
        let coo = Self::from_parts_unchecked(nrows, ncols, row, col, data);
        check_equal_len("row and data", coo.row.len(), coo.data.len())?;
        check_equal_len("col and data", coo.col.len(), coo.data.len())?;
        if check {
            coo.check_bounds()?;
        }
        Ok(coo)
    }

    #[inline]
    #[must_use]
    pub const fn from_parts_unchecked(
        nrows: usize,
        ncols: usize,
        row: Vec<i64>,
        col: Vec<i64>,
        data: Vec<f64>,
    ) -> Self {
        Self {
            data,
            row,
            col,
            ncols,
            nrows,
        }
    }

    #[must_use]
    pub const fn empty(nrows: usize, ncols: usize) -> Self {
        Self::from_parts_unchecked(nrows, ncols, Vec::new(), Vec::new(), Vec::new())
    }

    /// # Errors
    /// Same as [`Coo::from_parts`] with `check = true`.
    pub fn validate(&self) -> Result<(), LayoutError> {
        check_equal_len("row and data", self.row.len(), self.data.len())?;
        check_equal_len("col and data", self.col.len(), self.data.len())?;
        self.check_bounds()
    }

    fn check_bounds(&self) -> Result<(), LayoutError> {
        for (&i, &j) in self.row.iter().zip(&self.col) {
            if !usize::try_from(i).is_ok_and(|ii| ii < self.nrows) {
                return Err(LayoutError::IndexOutOfBounds {
                    axis: "row",
                    index: i,
                    extent: self.nrows,
                });
            }
            if !usize::try_from(j).is_ok_and(|jj| jj < self.ncols) {
                return Err(LayoutError::IndexOutOfBounds {
                    axis: "column",
                    index: j,
                    extent: self.ncols,
                });
            }
        }
        Ok(())
    }
}
