//! Common view over the six concrete storage types.

use ndarray::Array2;

use crate::family::ArrayFamily;
use crate::tensor::Tensor;
use crate::{Bsr, Coo, Csc, Csr};

/// Implemented by every concrete storage type an [`ArrayEntry`](crate::ArrayEntry)
/// can hold. `FAMILY` is fixed by the type, so the family of a value is known
/// from its type alone.
pub trait ArrayLayout {
    const FAMILY: ArrayFamily;

    fn shape(&self) -> (usize, usize);

    /// Number of stored scalars. Dense layouts store every element.
    fn stored(&self) -> usize;
}

impl ArrayLayout for Array2<f64> {
    const FAMILY: ArrayFamily = ArrayFamily::DenseGeneric;

    #[inline]
    fn shape(&self) -> (usize, usize) {
        self.dim()
    }

    #[inline]
    fn stored(&self) -> usize {
        self.len()
    }
}

impl ArrayLayout for Tensor {
    const FAMILY: ArrayFamily = ArrayFamily::DenseAccelerated;

    #[inline]
    fn shape(&self) -> (usize, usize) {
        let [rows, cols] = Tensor::shape(self);
        (rows, cols)
    }

    #[inline]
    fn stored(&self) -> usize {
        self.data().len()
    }
}

impl ArrayLayout for Csr<f64, i64> {
    const FAMILY: ArrayFamily = ArrayFamily::SparseCsr;

    #[inline]
    fn shape(&self) -> (usize, usize) {
        Csr::shape(self)
    }

    #[inline]
    fn stored(&self) -> usize {
        self.nnz()
    }
}

impl ArrayLayout for Csc<f64, i64> {
    const FAMILY: ArrayFamily = ArrayFamily::SparseCsc;

    #[inline]
    fn shape(&self) -> (usize, usize) {
        Csc::shape(self)
    }

    #[inline]
    fn stored(&self) -> usize {
        self.nnz()
    }
}

impl ArrayLayout for Bsr<f64, i64> {
    const FAMILY: ArrayFamily = ArrayFamily::SparseBsr;

    #[inline]
    fn shape(&self) -> (usize, usize) {
        Bsr::shape(self)
    }

    #[inline]
    fn stored(&self) -> usize {
        self.nnz()
    }
}

impl ArrayLayout for Coo<f64, i64> {
    const FAMILY: ArrayFamily = ArrayFamily::SparseCoo;

    #[inline]
    fn shape(&self) -> (usize, usize) {
        Coo::shape(self)
    }

    #[inline]
    fn stored(&self) -> usize {
        self.nnz()
    }
}
