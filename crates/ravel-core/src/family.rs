//! Array families and the per-document entry enum.

use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{ClassificationError, LayoutError};
use crate::layout::ArrayLayout;
use crate::tensor::Tensor;
use crate::{Bsr, Coo, Csc, Csr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayFamily {
    DenseGeneric,
    DenseAccelerated,
    SparseCsr,
    SparseCsc,
    SparseBsr,
    SparseCoo,
}

impl ArrayFamily {
    pub const ALL: [Self; 6] = [
        Self::DenseGeneric,
        Self::DenseAccelerated,
        Self::SparseCsr,
        Self::SparseCsc,
        Self::SparseBsr,
        Self::SparseCoo,
    ];

    #[inline]
    #[must_use]
    pub const fn is_sparse(self) -> bool {
        !self.is_dense()
    }

    #[inline]
    #[must_use]
    pub const fn is_dense(self) -> bool {
        matches!(self, Self::DenseGeneric | Self::DenseAccelerated)
    }

    /// Whether an entry of family `self` may join a stack targeting `target`
    /// without changing its layout class. The two dense families convert
    /// into each other exactly.
    #[inline]
    #[must_use]
    pub const fn stacks_into(self, target: Self) -> bool {
        (self as u8 == target as u8) || (self.is_dense() && target.is_dense())
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DenseGeneric => "dense",
            Self::DenseAccelerated => "tensor",
            Self::SparseCsr => "csr",
            Self::SparseCsc => "csc",
            Self::SparseBsr => "bsr",
            Self::SparseCoo => "coo",
        }
    }
}

impl fmt::Display for ArrayFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the stacker does when present entries disagree on their family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixedFamilyPolicy {
    /// Fail with [`StackError::FamilyMismatch`](crate::StackError::FamilyMismatch).
    #[default]
    Reject,
    /// Densify every entry and stack as [`ArrayFamily::DenseGeneric`].
    PromoteDense,
}

/// One document's numeric payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayEntry {
    Dense(Array2<f64>),
    Tensor(Tensor),
    Csr(Csr<f64, i64>),
    Csc(Csc<f64, i64>),
    Bsr(Bsr<f64, i64>),
    Coo(Coo<f64, i64>),
}

impl ArrayEntry {
    #[must_use]
    pub const fn family(&self) -> ArrayFamily {
        match self {
            Self::Dense(_) => ArrayFamily::DenseGeneric,
            Self::Tensor(_) => ArrayFamily::DenseAccelerated,
            Self::Csr(_) => ArrayFamily::SparseCsr,
            Self::Csc(_) => ArrayFamily::SparseCsc,
            Self::Bsr(_) => ArrayFamily::SparseBsr,
            Self::Coo(_) => ArrayFamily::SparseCoo,
        }
    }

    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Self::Dense(a) => ArrayLayout::shape(a),
            Self::Tensor(t) => ArrayLayout::shape(t),
            Self::Csr(a) => a.shape(),
            Self::Csc(a) => a.shape(),
            Self::Bsr(a) => a.shape(),
            Self::Coo(a) => a.shape(),
        }
    }

    #[inline]
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.shape().0
    }

    #[inline]
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.shape().1
    }

    /// Stored scalars; equals `rows * cols` for the dense families.
    #[must_use]
    pub fn stored(&self) -> usize {
        match self {
            Self::Dense(a) => a.stored(),
            Self::Tensor(t) => t.stored(),
            Self::Csr(a) => a.nnz(),
            Self::Csc(a) => a.nnz(),
            Self::Bsr(a) => a.nnz(),
            Self::Coo(a) => a.nnz(),
        }
    }

    /// Runs the full structural scan of the underlying storage.
    ///
    /// # Errors
    /// The first [`LayoutError`] found. Dense arrays and tensors cannot be
    /// built in an inconsistent state and always pass.
    pub fn validate(&self) -> Result<(), LayoutError> {
        match self {
            Self::Dense(_) | Self::Tensor(_) => Ok(()),
            Self::Csr(a) => a.validate(),
            Self::Csc(a) => a.validate(),
            Self::Bsr(a) => a.validate(),
            Self::Coo(a) => a.validate(),
        }
    }
}

macro_rules! entry_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ArrayEntry {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }

            impl TryFrom<ArrayEntry> for $ty {
                type Error = ClassificationError;

                fn try_from(entry: ArrayEntry) -> Result<Self, Self::Error> {
                    match entry {
                        ArrayEntry::$variant(value) => Ok(value),
                        other => Err(ClassificationError::WrongFamily {
                            expected: <$ty as ArrayLayout>::FAMILY,
                            found: other.family(),
                        }),
                    }
                }
            }
        )*
    };
}

entry_conversions! {
    Array2<f64> => Dense,
    Tensor => Tensor,
    Csr<f64, i64> => Csr,
    Csc<f64, i64> => Csc,
    Bsr<f64, i64> => Bsr,
    Coo<f64, i64> => Coo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_families_stack_into_each_other() {
        assert!(ArrayFamily::DenseGeneric.stacks_into(ArrayFamily::DenseAccelerated));
        assert!(ArrayFamily::DenseAccelerated.stacks_into(ArrayFamily::DenseGeneric));
        assert!(!ArrayFamily::SparseCsr.stacks_into(ArrayFamily::SparseCoo));
        assert!(!ArrayFamily::DenseGeneric.stacks_into(ArrayFamily::SparseCsr));
        assert!(ArrayFamily::SparseBsr.stacks_into(ArrayFamily::SparseBsr));
    }

    #[test]
    fn sparse_marker_is_structural() {
        let sparse: Vec<_> = ArrayFamily::ALL.iter().filter(|f| f.is_sparse()).collect();
        assert_eq!(sparse.len(), 4);
    }

    #[test]
    fn try_from_reports_both_families() {
        let entry = ArrayEntry::from(Coo::empty(1, 3));
        let err = Csr::<f64, i64>::try_from(entry).unwrap_err();
        assert_eq!(
            err,
            ClassificationError::WrongFamily {
                expected: ArrayFamily::SparseCsr,
                found: ArrayFamily::SparseCoo,
            }
        );
    }
}
