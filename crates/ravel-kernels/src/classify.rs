//! Array family classification.
//!
//! Families are closed: a value is one of the six storage types (or an entry
//! or stacked array wrapping one), otherwise it is rejected. Classification
//! looks at the concrete type only, never at the stored values.

use std::any::{type_name, Any};

use ndarray::Array2;
use ravel_core::{
    ArrayEntry, ArrayFamily, ArrayLayout, Bsr, ClassificationError, Coo, Csc, Csr, StackedArray,
    Tensor,
};

/// Family of `value`.
///
/// # Errors
/// [`ClassificationError::UnsupportedType`] when `V` is not a recognised
/// array type.
pub fn classify<V: Any>(value: &V) -> Result<ArrayFamily, ClassificationError> {
    let any = value as &dyn Any;
    if let Some(entry) = any.downcast_ref::<ArrayEntry>() {
        return Ok(entry.family());
    }
    if let Some(stacked) = any.downcast_ref::<StackedArray>() {
        return Ok(stacked.family());
    }
    family_of::<Array2<f64>>(any)
        .or_else(|| family_of::<Tensor>(any))
        .or_else(|| family_of::<Csr<f64, i64>>(any))
        .or_else(|| family_of::<Csc<f64, i64>>(any))
        .or_else(|| family_of::<Bsr<f64, i64>>(any))
        .or_else(|| family_of::<Coo<f64, i64>>(any))
        .ok_or(ClassificationError::UnsupportedType {
            type_name: type_name::<V>(),
        })
}

/// Moves a recognised value into an [`ArrayEntry`].
///
/// # Errors
/// Same as [`classify`].
pub fn into_entry<V: Any>(value: V) -> Result<ArrayEntry, ClassificationError> {
    let boxed: Box<dyn Any> = Box::new(value);
    let boxed = match boxed.downcast::<ArrayEntry>() {
        Ok(entry) => return Ok(*entry),
        Err(other) => other,
    };
    let boxed = match boxed.downcast::<StackedArray>() {
        Ok(stacked) => return Ok(stacked.into_entry()),
        Err(other) => other,
    };
    take::<Array2<f64>>(boxed)
        .or_else(take::<Tensor>)
        .or_else(take::<Csr<f64, i64>>)
        .or_else(take::<Csc<f64, i64>>)
        .or_else(take::<Bsr<f64, i64>>)
        .or_else(take::<Coo<f64, i64>>)
        .map_err(|_| ClassificationError::UnsupportedType {
            type_name: type_name::<V>(),
        })
}

#[inline]
fn family_of<T: ArrayLayout + Any>(any: &dyn Any) -> Option<ArrayFamily> {
    any.is::<T>().then_some(T::FAMILY)
}

#[inline]
fn take<T>(boxed: Box<dyn Any>) -> Result<ArrayEntry, Box<dyn Any>>
where
    T: Any + Into<ArrayEntry>,
{
    boxed.downcast::<T>().map(|value| (*value).into())
}
