//! Attribute-level get/set over a slice of documents.
//!
//! Reading stacks every document's entry for one attribute into a single
//! [`StackedArray`]; writing unravels a stacked value back, one row per
//! document.

use std::any::Any;

use ndarray::Array2;
use ravel_core::{ArrayEntry, StackedArray};
use ravel_kernels::{into_entry, stack_with, to_dense, unravel};
use tracing::debug;

use crate::config::RavelConfig;
use crate::document::Document;
use crate::error::{RavelError, RavelResult};

/// Stack attribute `attr` of every document, in document order.
///
/// The family of the first document holding the attribute decides the
/// target; documents without it contribute one zero row.
///
/// # Errors
/// - [`RavelError::NoData`] when no document holds `attr`.
/// - [`RavelError::Stack`] when the entries cannot be stacked under
///   `config.mixed_families`.
pub fn get_attribute(
    documents: &[Document],
    attr: &str,
    config: &RavelConfig,
) -> RavelResult<StackedArray> {
    let entries: Vec<Option<&ArrayEntry>> = documents.iter().map(|d| d.get(attr)).collect();
    let Some(first) = entries.iter().flatten().next() else {
        return Err(RavelError::NoData {
            attr: attr.to_owned(),
        });
    };
    let target = first.family();
    debug!(attr, documents = documents.len(), family = %target, "reading stacked attribute");
    let stacked = stack_with(&entries, target, config.mixed_families)?;
    debug!(
        attr,
        family = %stacked.family(),
        rows = stacked.row_count(),
        cols = stacked.col_count(),
        "stacked attribute"
    );
    Ok(stacked)
}

/// Unravel `value` into one row per document and store each row under
/// `attr`.
///
/// Nothing is written unless every row was produced.
///
/// # Errors
/// - [`RavelError::Classification`] when `value` is not an array type.
/// - [`RavelError::Layout`] when layout validation is enabled and `value`
///   is structurally invalid.
/// - [`RavelError::Unravel`] when the row count differs from the number of
///   documents.
pub fn set_attribute<V: Any>(
    documents: &mut [Document],
    attr: &str,
    value: V,
    config: &RavelConfig,
) -> RavelResult<()> {
    let entry = into_entry(value)?;
    if config.validate_layouts {
        entry.validate()?;
    }
    debug!(attr, documents = documents.len(), family = %entry.family(), "writing stacked attribute");
    let rows = unravel(&StackedArray::new(entry), documents.len())?;
    for (doc, row) in documents.iter_mut().zip(rows) {
        doc.insert(attr, row);
    }
    Ok(())
}

/// Dense `(rows, cols)` copy of any entry.
#[must_use]
pub fn to_dense_array(entry: &ArrayEntry) -> Array2<f64> {
    to_dense(entry)
}
