//! Document facade for ravel
//!
//! Documents carry optional per-document arrays under named attributes. A
//! [`DocumentArray`] reads one attribute across all documents as a single
//! stacked array and writes a stacked array back one row per document,
//! keeping whichever storage family was in force.
#![allow(
    clippy::must_use_candidate,
    reason = "Iterator accessors on documents are cheap views; marking each one adds noise"
)]

pub mod attribute;
pub mod config;
pub mod document;
pub mod error;

pub use attribute::{get_attribute, set_attribute, to_dense_array};
pub use config::RavelConfig;
pub use document::{Document, DocumentArray, EMBEDDING, TENSOR};
pub use error::{RavelError, RavelResult};
pub use ravel_core::{
    ArrayEntry, ArrayFamily, Bsr, Coo, Csc, Csr, Device, MixedFamilyPolicy, StackedArray, Tensor,
};

#[inline]
#[must_use]
pub const fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
