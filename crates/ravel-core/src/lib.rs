//! Core data structures for ravel (pure Rust)
//!
//! Storage formats for the six array families a document attribute may hold,
//! the closed [`ArrayEntry`] enum over them, and the error taxonomy shared by
//! the kernels and the document facade.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod bsr;
pub mod coo;
pub mod csc;
pub mod csr;
pub mod error;
pub mod family;
pub mod layout;
pub mod stacked;
pub mod tensor;
mod validate;

pub use bsr::Bsr;
pub use coo::Coo;
pub use csc::Csc;
pub use csr::Csr;
pub use error::{ClassificationError, LayoutError, StackError, UnravelError};
pub use family::{ArrayEntry, ArrayFamily, MixedFamilyPolicy};
pub use layout::ArrayLayout;
pub use stacked::StackedArray;
pub use tensor::{Device, Tensor};
