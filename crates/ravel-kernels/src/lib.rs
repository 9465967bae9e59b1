//! Conversion kernels for ravel (pure Rust, parallel ready)
//!
//! Classification, dense normalisation, row stacking and row splitting over
//! [`ravel_core::ArrayEntry`] values.

pub mod classify;
pub mod convert;
pub mod stack;
pub mod unravel;
pub mod util;

pub use classify::{classify, into_entry};
pub use convert::{
    bsr_from_dense, bsr_split_block_rows, bsr_to_dense, coo_from_dense, coo_to_dense,
    csc_from_dense, csc_to_dense, csr_from_dense, csr_to_dense, is_all_zero, tensor_from_dense,
    tensor_to_dense, to_dense,
};
pub use stack::{stack, stack_bsr, stack_coo, stack_csc, stack_csr, stack_with};
pub use unravel::{split_rows, unravel};
