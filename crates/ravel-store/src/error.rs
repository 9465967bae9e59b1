//! Error type for the document facade.
//!
//! Kernel errors pass through unchanged via `#[from]`; the facade adds the
//! two failures only it can detect.

use ravel_core::{ClassificationError, LayoutError, StackError, UnravelError};
use thiserror::Error;

/// Result type alias for facade operations.
pub type RavelResult<T> = Result<T, RavelError>;

#[derive(Debug, Error)]
pub enum RavelError {
    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error(transparent)]
    Stack(#[from] StackError),

    #[error(transparent)]
    Unravel(#[from] UnravelError),

    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),

    /// Every document lacks the attribute, so no family or width can be
    /// inferred.
    #[error("no document holds attribute `{attr}`")]
    NoData { attr: String },

    #[error("configuration error: {message}")]
    Config { message: String },
}

impl RavelError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
