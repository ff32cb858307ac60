//! Error types for the typist-tui crate

use std::io;
use thiserror::Error;

/// Result type alias for typist-tui operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for typist-tui
#[derive(Error, Debug)]
pub enum Error {
    /// Terminal I/O errors
    #[error("Terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// Core errors from typist-core
    #[error("Core error: {0}")]
    Core(#[from] typist_core::Error),
}
