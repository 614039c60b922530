//! Error type for document stream operations.
//!
//! Positional and numeric inputs throughout the crate clamp rather than
//! fail; the only fallible operations are the ones that touch a stream.

use thiserror::Error;

/// Errors produced by `Document::load_from_reader` / `write_to_writer`.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The underlying reader or writer failed.
    #[error("document stream I/O failed")]
    Io(#[from] std::io::Error),

    /// The stream's bytes are not valid UTF-8.
    #[error("document stream is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}
