//! Crate-wide error type
//!
//! Each subsystem (ICC decoding, pipeline compilation, pipeline evaluation) owns
//! its own error enum; this type unifies them behind `?` at the public API.

use thiserror::Error;

/// Result type for color-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in color-core operations
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// Failure decoding an ICC profile
    #[error(transparent)]
    Icc(#[from] crate::icc::IccError),

    /// Failure compiling a profile/intent chain into a pipeline
    #[error(transparent)]
    Pipeline(#[from] crate::pipeline::error::PipelineError),

    /// Failure evaluating a compiled pipeline against pixel data
    #[error(transparent)]
    Transform(#[from] crate::pipeline::error::TransformError),

    /// Buffer size mismatch at the public byte-buffer API
    #[error("buffer size mismatch: expected {expected}, got {actual}")]
    BufferSize { expected: usize, actual: usize },
}
