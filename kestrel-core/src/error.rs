//! Structured error types for the kestrel crates.

use thiserror::Error;

/// Unified error type for all kestrel operations.
#[derive(Debug, Error)]
pub enum KestrelError {
    /// I/O error from a streaming reader.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input (empty list, negative penalty, out-of-range values).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Two arguments that must have equal length do not.
    #[error("length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// A distance matrix failed validation.
    #[error("shape violation: {0}")]
    ShapeViolation(String),

    /// Malformed text input (Newick, FASTA).
    #[error("parse error: {0}")]
    Parse(String),

    /// Unrecognised alignment mode name.
    #[error("unknown alignment mode '{0}'")]
    BadMode(String),

    /// A k-mer list where equal lengths are required is ragged.
    #[error("k-mers are not of uniform length: {0}")]
    NotUniform(String),

    /// Assembly input cannot be put together.
    #[error("no solution: {0}")]
    NoSolution(String),

    /// FASTA body bytes appeared before the first `>` header.
    #[error("FASTA data before first header")]
    NoHeader,

    /// A single FASTA line exceeded the reader's limit.
    #[error("line exceeds {limit} bytes")]
    LineTooLong { limit: usize },
}

impl KestrelError {
    /// Shorthand for [`KestrelError::LengthMismatch`].
    pub fn length_mismatch(left: usize, right: usize) -> Self {
        KestrelError::LengthMismatch { left, right }
    }
}

/// Convenience alias used throughout the kestrel crates.
pub type Result<T> = std::result::Result<T, KestrelError>;
