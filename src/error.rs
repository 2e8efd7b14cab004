//! Error types for the HDC encoding core.

use thiserror::Error;

/// Errors surfaced by encoders and the ESDR memory.
///
/// `UnknownBit` is deliberately absent: decode silently ignores bits that
/// are not present in an encoder's reverse index, per spec. There is no
/// `Serialization` variant either: `Persistable::serialize`/`restore` only
/// rearrange in-memory maps and cannot fail; the caller's actual store is
/// free to define its own error type for I/O or wire-format failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HdcError {
    /// Caller supplied an explicit population with fewer usable bits than
    /// the encoder's `max_nbits`.
    #[error("population has {available} usable bits, need at least {required}")]
    PopulationTooSmall { available: usize, required: usize },

    /// During codebook extension, no bit remained in `pool \ codeword`.
    #[error("population exhausted while extending the codebook")]
    PopulationExhausted,

    /// A constructor or method argument was out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HdcError>;
