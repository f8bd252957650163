//! Error types for Amora.
//!
//! A single `thiserror` enum covers the whole workspace. Variants are kept
//! distinct so callers can match on the failure class instead of parsing
//! messages.

use thiserror::Error;

/// Result type alias using [`AmoraError`].
pub type Result<T> = std::result::Result<T, AmoraError>;

/// Main error type for all Amora operations.
#[derive(Debug, Error)]
pub enum AmoraError {
    /// A string, URI, or event record failed to parse.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// A felt exceeded the wire bound, or a scalar was outside `[1, N-1]`.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// The x-coordinate has no square root for `y^2 = x^3 + a*x + b`.
    #[error("x-coordinate {0} is not on the curve")]
    NotOnCurve(String),

    /// A zero scalar, zero coordinate, or point at infinity appeared where
    /// a group element was required.
    #[error("zero scalar or point at infinity")]
    ZeroPoint,

    /// Opaque pass-through from the chain client.
    #[error("chain client error: {0}")]
    Chain(String),

    /// The operation requires a capability this configuration lacks.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

impl AmoraError {
    /// Wraps any displayable chain-client failure.
    pub fn chain(err: impl std::fmt::Display) -> Self {
        AmoraError::Chain(err.to_string())
    }

    /// Returns true if this error came out of the curve arithmetic.
    ///
    /// Crypto errors indicate malformed input, never a "no match".
    pub fn is_crypto_error(&self) -> bool {
        matches!(self, AmoraError::NotOnCurve(_) | AmoraError::ZeroPoint)
    }

    /// Returns true if this is a parse or range failure.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            AmoraError::InvalidFormat(_) | AmoraError::OutOfRange(_)
        )
    }
}
