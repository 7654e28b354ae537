//! Error type shared by every primitive in this crate.

/// Failure raised by a chaos-based primitive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrimitiveError {
    /// A constructor or operation received a parameter it cannot work with.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `simulate_exchange` was asked for an entropy label it does not know.
    #[error("unknown entropy label {0:?}")]
    UnknownLabel(String),

    /// Input to a single-block operation had the wrong length.
    #[error("block length mismatch: expected {expected} bytes, got {got}")]
    BlockLength { expected: usize, got: usize },

    /// CBC decryption found padding that was not produced by `encrypt_cbc`.
    #[error("invalid PKCS#7 padding")]
    InvalidPadding,

    /// Prime search gave up after too many candidates.
    #[error("no {bits}-bit prime found after {attempts} candidates")]
    PrimeSearchExhausted { bits: u64, attempts: usize },
}

impl PrimitiveError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
