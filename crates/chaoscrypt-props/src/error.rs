use std::convert::Infallible;

use chaoscrypt_core::PrimitiveError;

/// Failure of a property test.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropsError {
    /// Test parameters that would yield degenerate statistics.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The primitive under test failed; passed through unchanged.
    #[error(transparent)]
    Primitive(#[from] PrimitiveError),
}

impl PropsError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl From<Infallible> for PropsError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
