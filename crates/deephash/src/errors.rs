use thiserror::Error;

use crate::validation::ValidationError;

/// Failure reported by a streaming digest primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("digest write failed: {0}")]
pub struct DigestError(pub String);

/// Errors that abort a hashing call. There is no partial success.
#[derive(Error, Debug)]
pub enum HashError {
    /// The digest rejected a write.
    #[error(transparent)]
    Digest(#[from] DigestError),
    /// The value could not be classified or its fields enumerated.
    #[error("introspection failed: {0}")]
    Introspection(String),
    /// The value is of a kind with no structural content (callable, handle).
    #[error("unsupported value kind: {0}")]
    Unsupported(String),
    /// Nesting went deeper than the configured limit.
    #[error("nesting depth exceeds limit of {0}")]
    DepthExceeded(usize),
    /// The hasher configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),
}
