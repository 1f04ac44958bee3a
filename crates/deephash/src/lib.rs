//! Stable structural content hashing.
//!
//! A value tree of scalars, timestamps, sequences, mappings and records is
//! walked into a SHA-256 digest and returned as 64 lowercase hex characters.
//! Two values with the same structural content hash alike regardless of the
//! iteration order of their unordered containers or the content of fields
//! marked as non-contributing.
//!
#![deny(missing_docs)]

/// Hasher configuration.
pub mod config;
/// Streaming digest primitive and hex output.
pub mod digest;
/// Error types for hashing.
pub mod errors;
/// Conversion of Rust values into the value model.
pub mod hashable;
/// Top-level hashing entry points.
pub mod hasher;
/// Counters collected while walking.
pub mod report;
/// Validation errors for digests and configuration.
pub mod validation;
/// The dynamically-shaped value model.
pub mod value;

mod walker;

pub use config::{Encoding, HashConfig, SequenceOrder};
pub use digest::{HexDigest, Sha256Digest, StreamingDigest};
pub use errors::{DigestError, HashError};
pub use hashable::Hashable;
pub use hasher::{hash, hash_value, Hasher};
pub use report::HashReport;
pub use validation::ValidationError;
pub use value::{Field, Record, Scalar, Value};
