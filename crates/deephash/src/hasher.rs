//! Top-level hasher: fresh digest, walk, finalize, hex-encode.

use std::marker::PhantomData;
use tracing::debug;

use crate::config::HashConfig;
use crate::digest::{HexDigest, Sha256Digest, StreamingDigest};
use crate::errors::HashError;
use crate::hashable::Hashable;
use crate::report::HashReport;
use crate::value::Value;
use crate::walker::Walker;

/// Computes structural content hashes.
///
/// A `Hasher` holds no state between calls beyond its configuration, so one
/// instance can be shared across threads hashing disjoint inputs.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use deephash::Hasher;
///
/// let a: HashMap<i32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
/// let b: HashMap<i32, &str> = [(2, "two"), (1, "one")].into_iter().collect();
///
/// let hasher = Hasher::new();
/// assert_eq!(hasher.hash(&a)?, hasher.hash(&b)?);
/// # Ok::<(), deephash::HashError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Hasher<D: StreamingDigest = Sha256Digest> {
    config: HashConfig,
    _digest: PhantomData<fn() -> D>,
}

impl Hasher {
    /// SHA-256 hasher with the default configuration.
    pub fn new() -> Self {
        Self {
            config: HashConfig::default(),
            _digest: PhantomData,
        }
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: StreamingDigest> Hasher<D> {
    /// Builds a hasher after validating `config`.
    pub fn with_config(config: HashConfig) -> Result<Self, HashError> {
        config.validate()?;
        Ok(Self {
            config,
            _digest: PhantomData,
        })
    }

    /// Configuration in effect.
    pub fn config(&self) -> &HashConfig {
        &self.config
    }

    /// Hashes any [`Hashable`] value.
    pub fn hash<T: Hashable + ?Sized>(&self, value: &T) -> Result<HexDigest, HashError> {
        self.hash_value(&value.to_value())
    }

    /// Hashes a value tree.
    pub fn hash_value(&self, value: &Value<'_>) -> Result<HexDigest, HashError> {
        self.hash_with_report(value).map(|(digest, _)| digest)
    }

    /// Hashes a value tree and returns the walk counters alongside the digest.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the digest or the walker; no digest is
    /// produced in that case.
    pub fn hash_with_report(
        &self,
        value: &Value<'_>,
    ) -> Result<(HexDigest, HashReport), HashError> {
        let mut report = HashReport::new(self.config.clone());
        let digest = Walker::new(&self.config, &mut report).hash_fresh::<D>(value, 0)?;
        debug!(
            kind = value.kind(),
            digest = %digest,
            child_hashes = report.metric(crate::report::CHILD_HASHES),
            truncated = report.truncated(),
            "hashed value"
        );
        Ok((digest, report))
    }
}

/// Hashes a [`Hashable`] value with SHA-256 and the default configuration.
pub fn hash<T: Hashable + ?Sized>(value: &T) -> Result<HexDigest, HashError> {
    Hasher::new().hash(value)
}

/// Hashes a value tree with SHA-256 and the default configuration.
pub fn hash_value(value: &Value<'_>) -> Result<HexDigest, HashError> {
    Hasher::new().hash_value(value)
}
