use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::errors::DigestError;
use crate::validation::ValidationError;

/// Length of a hex-encoded SHA-256 digest.
pub const HEX_DIGEST_LEN: usize = 64;

/// Streaming digest consumed by the walker.
///
/// A fresh instance is created for the top-level call and for every child hash.
pub trait StreamingDigest: Sized {
    /// Creates an empty digest state.
    fn new() -> Self;

    /// Appends bytes to the internal state.
    fn update(&mut self, bytes: &[u8]) -> Result<(), DigestError>;

    /// Consumes the state and returns the digest bytes.
    fn finalize(self) -> Vec<u8>;
}

/// SHA-256 streaming digest. Writes never fail.
#[derive(Debug, Clone, Default)]
pub struct Sha256Digest(Sha256);

impl StreamingDigest for Sha256Digest {
    fn new() -> Self {
        Self(Sha256::new())
    }

    fn update(&mut self, bytes: &[u8]) -> Result<(), DigestError> {
        Sha2Digest::update(&mut self.0, bytes);
        Ok(())
    }

    fn finalize(self) -> Vec<u8> {
        self.0.finalize().to_vec()
    }
}

/// Lowercase hex digest, 64 characters, no prefix.
///
/// Serializes as a plain string; deserializing runs [`HexDigest::parse`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct HexDigest(String);

impl HexDigest {
    /// Hex-encodes raw digest bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Parses a validated hex digest.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let re = Regex::new(r"^[0-9a-f]{64}$").expect("invalid regex");
        if !re.is_match(&s) {
            return Err(ValidationError::PatternMismatch {
                field: "hex_digest",
                value: s,
            });
        }
        Ok(Self(s))
    }

    /// Borrows the hex text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the owned hex text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for HexDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for HexDigest {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for HexDigest {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl FromStr for HexDigest {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexDigest {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<HexDigest> for String {
    fn from(value: HexDigest) -> Self {
        value.0
    }
}
