use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Default nesting limit, counted across child-hash invocations.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// How sequence elements are ordered before being written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceOrder {
    /// Element hashes are sorted, so `[a, b]` and `[b, a]` hash alike.
    #[default]
    Multiset,
    /// Element hashes are written in index order.
    Ordered,
}

/// Byte encoding of every write into the digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Bare textual forms, no delimiters.
    #[default]
    Legacy,
    /// One kind byte plus an 8-byte big-endian length before each write.
    /// Not compatible with `Legacy` digests.
    Framed,
}

/// Hasher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HashConfig {
    /// Sequence canonicalization.
    pub sequence_order: SequenceOrder,
    /// Digest input encoding.
    pub encoding: Encoding,
    /// Nesting limit; `None` disables the check.
    pub max_depth: Option<usize>,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            sequence_order: SequenceOrder::Multiset,
            encoding: Encoding::Legacy,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl HashConfig {
    /// Parses and validates a TOML configuration.
    ///
    /// ```rust
    /// use deephash::{HashConfig, SequenceOrder};
    ///
    /// let config = HashConfig::from_toml_str("sequence_order = \"ordered\"")?;
    /// assert_eq!(config.sequence_order, SequenceOrder::Ordered);
    /// # Ok::<(), deephash::ValidationError>(())
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ValidationError> {
        let config: HashConfig =
            toml::from_str(text).map_err(|e| ValidationError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the walker cannot honor.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_depth == Some(0) {
            return Err(ValidationError::OutOfBounds {
                field: "max_depth",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = HashConfig::from_toml_str("").unwrap();
        assert_eq!(config, HashConfig::default());
    }

    #[test]
    fn toml_overrides() {
        let config = HashConfig::from_toml_str(
            "sequence_order = \"ordered\"\nencoding = \"framed\"\nmax_depth = 8\n",
        )
        .unwrap();
        assert_eq!(config.sequence_order, SequenceOrder::Ordered);
        assert_eq!(config.encoding, Encoding::Framed);
        assert_eq!(config.max_depth, Some(8));
    }

    #[test]
    fn zero_depth_is_rejected() {
        let err = HashConfig::from_toml_str("max_depth = 0").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfBounds {
                field: "max_depth",
                ..
            }
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = HashConfig::from_toml_str("colour = \"blue\"").unwrap_err();
        assert!(matches!(err, ValidationError::Parse(_)));
    }
}
