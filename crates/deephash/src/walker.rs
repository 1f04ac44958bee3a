//! Recursive walker: turns a [`Value`] tree into a deterministic byte stream.
//!
//! Per-kind rules, applied after indirection is peeled and zero values are
//! dropped:
//!
//! - **Scalar**: its textual form, no length prefix, no delimiter.
//! - **Timestamp**: RFC 3339 text at second precision, nothing else.
//! - **Mapping**: every key and value gets a child hash (fresh digest); pairs
//!   are sorted by key hash and both hex strings are written per pair.
//! - **Sequence**: every element gets a child hash; hashes are sorted (unless
//!   the config asks for index order) and written.
//! - **Record**: fields in declaration order, without names. `hash=ignore` and
//!   zero fields are skipped. The first inaccessible non-zero field ends the
//!   record: it and every field after it contribute nothing.

use tracing::{debug, trace};

use crate::config::{Encoding, HashConfig, SequenceOrder};
use crate::digest::{HexDigest, StreamingDigest};
use crate::errors::HashError;
use crate::report::{self, HashReport};
use crate::value::{format_timestamp, Record, Scalar, Value};

// Kind bytes used by `Encoding::Framed`.
const KIND_BOOL: u8 = 0x01;
const KIND_INT: u8 = 0x02;
const KIND_UINT: u8 = 0x03;
const KIND_FLOAT: u8 = 0x04;
const KIND_CHAR: u8 = 0x05;
const KIND_STR: u8 = 0x06;
const KIND_BYTES: u8 = 0x07;
const KIND_TIMESTAMP: u8 = 0x08;
const KIND_CHILD: u8 = 0x09;

/// Walk state for one top-level hashing call.
pub(crate) struct Walker<'c> {
    config: &'c HashConfig,
    report: &'c mut HashReport,
}

impl<'c> Walker<'c> {
    pub(crate) fn new(config: &'c HashConfig, report: &'c mut HashReport) -> Self {
        Self { config, report }
    }

    /// Hashes `value` into a fresh digest and hex-encodes the result.
    ///
    /// Used for the top-level call and for every child hash.
    pub(crate) fn hash_fresh<D: StreamingDigest>(
        &mut self,
        value: &Value<'_>,
        depth: usize,
    ) -> Result<HexDigest, HashError> {
        let mut digest = D::new();
        self.walk(value, &mut digest, depth)?;
        Ok(HexDigest::from_bytes(&digest.finalize()))
    }

    /// Writes the canonical encoding of `value` into `digest`.
    pub(crate) fn walk<D: StreamingDigest>(
        &mut self,
        value: &Value<'_>,
        digest: &mut D,
        depth: usize,
    ) -> Result<(), HashError> {
        if let Some(max) = self.config.max_depth {
            if depth > max {
                return Err(HashError::DepthExceeded(max));
            }
        }

        let value = value.resolve();
        if value.is_zero() {
            self.report.bump(report::ZERO_ELIDED, 1);
            return Ok(());
        }
        trace!(kind = value.kind(), depth, "walk");

        match value {
            Value::Scalar(scalar) => self.write_scalar(scalar, digest),
            Value::Timestamp(ts) => {
                let text = format_timestamp(ts);
                self.emit(digest, KIND_TIMESTAMP, text.as_bytes())
            }
            Value::Mapping(entries) => self.walk_mapping::<D>(entries, digest, depth),
            Value::Sequence(items) => self.walk_sequence::<D>(items, digest, depth),
            Value::Record(record) => self.walk_record(record, digest, depth),
            Value::Opaque(type_name) => Err(HashError::Unsupported(type_name.to_string())),
            // Peeled by resolve() or dropped as zero above.
            Value::Null | Value::Indirect(_) => Ok(()),
        }
    }

    fn write_scalar<D: StreamingDigest>(
        &mut self,
        scalar: &Scalar<'_>,
        digest: &mut D,
    ) -> Result<(), HashError> {
        let kind = match scalar {
            Scalar::Str(s) => return self.emit(digest, KIND_STR, s.as_bytes()),
            Scalar::Bool(_) => KIND_BOOL,
            Scalar::Int(_) => KIND_INT,
            Scalar::UInt(_) => KIND_UINT,
            Scalar::Float32(_) | Scalar::Float64(_) => KIND_FLOAT,
            Scalar::Char(_) => KIND_CHAR,
            Scalar::Bytes(_) => KIND_BYTES,
        };
        self.emit(digest, kind, scalar.to_string().as_bytes())
    }

    fn walk_mapping<D: StreamingDigest>(
        &mut self,
        entries: &[(Value<'_>, Value<'_>)],
        digest: &mut D,
        depth: usize,
    ) -> Result<(), HashError> {
        let mut pairs = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let key_hash = self.child_hash::<D>(key, depth + 1)?;
            let value_hash = self.child_hash::<D>(value, depth + 1)?;
            pairs.push((key_hash, value_hash));
        }
        // Keys that collide on their child hash fall back to the value hash.
        pairs.sort();

        for (key_hash, value_hash) in &pairs {
            self.emit(digest, KIND_CHILD, key_hash.as_str().as_bytes())?;
            self.emit(digest, KIND_CHILD, value_hash.as_str().as_bytes())?;
        }
        Ok(())
    }

    fn walk_sequence<D: StreamingDigest>(
        &mut self,
        items: &[Value<'_>],
        digest: &mut D,
        depth: usize,
    ) -> Result<(), HashError> {
        let mut hashes = items
            .iter()
            .map(|item| self.child_hash::<D>(item, depth + 1))
            .collect::<Result<Vec<_>, _>>()?;
        if self.config.sequence_order == SequenceOrder::Multiset {
            hashes.sort();
        }

        for hash in &hashes {
            self.emit(digest, KIND_CHILD, hash.as_str().as_bytes())?;
        }
        Ok(())
    }

    fn walk_record<D: StreamingDigest>(
        &mut self,
        record: &Record<'_>,
        digest: &mut D,
        depth: usize,
    ) -> Result<(), HashError> {
        for field in &record.fields {
            if field.is_ignored() {
                self.report.bump(report::IGNORED_FIELDS, 1);
                continue;
            }
            if field.is_zero() {
                self.report.bump(report::ZERO_ELIDED, 1);
                continue;
            }
            if !field.accessible {
                debug!(
                    record = %record.name,
                    field = %field.name,
                    index = field.index,
                    "inaccessible field ends record traversal"
                );
                self.report.bump(report::TRUNCATED_RECORDS, 1);
                return Ok(());
            }
            self.walk(field.value.resolve(), digest, depth + 1)?;
        }
        Ok(())
    }

    fn child_hash<D: StreamingDigest>(
        &mut self,
        value: &Value<'_>,
        depth: usize,
    ) -> Result<HexDigest, HashError> {
        self.report.bump(report::CHILD_HASHES, 1);
        self.hash_fresh::<D>(value, depth)
    }

    fn emit<D: StreamingDigest>(
        &mut self,
        digest: &mut D,
        kind: u8,
        bytes: &[u8],
    ) -> Result<(), HashError> {
        match self.config.encoding {
            Encoding::Legacy => digest.update(bytes)?,
            Encoding::Framed => {
                digest.update(&[kind])?;
                digest.update(&(bytes.len() as u64).to_be_bytes())?;
                digest.update(bytes)?;
            }
        }
        self.report.bump(report::BYTES_WRITTEN, bytes.len() as u64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::Sha256Digest;
    use crate::errors::DigestError;
    use chrono::{FixedOffset, TimeZone};

    /// Records every write and still hashes with SHA-256, so child hashes
    /// computed through it are real digests.
    #[derive(Default)]
    struct Capture(Vec<u8>, Sha256Digest);

    impl StreamingDigest for Capture {
        fn new() -> Self {
            Self::default()
        }

        fn update(&mut self, bytes: &[u8]) -> Result<(), DigestError> {
            self.0.extend_from_slice(bytes);
            self.1.update(bytes)
        }

        fn finalize(self) -> Vec<u8> {
            self.1.finalize()
        }
    }

    fn stream(value: &Value<'_>) -> Vec<u8> {
        let config = HashConfig::default();
        let mut report = HashReport::new(config.clone());
        let mut capture = Capture::default();
        Walker::new(&config, &mut report)
            .walk(value, &mut capture, 0)
            .unwrap();
        capture.0
    }

    #[test]
    fn scalars_write_their_text() {
        assert_eq!(stream(&Value::Scalar(Scalar::Int(123))), b"123");
        assert_eq!(stream(&Value::Scalar(Scalar::Bool(true))), b"true");
        assert_eq!(stream(&Value::str("abc")), b"abc");
    }

    #[test]
    fn zero_values_write_nothing() {
        assert!(stream(&Value::Null).is_empty());
        assert!(stream(&Value::Scalar(Scalar::Int(0))).is_empty());
        assert!(stream(&Value::indirect(Value::str(""))).is_empty());
    }

    #[test]
    fn timestamp_writes_only_its_text() {
        let ts = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 6, 7, 8, 9)
            .unwrap();
        assert_eq!(stream(&Value::Timestamp(ts)), b"2024-05-06T07:08:09Z");
    }

    #[test]
    fn record_writes_fields_in_order_without_names() {
        let record = Record::new("R")
            .field("a", Value::str("x"))
            .ignored_field("b", Value::str("skip"))
            .field("c", Value::str(""))
            .field("d", Value::Scalar(Scalar::Int(5)));
        assert_eq!(stream(&Value::Record(record)), b"x5");
    }

    #[test]
    fn inaccessible_field_ends_the_record() {
        let record = Record::new("R")
            .field("a", Value::str("x"))
            .private_field("hidden", Value::str("secret"))
            .field("after", Value::str("y"));
        assert_eq!(stream(&Value::Record(record)), b"x");
    }

    #[test]
    fn zero_inaccessible_field_does_not_end_the_record() {
        let record = Record::new("R")
            .field("a", Value::str("x"))
            .private_field("hidden", Value::str(""))
            .field("after", Value::str("y"));
        assert_eq!(stream(&Value::Record(record)), b"xy");
    }

    #[test]
    fn private_pointer_to_zero_record_ends_the_record() {
        let empty = Record::new("Inner").field("x", Value::str(""));
        let record = Record::new("R")
            .field("a", Value::str("x"))
            .private_field("hidden", Value::indirect(Value::Record(empty)))
            .field("after", Value::str("y"));
        assert_eq!(stream(&Value::Record(record)), b"x");
    }

    #[test]
    fn sequence_writes_sorted_child_hashes() {
        let seq = Value::Sequence(vec![Value::str("b"), Value::str("a")]);
        let mut expected = vec![
            hex::encode(sha256(b"b")),
            hex::encode(sha256(b"a")),
        ];
        expected.sort();
        assert_eq!(stream(&seq), expected.concat().into_bytes());
    }

    #[test]
    fn mapping_writes_key_then_value_hash() {
        let map = Value::Mapping(vec![(Value::Scalar(Scalar::Int(1)), Value::str("one"))]);
        let expected = format!(
            "{}{}",
            hex::encode(sha256(b"1")),
            hex::encode(sha256(b"one"))
        );
        assert_eq!(stream(&map), expected.into_bytes());
    }

    #[test]
    fn framed_encoding_prefixes_kind_and_length() {
        let config = HashConfig {
            encoding: Encoding::Framed,
            ..HashConfig::default()
        };
        let mut report = HashReport::new(config.clone());
        let mut capture = Capture::default();
        Walker::new(&config, &mut report)
            .walk(&Value::str("ab"), &mut capture, 0)
            .unwrap();
        assert_eq!(capture.0, [&[KIND_STR][..], &2u64.to_be_bytes()[..], &b"ab"[..]].concat());
    }

    #[test]
    fn opaque_values_are_rejected() {
        let config = HashConfig::default();
        let mut report = HashReport::new(config.clone());
        let err = Walker::new(&config, &mut report)
            .hash_fresh::<Sha256Digest>(&Value::Opaque("fn()".into()), 0)
            .unwrap_err();
        assert!(matches!(err, HashError::Unsupported(name) if name == "fn()"));
    }

    fn sha256(bytes: &[u8]) -> Vec<u8> {
        let mut digest = Sha256Digest::new();
        digest.update(bytes).unwrap();
        digest.finalize()
    }
}
