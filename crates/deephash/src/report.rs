use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::HashConfig;

/// Metric: record fields skipped because of `hash=ignore`.
pub const IGNORED_FIELDS: &str = "ignored_fields";
/// Metric: zero values that contributed no bytes.
pub const ZERO_ELIDED: &str = "zero_elided";
/// Metric: records cut short at an inaccessible field.
pub const TRUNCATED_RECORDS: &str = "truncated_records";
/// Metric: nested child hashes computed for mappings and sequences.
pub const CHILD_HASHES: &str = "child_hashes";
/// Metric: bytes written into digests, child digests included.
pub const BYTES_WRITTEN: &str = "bytes_written";

/// Counters collected over one hashing call, child hashes included.
///
/// The report never influences the digest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HashReport {
    /// Named counters.
    pub metrics: BTreeMap<String, u64>,
    /// Configuration the digest was produced under.
    pub config: HashConfig,
}

impl HashReport {
    pub(crate) fn new(config: HashConfig) -> Self {
        Self {
            metrics: BTreeMap::new(),
            config,
        }
    }

    pub(crate) fn bump(&mut self, metric: &str, by: u64) {
        self.metrics
            .entry(metric.to_string())
            .and_modify(|count| *count += by)
            .or_insert(by);
    }

    /// Reads a counter, zero when never bumped.
    pub fn metric(&self, metric: &str) -> u64 {
        self.metrics.get(metric).copied().unwrap_or(0)
    }

    /// True when at least one record lost fields to an inaccessible field.
    pub fn truncated(&self) -> bool {
        self.metric(TRUNCATED_RECORDS) > 0
    }
}
