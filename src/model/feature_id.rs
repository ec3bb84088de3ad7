// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Unique identifiers for editor features.
//!
//! Each `FeatureId` is an opaque string. Generated ids combine the current
//! wall-clock time in milliseconds with a global atomic counter, so they are
//! never reused within a process even if the clock stalls. Hosts may also
//! supply their own ids when loading features programmatically.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// An opaque, unique feature identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(String);

static FEATURE_COUNTER: AtomicU64 = AtomicU64::new(1);

impl FeatureId {
    /// Create a new unique feature ID
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let count = FEATURE_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(format!("{millis:x}-{count:04x}"))
    }

    /// Wrap an existing id string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive a child id (`<id>_<suffix>`), used for split results
    pub fn derived(&self, suffix: &str) -> Self {
        Self(format!("{}_{}", self.0, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FeatureId {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FeatureId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_unique() {
        let ids: HashSet<FeatureId> = (0..1000).map(|_| FeatureId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn derived_ids_append_suffix() {
        let id = FeatureId::new("road");
        assert_eq!(id.derived("split_1").as_str(), "road_split_1");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = FeatureId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
