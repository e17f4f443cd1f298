//! Alert deduplication against the cross-run alert history.
//!
//! The history maps an alert identity key to the timestamp of its last
//! emitted crossing. It retains only the most recent occurrence per key,
//! not an append-only log.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::signal::AlertKey;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertHistory {
    #[serde(default)]
    entries: HashMap<String, DateTime<Utc>>,
}

impl AlertHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_emitted(&self, key: &AlertKey) -> Option<DateTime<Utc>> {
        self.entries.get(&key.to_string()).copied()
    }

    /// Whether an alert for `key` at `crossing_ts` should be emitted.
    ///
    /// Suppressed when the history already records the identical crossing
    /// timestamp for this key, or a crossing within `window` of it.
    pub fn should_emit(
        &self,
        key: &AlertKey,
        crossing_ts: DateTime<Utc>,
        window: Duration,
    ) -> bool {
        match self.entries.get(&key.to_string()) {
            None => true,
            Some(prev) => {
                if *prev == crossing_ts {
                    return false;
                }
                crossing_ts.signed_duration_since(*prev).abs() >= window
            }
        }
    }

    /// Upsert the key with the latest crossing timestamp, overwriting any
    /// prior entry for that key.
    pub fn record(&mut self, key: &AlertKey, crossing_ts: DateTime<Utc>) {
        self.entries.insert(key.to_string(), crossing_ts);
    }
}
