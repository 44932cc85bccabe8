//! Load/save of the progress map against a single string slot.
//!
//! The slot holds a JSON object `{"YYYY-MM-DD": "none"|"learned"|"frozen"}`.
//! Every mutation rewrites the whole object.

use std::collections::BTreeMap;

use super::{DayStatus, ProgressMap};
use crate::calendar::DateKey;
use crate::error::Result;
use crate::storage::{keys, KeyValueStore};

pub struct ProgressStore<S> {
    store: S,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the persisted map. Never fails: missing, unreadable, or
    /// malformed data all read as an empty map.
    pub fn load(&self) -> ProgressMap {
        match self.store.get(keys::PROGRESS_MAP) {
            Ok(raw) => decode(raw.as_deref().unwrap_or_default()),
            Err(e) => {
                tracing::warn!("progress map unreadable, using empty map: {e}");
                ProgressMap::new()
            }
        }
    }

    /// Read for a read-modify-write cycle.
    ///
    /// Malformed data still reads as empty, but a failing store is an
    /// error so the following save cannot overwrite data it never saw.
    pub fn load_for_update(&self) -> Result<ProgressMap> {
        let raw = self.store.get(keys::PROGRESS_MAP)?;
        Ok(decode(raw.as_deref().unwrap_or_default()))
    }

    /// Replace the persisted map with `map`.
    pub fn save(&self, map: &ProgressMap) -> Result<()> {
        let raw = serde_json::to_string(map)?;
        self.store.set(keys::PROGRESS_MAP, &raw)
    }

    /// Load, write one day, save. Returns the day's previous status.
    pub fn set_status(&self, date: DateKey, status: DayStatus) -> Result<DayStatus> {
        let mut map = self.load_for_update()?;
        let previous = map.set(date, status);
        self.save(&map)?;
        Ok(previous)
    }
}

/// Decode a persisted progress map, dropping what cannot be understood.
///
/// A document that is not an object of known status strings reads as
/// empty. Individual keys that are not `YYYY-MM-DD` are skipped.
pub fn decode(raw: &str) -> ProgressMap {
    if raw.trim().is_empty() {
        return ProgressMap::new();
    }
    let entries: BTreeMap<String, DayStatus> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("malformed progress map, using empty map: {e}");
            return ProgressMap::new();
        }
    };
    entries
        .into_iter()
        .filter_map(|(key, status)| match key.parse::<DateKey>() {
            Ok(date) => Some((date, status)),
            Err(e) => {
                tracing::warn!("skipping progress entry: {e}");
                None
            }
        })
        .collect()
}
