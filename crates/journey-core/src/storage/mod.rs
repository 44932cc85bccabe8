mod config;
pub mod database;

pub use config::{CalendarConfig, Config, FreezeConfig};
pub use database::Database;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;

/// Slot keys in the persisted key-value store.
pub mod keys {
    pub const PROGRESS_MAP: &str = "progress.map";
    pub const TOPIC: &str = "learning.topic";
    pub const TIMEFRAME: &str = "learning.timeframe";
    pub const PERIOD_START: &str = "goal.periodStart";
    pub const GOAL_REVISION: &str = "goal.revision";
    /// Browse state owned by the presentation layer.
    pub const UI_VIEW: &str = "ui.view";
}

/// An opaque durable string slot store.
///
/// Callers are expected to be single-threaded; implementations give no
/// cross-key atomicity, only whole-value replacement per key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// In-process store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Returns the data directory, creating it if needed.
///
/// `JOURNEY_HOME` overrides the location outright. Otherwise this is
/// `~/.config/journey[-dev]/`, with the `-dev` suffix when `JOURNEY_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("JOURNEY_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("JOURNEY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("journey-dev")
            } else {
                base_dir.join("journey")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_set() {
        let store = MemoryStore::new();
        assert!(store.get("a").unwrap().is_none());
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn borrowed_store_delegates() {
        let store = MemoryStore::new();
        let by_ref = &store;
        by_ref.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
