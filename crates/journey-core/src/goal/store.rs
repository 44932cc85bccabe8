//! Goal persistence across the topic / timeframe / periodStart / revision slots.
//!
//! Reads are fail-soft: each slot that is missing or unparseable falls
//! back to its first-run default, and the repaired value is written back
//! on a best-effort basis.

use super::{normalize_topic, Goal, GoalRevision, Timeframe, DEFAULT_TOPIC};
use crate::calendar::DateKey;
use crate::error::Result;
use crate::storage::{keys, KeyValueStore};

/// A stored period start further than this past today is treated as corrupt.
pub const MAX_PERIOD_START_LEAD_DAYS: i64 = 4000;

pub struct GoalStore<S> {
    store: S,
}

impl<S: KeyValueStore> GoalStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the goal, repairing missing or corrupt slots.
    pub fn load(&self, today: DateKey) -> Goal {
        let topic = match self.read(keys::TOPIC) {
            Some(topic) => topic,
            None => {
                self.repair(keys::TOPIC, DEFAULT_TOPIC);
                DEFAULT_TOPIC.to_string()
            }
        };

        let timeframe = match self.read(keys::TIMEFRAME).map(|raw| raw.parse::<Timeframe>()) {
            Some(Ok(timeframe)) => timeframe,
            Some(Err(e)) => {
                tracing::warn!("unknown stored timeframe, using Week: {e}");
                self.repair(keys::TIMEFRAME, Timeframe::Week.as_str());
                Timeframe::Week
            }
            None => {
                self.repair(keys::TIMEFRAME, Timeframe::Week.as_str());
                Timeframe::Week
            }
        };

        let period_start = match self.read(keys::PERIOD_START).map(|raw| raw.parse::<DateKey>()) {
            Some(Ok(start)) if within_guard(start, today) => start,
            Some(Ok(start)) => {
                tracing::warn!(%start, %today, "stored period start too far ahead, resetting to today");
                self.repair(keys::PERIOD_START, &today.to_string());
                today
            }
            Some(Err(e)) => {
                tracing::warn!("unparseable period start, resetting to today: {e}");
                self.repair(keys::PERIOD_START, &today.to_string());
                today
            }
            None => {
                self.repair(keys::PERIOD_START, &today.to_string());
                today
            }
        };

        Goal {
            topic,
            timeframe,
            period_start,
        }
    }

    /// Write all goal fields. Does not touch the revision.
    pub fn save(&self, goal: &Goal) -> Result<()> {
        self.store.set(keys::TOPIC, &normalize_topic(&goal.topic))?;
        self.store.set(keys::TIMEFRAME, goal.timeframe.as_str())?;
        self.store.set(keys::PERIOD_START, &goal.period_start.to_string())?;
        Ok(())
    }

    /// Current revision; unreadable values read as 0.
    pub fn revision(&self) -> GoalRevision {
        match self.read(keys::GOAL_REVISION).map(|raw| raw.trim().parse::<u64>()) {
            Some(Ok(n)) => GoalRevision(n),
            Some(Err(e)) => {
                tracing::warn!("unparseable goal revision, using 0: {e}");
                GoalRevision::default()
            }
            None => GoalRevision::default(),
        }
    }

    /// Increment and persist the revision, returning the new value.
    pub fn bump_revision(&self) -> Result<GoalRevision> {
        let next = self.revision().next();
        self.store.set(keys::GOAL_REVISION, &next.to_string())?;
        Ok(next)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, "slot unreadable: {e}");
                None
            }
        }
    }

    fn repair(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(key, "could not write repaired slot: {e}");
        }
    }
}

fn within_guard(start: DateKey, today: DateKey) -> bool {
    start <= today.add_days(MAX_PERIOD_START_LEAD_DAYS)
}
