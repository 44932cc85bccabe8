//! Day statuses and the persisted day → status mapping.

mod store;

pub use store::ProgressStore;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calendar::DateKey;

/// What the user recorded for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    #[default]
    None,
    Learned,
    Frozen,
}

impl DayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayStatus::None => "none",
            DayStatus::Learned => "learned",
            DayStatus::Frozen => "frozen",
        }
    }

    pub fn is_logged(&self) -> bool {
        !matches!(self, DayStatus::None)
    }
}

/// Mapping from day to status. Absent days read as [`DayStatus::None`].
///
/// Iteration is chronological, which the model does not require but
/// keeps the serialized form stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressMap(BTreeMap<DateKey, DayStatus>);

impl ProgressMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, date: DateKey) -> DayStatus {
        self.0.get(&date).copied().unwrap_or_default()
    }

    /// Overwrites any prior value; returns it.
    pub fn set(&mut self, date: DateKey, status: DayStatus) -> DayStatus {
        self.0.insert(date, status).unwrap_or_default()
    }

    pub fn earliest(&self) -> Option<DateKey> {
        self.0.keys().next().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DateKey, DayStatus)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(DateKey, DayStatus)> for ProgressMap {
    fn from_iter<I: IntoIterator<Item = (DateKey, DayStatus)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
