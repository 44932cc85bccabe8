//! The learning goal and its revision counter.

mod store;

pub use store::GoalStore;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calendar::DateKey;
use crate::error::ValidationError;

/// Topic used until the user names one, and whenever an edit leaves it blank.
pub const DEFAULT_TOPIC: &str = "<unset>";

/// Length of a tracked period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[default]
    Week,
    Month,
    Year,
}

impl Timeframe {
    /// Persisted form: `"Week"`, `"Month"`, `"Year"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Week => "Week",
            Timeframe::Month => "Month",
            Timeframe::Year => "Year",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            "year" => Ok(Timeframe::Year),
            _ => Err(ValidationError::InvalidValue {
                field: "timeframe".into(),
                message: format!("'{s}' is not one of Week, Month, Year"),
            }),
        }
    }
}

/// A self-declared learning goal tracked over a repeating period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub topic: String,
    pub timeframe: Timeframe,
    pub period_start: DateKey,
}

impl Goal {
    /// First-run goal: default topic, weekly, starting `today`.
    pub fn initial(today: DateKey) -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            timeframe: Timeframe::Week,
            period_start: today,
        }
    }

    /// Whether an edit to `topic`/`timeframe` would change anything.
    pub fn differs_from(&self, topic: &str, timeframe: Timeframe) -> bool {
        normalize_topic(topic) != self.topic || timeframe != self.timeframe
    }
}

/// Trim surrounding whitespace; blank topics become [`DEFAULT_TOPIC`].
pub fn normalize_topic(topic: &str) -> String {
    let trimmed = topic.trim();
    if trimmed.is_empty() {
        DEFAULT_TOPIC.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Counter bumped once per goal creation, edit, or restart.
///
/// Wraps on overflow; only (in)equality is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalRevision(pub u64);

impl GoalRevision {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for GoalRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
