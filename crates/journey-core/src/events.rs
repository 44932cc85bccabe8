use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::DateKey;
use crate::goal::{Goal, GoalRevision};
use crate::progress::DayStatus;

/// Every state change made through the engine produces an Event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A day's status was written.
    DayLogged {
        date: DateKey,
        status: DayStatus,
        previous: DayStatus,
        at: DateTime<Utc>,
    },
    /// The goal was created, edited, or restarted and the focus re-resolved.
    GoalRevised {
        revision: GoalRevision,
        goal: Goal,
        focus: DateKey,
        at: DateTime<Utc>,
    },
    /// The browsed week or selected day moved.
    ViewChanged {
        selected: DateKey,
        week_start: DateKey,
        at: DateTime<Utc>,
    },
}
