//! Browse state and the read-only view model handed to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::calendar::{DateKey, WeekStart};
use crate::freeze::{FreezeQuota, WeekCounts};
use crate::goal::{Goal, GoalRevision};
use crate::period::Period;
use crate::progress::DayStatus;
use crate::storage::Config;
use crate::transition::FocusTarget;

/// Engine behavior switches, normally taken from [`Config`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineSettings {
    pub week_start: WeekStart,
    pub enforce_freeze_quota: bool,
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            week_start: config.calendar.week_start,
            enforce_freeze_quota: config.freeze.enforce_quota,
        }
    }
}

/// What the user is looking at. Session-scoped; a host may persist it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub selected: DateKey,
    pub week_start: DateKey,
    pub picked_year: i32,
    pub picked_month: u32,
    /// Set on every goal revision; cleared by the first log made while
    /// the live period is displayed.
    pub awaiting_first_log: bool,
    /// Revision this view last resolved its focus for.
    pub seen_revision: GoalRevision,
}

impl ViewState {
    pub fn anchored(date: DateKey, week_start: WeekStart, seen_revision: GoalRevision) -> Self {
        let target = FocusTarget::on(date, week_start);
        Self {
            selected: target.date,
            week_start: target.week_start,
            picked_year: target.picked_year,
            picked_month: target.picked_month,
            awaiting_first_log: false,
            seen_revision,
        }
    }

    pub fn focus(&mut self, target: FocusTarget) {
        self.selected = target.date;
        self.week_start = target.week_start;
        self.picked_year = target.picked_year;
        self.picked_month = target.picked_month;
    }

    /// Browse to the week opening on `week_start`, selecting its first day.
    /// The picked month/year follow the week start.
    pub fn show_week(&mut self, week_start: DateKey) {
        self.week_start = week_start;
        self.selected = week_start;
        self.picked_year = week_start.year();
        self.picked_month = week_start.month();
    }

    /// Bring a restored state in line with the current week convention.
    pub(crate) fn normalized(mut self, week_start: WeekStart) -> Self {
        self.week_start = self.week_start.start_of_week(week_start);
        if !(1..=12).contains(&self.picked_month) {
            self.picked_month = self.week_start.month();
            self.picked_year = self.week_start.year();
        }
        self
    }
}

/// One day of the browsed week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekDay {
    pub date: DateKey,
    pub weekday: String,
    pub status: DayStatus,
    pub is_today: bool,
    pub is_past: bool,
    pub is_future: bool,
    pub is_selected: bool,
}

/// Everything the activity screen renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySnapshot {
    pub today: DateKey,
    pub goal: Goal,
    pub revision: GoalRevision,
    pub live_period: Period,
    pub displayed_period: Period,
    pub month_label: String,
    pub selected: DateKey,
    /// Primary-control status; may differ from the stored one when the
    /// freeze quota is exhausted.
    pub focus_status: DayStatus,
    pub week: Vec<WeekDay>,
    pub counts: WeekCounts,
    pub freeze: FreezeQuota,
    pub freeze_label: String,
    pub period_complete: bool,
    pub awaiting_first_log: bool,
}
