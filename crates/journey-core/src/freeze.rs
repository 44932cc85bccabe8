//! Weekly freeze quota.
//!
//! A freeze excuses a day without breaking the streak. At most
//! [`MAX_FREEZES_PER_WEEK`] may be used in any browsed 7-day window.

use serde::{Deserialize, Serialize};

use crate::calendar::DateKey;
use crate::progress::{DayStatus, ProgressMap};

pub const MAX_FREEZES_PER_WEEK: usize = 2;

/// Number of `Frozen` days among `week_days`.
pub fn weekly_freeze_count(progress: &ProgressMap, week_days: &[DateKey; 7]) -> usize {
    week_days
        .iter()
        .filter(|d| progress.status(**d) == DayStatus::Frozen)
        .count()
}

pub fn is_freeze_available(count: usize) -> bool {
    count < MAX_FREEZES_PER_WEEK
}

/// Status shown on the primary log control.
///
/// With the quota exhausted, anything but `Learned` is shown as `None`,
/// including a day that is actually stored as `Frozen`. Only the primary
/// control goes through here; every other view reads the stored status.
pub fn effective_focus_status(raw: DayStatus, freeze_available: bool) -> DayStatus {
    if !freeze_available && raw != DayStatus::Learned {
        DayStatus::None
    } else {
        raw
    }
}

/// Freeze usage for one week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezeQuota {
    pub used: usize,
    pub max: usize,
    pub available: bool,
}

impl FreezeQuota {
    pub fn from_count(used: usize) -> Self {
        Self {
            used,
            max: MAX_FREEZES_PER_WEEK,
            available: is_freeze_available(used),
        }
    }

    /// `"1 out of 2 Freezes used"`; usage is capped at the maximum.
    pub fn label(&self) -> String {
        format!("{} out of {} Freezes used", self.used.min(self.max), self.max)
    }
}

/// Learned / frozen tallies for one week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekCounts {
    pub learned: usize,
    pub frozen: usize,
}

pub fn week_counts(progress: &ProgressMap, week_days: &[DateKey; 7]) -> WeekCounts {
    week_days
        .iter()
        .fold(WeekCounts::default(), |mut counts, d| {
            match progress.status(*d) {
                DayStatus::Learned => counts.learned += 1,
                DayStatus::Frozen => counts.frozen += 1,
                DayStatus::None => {}
            }
            counts
        })
}

/// The seven consecutive days opening on `week_start`.
pub fn week_days(week_start: DateKey) -> [DateKey; 7] {
    let mut days = [week_start; 7];
    for (i, day) in days.iter_mut().enumerate() {
        *day = week_start.add_days(i as i64);
    }
    days
}
