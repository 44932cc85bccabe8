//! Re-focusing after a goal revision.
//!
//! When a goal is created, edited, or restarted the previously focused day
//! is stale. The new focus is the first unlogged day of the new live
//! period, and the browsed week / month / year move to contain it.

use serde::{Deserialize, Serialize};

use crate::calendar::{DateKey, WeekStart};
use crate::goal::Goal;
use crate::period::period_end;
use crate::progress::{DayStatus, ProgressMap};

/// First day in `[period_start, period_end_exclusive)` whose status is
/// `None`, or `period_start` itself when every day is already logged.
pub fn nearest_unlogged_in_period(
    progress: &ProgressMap,
    period_start: DateKey,
    period_end_exclusive: DateKey,
) -> DateKey {
    period_start
        .days_until_exclusive(period_end_exclusive)
        .find(|d| progress.status(*d) == DayStatus::None)
        .unwrap_or(period_start)
}

/// Where the view lands after a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusTarget {
    pub date: DateKey,
    pub week_start: DateKey,
    pub picked_year: i32,
    pub picked_month: u32,
}

impl FocusTarget {
    /// Browse anchors for a view focused on `date`.
    pub fn on(date: DateKey, week_start: WeekStart) -> Self {
        Self {
            date,
            week_start: date.start_of_week(week_start),
            picked_year: date.year(),
            picked_month: date.month(),
        }
    }
}

/// Resolve the focus for `goal`'s live period.
pub fn resolve(progress: &ProgressMap, goal: &Goal, week_start: WeekStart) -> FocusTarget {
    let end = period_end(goal.period_start, goal.timeframe);
    let date = nearest_unlogged_in_period(progress, goal.period_start, end);
    tracing::debug!(%date, period_start = %goal.period_start, %end, "resolved focus after goal revision");
    FocusTarget::on(date, week_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::Timeframe;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn skips_logged_days() {
        let progress: ProgressMap = [
            (key("2025-01-01"), DayStatus::Learned),
            (key("2025-01-02"), DayStatus::Frozen),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            nearest_unlogged_in_period(&progress, key("2025-01-01"), key("2025-01-08")),
            key("2025-01-03")
        );
    }

    #[test]
    fn explicit_none_counts_as_unlogged() {
        let progress: ProgressMap = [
            (key("2025-01-01"), DayStatus::Learned),
            (key("2025-01-02"), DayStatus::None),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            nearest_unlogged_in_period(&progress, key("2025-01-01"), key("2025-01-08")),
            key("2025-01-02")
        );
    }

    #[test]
    fn empty_map_returns_period_start() {
        let start = key("2025-03-10");
        let end = period_end(start, Timeframe::Month);
        assert_eq!(end, key("2025-04-10"));
        assert_eq!(nearest_unlogged_in_period(&ProgressMap::new(), start, end), start);
    }

    #[test]
    fn fully_logged_week_falls_back_to_start() {
        let start = key("2025-01-01");
        let progress: ProgressMap = (0..7)
            .map(|i| (start.add_days(i), DayStatus::Learned))
            .collect();
        assert_eq!(
            nearest_unlogged_in_period(&progress, start, start.add_days(7)),
            start
        );
    }

    #[test]
    fn resolve_moves_browse_anchors() {
        let goal = Goal {
            topic: "Rust".into(),
            timeframe: Timeframe::Month,
            period_start: key("2025-01-30"),
        };
        let progress: ProgressMap = [
            (key("2025-01-30"), DayStatus::Learned),
            (key("2025-01-31"), DayStatus::Learned),
        ]
        .into_iter()
        .collect();
        let target = resolve(&progress, &goal, WeekStart::Monday);
        assert_eq!(target.date, key("2025-02-01"));
        // 2025-02-01 is a Saturday.
        assert_eq!(target.week_start, key("2025-01-27"));
        assert_eq!((target.picked_year, target.picked_month), (2025, 2));
    }
}
