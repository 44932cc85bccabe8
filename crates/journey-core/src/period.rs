//! Period boundaries and completion.
//!
//! A period is the half-open range `[start, end)` where `end` is
//! `start + 7 days`, `+ 1 month`, or `+ 1 year` depending on the timeframe.
//! The same formula serves both the goal's live period and whatever
//! period the user is browsing.

use serde::{Deserialize, Serialize};

use crate::calendar::DateKey;
use crate::goal::Timeframe;

/// Exclusive upper bound of the period opening on `start`.
pub fn period_end(start: DateKey, timeframe: Timeframe) -> DateKey {
    match timeframe {
        Timeframe::Week => start.add_days(7),
        Timeframe::Month => start.add_months(1),
        Timeframe::Year => start.add_years(1),
    }
}

/// `today >= period_end(start, timeframe)`.
pub fn is_complete(start: DateKey, timeframe: Timeframe, today: DateKey) -> bool {
    today >= period_end(start, timeframe)
}

/// Whether the browsed period is the goal's live period (same first day).
pub fn is_live_period(displayed_start: DateKey, period_start: DateKey) -> bool {
    displayed_start == period_start
}

/// Start of the browsed period.
///
/// Week uses the browsed week's first day; Month the 1st of the picked
/// month; Year January 1st of the picked year.
pub fn displayed_period_start(
    timeframe: Timeframe,
    browsed_week_start: DateKey,
    picked_year: i32,
    picked_month: u32,
) -> DateKey {
    match timeframe {
        Timeframe::Week => browsed_week_start,
        Timeframe::Month => DateKey::from_ymd(picked_year, picked_month, 1)
            .unwrap_or_else(|| browsed_week_start.first_of_month()),
        Timeframe::Year => DateKey::from_ymd(picked_year, 1, 1)
            .unwrap_or_else(|| browsed_week_start.first_of_month()),
    }
}

/// A concrete `[start, end)` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start: DateKey,
    pub end_exclusive: DateKey,
}

impl Period {
    pub fn new(start: DateKey, timeframe: Timeframe) -> Self {
        Self {
            start,
            end_exclusive: period_end(start, timeframe),
        }
    }

    pub fn contains(&self, date: DateKey) -> bool {
        self.start <= date && date < self.end_exclusive
    }

    pub fn is_complete(&self, today: DateKey) -> bool {
        today >= self.end_exclusive
    }

    pub fn days(&self) -> impl Iterator<Item = DateKey> {
        self.start.days_until_exclusive(self.end_exclusive)
    }

    pub fn len_days(&self) -> i64 {
        self.start.days_until(self.end_exclusive)
    }
}
