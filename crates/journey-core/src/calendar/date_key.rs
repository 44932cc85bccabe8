//! Canonical calendar-day identity.
//!
//! A [`DateKey`] is a day with no time-of-day component. Its textual form
//! is the locale-invariant `YYYY-MM-DD`, zero-padded, no offset. The
//! derived ordering is chronological, which for four-digit years is also
//! the lexicographic order of the textual form.
//!
//! Keys are confined to years 0000 through 9999, the range that text form
//! can express. Constructors reject dates outside it and arithmetic
//! saturates at its bounds.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Local, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::WeekStart;

const KEY_FORMAT: &str = "%Y-%m-%d";

/// Returned when a string is not a well-formed `YYYY-MM-DD` key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date key '{0}': expected YYYY-MM-DD")]
pub struct ParseDateKeyError(pub String);

/// A single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// The local calendar day at evaluation time.
    pub fn today() -> Self {
        Self::saturating(Some(Local::now().date_naive()), true)
    }

    /// Earliest representable key, `0000-01-01`.
    pub fn min() -> Self {
        Self(NaiveDate::from_ymd_opt(0, 1, 1).unwrap_or(NaiveDate::MIN))
    }

    /// Latest representable key, `9999-12-31`.
    pub fn max() -> Self {
        Self(NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX))
    }

    /// `None` for invalid dates and years outside 0000..=9999.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(Self::from_naive)
    }

    pub fn from_naive(date: NaiveDate) -> Option<Self> {
        (0..=9999).contains(&date.year()).then_some(Self(date))
    }

    fn saturating(date: Option<NaiveDate>, forward: bool) -> Self {
        match date.and_then(Self::from_naive) {
            Some(key) => key,
            None if forward => Self::max(),
            None => Self::min(),
        }
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    // ── Arithmetic ───────────────────────────────────────────────────
    //
    // Out-of-range results saturate at `min()` / `max()`.

    pub fn add_days(&self, n: i64) -> Self {
        let shifted = Duration::try_days(n).and_then(|d| self.0.checked_add_signed(d));
        Self::saturating(shifted, n >= 0)
    }

    /// Month arithmetic clamps the day to the target month's length
    /// (Jan 31 + 1 month = Feb 28/29).
    pub fn add_months(&self, n: i32) -> Self {
        let months = Months::new(n.unsigned_abs());
        let shifted = if n < 0 {
            self.0.checked_sub_months(months)
        } else {
            self.0.checked_add_months(months)
        };
        Self::saturating(shifted, n >= 0)
    }

    pub fn add_years(&self, n: i32) -> Self {
        self.add_months(n.saturating_mul(12))
    }

    /// Number of days from `self` to `other` (negative if `other` is earlier).
    pub fn days_until(&self, other: DateKey) -> i64 {
        (other.0 - self.0).num_days()
    }

    // ── Anchors ──────────────────────────────────────────────────────

    /// First day of the week containing `self`.
    pub fn start_of_week(&self, week_start: WeekStart) -> Self {
        let offset = week_start.offset_of(self.weekday());
        self.add_days(-i64::from(offset))
    }

    pub fn first_of_month(&self) -> Self {
        Self(self.0.with_day(1).unwrap_or(self.0))
    }

    pub fn days_in_month(&self) -> u32 {
        let first = self.first_of_month();
        first.days_until(first.add_months(1)) as u32
    }

    /// Days in the half-open range `[self, end)`.
    pub fn days_until_exclusive(&self, end: DateKey) -> impl Iterator<Item = DateKey> {
        let start = self.0;
        start
            .iter_days()
            .take_while(move |d| *d < end.0)
            .map(DateKey)
    }

    /// `"October 2026"`.
    pub fn month_year_label(&self) -> String {
        self.0.format("%B %Y").to_string()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = ParseDateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono alone would accept unpadded fields and signed years.
        let bytes = s.as_bytes();
        let shaped = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !shaped {
            return Err(ParseDateKeyError(s.to_string()));
        }
        NaiveDate::parse_from_str(s, KEY_FORMAT)
            .ok()
            .and_then(Self::from_naive)
            .ok_or_else(|| ParseDateKeyError(s.to_string()))
    }
}

impl TryFrom<String> for DateKey {
    type Error = ParseDateKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}
