use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Which weekday opens a calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }

    /// Position of `day` within a week opened by `self` (0..=6).
    ///
    /// Same value as `(weekday - weekStart + 7) % 7` for the month grid's
    /// leading blanks.
    pub fn offset_of(&self, day: Weekday) -> u32 {
        (day.num_days_from_monday() + 7 - self.weekday().num_days_from_monday()) % 7
    }

    /// The seven weekdays in display order.
    pub fn ordered_weekdays(&self) -> [Weekday; 7] {
        let mut days = [self.weekday(); 7];
        for i in 1..7 {
            days[i] = days[i - 1].succ();
        }
        days
    }
}
