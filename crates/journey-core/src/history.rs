//! Month grids for the history view.
//!
//! Read-only derivation from the progress map; recomputed on every call.

use serde::{Deserialize, Serialize};

use crate::calendar::{DateKey, WeekStart};
use crate::progress::{DayStatus, ProgressMap};

/// Month anchors (1st of month) from the month of the earliest logged day
/// through `today`'s month, most recent first. Never empty.
pub fn months_with_data(progress: &ProgressMap, today: DateKey) -> Vec<DateKey> {
    let end = today.first_of_month();
    let start = progress.earliest().unwrap_or(today).first_of_month();

    let mut months = Vec::new();
    let mut cursor = end;
    loop {
        months.push(cursor);
        if cursor <= start {
            break;
        }
        cursor = cursor.add_months(-1);
    }
    months
}

/// A month laid out 7 cells wide. `None` cells are padding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub anchor: DateKey,
    pub cells: Vec<Option<DateKey>>,
}

impl MonthGrid {
    pub fn rows(&self) -> impl Iterator<Item = &[Option<DateKey>]> {
        self.cells.chunks(7)
    }

    pub fn row_count(&self) -> usize {
        self.cells.len() / 7
    }

    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|c| c.is_none()).count()
    }
}

pub fn month_grid(anchor: DateKey, week_start: WeekStart) -> MonthGrid {
    let first = anchor.first_of_month();
    let leading = week_start.offset_of(first.weekday()) as usize;
    let days = first.days_in_month();

    let mut cells: Vec<Option<DateKey>> = vec![None; leading];
    cells.extend((0..days).map(|i| Some(first.add_days(i64::from(i)))));
    while cells.len() % 7 != 0 {
        cells.push(None);
    }
    MonthGrid {
        anchor: first,
        cells,
    }
}

/// `["MON", "TUE", ...]` in display order.
pub fn weekday_headers(week_start: WeekStart) -> [String; 7] {
    week_start
        .ordered_weekdays()
        .map(|d| d.to_string().to_uppercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryCell {
    pub date: DateKey,
    pub status: DayStatus,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSection {
    pub anchor: DateKey,
    pub label: String,
    pub rows: Vec<Vec<Option<HistoryCell>>>,
}

/// Every month section, most recent first, with statuses filled in.
pub fn build_history(
    progress: &ProgressMap,
    today: DateKey,
    week_start: WeekStart,
) -> Vec<MonthSection> {
    months_with_data(progress, today)
        .into_iter()
        .map(|anchor| {
            let grid = month_grid(anchor, week_start);
            let rows = grid
                .rows()
                .map(|row| {
                    row.iter()
                        .map(|cell| {
                            cell.map(|date| HistoryCell {
                                date,
                                status: progress.status(date),
                                is_today: date == today,
                            })
                        })
                        .collect()
                })
                .collect();
            MonthSection {
                anchor,
                label: anchor.month_year_label(),
                rows,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn empty_map_yields_current_month_only() {
        let months = months_with_data(&ProgressMap::new(), key("2025-03-18"));
        assert_eq!(months, vec![key("2025-03-01")]);
    }

    #[test]
    fn months_descend_from_today_to_earliest() {
        let progress: ProgressMap = [
            (key("2024-11-20"), DayStatus::Learned),
            (key("2025-01-05"), DayStatus::Frozen),
        ]
        .into_iter()
        .collect();
        let months = months_with_data(&progress, key("2025-02-10"));
        assert_eq!(
            months,
            vec![
                key("2025-02-01"),
                key("2025-01-01"),
                key("2024-12-01"),
                key("2024-11-01"),
            ]
        );
    }

    #[test]
    fn future_only_data_still_shows_current_month() {
        let progress: ProgressMap = [(key("2025-06-01"), DayStatus::Learned)]
            .into_iter()
            .collect();
        assert_eq!(
            months_with_data(&progress, key("2025-02-10")),
            vec![key("2025-02-01")]
        );
    }

    #[test]
    fn months_stop_at_earliest_representable_month() {
        let progress: ProgressMap = [(DateKey::min().add_days(14), DayStatus::Learned)]
            .into_iter()
            .collect();
        let months = months_with_data(&progress, key("0000-02-10"));
        assert_eq!(months, vec![key("0000-02-01"), key("0000-01-01")]);
    }

    #[test]
    fn grid_leading_blanks_follow_week_start() {
        // 2025-03-01 is a Saturday.
        let monday = month_grid(key("2025-03-15"), WeekStart::Monday);
        assert_eq!(monday.leading_blanks(), 5);
        assert_eq!(monday.anchor, key("2025-03-01"));
        let sunday = month_grid(key("2025-03-15"), WeekStart::Sunday);
        assert_eq!(sunday.leading_blanks(), 6);
    }

    #[test]
    fn grid_pads_to_whole_rows() {
        let grid = month_grid(key("2025-03-01"), WeekStart::Sunday);
        // 6 leading + 31 days = 37 -> 42.
        assert_eq!(grid.cells.len(), 42);
        assert_eq!(grid.row_count(), 6);
        assert_eq!(grid.cells.iter().flatten().count(), 31);

        // February 2026 opens on a Sunday and fills exactly four rows.
        let feb = month_grid(key("2026-02-01"), WeekStart::Sunday);
        assert_eq!(feb.leading_blanks(), 0);
        assert_eq!(feb.cells.len(), 28);
    }

    #[test]
    fn headers_follow_convention() {
        assert_eq!(weekday_headers(WeekStart::Sunday)[0], "SUN");
        assert_eq!(weekday_headers(WeekStart::Monday)[6], "SUN");
    }

    #[test]
    fn history_sections_carry_statuses() {
        let progress: ProgressMap = [(key("2025-02-03"), DayStatus::Learned)]
            .into_iter()
            .collect();
        let sections = build_history(&progress, key("2025-02-10"), WeekStart::Monday);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].label, "February 2025");

        let cells: Vec<HistoryCell> = sections[0].rows.iter().flatten().flatten().copied().collect();
        assert_eq!(cells.len(), 28);
        let logged = cells.iter().find(|c| c.date == key("2025-02-03")).unwrap();
        assert_eq!(logged.status, DayStatus::Learned);
        assert!(cells.iter().find(|c| c.date == key("2025-02-10")).unwrap().is_today);
    }
}
