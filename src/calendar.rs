//! Monday-first month grid for the personal attendance calendar.

use chrono::{Datelike, NaiveDate};

pub const WEEKDAY_LABELS: [&str; 7] = ["L", "M", "X", "J", "V", "S", "D"];

pub const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

#[derive(Clone, Debug, PartialEq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Blank cells before day 1 in a Monday-first layout.
    pub lead_blanks: usize,
    pub days: u32,
}

impl MonthGrid {
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month as usize - 1).min(11)]
    }

    /// Zero-padded date key for one cell, comparable against log dates.
    pub fn date_key(&self, day: u32) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, day)
    }
}

pub fn month_grid(today: NaiveDate) -> MonthGrid {
    // Day 1 exists for every valid date.
    let first = today.with_day(1).unwrap_or(today);
    let days = (28..=31)
        .rev()
        .find(|&d| NaiveDate::from_ymd_opt(today.year(), today.month(), d).is_some())
        .unwrap_or(31);
    MonthGrid {
        year: today.year(),
        month: today.month(),
        lead_blanks: first.weekday().num_days_from_monday() as usize,
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn leap_february_has_29_days() {
        let grid = month_grid(date("2024-02-10"));
        assert_eq!(grid.days, 29);
        // 2024-02-01 was a Thursday.
        assert_eq!(grid.lead_blanks, 3);
    }

    #[test]
    fn plain_february_has_28_days() {
        assert_eq!(month_grid(date("2026-02-01")).days, 28);
    }

    #[test]
    fn month_starting_on_sunday_gets_six_blanks() {
        // 2026-03-01 is a Sunday.
        let grid = month_grid(date("2026-03-15"));
        assert_eq!(grid.lead_blanks, 6);
        assert_eq!(grid.days, 31);
    }

    #[test]
    fn date_keys_are_zero_padded() {
        let grid = month_grid(date("2026-08-25"));
        assert_eq!(grid.date_key(3), "2026-08-03");
        assert_eq!(grid.month_name(), "agosto");
    }
}
