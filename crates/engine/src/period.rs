//! Year/month selections backing the yearly and monthly report pages.
//!
//! Selections live in the URL query (`?year=2025&month=3`). Values outside the
//! supported window are ignored rather than rejected so a hand-edited URL
//! falls back to the default period.

use chrono::{Datelike, NaiveDate};

use crate::{EngineError, ResultEngine};

pub const MIN_YEAR: i32 = 2020;
pub const MAX_YEAR: i32 = 2030;

fn valid_year(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

fn valid_month(month: u32) -> bool {
    (1..=12).contains(&month)
}

fn query_value<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find_map(|(k, v)| (k == key).then_some(v))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearSelection {
    year: i32,
}

impl YearSelection {
    pub fn new(year: i32) -> ResultEngine<Self> {
        if !valid_year(year) {
            return Err(EngineError::InvalidPeriod(format!(
                "year {year} outside {MIN_YEAR}..={MAX_YEAR}"
            )));
        }
        Ok(Self { year })
    }

    /// Defaults to the calendar year of `today`.
    pub fn current(today: NaiveDate) -> Self {
        Self { year: today.year() }
    }

    pub fn from_query(query: &str, today: NaiveDate) -> Self {
        query_value(query, "year")
            .and_then(|raw| raw.parse::<i32>().ok())
            .and_then(|year| Self::new(year).ok())
            .unwrap_or_else(|| Self::current(today))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Applies a new year; out-of-range values are ignored.
    ///
    /// Returns `true` when the selection changed.
    pub fn set_year(&mut self, year: i32) -> bool {
        if !valid_year(year) || year == self.year {
            return false;
        }
        self.year = year;
        true
    }

    pub fn to_query(&self) -> String {
        format!("year={}", self.year)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthSelection {
    year: i32,
    month: u32,
}

impl MonthSelection {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !valid_year(year) {
            return Err(EngineError::InvalidPeriod(format!(
                "year {year} outside {MIN_YEAR}..={MAX_YEAR}"
            )));
        }
        if !valid_month(month) {
            return Err(EngineError::InvalidPeriod(format!("month {month} outside 1..=12")));
        }
        Ok(Self { year, month })
    }

    /// Defaults to the month before `today`.
    pub fn previous_month(today: NaiveDate) -> Self {
        if today.month() == 1 {
            Self {
                year: today.year() - 1,
                month: 12,
            }
        } else {
            Self {
                year: today.year(),
                month: today.month() - 1,
            }
        }
    }

    /// Each component falls back independently to the default period.
    pub fn from_query(query: &str, today: NaiveDate) -> Self {
        let default = Self::previous_month(today);
        let year = query_value(query, "year")
            .and_then(|raw| raw.parse::<i32>().ok())
            .filter(|year| valid_year(*year))
            .unwrap_or(default.year);
        let month = query_value(query, "month")
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|month| valid_month(*month))
            .unwrap_or(default.month);
        Self { year, month }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn set_year(&mut self, year: i32) -> bool {
        if !valid_year(year) || year == self.year {
            return false;
        }
        self.year = year;
        true
    }

    pub fn set_month(&mut self, month: u32) -> bool {
        if !valid_month(month) || month == self.month {
            return false;
        }
        self.month = month;
        true
    }

    /// `YYYY-MM`, as used by the backend's `month` field.
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }

    pub fn to_query(&self) -> String {
        format!("year={}&month={}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn year_defaults_to_current() {
        assert_eq!(YearSelection::from_query("", today()).year(), 2025);
        assert_eq!(YearSelection::from_query("?year=abc", today()).year(), 2025);
    }

    #[test]
    fn year_query_outside_window_is_ignored() {
        assert_eq!(YearSelection::from_query("year=2019", today()).year(), 2025);
        assert_eq!(YearSelection::from_query("year=2031", today()).year(), 2025);
        assert_eq!(YearSelection::from_query("year=2022", today()).year(), 2022);
    }

    #[test]
    fn set_year_rejects_out_of_range() {
        let mut selection = YearSelection::current(today());
        assert!(!selection.set_year(2035));
        assert!(selection.set_year(2024));
        assert_eq!(selection.to_query(), "year=2024");
    }

    #[test]
    fn month_defaults_to_previous_month_across_year_boundary() {
        let selection = MonthSelection::from_query("", today());
        assert_eq!((selection.year(), selection.month()), (2024, 12));
        assert_eq!(selection.label(), "2024-12");
    }

    #[test]
    fn month_query_components_fall_back_independently() {
        let selection = MonthSelection::from_query("?year=2023&month=13", today());
        assert_eq!((selection.year(), selection.month()), (2023, 12));
        let selection = MonthSelection::from_query("month=4", today());
        assert_eq!(selection.to_query(), "year=2024&month=4");
    }

    #[test]
    fn month_new_validates() {
        assert!(MonthSelection::new(2025, 0).is_err());
        assert!(MonthSelection::new(2040, 1).is_err());
        assert!(MonthSelection::new(2025, 6).is_ok());
    }
}
