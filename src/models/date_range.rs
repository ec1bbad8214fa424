use crate::errors::{AppError, AppResult};
use crate::utils::date::{last_day_of_month, month_bounds};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Inclusive calendar range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if end < start {
            return Err(AppError::InvalidRange(format!(
                "end {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// The whole calendar month `year-month`.
    pub fn month(year: i32, month: u32) -> AppResult<Self> {
        let (start, end) = month_bounds(year, month)?;
        Ok(Self { start, end })
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Every date of the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(|d| *d <= self.end)
    }

    /// Parse a `--range` expression.
    ///
    /// Accepted forms:
    /// - `YYYY`
    /// - `YYYY-MM`
    /// - `YYYY-MM-DD`
    /// - `start:end` in any of the above (same format on both sides)
    pub fn parse(expr: &str) -> AppResult<Self> {
        let expr = expr.trim();

        if let Some((start_raw, end_raw)) = expr.split_once(':') {
            let start_raw = start_raw.trim();
            let end_raw = end_raw.trim();

            if start_raw.len() != end_raw.len() {
                return Err(AppError::InvalidRange(format!(
                    "{expr}: start and end must have same format"
                )));
            }

            let start = parse_bound(start_raw)?;
            let end = parse_bound(end_raw)?;
            return DateRange::new(start.start, end.end);
        }

        parse_bound(expr)
    }
}

/// One side of a range expression, expanded to the period it names.
fn parse_bound(raw: &str) -> AppResult<DateRange> {
    let invalid = || AppError::InvalidRange(raw.to_string());

    match raw.len() {
        // YYYY
        4 => {
            let y: i32 = raw.parse().map_err(|_| invalid())?;
            let start = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(invalid)?;
            let end = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(invalid)?;
            Ok(DateRange { start, end })
        }
        // YYYY-MM
        7 => {
            let (y, m) = raw.split_once('-').ok_or_else(invalid)?;
            let y: i32 = y.parse().map_err(|_| invalid())?;
            let m: u32 = m.parse().map_err(|_| invalid())?;
            DateRange::month(y, m).map_err(|_| invalid())
        }
        // YYYY-MM-DD
        10 => {
            let d = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
            Ok(DateRange::single(d))
        }
        _ => Err(invalid()),
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else if self.start.day() == 1
            && self.start.year() == self.end.year()
            && self.start.month() == self.end.month()
            && Some(self.end.day()) == last_day_of_month(self.end.year(), self.end.month())
        {
            write!(f, "{}", self.start.format("%Y-%m"))
        } else {
            write!(f, "{} → {}", self.start, self.end)
        }
    }
}
