use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| AppError::InvalidDate(s.to_string()))
}

/// Parse `YYYY-MM` into `(year, month)`.
pub fn parse_month(s: &str) -> AppResult<(i32, u32)> {
    let invalid = || AppError::InvalidMonth(s.to_string());
    let (y, m) = s.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = y.parse().map_err(|_| invalid())?;
    let month: u32 = m.parse().map_err(|_| invalid())?;
    check_month(year, month)?;
    Ok((year, month))
}

pub fn check_month(year: i32, month: u32) -> AppResult<()> {
    if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        return Err(AppError::InvalidMonth(format!("{year}-{month:02}")));
    }
    Ok(())
}

/// Day of week under the domain convention: Sunday = 0 … Saturday = 6.
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}

/// First and last date of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    check_month(year, month)?;
    let invalid = || AppError::InvalidMonth(format!("{year}-{month:02}"));
    let last = last_day_of_month(year, month).ok_or_else(invalid)?;
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let end = NaiveDate::from_ymd_opt(year, month, last).ok_or_else(invalid)?;
    Ok((start, end))
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    match day_of_week(date) {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        _ => "Saturday",
    }
}
