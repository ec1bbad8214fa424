use super::period::TimePeriod;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

const DAY_CODES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// One `(day_of_week, period)` pair of a weekly schedule.
///
/// `day_of_week` follows the domain convention Sunday = 0 … Saturday = 6.
/// Field order gives the derived `Ord`: by day, then chronologically by period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeeklySlot {
    pub day_of_week: u8,
    pub period: TimePeriod,
}

impl WeeklySlot {
    pub fn new(day_of_week: u8, period: TimePeriod) -> AppResult<Self> {
        if day_of_week > 6 {
            return Err(AppError::InvalidWeekday(day_of_week.to_string()));
        }
        Ok(Self {
            day_of_week,
            period,
        })
    }

    /// Parse `<day>:<period>` where day is `sun..sat`, a full English name,
    /// or a number `0..6` (Sunday = 0).
    pub fn parse(input: &str) -> AppResult<Self> {
        let (day_raw, period_raw) = input
            .split_once(':')
            .ok_or_else(|| AppError::InvalidSlot(input.to_string()))?;

        let day = parse_day_of_week(day_raw)?;
        let period = TimePeriod::parse(period_raw)?;
        WeeklySlot::new(day, period)
    }

    pub fn day_code(&self) -> &'static str {
        DAY_CODES[self.day_of_week as usize % 7]
    }
}

impl fmt::Display for WeeklySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.day_code(), self.period)
    }
}

fn parse_day_of_week(raw: &str) -> AppResult<u8> {
    let lower = raw.trim().to_lowercase();

    if let Ok(n) = lower.parse::<u8>() {
        return if n <= 6 {
            Ok(n)
        } else {
            Err(AppError::InvalidWeekday(raw.to_string()))
        };
    }

    DAY_CODES
        .iter()
        .position(|code| lower.len() >= 3 && lower.starts_with(code))
        .map(|i| i as u8)
        .ok_or_else(|| AppError::InvalidWeekday(raw.to_string()))
}

/// A class with its fixed weekly pattern.
///
/// The slot set is finite and enumerable; there is no recurrence rule beyond
/// "every week at these slots".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSchedule {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub slots: BTreeSet<WeeklySlot>,
    pub monthly_fee: Option<i64>,
}

impl ClassSchedule {
    pub fn new(id: impl Into<String>, subject: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            subject: subject.into(),
            slots: BTreeSet::new(),
            monthly_fee: None,
        }
    }

    pub fn with_slot(mut self, day_of_week: u8, period: TimePeriod) -> AppResult<Self> {
        self.slots.insert(WeeklySlot::new(day_of_week, period)?);
        Ok(self)
    }

    pub fn has_slot(&self, day_of_week: u8, period: TimePeriod) -> bool {
        self.slots.contains(&WeeklySlot {
            day_of_week,
            period,
        })
    }

    /// Periods scheduled on the given weekday, in chronological order.
    pub fn periods_on(&self, day_of_week: u8) -> impl Iterator<Item = TimePeriod> + '_ {
        self.slots
            .iter()
            .filter(move |s| s.day_of_week == day_of_week)
            .map(|s| s.period)
    }

    pub fn slots_label(&self) -> String {
        self.slots
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
