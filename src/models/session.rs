use super::period::TimePeriod;
use chrono::NaiveDate;
use serde::Serialize;

/// A concrete, dated occurrence of a class at one weekly slot.
/// Derived on demand from the weekly schedule, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Session {
    pub class_id: String,
    pub date: NaiveDate,
    pub period: TimePeriod,
}

impl Session {
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
