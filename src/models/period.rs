use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed daily slot a class can occupy.
///
/// The declaration order is the chronological order of the day, so the
/// derived `Ord` sorts morning < afternoon < evening. Never sort periods by
/// their labels: "afternoon" < "evening" < "morning" lexically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    Morning,
    Afternoon,
    Evening,
}

impl TimePeriod {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TimePeriod::Morning => "morning",
            TimePeriod::Afternoon => "afternoon",
            TimePeriod::Evening => "evening",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "morning" => Some(TimePeriod::Morning),
            "afternoon" => Some(TimePeriod::Afternoon),
            "evening" => Some(TimePeriod::Evening),
            _ => None,
        }
    }

    /// Helper: parse CLI input, accepting full names or the first letter.
    pub fn parse(input: &str) -> AppResult<Self> {
        let lower = input.trim().to_lowercase();
        let period = match lower.as_str() {
            "m" => Some(TimePeriod::Morning),
            "a" => Some(TimePeriod::Afternoon),
            "e" => Some(TimePeriod::Evening),
            other => TimePeriod::from_db_str(other),
        };
        period.ok_or_else(|| AppError::InvalidTimePeriod(input.to_string()))
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}
