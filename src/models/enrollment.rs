use super::person::{PersonRef, PersonType};
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Three-way enrollment state.
///
/// Allowed edges: trial → active, trial → inactive, active → inactive.
/// Nothing returns to `Trial` and `Inactive` is terminal for its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Trial,
    Active,
    Inactive,
}

impl EnrollmentStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Trial => "trial",
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Inactive => "inactive",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "trial" => Some(EnrollmentStatus::Trial),
            "active" => Some(EnrollmentStatus::Active),
            "inactive" => Some(EnrollmentStatus::Inactive),
            _ => None,
        }
    }

    pub fn parse(input: &str) -> AppResult<Self> {
        EnrollmentStatus::from_db_str(&input.trim().to_lowercase())
            .ok_or_else(|| AppError::InvalidStatus(input.to_string()))
    }

    /// Statuses that grant attendance and billing.
    pub fn is_billable(&self) -> bool {
        matches!(self, EnrollmentStatus::Trial | EnrollmentStatus::Active)
    }

    /// A new enrollment row may only start as trial or active.
    pub fn is_onboarding(&self) -> bool {
        self.is_billable()
    }

    pub fn can_transition_to(&self, next: EnrollmentStatus) -> bool {
        matches!(
            (self, next),
            (EnrollmentStatus::Trial, EnrollmentStatus::Active)
                | (EnrollmentStatus::Trial, EnrollmentStatus::Inactive)
                | (EnrollmentStatus::Active, EnrollmentStatus::Inactive)
        )
    }

    pub fn transition_to(&self, next: EnrollmentStatus) -> AppResult<EnrollmentStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

/// One enrollment row: a person in a class over a validity interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enrollment {
    pub id: i64,
    pub person_id: String,
    pub person_type: PersonType,
    pub class_id: String,
    pub status: EnrollmentStatus,
    pub start_date: NaiveDate,
    /// `None` is open-ended.
    pub end_date: Option<NaiveDate>,
}

impl Enrollment {
    pub fn person_ref(&self) -> PersonRef {
        PersonRef::new(self.person_type, self.person_id.clone())
    }

    /// `start_date <= day <= end_date` (or unbounded), regardless of status.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && self.end_date.is_none_or(|end| day <= end)
    }

    /// Billable status and covering `day`.
    pub fn grants(&self, day: NaiveDate) -> bool {
        self.status.is_billable() && self.covers(day)
    }

    /// The part of `[from, to]` covered by this row, if any.
    pub fn coverage_within(&self, from: NaiveDate, to: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.start_date.max(from);
        let end = match self.end_date {
            Some(e) => e.min(to),
            None => to,
        };
        (start <= end).then_some((start, end))
    }

    pub fn validate_interval(start: NaiveDate, end: Option<NaiveDate>) -> AppResult<()> {
        if let Some(e) = end
            && e < start
        {
            return Err(AppError::Validation(format!(
                "end date {} is before start date {}",
                e, start
            )));
        }
        Ok(())
    }
}
