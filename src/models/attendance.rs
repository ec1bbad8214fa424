use super::period::TimePeriod;
use super::person::{PersonRef, PersonType};
use chrono::NaiveDate;
use serde::Serialize;

/// Unique identity of an attendance fact.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AttendanceKey {
    pub class_id: String,
    pub date: NaiveDate,
    pub period: TimePeriod,
    pub person_id: String,
    pub person_type: PersonType,
}

impl AttendanceKey {
    pub fn new(
        class_id: impl Into<String>,
        date: NaiveDate,
        period: TimePeriod,
        person: &PersonRef,
    ) -> Self {
        Self {
            class_id: class_id.into(),
            date,
            period,
            person_id: person.id.clone(),
            person_type: person.kind,
        }
    }

    pub fn person_ref(&self) -> PersonRef {
        PersonRef::new(self.person_type, self.person_id.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    #[serde(flatten)]
    pub key: AttendanceKey,
    pub present: bool,
    /// RFC 3339 timestamp of the last write to this key.
    pub recorded_at: String,
}
