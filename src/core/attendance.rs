//! Per-session, per-person attendance facts.
//!
//! Writes are upserts keyed by `(class, date, period, person)`: a second
//! write to the same key replaces `present`, it never adds a row. Writes
//! are accepted even when the person is not eligible or the date is off
//! the weekly schedule; those conditions come back as warnings so an admin
//! can record make-up sessions and overrides.

use crate::core::audit::{self, DataQualityWarning};
use crate::core::enrollment::EnrollmentRegistry;
use crate::core::schedule::ScheduleResolver;
use crate::db::store::{AttendanceFilter, Store};
use crate::errors::{AppError, AppResult};
use crate::models::{AttendanceKey, AttendanceRecord, DateRange, PersonRef, TimePeriod};
use chrono::{Local, NaiveDate};
use log::info;
use std::collections::BTreeMap;

/// `period → (person → present)`. A missing entry means "not recorded",
/// which is different from `present == false`.
pub type ClassDateAttendance = BTreeMap<TimePeriod, BTreeMap<PersonRef, bool>>;

/// Result of a write: what the store now holds plus any findings.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub record: AttendanceRecord,
    pub warnings: Vec<DataQualityWarning>,
}

pub struct AttendanceLedger<'a, S: Store + ?Sized> {
    store: &'a S,
}

impl<'a, S: Store + ?Sized> AttendanceLedger<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn upsert_attendance(
        &self,
        class_id: &str,
        date: NaiveDate,
        period: TimePeriod,
        person: &PersonRef,
        present: bool,
    ) -> AppResult<Recorded> {
        validate_id("class id", class_id)?;
        validate_id("person id", &person.id)?;

        let class = self
            .store
            .class(class_id)?
            .ok_or_else(|| AppError::ClassNotFound(class_id.to_string()))?;

        if self.store.person(person.kind, &person.id)?.is_none() {
            return Err(person.kind.not_found(&person.id));
        }

        let key = AttendanceKey::new(class_id, date, period, person);
        let recorded_at = Local::now().to_rfc3339();
        let record = self.store.upsert_attendance(&key, present, &recorded_at)?;

        info!(
            "attendance {} {} {} {} = {}",
            class_id, date, period, person, present
        );

        let mut warnings = Vec::new();

        if !ScheduleResolver::is_scheduled(&class, date, period) {
            warnings.push(DataQualityWarning::OffSchedule {
                class_id: class_id.to_string(),
                date,
                period,
            });
        }

        let registry = EnrollmentRegistry::load_pair(self.store, person, class_id)?;
        if !registry.is_eligible(person, class_id, date) {
            warnings.push(DataQualityWarning::AttendanceWithoutEnrollment {
                person: person.clone(),
                class_id: class_id.to_string(),
                date,
            });
        }

        self.store.log(
            "attend",
            &format!("{class_id} {date} {period}"),
            &format!(
                "{} {}",
                person,
                if present { "present" } else { "absent" }
            ),
        )?;
        audit::record(self.store, &warnings)?;

        Ok(Recorded { record, warnings })
    }

    /// Two-level lookup of one class day.
    pub fn list_by_class_date(&self, class_id: &str, date: NaiveDate) -> AppResult<ClassDateAttendance> {
        self.require_class(class_id)?;
        let records = self.store.attendance_for_class_date(class_id, date)?;
        Ok(group_by_period(&records))
    }

    /// Records across many classes for reporting, ordered by date, class,
    /// period and person.
    pub fn list_by_date_range(
        &self,
        range: &DateRange,
        filter: &AttendanceFilter,
    ) -> AppResult<Vec<AttendanceRecord>> {
        if let Some(c) = &filter.class_id {
            self.require_class(c)?;
        }
        self.store.attendance_in_range(range, filter)
    }

    fn require_class(&self, class_id: &str) -> AppResult<()> {
        validate_id("class id", class_id)?;
        match self.store.class(class_id)? {
            Some(_) => Ok(()),
            None => Err(AppError::ClassNotFound(class_id.to_string())),
        }
    }
}

pub fn group_by_period(records: &[AttendanceRecord]) -> ClassDateAttendance {
    let mut out: ClassDateAttendance = BTreeMap::new();
    for r in records {
        out.entry(r.key.period)
            .or_default()
            .insert(r.key.person_ref(), r.present);
    }
    out
}

/// Per-person totals over a set of records: `(present, absent)`.
pub fn tally(records: &[AttendanceRecord]) -> BTreeMap<PersonRef, (u32, u32)> {
    let mut out: BTreeMap<PersonRef, (u32, u32)> = BTreeMap::new();
    for r in records {
        let entry = out.entry(r.key.person_ref()).or_default();
        if r.present {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }
    out
}

fn validate_id(what: &str, id: &str) -> AppResult<()> {
    if id.trim().is_empty() {
        return Err(AppError::Validation(format!("{what} must not be empty")));
    }
    Ok(())
}
