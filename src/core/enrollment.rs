//! Enrollment validity intervals, eligibility and status transitions.

use crate::db::store::{EnrollmentFilter, Store};
use crate::errors::{AppError, AppResult};
use crate::models::{Enrollment, EnrollmentStatus, PersonRef, PersonType};
use chrono::NaiveDate;
use log::info;
use std::collections::{BTreeMap, BTreeSet};

/// In-memory view over a set of enrollment rows.
///
/// Built from a store query and then queried without further I/O, so it
/// can be shared across threads while a report is computed.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentRegistry {
    rows: Vec<Enrollment>,
}

impl EnrollmentRegistry {
    pub fn new(rows: Vec<Enrollment>) -> Self {
        Self { rows }
    }

    /// All rows of the store.
    pub fn load<S: Store + ?Sized>(store: &S) -> AppResult<Self> {
        Ok(Self::new(store.enrollments(&EnrollmentFilter::default())?))
    }

    /// Rows of one `(person, class)` pair.
    pub fn load_pair<S: Store + ?Sized>(
        store: &S,
        person: &PersonRef,
        class_id: &str,
    ) -> AppResult<Self> {
        Ok(Self::new(
            store.enrollments(&EnrollmentFilter::pair(person, class_id))?,
        ))
    }

    pub fn rows(&self) -> &[Enrollment] {
        &self.rows
    }

    pub fn rows_for<'a>(
        &'a self,
        person: &'a PersonRef,
        class_id: &'a str,
    ) -> impl Iterator<Item = &'a Enrollment> + 'a {
        self.rows.iter().filter(move |e| {
            e.person_type == person.kind && e.person_id == person.id && e.class_id == class_id
        })
    }

    /// True iff some row of the pair is active/trial and covers `date`.
    pub fn is_eligible(&self, person: &PersonRef, class_id: &str, date: NaiveDate) -> bool {
        self.rows_for(person, class_id).any(|e| e.grants(date))
    }

    /// Known persons minus those with at least one row (any status)
    /// covering `as_of`.
    pub fn find_unenrolled(&self, all_persons: &[PersonRef], as_of: NaiveDate) -> BTreeSet<PersonRef> {
        let covered: BTreeSet<PersonRef> = self
            .rows
            .iter()
            .filter(|e| e.covers(as_of))
            .map(|e| e.person_ref())
            .collect();

        all_persons
            .iter()
            .filter(|p| !covered.contains(*p))
            .cloned()
            .collect()
    }

    /// Persons of `kind` eligible in `class_id` on `date`.
    pub fn eligible_in(&self, class_id: &str, kind: PersonType, date: NaiveDate) -> BTreeSet<String> {
        self.rows
            .iter()
            .filter(|e| e.class_id == class_id && e.person_type == kind && e.grants(date))
            .map(|e| e.person_id.clone())
            .collect()
    }

    /// True if any active/trial row of `class_id` covers `date`.
    pub fn has_billable_on(&self, class_id: &str, date: NaiveDate) -> bool {
        self.rows
            .iter()
            .any(|e| e.class_id == class_id && e.grants(date))
    }

    /// Distinct `(person, class)` pairs with an active/trial row
    /// intersecting `[from, to]`.
    pub fn billable_pairs(&self, from: NaiveDate, to: NaiveDate) -> Vec<(PersonRef, String)> {
        let pairs: BTreeMap<(PersonRef, String), ()> = self
            .rows
            .iter()
            .filter(|e| e.status.is_billable() && e.coverage_within(from, to).is_some())
            .map(|e| ((e.person_ref(), e.class_id.clone()), ()))
            .collect();

        pairs.into_keys().collect()
    }

    /// Sorted, merged active/trial coverage of the pair within `[from, to]`.
    pub fn coverage(
        &self,
        person: &PersonRef,
        class_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<(NaiveDate, NaiveDate)> {
        let mut parts: Vec<(NaiveDate, NaiveDate)> = self
            .rows_for(person, class_id)
            .filter(|e| e.status.is_billable())
            .filter_map(|e| e.coverage_within(from, to))
            .collect();
        parts.sort();

        let mut merged: Vec<(NaiveDate, NaiveDate)> = Vec::with_capacity(parts.len());
        for (start, end) in parts {
            match merged.last_mut() {
                Some(last) if start <= last.1 + chrono::Days::new(1) => {
                    last.1 = last.1.max(end);
                }
                _ => merged.push((start, end)),
            }
        }
        merged
    }

    /// Onboard a person into a class.
    ///
    /// The class and person must exist, the status must be trial or active
    /// and the interval must not end before it starts.
    pub fn enroll<S: Store + ?Sized>(
        store: &S,
        person: &PersonRef,
        class_id: &str,
        status: EnrollmentStatus,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> AppResult<Enrollment> {
        if !status.is_onboarding() {
            return Err(AppError::Validation(format!(
                "new enrollments must start as trial or active, not {status}"
            )));
        }
        Enrollment::validate_interval(start_date, end_date)?;

        if store.class(class_id)?.is_none() {
            return Err(AppError::ClassNotFound(class_id.to_string()));
        }
        if store.person(person.kind, &person.id)?.is_none() {
            return Err(person.kind.not_found(&person.id));
        }

        let mut enrollment = Enrollment {
            id: 0,
            person_id: person.id.clone(),
            person_type: person.kind,
            class_id: class_id.to_string(),
            status,
            start_date,
            end_date,
        };
        enrollment.id = store.insert_enrollment(&enrollment)?;

        info!("enrolled {} in {} as {}", person, class_id, status);
        store.log(
            "enroll",
            &person.to_string(),
            &format!("#{} {} {} from {}", enrollment.id, class_id, status, start_date),
        )?;

        Ok(enrollment)
    }

    /// Move an enrollment row along the status table.
    ///
    /// Moving to `inactive` closes an open-ended row at `end_date`, or at
    /// `today` when none is given.
    pub fn transition<S: Store + ?Sized>(
        store: &S,
        id: i64,
        next: EnrollmentStatus,
        end_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> AppResult<Enrollment> {
        let mut enrollment = store
            .enrollment(id)?
            .ok_or(AppError::EnrollmentNotFound(id))?;

        let from = enrollment.status;
        enrollment.status = from.transition_to(next)?;

        if let Some(end) = end_date {
            enrollment.end_date = Some(end);
        } else if next == EnrollmentStatus::Inactive && enrollment.end_date.is_none() {
            enrollment.end_date = Some(today.max(enrollment.start_date));
        }
        Enrollment::validate_interval(enrollment.start_date, enrollment.end_date)?;

        store.update_enrollment(id, enrollment.status, enrollment.end_date)?;

        info!("enrollment #{} {} -> {}", id, from, next);
        store.log(
            "enroll_status",
            &enrollment.person_ref().to_string(),
            &format!("#{} {} {} -> {}", id, enrollment.class_id, from, next),
        )?;

        Ok(enrollment)
    }
}
