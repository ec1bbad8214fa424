//! Data-quality findings.
//!
//! A [`DataQualityWarning`] never fails the operation that raised it. It is
//! returned next to the result, logged at `warn` level and, for writes,
//! appended to the audit log as a `data_quality` line.

use crate::core::enrollment::EnrollmentRegistry;
use crate::core::snapshot::Snapshot;
use crate::db::store::{AttendanceFilter, Store};
use crate::errors::AppResult;
use crate::models::{DateRange, FeeSchedule, PersonRef, PersonType, TimePeriod};
use chrono::NaiveDate;
use log::warn;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// A subject in use has no fee.
    MissingFee { subject: String },
    /// A subject in use has a zero or negative fee.
    NonPositiveFee { subject: String, fee: i64 },
    /// Classes of one subject carry different fees.
    ConflictingFee { subject: String, fees: Vec<i64> },
    /// Attendance stored for a person without an active/trial enrollment
    /// covering that date.
    AttendanceWithoutEnrollment {
        person: PersonRef,
        class_id: String,
        date: NaiveDate,
    },
    /// Attendance stored for a date/period that matches no weekly slot.
    OffSchedule {
        class_id: String,
        date: NaiveDate,
        period: TimePeriod,
    },
    /// A known person with no enrollment row covering the audit date.
    UnenrolledPerson { person: PersonRef, as_of: NaiveDate },
    /// An enrollment references a class missing from the catalog read.
    UnknownClass { person: PersonRef, class_id: String },
}

impl DataQualityWarning {
    pub fn code(&self) -> &'static str {
        match self {
            DataQualityWarning::MissingFee { .. } => "missing_fee",
            DataQualityWarning::NonPositiveFee { .. } => "non_positive_fee",
            DataQualityWarning::ConflictingFee { .. } => "conflicting_fee",
            DataQualityWarning::AttendanceWithoutEnrollment { .. } => {
                "attendance_without_enrollment"
            }
            DataQualityWarning::OffSchedule { .. } => "off_schedule",
            DataQualityWarning::UnenrolledPerson { .. } => "unenrolled_person",
            DataQualityWarning::UnknownClass { .. } => "unknown_class",
        }
    }

    /// The entity the finding is about, used as the audit log target.
    pub fn target(&self) -> String {
        match self {
            DataQualityWarning::MissingFee { subject }
            | DataQualityWarning::NonPositiveFee { subject, .. }
            | DataQualityWarning::ConflictingFee { subject, .. } => subject.clone(),
            DataQualityWarning::AttendanceWithoutEnrollment { person, .. }
            | DataQualityWarning::UnenrolledPerson { person, .. } => person.to_string(),
            DataQualityWarning::OffSchedule { class_id, .. }
            | DataQualityWarning::UnknownClass { class_id, .. } => class_id.clone(),
        }
    }
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityWarning::MissingFee { subject } => {
                write!(f, "no monthly fee defined for subject '{subject}'")
            }
            DataQualityWarning::NonPositiveFee { subject, fee } => {
                write!(f, "monthly fee for subject '{subject}' is not positive ({fee})")
            }
            DataQualityWarning::ConflictingFee { subject, fees } => {
                let list = fees
                    .iter()
                    .map(|f| f.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "classes of subject '{subject}' disagree on the fee ({list})")
            }
            DataQualityWarning::AttendanceWithoutEnrollment {
                person,
                class_id,
                date,
            } => write!(
                f,
                "{person} has attendance in {class_id} on {date} without a covering enrollment"
            ),
            DataQualityWarning::OffSchedule {
                class_id,
                date,
                period,
            } => write!(
                f,
                "{class_id} has no scheduled session on {date} ({period})"
            ),
            DataQualityWarning::UnenrolledPerson { person, as_of } => {
                write!(f, "{person} has no enrollment covering {as_of}")
            }
            DataQualityWarning::UnknownClass { person, class_id } => write!(
                f,
                "{person} is enrolled in {class_id}, which is not in the class catalog; not billed"
            ),
        }
    }
}

/// Emit each warning on the `log` facade.
pub fn report(warnings: &[DataQualityWarning]) {
    for w in warnings {
        warn!("data quality [{}]: {}", w.code(), w);
    }
}

/// Emit and persist warnings raised by a write. Failing to persist the
/// audit line does not undo the write; the error is returned to the caller.
pub fn record<S: Store + ?Sized>(store: &S, warnings: &[DataQualityWarning]) -> AppResult<()> {
    report(warnings);
    for w in warnings {
        store.log("data_quality", &w.target(), &w.to_string())?;
    }
    Ok(())
}

/// Every subject used by a class with an active/trial enrollment covering
/// `as_of` must map to a strictly positive fee.
pub fn check_fee_table(
    snapshot: &Snapshot,
    fees: &FeeSchedule,
    as_of: NaiveDate,
) -> Vec<DataQualityWarning> {
    let subjects_in_use: BTreeSet<&str> = snapshot
        .classes
        .values()
        .filter(|c| snapshot.registry.has_billable_on(&c.id, as_of))
        .map(|c| c.subject.as_str())
        .collect();

    subjects_in_use
        .into_iter()
        .filter_map(|subject| match fees.get(subject) {
            None => Some(DataQualityWarning::MissingFee {
                subject: subject.to_string(),
            }),
            Some(fee) if fee <= 0 => Some(DataQualityWarning::NonPositiveFee {
                subject: subject.to_string(),
                fee,
            }),
            Some(_) => None,
        })
        .collect()
}

/// Attendance rows in `range` whose person had no active/trial enrollment
/// covering the date.
pub fn attendance_without_enrollment<S: Store + ?Sized>(
    store: &S,
    registry: &EnrollmentRegistry,
    range: &DateRange,
) -> AppResult<Vec<DataQualityWarning>> {
    let records = store.attendance_in_range(range, &AttendanceFilter::default())?;

    let found: BTreeSet<DataQualityWarning> = records
        .iter()
        .filter(|r| !registry.is_eligible(&r.key.person_ref(), &r.key.class_id, r.key.date))
        .map(|r| DataQualityWarning::AttendanceWithoutEnrollment {
            person: r.key.person_ref(),
            class_id: r.key.class_id.clone(),
            date: r.key.date,
        })
        .collect();

    Ok(found.into_iter().collect())
}

/// Full audit: fee table, unenrolled students and, when a range is given,
/// attendance recorded without covering enrollment.
pub fn run_audit<S: Store + ?Sized>(
    store: &S,
    as_of: NaiveDate,
    range: Option<&DateRange>,
) -> AppResult<Vec<DataQualityWarning>> {
    let snapshot = Snapshot::load(store)?;

    let mut warnings = snapshot.fee_warnings.clone();
    warnings.extend(check_fee_table(&snapshot, &snapshot.fees, as_of));

    let students: Vec<PersonRef> = store
        .persons(PersonType::Student)?
        .iter()
        .map(|p| p.person_ref())
        .collect();

    warnings.extend(
        snapshot
            .registry
            .find_unenrolled(&students, as_of)
            .into_iter()
            .map(|person| DataQualityWarning::UnenrolledPerson { person, as_of }),
    );

    if let Some(r) = range {
        warnings.extend(attendance_without_enrollment(store, &snapshot.registry, r)?);
    }

    report(&warnings);
    Ok(warnings)
}
