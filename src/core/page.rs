//! Class-day page: the class, its sessions on one date, the people eligible
//! to attend and what has been recorded so far.

use crate::core::attendance::{ClassDateAttendance, group_by_period};
use crate::core::enrollment::EnrollmentRegistry;
use crate::core::schedule::ScheduleResolver;
use crate::db::store::{EnrollmentFilter, Store};
use crate::errors::{AppError, AppResult};
use crate::models::{ClassSchedule, Person, PersonRef, PersonType, Session};
use chrono::NaiveDate;
use log::debug;

#[derive(Debug, Clone)]
pub struct ClassDayPage {
    pub class: ClassSchedule,
    pub date: NaiveDate,
    pub sessions: Vec<Session>,
    pub students: Vec<Person>,
    pub teachers: Vec<Person>,
    pub attendance: ClassDateAttendance,
}

impl ClassDayPage {
    /// Fan the five reads out concurrently and join them in memory.
    /// Each read sees the store at its own access time.
    pub fn assemble<S: Store + ?Sized>(store: &S, class_id: &str, date: NaiveDate) -> AppResult<Self> {
        let ((class, enrollments), ((students, teachers), attendance)) = rayon::join(
            || {
                rayon::join(
                    || store.class(class_id),
                    || store.enrollments(&EnrollmentFilter::class(class_id)),
                )
            },
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || store.persons(PersonType::Student),
                            || store.persons(PersonType::Teacher),
                        )
                    },
                    || store.attendance_for_class_date(class_id, date),
                )
            },
        );

        let class = class?.ok_or_else(|| AppError::ClassNotFound(class_id.to_string()))?;
        let registry = EnrollmentRegistry::new(enrollments?);

        let eligible_students = registry.eligible_in(class_id, PersonType::Student, date);
        let eligible_teachers = registry.eligible_in(class_id, PersonType::Teacher, date);

        let students: Vec<Person> = students?
            .into_iter()
            .filter(|p| eligible_students.contains(&p.id))
            .collect();
        let teachers: Vec<Person> = teachers?
            .into_iter()
            .filter(|p| eligible_teachers.contains(&p.id))
            .collect();

        let sessions = ScheduleResolver::sessions_on(&class, date);
        let attendance = group_by_period(&attendance?);

        debug!(
            "page {} {}: {} sessions, {} students, {} teachers",
            class_id,
            date,
            sessions.len(),
            students.len(),
            teachers.len()
        );

        Ok(Self {
            class,
            date,
            sessions,
            students,
            teachers,
            attendance,
        })
    }

    /// Persons to show for a class day: eligible ones first, then anyone
    /// with a recorded mark who is not eligible.
    pub fn roster(&self) -> Vec<PersonRef> {
        let mut out: Vec<PersonRef> = self
            .teachers
            .iter()
            .chain(self.students.iter())
            .map(|p| p.person_ref())
            .collect();

        for marks in self.attendance.values() {
            for person in marks.keys() {
                if !out.contains(person) {
                    out.push(person.clone());
                }
            }
        }
        out
    }
}
