//! Persistence seam for the core components.
//!
//! The core only reads, queries and upserts through [`Store`]; it never
//! issues SQL itself. [`SqliteStore`] opens an independent connection for
//! every call, so each read is consistent at its own access time and reads
//! issued from different threads never share a connection.

use crate::db::log::audit_log;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::{
    AttendanceKey, AttendanceRecord, ClassSchedule, DateRange, Enrollment, EnrollmentStatus,
    Expense, Person, PersonRef, PersonType,
};
use chrono::NaiveDate;

/// Optional narrowing of an enrollment query.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentFilter {
    pub person: Option<PersonRef>,
    pub class_id: Option<String>,
}

impl EnrollmentFilter {
    pub fn pair(person: &PersonRef, class_id: &str) -> Self {
        Self {
            person: Some(person.clone()),
            class_id: Some(class_id.to_string()),
        }
    }

    pub fn class(class_id: &str) -> Self {
        Self {
            person: None,
            class_id: Some(class_id.to_string()),
        }
    }
}

/// Optional narrowing of an attendance range query.
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub class_id: Option<String>,
    pub person: Option<PersonRef>,
}

/// Record collections the engine consumes.
///
/// Failures are returned unchanged; implementations do not retry.
pub trait Store: Send + Sync {
    fn class(&self, id: &str) -> AppResult<Option<ClassSchedule>>;

    /// All classes ordered by id.
    fn classes(&self) -> AppResult<Vec<ClassSchedule>>;

    fn save_class(&self, class: &ClassSchedule) -> AppResult<()>;

    /// Apply `fee` to every class of `subject`; returns the classes updated.
    fn set_subject_fee(&self, subject: &str, fee: i64) -> AppResult<usize>;

    fn person(&self, kind: PersonType, id: &str) -> AppResult<Option<Person>>;

    fn persons(&self, kind: PersonType) -> AppResult<Vec<Person>>;

    fn save_person(&self, person: &Person) -> AppResult<()>;

    fn enrollment(&self, id: i64) -> AppResult<Option<Enrollment>>;

    fn enrollments(&self, filter: &EnrollmentFilter) -> AppResult<Vec<Enrollment>>;

    /// Insert a row, ignoring `enrollment.id`; returns the assigned id.
    fn insert_enrollment(&self, enrollment: &Enrollment) -> AppResult<i64>;

    fn update_enrollment(
        &self,
        id: i64,
        status: EnrollmentStatus,
        end_date: Option<NaiveDate>,
    ) -> AppResult<()>;

    /// Insert or overwrite the record at `key` and return what is stored.
    fn upsert_attendance(
        &self,
        key: &AttendanceKey,
        present: bool,
        recorded_at: &str,
    ) -> AppResult<AttendanceRecord>;

    fn attendance_for_class_date(
        &self,
        class_id: &str,
        date: NaiveDate,
    ) -> AppResult<Vec<AttendanceRecord>>;

    fn attendance_in_range(
        &self,
        range: &DateRange,
        filter: &AttendanceFilter,
    ) -> AppResult<Vec<AttendanceRecord>>;

    fn insert_expense(&self, reason: &str, amount: i64, month: u32, year: i32) -> AppResult<i64>;

    /// Expenses of one year, or all of them.
    fn expenses(&self, year: Option<i32>) -> AppResult<Vec<Expense>>;

    /// Append a line to the internal audit log.
    fn log(&self, operation: &str, target: &str, message: &str) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    fn open(&self) -> AppResult<DbPool> {
        Ok(DbPool::new(&self.db_path)?)
    }
}

impl Store for SqliteStore {
    fn class(&self, id: &str) -> AppResult<Option<ClassSchedule>> {
        queries::load_class(&self.open()?.conn, id)
    }

    fn classes(&self) -> AppResult<Vec<ClassSchedule>> {
        queries::load_classes(&self.open()?.conn)
    }

    fn save_class(&self, class: &ClassSchedule) -> AppResult<()> {
        queries::upsert_class(&self.open()?.conn, class)
    }

    fn set_subject_fee(&self, subject: &str, fee: i64) -> AppResult<usize> {
        queries::set_subject_fee(&self.open()?.conn, subject, fee)
    }

    fn person(&self, kind: PersonType, id: &str) -> AppResult<Option<Person>> {
        queries::load_person(&self.open()?.conn, kind, id)
    }

    fn persons(&self, kind: PersonType) -> AppResult<Vec<Person>> {
        queries::load_persons(&self.open()?.conn, kind)
    }

    fn save_person(&self, person: &Person) -> AppResult<()> {
        queries::upsert_person(&self.open()?.conn, person)
    }

    fn enrollment(&self, id: i64) -> AppResult<Option<Enrollment>> {
        queries::load_enrollment(&self.open()?.conn, id)
    }

    fn enrollments(&self, filter: &EnrollmentFilter) -> AppResult<Vec<Enrollment>> {
        queries::load_enrollments(&self.open()?.conn, filter)
    }

    fn insert_enrollment(&self, enrollment: &Enrollment) -> AppResult<i64> {
        queries::insert_enrollment(&self.open()?.conn, enrollment)
    }

    fn update_enrollment(
        &self,
        id: i64,
        status: EnrollmentStatus,
        end_date: Option<NaiveDate>,
    ) -> AppResult<()> {
        queries::update_enrollment(&self.open()?.conn, id, status, end_date)
    }

    fn upsert_attendance(
        &self,
        key: &AttendanceKey,
        present: bool,
        recorded_at: &str,
    ) -> AppResult<AttendanceRecord> {
        queries::upsert_attendance(&self.open()?.conn, key, present, recorded_at)
    }

    fn attendance_for_class_date(
        &self,
        class_id: &str,
        date: NaiveDate,
    ) -> AppResult<Vec<AttendanceRecord>> {
        queries::load_attendance_for_class_date(&self.open()?.conn, class_id, date)
    }

    fn attendance_in_range(
        &self,
        range: &DateRange,
        filter: &AttendanceFilter,
    ) -> AppResult<Vec<AttendanceRecord>> {
        queries::load_attendance_in_range(&self.open()?.conn, range, filter)
    }

    fn insert_expense(&self, reason: &str, amount: i64, month: u32, year: i32) -> AppResult<i64> {
        queries::insert_expense(&self.open()?.conn, reason, amount, month, year)
    }

    fn expenses(&self, year: Option<i32>) -> AppResult<Vec<Expense>> {
        queries::load_expenses(&self.open()?.conn, year)
    }

    fn log(&self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        audit_log(&self.open()?.conn, operation, target, message)
    }
}
