//! SQL for every collection. Functions take a plain `&Connection` and map
//! rows into domain models; callers decide how connections are opened.

use crate::db::store::{AttendanceFilter, EnrollmentFilter};
use crate::errors::{AppError, AppResult};
use crate::models::{
    AttendanceKey, AttendanceRecord, ClassSchedule, DateRange, Enrollment, EnrollmentStatus,
    Expense, Person, PersonType, TimePeriod, WeeklySlot,
};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params, params_from_iter};
use std::collections::BTreeSet;

const DATE_FMT: &str = "%Y-%m-%d";

fn date_str(d: NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(err))
}

fn get_date(row: &Row, col: &str) -> Result<NaiveDate> {
    let raw: String = row.get(col)?;
    NaiveDate::parse_from_str(&raw, DATE_FMT)
        .map_err(|_| conversion_error(0, AppError::InvalidDate(raw.clone())))
}

fn get_opt_date(row: &Row, col: &str) -> Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(col)?;
    match raw {
        Some(s) if !s.trim().is_empty() => NaiveDate::parse_from_str(&s, DATE_FMT)
            .map(Some)
            .map_err(|_| conversion_error(0, AppError::InvalidDate(s.clone()))),
        _ => Ok(None),
    }
}

fn get_person_type(row: &Row, col: &str) -> Result<PersonType> {
    let raw: String = row.get(col)?;
    PersonType::from_db_str(&raw).ok_or_else(|| conversion_error(0, AppError::InvalidPersonType(raw)))
}

// ---------------------------
// classes
// ---------------------------

fn map_class(row: &Row) -> Result<ClassSchedule> {
    let raw_slots: String = row.get("weekly_schedule")?;
    let decoded: Vec<WeeklySlot> =
        serde_json::from_str(&raw_slots).map_err(|e| conversion_error(0, AppError::Json(e)))?;
    let slots = decoded
        .into_iter()
        .map(|s| WeeklySlot::new(s.day_of_week, s.period))
        .collect::<AppResult<BTreeSet<_>>>()
        .map_err(|e| conversion_error(0, e))?;

    Ok(ClassSchedule {
        id: row.get("id")?,
        name: row.get("name")?,
        subject: row.get("subject")?,
        slots,
        monthly_fee: row.get("monthly_fee")?,
    })
}

pub fn upsert_class(conn: &Connection, class: &ClassSchedule) -> AppResult<()> {
    let slots = serde_json::to_string(&class.slots)?;

    conn.execute(
        "INSERT INTO classes (id, name, subject, weekly_schedule, monthly_fee)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            subject = excluded.subject,
            weekly_schedule = excluded.weekly_schedule,
            monthly_fee = excluded.monthly_fee",
        params![class.id, class.name, class.subject, slots, class.monthly_fee],
    )?;
    Ok(())
}

pub fn load_class(conn: &Connection, id: &str) -> AppResult<Option<ClassSchedule>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM classes WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_class).optional()?)
}

pub fn load_classes(conn: &Connection) -> AppResult<Vec<ClassSchedule>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM classes ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_class)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Set the fee on every class of `subject`. Returns the number of classes touched.
pub fn set_subject_fee(conn: &Connection, subject: &str, fee: i64) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE classes SET monthly_fee = ?1 WHERE subject = ?2",
        params![fee, subject],
    )?;
    Ok(n)
}

// ---------------------------
// students / teachers
// ---------------------------

fn map_person(kind: PersonType) -> impl Fn(&Row) -> Result<Person> {
    move |row: &Row| -> Result<Person> {
        Ok(Person {
            id: row.get("id")?,
            full_name: row.get("full_name")?,
            phone: row.get("phone")?,
            kind,
        })
    }
}

pub fn upsert_person(conn: &Connection, person: &Person) -> AppResult<()> {
    let sql = format!(
        "INSERT INTO {} (id, full_name, phone) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET full_name = excluded.full_name, phone = excluded.phone",
        person.kind.table()
    );
    conn.execute(&sql, params![person.id, person.full_name, person.phone])?;
    Ok(())
}

pub fn load_person(conn: &Connection, kind: PersonType, id: &str) -> AppResult<Option<Person>> {
    let sql = format!("SELECT * FROM {} WHERE id = ?1", kind.table());
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([id], map_person(kind)).optional()?)
}

pub fn load_persons(conn: &Connection, kind: PersonType) -> AppResult<Vec<Person>> {
    let sql = format!("SELECT * FROM {} ORDER BY id ASC", kind.table());
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([], map_person(kind))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// enrollments
// ---------------------------

fn map_enrollment(row: &Row) -> Result<Enrollment> {
    let raw_status: String = row.get("status")?;
    let status = EnrollmentStatus::from_db_str(&raw_status)
        .ok_or_else(|| conversion_error(0, AppError::InvalidStatus(raw_status.clone())))?;

    Ok(Enrollment {
        id: row.get("id")?,
        person_id: row.get("person_id")?,
        person_type: get_person_type(row, "person_type")?,
        class_id: row.get("class_id")?,
        status,
        start_date: get_date(row, "start_date")?,
        end_date: get_opt_date(row, "end_date")?,
    })
}

/// Insert a new enrollment row; `enrollment.id` is ignored. Returns the new id.
pub fn insert_enrollment(conn: &Connection, e: &Enrollment) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO enrollments (person_id, person_type, class_id, status, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            e.person_id,
            e.person_type.to_db_str(),
            e.class_id,
            e.status.to_db_str(),
            date_str(e.start_date),
            e.end_date.map(date_str),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_enrollment(conn: &Connection, id: i64) -> AppResult<Option<Enrollment>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM enrollments WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_enrollment).optional()?)
}

pub fn load_enrollments(conn: &Connection, filter: &EnrollmentFilter) -> AppResult<Vec<Enrollment>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut args: Vec<String> = Vec::new();

    if let Some(p) = &filter.person {
        clauses.push("person_type = ? AND person_id = ?");
        args.push(p.kind.to_db_str().to_string());
        args.push(p.id.clone());
    }
    if let Some(c) = &filter.class_id {
        clauses.push("class_id = ?");
        args.push(c.clone());
    }

    let mut sql = String::from("SELECT * FROM enrollments");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args.iter()), map_enrollment)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn update_enrollment(
    conn: &Connection,
    id: i64,
    status: EnrollmentStatus,
    end_date: Option<NaiveDate>,
) -> AppResult<()> {
    conn.execute(
        "UPDATE enrollments SET status = ?1, end_date = ?2 WHERE id = ?3",
        params![status.to_db_str(), end_date.map(date_str), id],
    )?;
    Ok(())
}

// ---------------------------
// attendance
// ---------------------------

fn map_attendance(row: &Row) -> Result<AttendanceRecord> {
    let raw_period: String = row.get("period")?;
    let period = TimePeriod::from_db_str(&raw_period)
        .ok_or_else(|| conversion_error(0, AppError::InvalidTimePeriod(raw_period.clone())))?;

    Ok(AttendanceRecord {
        key: AttendanceKey {
            class_id: row.get("class_id")?,
            date: get_date(row, "date")?,
            period,
            person_id: row.get("person_id")?,
            person_type: get_person_type(row, "person_type")?,
        },
        present: row.get::<_, i64>("present")? != 0,
        recorded_at: row.get("recorded_at")?,
    })
}

/// Insert or overwrite the record at `key`. Last write wins.
pub fn upsert_attendance(
    conn: &Connection,
    key: &AttendanceKey,
    present: bool,
    recorded_at: &str,
) -> AppResult<AttendanceRecord> {
    conn.execute(
        "INSERT INTO attendance (class_id, date, period, person_id, person_type, present, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(class_id, date, period, person_id, person_type) DO UPDATE SET
            present = excluded.present,
            recorded_at = excluded.recorded_at",
        params![
            key.class_id,
            date_str(key.date),
            key.period.to_db_str(),
            key.person_id,
            key.person_type.to_db_str(),
            present as i64,
            recorded_at,
        ],
    )?;

    let mut stmt = conn.prepare_cached(
        "SELECT * FROM attendance
         WHERE class_id = ?1 AND date = ?2 AND period = ?3 AND person_id = ?4 AND person_type = ?5",
    )?;

    let record = stmt.query_row(
        params![
            key.class_id,
            date_str(key.date),
            key.period.to_db_str(),
            key.person_id,
            key.person_type.to_db_str(),
        ],
        map_attendance,
    )?;
    Ok(record)
}

pub fn load_attendance_for_class_date(
    conn: &Connection,
    class_id: &str,
    date: NaiveDate,
) -> AppResult<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM attendance WHERE class_id = ?1 AND date = ?2 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![class_id, date_str(date)], map_attendance)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Records with `range.start <= date <= range.end`, ordered by
/// date, class, chronological period, person.
pub fn load_attendance_in_range(
    conn: &Connection,
    range: &DateRange,
    filter: &AttendanceFilter,
) -> AppResult<Vec<AttendanceRecord>> {
    let mut sql = String::from("SELECT * FROM attendance WHERE date BETWEEN ? AND ?");
    let mut args: Vec<String> = vec![date_str(range.start), date_str(range.end)];

    if let Some(c) = &filter.class_id {
        sql.push_str(" AND class_id = ?");
        args.push(c.clone());
    }
    if let Some(p) = &filter.person {
        sql.push_str(" AND person_type = ? AND person_id = ?");
        args.push(p.kind.to_db_str().to_string());
        args.push(p.id.clone());
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args.iter()), map_attendance)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }

    // Period labels do not sort chronologically in SQL.
    out.sort_by(|a, b| {
        (a.key.date, &a.key.class_id, a.key.period, a.key.person_type, &a.key.person_id).cmp(&(
            b.key.date,
            &b.key.class_id,
            b.key.period,
            b.key.person_type,
            &b.key.person_id,
        ))
    });

    Ok(out)
}

// ---------------------------
// expenses
// ---------------------------

fn map_expense(row: &Row) -> Result<Expense> {
    Ok(Expense {
        id: row.get("id")?,
        reason: row.get("reason")?,
        amount: row.get("amount")?,
        month: row.get("month")?,
        year: row.get("year")?,
    })
}

pub fn insert_expense(
    conn: &Connection,
    reason: &str,
    amount: i64,
    month: u32,
    year: i32,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO expenses (reason, amount, month, year) VALUES (?1, ?2, ?3, ?4)",
        params![reason, amount, month, year],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_expenses(conn: &Connection, year: Option<i32>) -> AppResult<Vec<Expense>> {
    let mut out = Vec::new();

    match year {
        Some(y) => {
            let mut stmt = conn.prepare_cached(
                "SELECT * FROM expenses WHERE year = ?1 ORDER BY month ASC, id ASC",
            )?;
            let rows = stmt.query_map([y], map_expense)?;
            for r in rows {
                out.push(r?);
            }
        }
        None => {
            let mut stmt = conn
                .prepare_cached("SELECT * FROM expenses ORDER BY year ASC, month ASC, id ASC")?;
            let rows = stmt.query_map([], map_expense)?;
            for r in rows {
                out.push(r?);
            }
        }
    }

    Ok(out)
}

// ---------------------------
// misc
// ---------------------------

pub fn count_rows(conn: &Connection, table: &str) -> AppResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}
