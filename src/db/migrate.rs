use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use log::info;
use rusqlite::{Connection, OptionalExtension};

/// Ensure that the `log` table exists. Migrations are recorded there.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250106_0001_create_catalog",
        description: "Created classes, students and teachers tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS classes (
            id              TEXT PRIMARY KEY,
            name            TEXT NOT NULL,
            subject         TEXT NOT NULL,
            weekly_schedule TEXT NOT NULL DEFAULT '[]',
            monthly_fee     INTEGER
        );

        CREATE TABLE IF NOT EXISTS students (
            id        TEXT PRIMARY KEY,
            full_name TEXT NOT NULL,
            phone     TEXT
        );

        CREATE TABLE IF NOT EXISTS teachers (
            id        TEXT PRIMARY KEY,
            full_name TEXT NOT NULL,
            phone     TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_classes_subject ON classes(subject);
        "#,
    },
    Migration {
        version: "20250106_0002_create_enrollments",
        description: "Created enrollments table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS enrollments (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            person_id   TEXT NOT NULL,
            person_type TEXT NOT NULL CHECK(person_type IN ('student','teacher')),
            class_id    TEXT NOT NULL,
            status      TEXT NOT NULL CHECK(status IN ('trial','active','inactive')),
            start_date  TEXT NOT NULL,
            end_date    TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_enrollments_pair
            ON enrollments(person_type, person_id, class_id);
        CREATE INDEX IF NOT EXISTS idx_enrollments_class ON enrollments(class_id);
        "#,
    },
    Migration {
        version: "20250106_0003_create_attendance",
        description: "Created attendance table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            class_id    TEXT NOT NULL,
            date        TEXT NOT NULL,
            period      TEXT NOT NULL CHECK(period IN ('morning','afternoon','evening')),
            person_id   TEXT NOT NULL,
            person_type TEXT NOT NULL CHECK(person_type IN ('student','teacher')),
            present     INTEGER NOT NULL DEFAULT 1,
            recorded_at TEXT NOT NULL,
            UNIQUE(class_id, date, period, person_id, person_type)
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date);
        CREATE INDEX IF NOT EXISTS idx_attendance_class_date ON attendance(class_id, date);
        "#,
    },
    Migration {
        version: "20250106_0004_create_expenses",
        description: "Created expenses table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS expenses (
            id     INTEGER PRIMARY KEY AUTOINCREMENT,
            reason TEXT NOT NULL,
            amount INTEGER NOT NULL,
            month  INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
            year   INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expenses_year_month ON expenses(year, month);
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    if is_applied(conn, m.version)? {
        return Ok(());
    }

    conn.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    info!("migration applied: {}", m.version);
    success(format!("Migration applied: {} → {}", m.version, m.description));

    Ok(())
}

/// Public entry point: run all pending migrations, in order.
///
/// Safe to call on every start: applied versions are skipped.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        apply(conn, m)?;
    }

    Ok(())
}

/// Versions not yet recorded in the `log` table.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut pending = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            pending.push(m.version);
        }
    }
    Ok(pending)
}
