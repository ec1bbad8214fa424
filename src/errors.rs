//! Unified application error type.
//! Every layer (db, core, cli, export) returns AppError so that callers see
//! one consistent error surface. Store failures are wrapped, never retried.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / store
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Schedule encoding error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Validation (rejected before any store access)
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time period: {0} (expected morning, afternoon or evening)")]
    InvalidTimePeriod(String),

    #[error("Invalid day of week: {0}")]
    InvalidWeekday(String),

    #[error("Invalid weekly slot: {0} (expected <day>:<period>, e.g. mon:morning)")]
    InvalidSlot(String),

    #[error("Unknown subject: {0}")]
    InvalidSubject(String),

    #[error("Invalid enrollment status: {0}")]
    InvalidStatus(String),

    #[error("Invalid person type: {0}")]
    InvalidPersonType(String),

    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Validation error: {0}")]
    Validation(String),

    // ---------------------------
    // Not found
    // ---------------------------
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("Teacher not found: {0}")]
    TeacherNotFound(String),

    #[error("Enrollment not found: {0}")]
    EnrollmentNotFound(i64),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),
}

impl AppError {
    /// True for malformed input rejected before touching the store.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::InvalidDate(_)
                | AppError::InvalidTimePeriod(_)
                | AppError::InvalidWeekday(_)
                | AppError::InvalidSlot(_)
                | AppError::InvalidSubject(_)
                | AppError::InvalidStatus(_)
                | AppError::InvalidPersonType(_)
                | AppError::InvalidMonth(_)
                | AppError::InvalidRange(_)
                | AppError::InvalidAmount(_)
                | AppError::InvalidTransition { .. }
                | AppError::Validation(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::ClassNotFound(_)
                | AppError::StudentNotFound(_)
                | AppError::TeacherNotFound(_)
                | AppError::EnrollmentNotFound(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
