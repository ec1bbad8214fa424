pub mod attend;
pub mod attendance;
pub mod audit;
pub mod class;
pub mod config;
pub mod db;
pub mod enroll;
pub mod expense;
pub mod fee;
pub mod init;
pub mod log;
pub mod person;
pub mod report;
pub mod roll;

use crate::core::DataQualityWarning;
use crate::models::{PersonRef, PersonType};
use crate::ui::messages::audit;

pub(crate) fn person_ref(id: &str, teacher: bool) -> PersonRef {
    let kind = if teacher {
        PersonType::Teacher
    } else {
        PersonType::Student
    };
    PersonRef::new(kind, id.trim())
}

pub(crate) fn print_warnings(warnings: &[DataQualityWarning]) {
    for w in warnings {
        audit(w.code(), w);
    }
}
