use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonType {
    Student,
    Teacher,
}

impl PersonType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PersonType::Student => "student",
            PersonType::Teacher => "teacher",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "student" => Some(PersonType::Student),
            "teacher" => Some(PersonType::Teacher),
            _ => None,
        }
    }

    pub fn parse(input: &str) -> AppResult<Self> {
        PersonType::from_db_str(&input.trim().to_lowercase())
            .ok_or_else(|| AppError::InvalidPersonType(input.to_string()))
    }

    /// Name of the store collection holding this kind of person.
    pub fn table(&self) -> &'static str {
        match self {
            PersonType::Student => "students",
            PersonType::Teacher => "teachers",
        }
    }

    pub fn not_found(&self, id: &str) -> AppError {
        match self {
            PersonType::Student => AppError::StudentNotFound(id.to_string()),
            PersonType::Teacher => AppError::TeacherNotFound(id.to_string()),
        }
    }
}

impl fmt::Display for PersonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

/// Identity of a person across both collections.
/// Student and teacher ids live in separate namespaces.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PersonRef {
    pub kind: PersonType,
    pub id: String,
}

impl PersonRef {
    pub fn new(kind: PersonType, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn student(id: impl Into<String>) -> Self {
        Self::new(PersonType::Student, id)
    }

    pub fn teacher(id: impl Into<String>) -> Self {
        Self::new(PersonType::Teacher, id)
    }
}

impl fmt::Display for PersonRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub id: String,        // ⇔ students.id / teachers.id
    pub full_name: String, // ⇔ full_name
    pub phone: Option<String>,
    pub kind: PersonType, // which table the row came from
}

impl Person {
    pub fn person_ref(&self) -> PersonRef {
        PersonRef::new(self.kind, self.id.clone())
    }
}
