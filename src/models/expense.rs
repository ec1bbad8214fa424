use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expense {
    pub id: i64,
    pub reason: String,
    pub amount: i64,
    pub month: u32,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    TeacherSalary,
    Other,
}

impl ExpenseCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::TeacherSalary => "teacher salary",
            ExpenseCategory::Other => "other",
        }
    }
}
