use crate::errors::{AppError, AppResult};
use serde::Serialize;

/// One month of the financial series. `profit` is always derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyFinance {
    pub month: u32,
    pub revenue: i64,
    pub expenses: i64,
    pub salary_expenses: i64,
    pub other_expenses: i64,
    pub profit: i64,
}

impl MonthlyFinance {
    pub fn new(
        month: u32,
        revenue: i64,
        salary_expenses: i64,
        other_expenses: i64,
    ) -> AppResult<Self> {
        let expenses = checked_sum(salary_expenses, other_expenses)?;
        let profit = revenue
            .checked_sub(expenses)
            .ok_or_else(|| AppError::InvalidAmount(format!("{revenue} - {expenses}")))?;
        Ok(Self {
            month,
            revenue,
            expenses,
            salary_expenses,
            other_expenses,
            profit,
        })
    }

    pub fn empty(month: u32) -> Self {
        Self {
            month,
            revenue: 0,
            expenses: 0,
            salary_expenses: 0,
            other_expenses: 0,
            profit: 0,
        }
    }
}

/// Money addition that reports overflow instead of wrapping.
pub fn checked_sum(a: i64, b: i64) -> AppResult<i64> {
    a.checked_add(b)
        .ok_or_else(|| AppError::InvalidAmount(format!("{a} + {b}")))
}
