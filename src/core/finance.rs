//! Monthly revenue / expense / profit series.

use crate::core::audit::DataQualityWarning;
use crate::core::fees::FeeEngine;
use crate::errors::{AppError, AppResult};
use crate::models::{Expense, ExpenseCategory, MonthlyFinance, PersonType, checked_sum};
use crate::utils::date::month_bounds;
use log::info;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

/// Splits expenses into teacher salary and everything else.
///
/// A salary expense carries the marker (case-insensitive) followed, anywhere
/// later in the reason, by a month code: `T<m>/<yyyy>`, `T<m>-<yyyy>` or
/// `<m>/<yyyy>`.
#[derive(Debug, Clone)]
pub struct ExpenseClassifier {
    pattern: Regex,
}

impl ExpenseClassifier {
    pub fn new(marker: &str) -> AppResult<Self> {
        let pattern = Regex::new(&format!(
            r"(?i){}.*?T?(\d{{1,2}})\s*[/\-]\s*(\d{{4}})\b",
            regex::escape(marker.trim())
        ))
        .map_err(|e| AppError::Config(format!("salary marker: {e}")))?;

        Ok(Self { pattern })
    }

    /// `(month, year)` named by a salary reason, if the reason is one.
    pub fn salary_period(&self, reason: &str) -> Option<(u32, i32)> {
        let caps = self.pattern.captures(reason)?;
        let month: u32 = caps.get(1)?.as_str().parse().ok()?;
        let year: i32 = caps.get(2)?.as_str().parse().ok()?;
        (1..=12).contains(&month).then_some((month, year))
    }

    pub fn classify(&self, expense: &Expense) -> ExpenseCategory {
        if self.salary_period(&expense.reason).is_some() {
            ExpenseCategory::TeacherSalary
        } else {
            ExpenseCategory::Other
        }
    }
}

/// Twelve months plus the findings raised while billing them.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlySeries {
    pub year: i32,
    pub months: Vec<MonthlyFinance>,
    pub warnings: Vec<DataQualityWarning>,
}

impl MonthlySeries {
    pub fn totals(&self) -> AppResult<MonthlyFinance> {
        self.months
            .iter()
            .try_fold(MonthlyFinance::empty(0), |acc, m| {
                MonthlyFinance::new(
                    0,
                    checked_sum(acc.revenue, m.revenue)?,
                    checked_sum(acc.salary_expenses, m.salary_expenses)?,
                    checked_sum(acc.other_expenses, m.other_expenses)?,
                )
            })
    }
}

pub struct FinancialAggregator<'a> {
    engine: &'a FeeEngine<'a>,
    expenses: &'a [Expense],
    classifier: &'a ExpenseClassifier,
}

impl<'a> FinancialAggregator<'a> {
    pub fn new(
        engine: &'a FeeEngine<'a>,
        expenses: &'a [Expense],
        classifier: &'a ExpenseClassifier,
    ) -> Self {
        Self {
            engine,
            expenses,
            classifier,
        }
    }

    /// One entry per calendar month, January first. Months without data
    /// are present with zeros.
    pub fn build_monthly_series(&self, year: i32) -> AppResult<MonthlySeries> {
        let per_month: Vec<(MonthlyFinance, Vec<DataQualityWarning>)> = (1..=12u32)
            .into_par_iter()
            .map(|month| self.month(year, month))
            .collect::<AppResult<Vec<_>>>()?;

        let mut warnings = BTreeSet::new();
        let mut months = Vec::with_capacity(12);
        for (m, w) in per_month {
            months.push(m);
            warnings.extend(w);
        }

        info!("built monthly series for {}", year);

        Ok(MonthlySeries {
            year,
            months,
            warnings: warnings.into_iter().collect(),
        })
    }

    fn month(&self, year: i32, month: u32) -> AppResult<(MonthlyFinance, Vec<DataQualityWarning>)> {
        let (from, to) = month_bounds(year, month)?;

        let mut revenue = 0;
        let mut warnings = Vec::new();
        // teachers are enrolled to teach, they are never billed
        for (person, class_id) in self
            .engine
            .registry()
            .billable_pairs(from, to)
            .into_iter()
            .filter(|(p, _)| p.kind == PersonType::Student)
        {
            // the class may have been created after the catalog was read
            if !self.engine.has_class(&class_id) {
                warnings.push(DataQualityWarning::UnknownClass { person, class_id });
                continue;
            }
            let quote = self
                .engine
                .compute_monthly_fee(&person, &class_id, month, year)?;
            revenue = checked_sum(revenue, quote.amount)?;
            warnings.extend(quote.warning);
        }

        let (salary, other) = self
            .expenses
            .iter()
            .filter(|e| e.year == year && e.month == month)
            .try_fold((0, 0), |(salary, other), e| -> AppResult<(i64, i64)> {
                Ok(match self.classifier.classify(e) {
                    ExpenseCategory::TeacherSalary => (checked_sum(salary, e.amount)?, other),
                    ExpenseCategory::Other => (salary, checked_sum(other, e.amount)?),
                })
            })?;

        Ok((MonthlyFinance::new(month, revenue, salary, other)?, warnings))
    }
}
