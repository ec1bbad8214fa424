//! Monthly tuition liability per student and class.

use crate::core::audit::DataQualityWarning;
use crate::core::enrollment::EnrollmentRegistry;
use crate::errors::{AppError, AppResult};
use crate::models::{ClassSchedule, FeeSchedule, PersonRef};
use crate::utils::date::month_bounds;
use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Largest monthly fee accepted at input, in VND.
pub const MAX_MONTHLY_FEE: i64 = 1_000_000_000_000;

/// How a month that is only partly covered by enrollment is billed.
/// Fully covered months always bill the whole fee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ProrationPolicy {
    /// Any coverage bills the whole fee.
    #[default]
    Full,
    /// `round(fee * covered_days / days_in_month)`.
    Linear,
    /// Whole fee iff coverage includes `cutoff_day` (clamped to the month), else 0.
    Cutoff { cutoff_day: u32 },
}

impl ProrationPolicy {
    pub fn describe(&self) -> String {
        match self {
            ProrationPolicy::Full => "full".to_string(),
            ProrationPolicy::Linear => "linear".to_string(),
            ProrationPolicy::Cutoff { cutoff_day } => format!("cutoff (day {cutoff_day})"),
        }
    }

    fn apply(
        &self,
        fee: i64,
        coverage: &[(NaiveDate, NaiveDate)],
        month_start: NaiveDate,
        days_in_month: i64,
    ) -> AppResult<i64> {
        let covered = covered_days(coverage);
        if covered == 0 {
            return Ok(0);
        }
        if covered == days_in_month {
            return Ok(fee);
        }

        let amount = match self {
            ProrationPolicy::Full => fee,
            ProrationPolicy::Linear => {
                let days = i128::from(days_in_month);
                let prorated = (i128::from(fee) * i128::from(covered) + days / 2) / days;
                i64::try_from(prorated).map_err(|_| AppError::InvalidAmount(prorated.to_string()))?
            }
            ProrationPolicy::Cutoff { cutoff_day } => {
                let day = (*cutoff_day).clamp(1, days_in_month as u32);
                let cutoff = month_start.with_day(day).unwrap_or(month_start);
                if coverage.iter().any(|(s, e)| *s <= cutoff && cutoff <= *e) {
                    fee
                } else {
                    0
                }
            }
        };
        Ok(amount)
    }
}

fn covered_days(coverage: &[(NaiveDate, NaiveDate)]) -> i64 {
    coverage.iter().map(|(s, e)| (*e - *s).num_days() + 1).sum()
}

/// Outcome of one fee computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeQuote {
    pub amount: i64,
    pub subject: String,
    pub fee: Option<i64>,
    pub covered_days: i64,
    pub days_in_month: i64,
    pub warning: Option<DataQualityWarning>,
}

/// Fee table derived from the fee stored on each class, one fee per
/// subject. When classes of one subject disagree the highest fee wins and a
/// `ConflictingFee` warning is returned.
pub fn derive_fee_schedule<'a, I>(classes: I) -> (FeeSchedule, Vec<DataQualityWarning>)
where
    I: IntoIterator<Item = &'a ClassSchedule>,
{
    let mut by_subject: BTreeMap<String, BTreeSet<i64>> = BTreeMap::new();
    for class in classes {
        if let Some(fee) = class.monthly_fee {
            by_subject.entry(class.subject.clone()).or_default().insert(fee);
        }
    }

    let mut warnings = Vec::new();
    let schedule = by_subject
        .into_iter()
        .filter_map(|(subject, fees)| {
            let max = fees.iter().next_back().copied()?;
            if fees.len() > 1 {
                warnings.push(DataQualityWarning::ConflictingFee {
                    subject: subject.clone(),
                    fees: fees.into_iter().collect(),
                });
            }
            Some((subject, max))
        })
        .collect();

    (schedule, warnings)
}

/// Computes `computeMonthlyFee` against an injected fee table, class
/// catalog, enrollment view and pro-ration policy. Holds only borrows, so
/// one engine can be shared by the twelve months of a report.
pub struct FeeEngine<'a> {
    fees: &'a FeeSchedule,
    classes: &'a BTreeMap<String, ClassSchedule>,
    registry: &'a EnrollmentRegistry,
    policy: ProrationPolicy,
}

impl<'a> FeeEngine<'a> {
    pub fn new(
        fees: &'a FeeSchedule,
        classes: &'a BTreeMap<String, ClassSchedule>,
        registry: &'a EnrollmentRegistry,
        policy: ProrationPolicy,
    ) -> Self {
        Self {
            fees,
            classes,
            registry,
            policy,
        }
    }

    pub fn registry(&self) -> &EnrollmentRegistry {
        self.registry
    }

    pub fn has_class(&self, class_id: &str) -> bool {
        self.classes.contains_key(class_id)
    }

    pub fn compute_monthly_fee(
        &self,
        person: &PersonRef,
        class_id: &str,
        month: u32,
        year: i32,
    ) -> AppResult<FeeQuote> {
        let (month_start, month_end) = month_bounds(year, month)?;
        let days_in_month = (month_end - month_start).num_days() + 1;

        let class = self
            .classes
            .get(class_id)
            .ok_or_else(|| AppError::ClassNotFound(class_id.to_string()))?;

        let fee = self.fees.get(&class.subject);
        let coverage = self
            .registry
            .coverage(person, class_id, month_start, month_end);
        let covered = covered_days(&coverage);

        let mut quote = FeeQuote {
            amount: 0,
            subject: class.subject.clone(),
            fee,
            covered_days: covered,
            days_in_month,
            warning: None,
        };

        match fee {
            None => {
                quote.warning = Some(DataQualityWarning::MissingFee {
                    subject: class.subject.clone(),
                });
            }
            Some(f) if f <= 0 => {
                quote.warning = Some(DataQualityWarning::NonPositiveFee {
                    subject: class.subject.clone(),
                    fee: f,
                });
            }
            Some(f) => {
                quote.amount = self.policy.apply(f, &coverage, month_start, days_in_month)?;
            }
        }

        debug!(
            "fee {} {} {}-{:02}: {} ({} of {} days)",
            person, class_id, year, month, quote.amount, covered, days_in_month
        );

        Ok(quote)
    }
}
