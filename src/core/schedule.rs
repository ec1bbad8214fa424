//! Expansion of a weekly pattern into dated sessions.

use crate::models::{ClassSchedule, DateRange, Session, TimePeriod};
use crate::utils::date::day_of_week;
use chrono::NaiveDate;
use log::debug;

pub struct ScheduleResolver;

impl ScheduleResolver {
    /// Every session of `class` inside `range` (inclusive), ordered by date
    /// then chronologically by period. Pure: the same input always yields
    /// the same sequence, so callers may cache it by `(class_id, range)`.
    pub fn resolve_sessions(class: &ClassSchedule, range: &DateRange) -> Vec<Session> {
        if class.slots.is_empty() {
            return Vec::new();
        }

        let sessions: Vec<Session> = range
            .days()
            .flat_map(|date| Self::sessions_on(class, date))
            .collect();

        debug!(
            "resolved {} sessions for {} in {}",
            sessions.len(),
            class.id,
            range
        );

        sessions
    }

    /// Sessions of `class` on a single date.
    pub fn sessions_on(class: &ClassSchedule, date: NaiveDate) -> Vec<Session> {
        // BTreeSet order within one weekday is already chronological.
        class
            .periods_on(day_of_week(date))
            .map(|period| Session {
                class_id: class.id.clone(),
                date,
                period,
            })
            .collect()
    }

    /// True if `(date, period)` matches one of the class's weekly slots.
    pub fn is_scheduled(class: &ClassSchedule, date: NaiveDate, period: TimePeriod) -> bool {
        class.has_slot(day_of_week(date), period)
    }
}
