use serde::Serialize;
use std::collections::BTreeMap;

/// Subject → monthly fee (VND). One active fee per subject.
///
/// Passed into the fee engine by value at call time; never a process-wide global.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeeSchedule {
    fees: BTreeMap<String, i64>,
}

impl FeeSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, subject: impl Into<String>, fee: i64) {
        self.fees.insert(subject.into(), fee);
    }

    pub fn with(mut self, subject: impl Into<String>, fee: i64) -> Self {
        self.set(subject, fee);
        self
    }

    pub fn get(&self, subject: &str) -> Option<i64> {
        self.fees.get(subject).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &i64)> {
        self.fees.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.fees.is_empty()
    }
}

impl FromIterator<(String, i64)> for FeeSchedule {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self {
            fees: iter.into_iter().collect(),
        }
    }
}
