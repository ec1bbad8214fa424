use crate::core::audit::DataQualityWarning;
use crate::core::enrollment::EnrollmentRegistry;
use crate::core::fees::derive_fee_schedule;
use crate::db::store::Store;
use crate::errors::AppResult;
use crate::models::{ClassSchedule, FeeSchedule};
use std::collections::BTreeMap;

/// Read-only view of the catalog used by fee quotes, reports and audits.
///
/// The two reads are independent; there is no cross-read transaction.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub classes: BTreeMap<String, ClassSchedule>,
    pub fees: FeeSchedule,
    pub fee_warnings: Vec<DataQualityWarning>,
    pub registry: EnrollmentRegistry,
}

impl Snapshot {
    pub fn load<S: Store + ?Sized>(store: &S) -> AppResult<Self> {
        let (classes, registry) = rayon::join(|| store.classes(), || EnrollmentRegistry::load(store));
        Ok(Self::new(classes?, registry?))
    }

    pub fn new(classes: Vec<ClassSchedule>, registry: EnrollmentRegistry) -> Self {
        let (fees, fee_warnings) = derive_fee_schedule(&classes);
        let classes = classes.into_iter().map(|c| (c.id.clone(), c)).collect();

        Self {
            classes,
            fees,
            fee_warnings,
            registry,
        }
    }
}
