pub mod attendance;
pub mod audit;
pub mod enrollment;
pub mod fees;
pub mod finance;
pub mod log;
pub mod page;
pub mod schedule;
pub mod snapshot;

pub use attendance::AttendanceLedger;
pub use audit::DataQualityWarning;
pub use enrollment::EnrollmentRegistry;
pub use fees::{FeeEngine, FeeQuote, ProrationPolicy};
pub use finance::{ExpenseClassifier, FinancialAggregator, MonthlySeries};
pub use page::ClassDayPage;
pub use schedule::ScheduleResolver;
pub use snapshot::Snapshot;
