//! Domain models shared by the core components, the store and the CLI.

pub mod attendance;
pub mod class;
pub mod date_range;
pub mod enrollment;
pub mod expense;
pub mod fee;
pub mod finance;
pub mod period;
pub mod person;
pub mod session;

pub use attendance::{AttendanceKey, AttendanceRecord};
pub use class::{ClassSchedule, WeeklySlot};
pub use date_range::DateRange;
pub use enrollment::{Enrollment, EnrollmentStatus};
pub use expense::{Expense, ExpenseCategory};
pub use fee::FeeSchedule;
pub use finance::{MonthlyFinance, checked_sum};
pub use period::TimePeriod;
pub use person::{Person, PersonRef, PersonType};
pub use session::Session;
