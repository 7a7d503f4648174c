//! Domain model for personnel load.

mod error;
mod load;
mod member;
mod report;

pub use error::PersonnelDomainError;
pub use load::{LoadThresholds, StatusLight, daily_share};
pub use member::Member;
pub use report::{ActiveTask, DashboardSummary, LoadReport, PerformanceMetrics};
