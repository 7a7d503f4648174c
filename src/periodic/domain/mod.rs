//! Domain model for recurring templates.

mod error;
mod schedule;
mod template;

pub use error::PeriodicDomainError;
pub use schedule::CronSchedule;
pub use template::{PeriodicTask, PeriodicTaskId, TemplateDraft, WindowPosition};
