//! Orchestration services for personnel views.

mod personnel;

pub use personnel::{PersonnelService, PersonnelServiceError, PersonnelServiceResult};
