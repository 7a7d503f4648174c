//! Orchestration services for leave.

mod leave;

pub use leave::{LeaveService, LeaveServiceError, LeaveServiceResult};
