//! Domain model for leave records.

mod leave;

pub use leave::{Leave, LeaveConflict, LeaveId, LeaveStatus, ParseLeaveStatusError};
