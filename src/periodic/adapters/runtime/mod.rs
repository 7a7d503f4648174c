//! Trigger registry backed by the tokio runtime.

mod scheduler;

pub use scheduler::TokioJobScheduler;
