//! Taskflow: task lifecycle and workload scheduling engine.
//!
//! This crate implements the business core of a task-management backend.
//! Tasks move through a review, pool, claim, progress and evaluation
//! workflow; ownership can be handed between executors; leave requests are
//! checked against active deadlines; a personnel projector turns open work
//! into a daily load figure; and recurring templates materialize tasks on a
//! cron schedule.
//!
//! # Architecture
//!
//! Taskflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, timers, etc.)
//!
//! # Modules
//!
//! - [`access`]: Caller identity and per-operation authorization policy
//! - [`calendar`]: Holidays and working-day capacity arithmetic
//! - [`leave`]: Leave records with deadline conflict detection
//! - [`task`]: Task aggregate, status graph and lifecycle services
//! - [`transfer`]: Ownership handover workflow between executors
//! - [`personnel`]: Member directory and daily load projection
//! - [`settings`]: System configuration values consumed by the engine
//! - [`periodic`]: Recurring task templates and the cron job scheduler
//! - [`error`]: Caller-visible error categories

pub mod access;
pub mod calendar;
pub mod error;
pub mod leave;
pub mod periodic;
pub mod personnel;
pub mod settings;
pub mod task;
pub mod transfer;

#[cfg(test)]
pub(crate) mod test_support;
