//! Recurring task templates and their live trigger registry.
//!
//! A [`domain::PeriodicTask`] carries a cron expression and task defaults.
//! The [`ports::JobScheduler`] owns one trigger per active template; on
//! each firing the [`ports::TemplateMaterializer`] turns the template into
//! a pooled task, or retires it once its window has closed.
//! [`services::PeriodicTaskService`] keeps the registry in step with the
//! stored activation flag.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
