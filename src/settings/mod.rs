//! Stored system configuration.
//!
//! The only key the engine interprets is `global_daily_work_hours`, the
//! default per-member daily capacity used by load projection. Other keys
//! are stored verbatim for collaborators.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
