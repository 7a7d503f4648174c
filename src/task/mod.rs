//! Task lifecycle engine.
//!
//! Tasks move through review, the pool, work, optional handover and
//! evaluation along the graph documented on
//! [`domain::TaskStatus`]. Subtasks are carved from an in-progress task's
//! approved budget and enter the pool directly. The module follows the
//! hexagonal layout used throughout the crate:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
