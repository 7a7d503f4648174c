//! Personal leave with deadline conflict detection.
//!
//! A leave is refused when some in-progress task assigned to the requester
//! would have no working day left outside the leave before its due date.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
