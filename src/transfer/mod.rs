//! Task handover between executors.
//!
//! An assignee parks an in-progress task in `pending_transfer` and names a
//! recipient. The recipient accepts or rejects; the initiator may cancel.
//! Acceptance moves the task and then, as a separate best-effort step, its
//! subtasks held by the previous assignee.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
