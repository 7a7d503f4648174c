//! Caller identity and authorization policy.
//!
//! The identity provider is an external collaborator: every operation
//! receives an authenticated [`Actor`] and trusts it as given. The rules
//! deciding whether that actor may perform an operation are kept together
//! in [`policy`] so they can be tested apart from the state machines they
//! guard.

mod identity;
pub mod policy;

pub use identity::{Actor, ParseRoleError, Role, UserId};
pub use policy::{AccessDenied, EvaluationScope, Operation, PolicyResult};

#[cfg(test)]
mod tests;
