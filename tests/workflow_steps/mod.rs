//! Step definitions for task lifecycle and transfer scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
