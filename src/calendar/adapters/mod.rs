//! Adapter implementations for calendar ports.

pub mod memory;
