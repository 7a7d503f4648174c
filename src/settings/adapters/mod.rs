//! Adapter implementations for configuration ports.

pub mod memory;
