//! Adapter implementations for personnel ports.

pub mod memory;
