//! Adapter implementations for leave ports.

pub mod memory;
