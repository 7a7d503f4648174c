//! Adapter implementations for handover ports.

pub mod memory;
