//! Working-day and capacity arithmetic.
//!
//! A working day is a calendar day that is not a weekend, not a configured
//! holiday, and not inside one of the user's leave ranges. The pure
//! counting rules live in [`domain`]; [`services::WorkingDayCalculator`]
//! fetches holidays and leave through ports and applies them. Leave
//! conflict detection and personnel load projection both build on it.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
