//! Team load projection and performance overview.
//!
//! Each tracked member's in-progress effort is spread over the working days
//! left before its deadline; the resulting daily hours are compared with
//! the member's capacity to pick a status light.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
