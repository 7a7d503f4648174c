//! In-memory configuration adapter.

mod config;

pub use config::InMemorySystemConfigRepository;
