//! In-memory template adapter.

mod template;

pub use template::InMemoryPeriodicTaskRepository;
