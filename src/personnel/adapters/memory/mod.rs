//! In-memory member directory.

mod directory;

pub use directory::InMemoryMemberDirectory;
