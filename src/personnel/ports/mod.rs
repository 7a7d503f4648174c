//! Port abstractions for the member directory.

mod directory;

pub use directory::{MemberDirectory, PersonnelRepositoryError, PersonnelRepositoryResult};
