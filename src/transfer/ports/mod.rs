//! Port abstractions for handover storage.

mod repository;

pub use repository::{TransferRepository, TransferRepositoryError, TransferRepositoryResult};
