//! Domain model for task handovers.

mod error;
mod transfer;

pub use error::TransferDomainError;
pub use transfer::{TaskTransfer, TransferDecision, TransferId, TransferStatus};
