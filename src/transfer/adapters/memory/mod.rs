//! In-memory handover adapter.

mod transfer;

pub use transfer::InMemoryTransferRepository;
