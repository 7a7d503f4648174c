//! Orchestration services for task handovers.

mod transfer;

pub use transfer::{
    SecondaryEffect, TransferResolution, TransferService, TransferServiceError,
    TransferServiceResult,
};
