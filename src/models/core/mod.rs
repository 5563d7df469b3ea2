//! Core domain models for the collection daemon.
//!
//! This module contains the fundamental data structures that represent:
//! - Chains: Chain descriptors and the endpoint capability set
//! - Records: Collected payloads keyed for idempotent storage

mod chain;
mod record;

pub use chain::{ChainDescriptor, EndpointKind};
pub use record::CollectedRecord;
