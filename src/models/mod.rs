//! Domain models and data structures for blockchain data collection.
//!
//! This module contains all the core data structures used throughout the application:
//!
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (ChainDescriptor, EndpointKind, CollectedRecord)

mod config;
mod core;

// Re-export core types
pub use core::{ChainDescriptor, CollectedRecord, EndpointKind};

// Re-export config types
pub use config::{AppConfig, ConfigError, ConfigLoader};
