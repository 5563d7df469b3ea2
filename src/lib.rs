//! Blockchain data collection service.
//!
//! This library provides functionality for periodically polling blockchain
//! networks and persisting what they return into a document store. It
//! includes:
//!
//! - Configuration management through JSON files
//! - Per-chain API clients with retry and capability extensions
//! - Idempotent, height-keyed record storage with catch-up on missed blocks
//! - Bounded-parallelism scheduling with cooperative shutdown
//!
//! # Module Structure
//!
//! - `bootstrap`: Bootstraps the application
//! - `models`: Data structures for configuration and collected records
//! - `services`: Core business logic and chain interaction
//! - `utils`: Common utilities and helper functions

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
