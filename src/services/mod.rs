//! Core services implementing the business logic.
//!
//! This module contains the main service implementations:
//! - `client`: Per-chain API clients with retry and capability extensions
//! - `collector`: One complete collection pass for one chain
//! - `scheduler`: Bounded-parallelism cycle loop across all chains
//! - `storage`: Record persistence and progress tracking

pub mod client;
pub mod collector;
pub mod scheduler;
pub mod storage;
