//! Utility modules for common functionality.
//!
//! This module provides various utility functions and types that are used across
//! the application. Currently includes:
//!
//! - logging: Logging utilities
//! - parsing: Parsing utilities
//! - tests: Test utilities
//! - http: HTTP client utilities (i.e. creation retryable HTTP clients)

pub mod http;
pub mod logging;
pub mod parsing;
pub mod tests;

pub use http::*;
pub use parsing::*;
