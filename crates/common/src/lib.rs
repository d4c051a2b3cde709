//! Cropkit Common Utilities
//!
//! Shared infrastructure for all Cropkit crates:
//! - Error types and result aliases
//! - Frame throttling and cancellation for preview loops
//! - Tracing/logging initialization
//! - Configuration loading

pub mod config;
pub mod error;
pub mod logging;
pub mod throttle;

pub use config::*;
pub use error::*;
pub use throttle::*;
