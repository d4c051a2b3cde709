//! Cropkit Render Engine
//!
//! Turns accumulated edit state into work:
//! - **Compile:** the pure Transform -> filter chain/argument compiler
//! - **Probe:** source metadata discovery via ffprobe
//! - **Runner:** ffmpeg execution with progress, log, and cancellation

pub mod compile;
pub mod probe;
pub mod runner;

pub use compile::*;
pub use probe::*;
pub use runner::*;
