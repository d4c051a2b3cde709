//! Cropkit Edit Core
//!
//! The interactive edit-state engine:
//! - **Drag:** generic pointer-drag lifecycle with captured per-drag context
//! - **Crop:** pure geometry updating a crop rectangle from handle drags
//! - **Trim:** pure math updating a time interval, plus playback side effects
//! - **Store:** the authoritative Transform record with an observer API
//! - **Ticker:** the cancellable preview tick loop
//!
//! Engines return candidate values; the caller commits them to the store.
//! All mutation happens on a single UI thread in response to discrete input
//! events.

pub mod crop;
pub mod drag;
pub mod playback;
pub mod store;
pub mod ticker;
pub mod trim;

pub use crop::*;
pub use drag::*;
pub use playback::*;
pub use store::*;
pub use ticker::*;
pub use trim::*;
