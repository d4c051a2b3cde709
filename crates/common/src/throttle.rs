//! Frame throttling and cancellation for preview loops.
//!
//! The preview redraw loop must repaint at a bounded rate and stop cleanly
//! when its owning view is torn down. `FrameThrottle` is the pure rate gate;
//! `CancelToken` is the owned teardown signal shared between the loop and
//! its owner.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Minimum-interval gate for a redraw loop.
///
/// `should_tick` returns true at most once per interval. The first call
/// always fires so a freshly created loop paints immediately.
#[derive(Debug)]
pub struct FrameThrottle {
    min_interval: Duration,
    last_tick: Option<Instant>,
}

impl FrameThrottle {
    /// Create a throttle with an explicit minimum interval.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_tick: None,
        }
    }

    /// Create a throttle targeting the given frame rate.
    pub fn from_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs(1) / fps.max(1))
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    pub fn should_tick(&mut self, now: Instant) -> bool {
        match self.last_tick {
            None => {
                self.last_tick = Some(now);
                true
            }
            Some(last) if now.duration_since(last) >= self.min_interval => {
                self.last_tick = Some(now);
                true
            }
            _ => false,
        }
    }

    /// The configured minimum interval.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Sticky cancellation token.
///
/// Cloning shares the underlying flag; once cancelled, every clone observes
/// it. There is no way to un-cancel.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation to every holder of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
