//! The preview redraw tick loop.
//!
//! Hosts draw the current frame (with the live transform applied) on a
//! timer rather than on every input event. `PreviewTicker` runs that timer
//! on a background thread, throttled to a minimum interval, until its
//! cancellation token fires. The callback should read the latest state
//! through a live shared reference so edits are visible on the very next
//! tick.
//!
//! Hosts with a native frame callback can skip the thread and drive a
//! [`FrameThrottle`] directly.

use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use cropkit_common::{CancelToken, FrameThrottle};

/// A running preview tick loop.
#[derive(Debug)]
pub struct PreviewTicker {
    token: CancelToken,
    handle: Option<JoinHandle<()>>,
}

impl PreviewTicker {
    /// Spawn a loop invoking `on_frame` at most once per `interval`.
    pub fn spawn<F>(interval: Duration, mut on_frame: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let token = CancelToken::new();
        let loop_token = token.clone();
        let poll = (interval / 4).max(Duration::from_millis(1));

        let handle = std::thread::spawn(move || {
            let mut throttle = FrameThrottle::new(interval);
            while !loop_token.is_cancelled() {
                if throttle.should_tick(Instant::now()) {
                    on_frame();
                }
                std::thread::sleep(poll);
            }
        });

        Self {
            token,
            handle: Some(handle),
        }
    }

    /// A clone of the loop's cancellation token, for owners that tear down
    /// from elsewhere.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Stop the loop and wait for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }
}

impl Drop for PreviewTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
