//! Source video metadata.

use serde::{Deserialize, Serialize};

/// Natural pixel dimensions and duration of the loaded source video.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoMeta {
    /// Natural width in pixels.
    pub width: u32,

    /// Natural height in pixels.
    pub height: u32,

    /// Duration in seconds.
    pub duration: f64,
}

impl VideoMeta {
    pub fn new(width: u32, height: u32, duration: f64) -> Self {
        Self {
            width,
            height,
            duration,
        }
    }

    /// Width/height ratio of the source frame.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height.max(1) as f64
    }
}

impl std::fmt::Display for VideoMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} ({:.3}s)", self.width, self.height, self.duration)
    }
}
