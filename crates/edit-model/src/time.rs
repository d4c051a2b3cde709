//! Trim interval in seconds.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Smallest trim duration the range engine will produce, in seconds.
pub const MIN_DURATION: f64 = 1.0;

/// A trim interval `(start, end)` in seconds relative to source duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive start, seconds.
    pub start: f64,
    /// Exclusive end, seconds.
    pub end: f64,
}

impl TimeRange {
    /// Create a range with the given bounds, stored verbatim.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// The full-duration range for a source of the given length.
    pub fn full(duration: f64) -> Self {
        Self::new(0.0, duration)
    }

    /// Length of the interval in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether this range spans the entire source.
    pub fn covers(&self, duration: f64) -> bool {
        self.start == 0.0 && self.end == duration
    }

    /// Clamp a playback time into this range.
    pub fn clamp(&self, time: f64) -> f64 {
        time.clamp(self.start, self.end)
    }
}

/// Error parsing a [`TimeRange`] from its `START:END` notation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseTimeRangeError {
    #[error("expected START:END in seconds, e.g. 2.5:8")]
    InvalidFormat,

    #[error("invalid number in time range: {0}")]
    InvalidNumber(String),

    #[error("time range end must be after start")]
    Inverted,
}

impl FromStr for TimeRange {
    type Err = ParseTimeRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once(':')
            .ok_or(ParseTimeRangeError::InvalidFormat)?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| ParseTimeRangeError::InvalidNumber(v.to_string()))
        };
        let range = TimeRange::new(parse(start)?, parse(end)?);
        if range.end <= range.start {
            return Err(ParseTimeRangeError::Inverted);
        }
        Ok(range)
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Format seconds as `M:SS.d` (or `H:MM:SS.d` past an hour) for display.
pub fn human_time(secs: f64) -> String {
    let secs = secs.max(0.0);
    let hours = (secs / 3600.0) as u64;
    let minutes = ((secs / 60.0) as u64) % 60;
    let rest = secs % 60.0;
    if hours > 0 {
        format!("{}:{:02}:{:04.1}", hours, minutes, rest)
    } else {
        format!("{}:{:04.1}", minutes, rest)
    }
}
