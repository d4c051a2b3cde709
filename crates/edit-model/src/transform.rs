//! The aggregate edit state.

use serde::{Deserialize, Serialize};

use crate::area::Area;
use crate::time::TimeRange;
use crate::video::VideoMeta;

/// The complete edit state for one loaded video.
///
/// `None` for `area`/`time` means "full frame"/"full duration", a distinct
/// state from an explicit full-covering value, used to suppress unnecessary
/// filters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Crop rectangle, in original-video pixel space.
    pub area: Option<Area>,

    /// Trim interval, in seconds.
    pub time: Option<TimeRange>,

    /// Mirror horizontally.
    pub flip_h: bool,

    /// Mirror vertically.
    pub flip_v: bool,

    /// Drop the audio stream.
    pub mute: bool,

    /// Output scale factor applied to both dimensions (1.0 = native).
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            area: None,
            time: None,
            flip_h: false,
            flip_v: false,
            mute: false,
            scale: 1.0,
        }
    }
}

impl Transform {
    /// Whether rendering this transform would reproduce the source
    /// unchanged (no filters, no trim, audio kept).
    pub fn is_identity(&self, meta: &VideoMeta) -> bool {
        !self.flip_h
            && !self.flip_v
            && !self.mute
            && self.scale == 1.0
            && self.area.map_or(true, |a| a.covers(meta))
            && self.time.map_or(true, |t| t.covers(meta.duration))
    }
}
