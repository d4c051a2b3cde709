//! Crop rectangle in source-video pixel space.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::video::VideoMeta;

/// Smallest crop dimension the geometry engine will produce, in pixels.
pub const MIN_CROP_SIZE: f64 = 100.0;

/// A crop rectangle `(x, y, width, height)` in source-video pixels.
///
/// Coordinates are always in *original* video pixel space regardless of the
/// output scale; the command compiler alone maps them to output pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Area {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Area {
    /// Create an area with the given geometry, stored verbatim.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The full-frame area for the given source.
    pub fn full(meta: &VideoMeta) -> Self {
        Self::new(0.0, 0.0, meta.width as f64, meta.height as f64)
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// The center point of this area.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether this area covers the source frame exactly.
    pub fn covers(&self, meta: &VideoMeta) -> bool {
        self.x == 0.0
            && self.y == 0.0
            && self.width == meta.width as f64
            && self.height == meta.height as f64
    }

    /// Width/height ratio.
    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Clamp this area into `[0, video_width] x [0, video_height]`,
    /// keeping dimensions at least `MIN_CROP_SIZE` (capped at the frame).
    pub fn clamp_to(&self, video_width: f64, video_height: f64) -> Area {
        let min_w = MIN_CROP_SIZE.min(video_width);
        let min_h = MIN_CROP_SIZE.min(video_height);
        let width = self.width.clamp(min_w, video_width);
        let height = self.height.clamp(min_h, video_height);
        Area {
            x: self.x.clamp(0.0, video_width - width),
            y: self.y.clamp(0.0, video_height - height),
            width,
            height,
        }
    }
}

/// Error parsing an [`Area`] from its `WxH+X+Y` notation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseAreaError {
    #[error("expected WxH+X+Y, e.g. 640x480+100+50")]
    InvalidFormat,

    #[error("invalid number in area: {0}")]
    InvalidNumber(String),
}

impl FromStr for Area {
    type Err = ParseAreaError;

    /// Parse X11-style geometry notation: `WxH+X+Y` (offsets optional,
    /// defaulting to `+0+0`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (size, offset) = match s.find('+') {
            Some(idx) => (&s[..idx], Some(&s[idx + 1..])),
            None => (s, None),
        };

        let (w, h) = size.split_once('x').ok_or(ParseAreaError::InvalidFormat)?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| ParseAreaError::InvalidNumber(v.to_string()))
        };

        let (x, y) = match offset {
            Some(rest) => {
                let (ox, oy) = rest.split_once('+').ok_or(ParseAreaError::InvalidFormat)?;
                (parse(ox)?, parse(oy)?)
            }
            None => (0.0, 0.0),
        };

        Ok(Area::new(x, y, parse(w)?, parse(h)?))
    }
}

impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width, self.height, self.x, self.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_covers() {
        let meta = VideoMeta::new(1920, 1080, 10.0);
        assert!(Area::full(&meta).covers(&meta));
        assert!(!Area::new(0.0, 0.0, 1920.0, 1079.0).covers(&meta));
        assert!(!Area::new(1.0, 0.0, 1919.0, 1080.0).covers(&meta));
    }

    #[test]
    fn test_edges() {
        let area = Area::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(area.right(), 110.0);
        assert_eq!(area.bottom(), 70.0);
        assert_eq!(area.center(), (60.0, 45.0));
    }

    #[test]
    fn test_clamp_pulls_inside_bounds() {
        let area = Area::new(-50.0, 1000.0, 300.0, 300.0).clamp_to(1920.0, 1080.0);
        assert_eq!(area.x, 0.0);
        assert_eq!(area.bottom(), 1080.0);
        assert_eq!(area.width, 300.0);
    }

    #[test]
    fn test_clamp_enforces_min_size() {
        let area = Area::new(0.0, 0.0, 10.0, 10.0).clamp_to(1920.0, 1080.0);
        assert_eq!(area.width, MIN_CROP_SIZE);
        assert_eq!(area.height, MIN_CROP_SIZE);
    }

    #[test]
    fn test_clamp_caps_at_frame() {
        let area = Area::new(0.0, 0.0, 5000.0, 5000.0).clamp_to(1920.0, 1080.0);
        assert_eq!(area.width, 1920.0);
        assert_eq!(area.height, 1080.0);
    }

    #[test]
    fn test_parse_geometry() {
        let area: Area = "640x480+100+50".parse().unwrap();
        assert_eq!(area, Area::new(100.0, 50.0, 640.0, 480.0));

        let area: Area = "640x480".parse().unwrap();
        assert_eq!(area, Area::new(0.0, 0.0, 640.0, 480.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("640".parse::<Area>(), Err(ParseAreaError::InvalidFormat));
        assert_eq!(
            "640x480+10".parse::<Area>(),
            Err(ParseAreaError::InvalidFormat)
        );
        assert!(matches!(
            "axb+1+2".parse::<Area>(),
            Err(ParseAreaError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        let area = Area::new(100.0, 50.0, 640.0, 480.0);
        let parsed: Area = area.to_string().parse().unwrap();
        assert_eq!(parsed, area);
    }

    proptest::proptest! {
        #[test]
        fn prop_clamp_always_inside_frame(
            x in -5000.0f64..5000.0,
            y in -5000.0f64..5000.0,
            w in 0.0f64..5000.0,
            h in 0.0f64..5000.0,
        ) {
            let area = Area::new(x, y, w, h).clamp_to(1920.0, 1080.0);
            proptest::prop_assert!(area.x >= 0.0);
            proptest::prop_assert!(area.y >= 0.0);
            proptest::prop_assert!(area.right() <= 1920.0);
            proptest::prop_assert!(area.bottom() <= 1080.0);
            proptest::prop_assert!(area.width >= MIN_CROP_SIZE);
            proptest::prop_assert!(area.height >= MIN_CROP_SIZE);
        }
    }
}
