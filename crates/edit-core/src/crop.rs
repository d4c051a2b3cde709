//! Crop geometry: pure math updating a crop rectangle from handle drags.
//!
//! All geometry is computed in source-video pixel space. Pointer input
//! arrives in display coordinates and is mapped through a [`ViewScale`].
//! The engine returns candidate areas; it never mutates shared state.

use cropkit_edit_model::{Area, Point, VideoMeta, MIN_CROP_SIZE};

use crate::drag::DragController;

/// Horizontal/vertical edge influence of a directional resize handle.
///
/// `-1` moves the left/top edge, `+1` the right/bottom edge, `0` leaves the
/// axis alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeDir {
    pub dir_x: i8,
    pub dir_y: i8,
}

impl ResizeDir {
    pub const N: ResizeDir = ResizeDir { dir_x: 0, dir_y: -1 };
    pub const NE: ResizeDir = ResizeDir { dir_x: 1, dir_y: -1 };
    pub const E: ResizeDir = ResizeDir { dir_x: 1, dir_y: 0 };
    pub const SE: ResizeDir = ResizeDir { dir_x: 1, dir_y: 1 };
    pub const S: ResizeDir = ResizeDir { dir_x: 0, dir_y: 1 };
    pub const SW: ResizeDir = ResizeDir { dir_x: -1, dir_y: 1 };
    pub const W: ResizeDir = ResizeDir { dir_x: -1, dir_y: 0 };
    pub const NW: ResizeDir = ResizeDir { dir_x: -1, dir_y: -1 };

    /// All eight directional handles, clockwise from north.
    pub const ALL: [ResizeDir; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];
}

/// A draggable crop control: the whole rectangle, or one of 8 directional
/// resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropHandle {
    Move,
    Resize(ResizeDir),
}

/// Named aspect-ratio presets for the crop selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatioPreset {
    #[default]
    Free,
    Square,
    Widescreen,
    Standard,
}

impl RatioPreset {
    /// The locked width/height ratio, or `None` in free mode.
    pub fn ratio(&self) -> Option<f64> {
        match self {
            RatioPreset::Free => None,
            RatioPreset::Square => Some(1.0),
            RatioPreset::Widescreen => Some(16.0 / 9.0),
            RatioPreset::Standard => Some(4.0 / 3.0),
        }
    }
}

/// Maps display (pointer) coordinates onto native video pixels.
#[derive(Debug, Clone, Copy)]
pub struct ViewScale {
    pub display_width: f64,
    pub display_height: f64,
    pub video_width: f64,
    pub video_height: f64,
}

impl ViewScale {
    pub fn new(display_width: f64, display_height: f64, meta: &VideoMeta) -> Self {
        Self {
            display_width,
            display_height,
            video_width: meta.width as f64,
            video_height: meta.height as f64,
        }
    }

    /// Absolute display position -> video pixels, clamped into the frame.
    pub fn to_video_point(&self, display: Point) -> Point {
        let x = display.x / (self.display_width / self.video_width);
        let y = display.y / (self.display_height / self.video_height);
        Point::new(
            x.clamp(0.0, self.video_width),
            y.clamp(0.0, self.video_height),
        )
    }

    /// Display displacement -> video pixels, unclamped.
    pub fn to_video_delta(&self, display: Point) -> Point {
        Point::new(
            display.x / (self.display_width / self.video_width),
            display.y / (self.display_height / self.video_height),
        )
    }
}

/// Compute the candidate area for one crop drag step.
///
/// `start` is the drag-start snapshot. `pointer` is the absolute pointer
/// position and `offset` the cumulative displacement since drag start, both
/// already mapped into video pixels. The result is clamped into the frame
/// on every branch; the caller commits it to the store.
pub fn apply_crop_drag(
    start: Area,
    handle: CropHandle,
    pointer: Point,
    offset: Point,
    meta: &VideoMeta,
    ratio: Option<f64>,
) -> Area {
    let video_w = meta.width as f64;
    let video_h = meta.height as f64;

    match handle {
        CropHandle::Move => Area {
            x: (start.x + offset.x).clamp(0.0, (video_w - start.width).max(0.0)),
            y: (start.y + offset.y).clamp(0.0, (video_h - start.height).max(0.0)),
            ..start
        },
        CropHandle::Resize(dir) => {
            let end_x = start.right();
            let end_y = start.bottom();
            let mut area = start;

            match dir.dir_y {
                -1 => {
                    area.y = pointer.y.min((end_y - MIN_CROP_SIZE).max(0.0));
                    area.height = end_y - area.y;
                }
                1 => {
                    area.height = (pointer.y - area.y).max(MIN_CROP_SIZE);
                }
                _ => {}
            }

            match dir.dir_x {
                -1 => {
                    area.x = pointer.x.min((end_x - MIN_CROP_SIZE).max(0.0));
                    area.width = end_x - area.x;
                }
                1 => {
                    area.width = (pointer.x - area.x).max(MIN_CROP_SIZE);
                }
                _ => {}
            }

            match ratio {
                Some(r) => constrain_ratio(area, r, dir, end_x, end_y, video_w, video_h),
                None => area.clamp_to(video_w, video_h),
            }
        }
    }
}

/// Overwrite the secondary dimension to honor a locked ratio, then fit the
/// result into the frame without breaking the ratio.
///
/// The anchor edge chosen by the drag stays fixed: a `-1` drag keeps the far
/// edge in place, so overwriting a dimension re-derives the near origin.
fn constrain_ratio(
    mut area: Area,
    ratio: f64,
    dir: ResizeDir,
    end_x: f64,
    end_y: f64,
    video_w: f64,
    video_h: f64,
) -> Area {
    if ratio > 1.0 {
        area.height = area.width / ratio;
    } else {
        area.width = area.height * ratio;
    }

    // Locked ratio raises the effective minimum of the larger dimension so
    // the smaller one still meets MIN_CROP_SIZE.
    let min_w = MIN_CROP_SIZE.max(MIN_CROP_SIZE * ratio);
    if area.width < min_w {
        area.width = min_w;
        area.height = min_w / ratio;
    }

    // Shrink both dimensions together if the anchored rectangle would leave
    // the frame.
    let avail_w = if dir.dir_x == -1 { end_x } else { video_w - area.x };
    let avail_h = if dir.dir_y == -1 { end_y } else { video_h - area.y };
    let fit = (avail_w / area.width).min(avail_h / area.height).min(1.0);
    if fit < 1.0 {
        area.width *= fit;
        area.height *= fit;
    }

    if dir.dir_x == -1 {
        area.x = end_x - area.width;
    }
    if dir.dir_y == -1 {
        area.y = end_y - area.height;
    }

    // Positional clamp only; a dimensional clamp here could break the ratio.
    area.x = area.x.clamp(0.0, (video_w - area.width).max(0.0));
    area.y = area.y.clamp(0.0, (video_h - area.height).max(0.0));
    area
}

/// Context captured at crop-drag start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropContext {
    pub handle: CropHandle,
    pub area: Area,
}

/// Drives [`apply_crop_drag`] from display-space pointer events.
#[derive(Debug)]
pub struct CropSession {
    drag: DragController<CropContext>,
    view: ViewScale,
    ratio: Option<f64>,
}

impl CropSession {
    pub fn new(view: ViewScale) -> Self {
        Self {
            drag: DragController::new(),
            view,
            ratio: None,
        }
    }

    /// Update the display mapping (e.g. after a window resize). Takes
    /// effect on the next drag.
    pub fn set_view(&mut self, view: ViewScale) {
        self.view = view;
    }

    /// Lock or free the aspect ratio for subsequent drags.
    pub fn set_ratio(&mut self, ratio: Option<f64>) {
        self.ratio = ratio;
    }

    pub fn ratio(&self) -> Option<f64> {
        self.ratio
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Begin a drag on `handle` with the current committed `area` as the
    /// snapshot baseline. Returns false if a drag is already active.
    pub fn pointer_down(&mut self, position: Point, handle: CropHandle, area: Area) -> bool {
        self.drag
            .pointer_down(position, CropContext { handle, area })
    }

    /// Advance the drag; yields the candidate area for the caller to
    /// commit.
    pub fn pointer_move(&mut self, position: Point, meta: &VideoMeta) -> Option<Area> {
        let ratio = self.ratio;
        let view = self.view;
        let mv = self.drag.pointer_move(position)?;
        Some(apply_crop_drag(
            mv.context.area,
            mv.context.handle,
            view.to_video_point(mv.position),
            view.to_video_delta(mv.offset),
            meta,
            ratio,
        ))
    }

    /// End the drag. Returns the snapshot context, if a drag was active.
    pub fn pointer_up(&mut self, position: Point) -> Option<CropContext> {
        self.drag.pointer_up(position).map(|end| end.context)
    }

    /// Terminate the drag after lost pointer capture.
    pub fn cancel(&mut self) -> Option<CropContext> {
        self.drag.cancel().map(|end| end.context)
    }
}
