//! Generic pointer-drag lifecycle with captured per-drag context.
//!
//! A [`DragController`] turns low-level pointer events into a drag
//! lifecycle. The context supplied at pointer-down is snapshotted unchanged
//! for the drag's lifetime, so move/end handlers always compute against a
//! fixed baseline rather than a moving current value.
//!
//! Guarantees:
//! - exactly one active drag at a time;
//! - move/up/cancel never yield anything outside an active drag;
//! - the snapshot is the same value on every callback of one drag.

use cropkit_edit_model::Point;

/// Total displacement (in display units) below which a pointer-up counts
/// as a click rather than a drag.
pub const CLICK_THRESHOLD: f64 = 3.0;

#[derive(Debug)]
struct ActiveDrag<C> {
    context: C,
    origin: Point,
    last: Point,
}

/// One pointer-move step of an active drag.
#[derive(Debug)]
pub struct DragMove<'a, C> {
    /// Current absolute pointer position.
    pub position: Point,

    /// Incremental delta from the previous move event (not the origin).
    pub delta: Point,

    /// Cumulative displacement from the drag origin.
    pub offset: Point,

    /// The context captured at drag start.
    pub context: &'a C,
}

/// The end of a drag, via pointer-up or cancellation.
#[derive(Debug)]
pub struct DragEnd<C> {
    /// Last known pointer position.
    pub position: Point,

    /// The context captured at drag start, returned to the caller.
    pub context: C,

    /// True when total displacement since origin stayed below
    /// [`CLICK_THRESHOLD`].
    pub clicked: bool,

    /// True when the drag ended by losing pointer capture rather than a
    /// pointer-up.
    pub cancelled: bool,
}

/// Drag state machine parameterized over a caller-supplied context type.
#[derive(Debug, Default)]
pub struct DragController<C> {
    active: Option<ActiveDrag<C>>,
}

impl<C> DragController<C> {
    pub fn new() -> Self {
        Self { active: None }
    }

    /// Whether a drag is currently active.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The origin coordinate of the active drag, if any.
    pub fn origin(&self) -> Option<Point> {
        self.active.as_ref().map(|drag| drag.origin)
    }

    /// The captured context of the active drag, if any.
    pub fn context(&self) -> Option<&C> {
        self.active.as_ref().map(|drag| &drag.context)
    }

    /// Start a drag at `position`, snapshotting `context`.
    ///
    /// Returns false (and leaves the existing drag untouched) if a drag is
    /// already active.
    pub fn pointer_down(&mut self, position: Point, context: C) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(ActiveDrag {
            context,
            origin: position,
            last: position,
        });
        true
    }

    /// Advance the active drag to `position`.
    pub fn pointer_move(&mut self, position: Point) -> Option<DragMove<'_, C>> {
        let drag = self.active.as_mut()?;
        let delta = position - drag.last;
        drag.last = position;
        Some(DragMove {
            position,
            delta,
            offset: position - drag.origin,
            context: &drag.context,
        })
    }

    /// End the active drag at `position`, returning the snapshot.
    pub fn pointer_up(&mut self, position: Point) -> Option<DragEnd<C>> {
        let drag = self.active.take()?;
        Some(DragEnd {
            position,
            clicked: position.distance_to(&drag.origin) < CLICK_THRESHOLD,
            cancelled: false,
            context: drag.context,
        })
    }

    /// Terminate the drag after lost pointer capture.
    ///
    /// Yields the snapshot like a pointer-up so callers can restore state
    /// (e.g. resume playback); never reports a click.
    pub fn cancel(&mut self) -> Option<DragEnd<C>> {
        let drag = self.active.take()?;
        Some(DragEnd {
            position: drag.last,
            clicked: false,
            cancelled: true,
            context: drag.context,
        })
    }
}
