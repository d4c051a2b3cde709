//! Trim range math and the stateful trim drag session.
//!
//! The pure half ([`apply_trim_drag`]) maps one drag step onto a candidate
//! [`TimeRange`] plus an optional playhead correction. [`TrimSession`] wires
//! that math to a [`DragController`] and a [`Playback`] surface, owning the
//! pause/resume and time-update bookkeeping around a drag.

use cropkit_edit_model::{Point, TimeRange, MIN_DURATION};

use crate::drag::DragController;
use crate::playback::Playback;

/// Seconds the playhead is nudged past a left cut, so the preview lands on
/// the first kept frame instead of the frame before it.
const LEFT_CUT_NUDGE: f64 = 0.01;

/// A draggable trim control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimHandle {
    /// The selected range body; drags translate the whole interval.
    Move,
    /// Left resize edge.
    Left,
    /// Right resize edge.
    Right,
    /// The playhead; drags scrub within the selected range.
    Seek,
}

/// Horizontal extent of the timeline track in display units.
#[derive(Debug, Clone, Copy)]
pub struct TrackGeometry {
    pub left: f64,
    pub width: f64,
}

impl TrackGeometry {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Map an absolute pointer x onto a time in `[0, duration]`.
    pub fn time_at(&self, pointer_x: f64, duration: f64) -> f64 {
        ((pointer_x - self.left) / self.width).clamp(0.0, 1.0) * duration
    }

    /// Map a pointer displacement onto a time delta (unclamped).
    pub fn time_delta(&self, delta_x: f64, duration: f64) -> f64 {
        delta_x / self.width * duration
    }
}

/// Result of one trim drag step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimUpdate {
    /// Candidate range for the caller to commit.
    pub time: TimeRange,

    /// Where the playhead should move, when the drag constrains it.
    pub playhead: Option<f64>,
}

/// Compute the candidate range for one trim drag step.
///
/// `start` is the drag-start snapshot; `pointer_time` the pointer position
/// mapped to `[0, duration]`; `delta_time` the cumulative time displacement
/// since drag start; `current_time` the live playback position.
pub fn apply_trim_drag(
    start: TimeRange,
    handle: TrimHandle,
    pointer_time: f64,
    delta_time: f64,
    current_time: f64,
    duration: f64,
) -> TrimUpdate {
    match handle {
        TrimHandle::Move => {
            // Rigid translation: the shift itself is clamped so neither
            // bound can leave [0, duration].
            let shift = delta_time.clamp(-start.start, duration - start.end);
            let time = TimeRange::new(start.start + shift, start.end + shift);
            TrimUpdate {
                time,
                playhead: Some(time.clamp(current_time)),
            }
        }
        TrimHandle::Left => {
            let new_start = pointer_time.min((start.end - MIN_DURATION).max(0.0));
            TrimUpdate {
                time: TimeRange::new(new_start, start.end),
                playhead: Some(new_start + LEFT_CUT_NUDGE),
            }
        }
        TrimHandle::Right => {
            let new_end = pointer_time.max((start.start + MIN_DURATION).min(duration));
            TrimUpdate {
                time: TimeRange::new(start.start, new_end),
                playhead: Some(new_end),
            }
        }
        TrimHandle::Seek => TrimUpdate {
            time: start,
            playhead: Some(start.clamp(pointer_time)),
        },
    }
}

/// Context captured at trim-drag start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimContext {
    pub handle: TrimHandle,

    /// Range snapshot; the baseline for every step of this drag.
    pub time: TimeRange,

    /// Playback position when the drag began; restored after edge drags.
    pub anchor_time: f64,

    /// Whether playback was running when the drag began.
    pub resume_on_end: bool,
}

/// Outcome of a finished trim drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimEnd {
    pub handle: TrimHandle,

    /// The press never exceeded the click threshold.
    pub clicked: bool,
}

/// Stateful trim interaction over a [`Playback`] surface.
///
/// Flag semantics:
/// - `ignore_time_updates` is set for the whole lifetime of a drag and
///   cleared on pointer-up/cancel; while set, the host must discard
///   playback time-update notifications (the drag owns the playhead).
/// - `resume_on_end` (in the captured context) records whether playback was
///   running at pointer-down; every drag pauses playback immediately, and
///   the end/cancel path resumes only when this flag is set.
#[derive(Debug)]
pub struct TrimSession {
    drag: DragController<TrimContext>,
    track: TrackGeometry,
    ignore_time_updates: bool,
}

impl TrimSession {
    pub fn new(track: TrackGeometry) -> Self {
        Self {
            drag: DragController::new(),
            track,
            ignore_time_updates: false,
        }
    }

    /// Update the track extent (e.g. after a window resize). Takes effect
    /// on the next drag.
    pub fn set_track(&mut self, track: TrackGeometry) {
        self.track = track;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// While true, playback time-update notifications must be discarded.
    pub fn ignores_time_updates(&self) -> bool {
        self.ignore_time_updates
    }

    /// Filter a playback time-update through the session's drag state.
    pub fn on_time_update(&self, time: f64) -> Option<f64> {
        if self.ignore_time_updates {
            None
        } else {
            Some(time)
        }
    }

    /// Begin a drag on `handle` with the committed `time` as the snapshot.
    /// Pauses playback, remembering whether it was running. Returns false
    /// if a drag is already active.
    pub fn pointer_down<P: Playback>(
        &mut self,
        position: Point,
        handle: TrimHandle,
        time: TimeRange,
        playback: &mut P,
    ) -> bool {
        let context = TrimContext {
            handle,
            time,
            anchor_time: playback.current_time(),
            resume_on_end: !playback.is_paused(),
        };
        if !self.drag.pointer_down(position, context) {
            return false;
        }
        playback.pause();
        self.ignore_time_updates = true;
        true
    }

    /// Advance the drag; seeks the playhead as the range constrains it and
    /// yields the candidate range for the caller to commit. `Seek` drags
    /// yield no range (playhead update only).
    pub fn pointer_move<P: Playback>(
        &mut self,
        position: Point,
        playback: &mut P,
    ) -> Option<TimeRange> {
        let track = self.track;
        let duration = playback.duration();
        let current = playback.current_time();

        let mv = self.drag.pointer_move(position)?;
        let update = apply_trim_drag(
            mv.context.time,
            mv.context.handle,
            track.time_at(mv.position.x, duration),
            track.time_delta(mv.offset.x, duration),
            current,
            duration,
        );
        let handle = mv.context.handle;

        if let Some(playhead) = update.playhead {
            playback.seek(playhead);
        }

        match handle {
            TrimHandle::Seek => None,
            _ => Some(update.time),
        }
    }

    /// End the drag: handle click-seek, restore the playhead after edge
    /// drags, and resume playback if it was running at pointer-down.
    pub fn pointer_up<P: Playback>(
        &mut self,
        position: Point,
        playback: &mut P,
    ) -> Option<TrimEnd> {
        let track = self.track;
        let duration = playback.duration();
        let end = self.drag.pointer_up(position)?;
        self.ignore_time_updates = false;

        match end.context.handle {
            TrimHandle::Move if end.clicked => {
                // A sub-threshold press on the range body seeks to the
                // pressed time, clamped into the selection.
                let time = end.context.time.clamp(track.time_at(position.x, duration));
                playback.seek(time);
            }
            TrimHandle::Left | TrimHandle::Right if !end.clicked => {
                playback.seek(end.context.anchor_time);
            }
            _ => {}
        }

        if end.context.resume_on_end {
            playback.play();
        }

        Some(TrimEnd {
            handle: end.context.handle,
            clicked: end.clicked,
        })
    }

    /// Terminate the drag after lost pointer capture, restoring playback
    /// state so the host is never left paused by a vanished pointer.
    pub fn cancel<P: Playback>(&mut self, playback: &mut P) -> Option<TrimEnd> {
        let end = self.drag.cancel()?;
        self.ignore_time_updates = false;
        if end.context.resume_on_end {
            playback.play();
        }
        Some(TrimEnd {
            handle: end.context.handle,
            clicked: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DURATION: f64 = 10.0;

    #[derive(Debug)]
    struct MockPlayback {
        duration: f64,
        time: f64,
        paused: bool,
        seeks: Vec<f64>,
    }

    impl MockPlayback {
        fn new(time: f64, paused: bool) -> Self {
            Self {
                duration: DURATION,
                time,
                paused,
                seeks: Vec::new(),
            }
        }
    }

    impl Playback for MockPlayback {
        fn duration(&self) -> f64 {
            self.duration
        }

        fn current_time(&self) -> f64 {
            self.time
        }

        fn seek(&mut self, secs: f64) {
            self.time = secs;
            self.seeks.push(secs);
        }

        fn play(&mut self) {
            self.paused = false;
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn is_paused(&self) -> bool {
            self.paused
        }
    }

    fn track() -> TrackGeometry {
        // 1 display unit == 0.01s on a 10s video.
        TrackGeometry::new(0.0, 1000.0)
    }

    #[test]
    fn test_track_maps_pointer_to_time() {
        let track = track();
        assert_eq!(track.time_at(500.0, DURATION), 5.0);
        assert_eq!(track.time_at(-50.0, DURATION), 0.0);
        assert_eq!(track.time_at(2000.0, DURATION), DURATION);
        assert_eq!(track.time_delta(100.0, DURATION), 1.0);
    }

    #[test]
    fn test_move_translates_rigidly() {
        let start = TimeRange::new(2.0, 5.0);
        let update = apply_trim_drag(start, TrimHandle::Move, 0.0, 1.5, 3.0, DURATION);
        assert_eq!(update.time, TimeRange::new(3.5, 6.5));
    }

    #[test]
    fn test_move_clamps_shift_symmetrically() {
        let start = TimeRange::new(2.0, 5.0);

        let update = apply_trim_drag(start, TrimHandle::Move, 0.0, -8.0, 3.0, DURATION);
        assert_eq!(update.time, TimeRange::new(0.0, 3.0));

        let update = apply_trim_drag(start, TrimHandle::Move, 0.0, 8.0, 3.0, DURATION);
        assert_eq!(update.time, TimeRange::new(7.0, 10.0));
    }

    #[test]
    fn test_move_clamps_playhead_into_range() {
        let start = TimeRange::new(2.0, 5.0);
        let update = apply_trim_drag(start, TrimHandle::Move, 0.0, 3.0, 2.5, DURATION);
        assert_eq!(update.time, TimeRange::new(5.0, 8.0));
        assert_eq!(update.playhead, Some(5.0));
    }

    #[test]
    fn test_left_resize_clamps_to_min_duration() {
        let start = TimeRange::new(2.0, 5.0);
        // Pointer past end - MIN_DURATION pins start exactly there.
        let update = apply_trim_drag(start, TrimHandle::Left, 9.0, 0.0, 2.0, DURATION);
        assert_eq!(update.time.start, start.end - MIN_DURATION);
        assert_eq!(update.time.end, start.end);
    }

    #[test]
    fn test_left_resize_never_negative() {
        let start = TimeRange::new(0.5, 1.2);
        // end - MIN_DURATION would be 0.2; a pointer at 0 stays at 0.
        let update = apply_trim_drag(start, TrimHandle::Left, 0.0, 0.0, 0.6, DURATION);
        assert_eq!(update.time.start, 0.0);
    }

    #[test]
    fn test_left_resize_nudges_playhead_past_cut() {
        let start = TimeRange::new(2.0, 8.0);
        let update = apply_trim_drag(start, TrimHandle::Left, 4.0, 0.0, 2.0, DURATION);
        assert_eq!(update.time, TimeRange::new(4.0, 8.0));
        assert!((update.playhead.unwrap() - 4.01).abs() < 1e-9);
    }

    #[test]
    fn test_right_resize_clamps_to_min_duration() {
        let start = TimeRange::new(4.0, 8.0);
        let update = apply_trim_drag(start, TrimHandle::Right, 1.0, 0.0, 5.0, DURATION);
        assert_eq!(update.time, TimeRange::new(4.0, 5.0));
        assert_eq!(update.playhead, Some(5.0));
    }

    #[test]
    fn test_right_resize_never_exceeds_duration() {
        let start = TimeRange::new(4.0, 8.0);
        let update = apply_trim_drag(start, TrimHandle::Right, 12.0, 0.0, 5.0, DURATION);
        assert_eq!(update.time.end, DURATION);
    }

    #[test]
    fn test_seek_leaves_range_untouched() {
        let start = TimeRange::new(2.0, 8.0);
        let update = apply_trim_drag(start, TrimHandle::Seek, 9.5, 0.0, 3.0, DURATION);
        assert_eq!(update.time, start);
        assert_eq!(update.playhead, Some(8.0));
    }

    #[test]
    fn test_session_pauses_then_resumes_playback() {
        let mut playback = MockPlayback::new(3.0, false);
        let mut session = TrimSession::new(track());
        let time = TimeRange::new(2.0, 8.0);

        assert!(session.pointer_down(Point::new(400.0, 0.0), TrimHandle::Move, time, &mut playback));
        assert!(playback.is_paused());
        assert!(session.ignores_time_updates());
        assert_eq!(session.on_time_update(4.2), None);

        session.pointer_move(Point::new(500.0, 0.0), &mut playback);
        let end = session.pointer_up(Point::new(500.0, 0.0), &mut playback).unwrap();
        assert!(!end.clicked);
        assert!(!playback.is_paused());
        assert!(!session.ignores_time_updates());
        assert_eq!(session.on_time_update(4.2), Some(4.2));
    }

    #[test]
    fn test_session_stays_paused_when_it_was_paused() {
        let mut playback = MockPlayback::new(3.0, true);
        let mut session = TrimSession::new(track());
        let time = TimeRange::new(2.0, 8.0);

        session.pointer_down(Point::new(400.0, 0.0), TrimHandle::Move, time, &mut playback);
        session.pointer_move(Point::new(500.0, 0.0), &mut playback);
        session.pointer_up(Point::new(500.0, 0.0), &mut playback);
        assert!(playback.is_paused());
    }

    #[test]
    fn test_session_move_drag_commits_shifted_range() {
        let mut playback = MockPlayback::new(3.0, true);
        let mut session = TrimSession::new(track());
        let time = TimeRange::new(2.0, 5.0);

        session.pointer_down(Point::new(400.0, 0.0), TrimHandle::Move, time, &mut playback);
        let committed = session
            .pointer_move(Point::new(500.0, 0.0), &mut playback)
            .unwrap();
        assert_eq!(committed, TimeRange::new(3.0, 6.0));
        // Playhead clamped into the shifted range.
        assert_eq!(playback.time, 3.0);
    }

    #[test]
    fn test_session_click_on_body_seeks_within_range() {
        let mut playback = MockPlayback::new(3.0, true);
        let mut session = TrimSession::new(track());
        let time = TimeRange::new(2.0, 8.0);

        session.pointer_down(Point::new(900.0, 0.0), TrimHandle::Move, time, &mut playback);
        let end = session.pointer_up(Point::new(901.0, 0.0), &mut playback).unwrap();
        assert!(end.clicked);
        // 901 display units -> 9.01s, clamped to the range end.
        assert_eq!(playback.time, 8.0);
    }

    #[test]
    fn test_session_edge_drag_restores_playhead() {
        let mut playback = MockPlayback::new(3.5, true);
        let mut session = TrimSession::new(track());
        let time = TimeRange::new(2.0, 8.0);

        session.pointer_down(Point::new(200.0, 0.0), TrimHandle::Left, time, &mut playback);
        session.pointer_move(Point::new(400.0, 0.0), &mut playback);
        assert!((playback.time - 4.01).abs() < 1e-9);

        session.pointer_up(Point::new(400.0, 0.0), &mut playback);
        assert_eq!(playback.time, 3.5);
    }

    #[test]
    fn test_session_seek_drag_scrubs_without_committing() {
        let mut playback = MockPlayback::new(3.0, true);
        let mut session = TrimSession::new(track());
        let time = TimeRange::new(2.0, 8.0);

        session.pointer_down(Point::new(300.0, 0.0), TrimHandle::Seek, time, &mut playback);
        let committed = session.pointer_move(Point::new(950.0, 0.0), &mut playback);
        assert_eq!(committed, None);
        assert_eq!(playback.time, 8.0);
    }

    #[test]
    fn test_session_cancel_restores_playback() {
        let mut playback = MockPlayback::new(3.0, false);
        let mut session = TrimSession::new(track());
        let time = TimeRange::new(2.0, 8.0);

        session.pointer_down(Point::new(400.0, 0.0), TrimHandle::Move, time, &mut playback);
        assert!(playback.is_paused());

        let end = session.cancel(&mut playback).unwrap();
        assert!(!end.clicked);
        assert!(!playback.is_paused());
        assert!(!session.ignores_time_updates());
        assert!(!session.is_dragging());
    }

    proptest! {
        #[test]
        fn prop_trim_invariants_hold(
            s in 0.0f64..9.0,
            len in 1.0f64..10.0,
            pointer in -5.0f64..15.0,
            delta in -15.0f64..15.0,
            current in 0.0f64..10.0,
            handle_idx in 0usize..4,
        ) {
            let handles = [TrimHandle::Move, TrimHandle::Left, TrimHandle::Right, TrimHandle::Seek];
            let start = TimeRange::new(s.min(DURATION - MIN_DURATION), (s + len).min(DURATION));
            prop_assume!(start.duration() >= MIN_DURATION);

            let pointer_time = pointer.clamp(0.0, DURATION);
            let update = apply_trim_drag(start, handles[handle_idx], pointer_time, delta, current, DURATION);

            prop_assert!(update.time.duration() >= MIN_DURATION - 1e-9,
                "duration collapsed: {:?}", update.time);
            prop_assert!(update.time.start >= 0.0);
            prop_assert!(update.time.end <= DURATION);
            prop_assert!(update.time.start <= update.time.end);
        }

        #[test]
        fn prop_move_never_stretches(
            s in 0.0f64..9.0,
            len in 1.0f64..10.0,
            delta in -15.0f64..15.0,
        ) {
            let start = TimeRange::new(s.min(DURATION - MIN_DURATION), (s + len).min(DURATION));
            prop_assume!(start.duration() >= MIN_DURATION);

            let update = apply_trim_drag(start, TrimHandle::Move, 0.0, delta, 0.0, DURATION);
            prop_assert!((update.time.duration() - start.duration()).abs() < 1e-9);
        }
    }
}
