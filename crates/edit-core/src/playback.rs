//! Seam to the host media engine.

/// A playable, seekable video surface.
///
/// Implemented by the host over whatever actually decodes the video; the
/// trim engine only needs transport control and the current position.
pub trait Playback {
    /// Total duration in seconds.
    fn duration(&self) -> f64;

    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Move the playback position.
    fn seek(&mut self, secs: f64);

    fn play(&mut self);

    fn pause(&mut self);

    fn is_paused(&self) -> bool;
}
