//! The authoritative edit state record.
//!
//! `EditStore` owns the current [`Transform`] for the loaded video and is
//! the single source of truth for the geometry engines and the command
//! compiler. Mutation happens only through the command methods below, each
//! of which notifies subscribed observers exactly once.
//!
//! Commands store committed values verbatim; clamping and validation
//! belong to the engines and the input boundary, so a read-back always
//! equals what was committed.

use std::rc::Rc;

use cropkit_edit_model::{Area, TimeRange, Transform, VideoMeta};

/// Consumer notified after every transform mutation.
pub trait TransformObserver {
    fn transform_changed(&self, transform: &Transform);
}

/// Handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(u64);

/// Single-threaded store of the current edit state.
pub struct EditStore {
    meta: VideoMeta,
    transform: Transform,
    observers: Vec<(u64, Rc<dyn TransformObserver>)>,
    next_observer_id: u64,
}

impl std::fmt::Debug for EditStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditStore")
            .field("meta", &self.meta)
            .field("transform", &self.transform)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl EditStore {
    /// Create a store for a freshly loaded video, with the default
    /// (identity) transform.
    pub fn new(meta: VideoMeta) -> Self {
        Self {
            meta,
            transform: Transform::default(),
            observers: Vec::new(),
            next_observer_id: 0,
        }
    }

    /// Metadata of the loaded video.
    pub fn meta(&self) -> &VideoMeta {
        &self.meta
    }

    /// The current edit state.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Replace the loaded video: new metadata, default transform.
    /// Subscriptions survive the reload.
    pub fn load_video(&mut self, meta: VideoMeta) {
        tracing::debug!(%meta, "Loading new video into edit store");
        self.meta = meta;
        self.transform = Transform::default();
        self.notify();
    }

    /// Restore the default transform for the current video.
    pub fn reset(&mut self) {
        self.transform = Transform::default();
        self.notify();
    }

    pub fn set_area(&mut self, area: Area) {
        self.transform.area = Some(area);
        self.notify();
    }

    /// Back to "full frame" (distinct from an explicit full-covering area).
    pub fn clear_area(&mut self) {
        self.transform.area = None;
        self.notify();
    }

    pub fn set_time(&mut self, time: TimeRange) {
        self.transform.time = Some(time);
        self.notify();
    }

    /// Back to "full duration".
    pub fn clear_time(&mut self) {
        self.transform.time = None;
        self.notify();
    }

    pub fn set_flip_h(&mut self, flip_h: bool) {
        self.transform.flip_h = flip_h;
        self.notify();
    }

    pub fn set_flip_v(&mut self, flip_v: bool) {
        self.transform.flip_v = flip_v;
        self.notify();
    }

    pub fn toggle_flip_h(&mut self) {
        self.transform.flip_h = !self.transform.flip_h;
        self.notify();
    }

    pub fn toggle_flip_v(&mut self) {
        self.transform.flip_v = !self.transform.flip_v;
        self.notify();
    }

    pub fn set_mute(&mut self, mute: bool) {
        self.transform.mute = mute;
        self.notify();
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.transform.scale = scale;
        self.notify();
    }

    /// Register an observer; it is called after every subsequent mutation.
    pub fn subscribe(&mut self, observer: Rc<dyn TransformObserver>) -> ObserverId {
        let id = self.next_observer_id;
        self.next_observer_id += 1;
        self.observers.push((id, observer));
        ObserverId(id)
    }

    /// Remove a subscription; unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: ObserverId) {
        self.observers.retain(|(oid, _)| *oid != id.0);
    }

    fn notify(&self) {
        for (_, observer) in &self.observers {
            observer.transform_changed(&self.transform);
        }
    }
}
