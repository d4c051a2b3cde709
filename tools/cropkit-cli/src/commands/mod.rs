//! CLI subcommands.

pub mod check;
pub mod plan;
pub mod probe;
pub mod render;

use anyhow::bail;
use cropkit_edit_core::EditStore;
use cropkit_edit_model::{MIN_CROP_SIZE, MIN_DURATION};

use crate::EditArgs;

/// Validate edit flags against the loaded video and commit them through
/// the store's command API.
///
/// The store itself never coerces, so out-of-range input is rejected here
/// at the boundary.
pub(crate) fn apply_edit(store: &mut EditStore, edit: &EditArgs) -> anyhow::Result<()> {
    let meta = *store.meta();

    if !(0.1..=1.0).contains(&edit.scale) {
        bail!("scale must be between 0.1 and 1.0, got {}", edit.scale);
    }

    if let Some(area) = edit.crop {
        if area.width < MIN_CROP_SIZE || area.height < MIN_CROP_SIZE {
            bail!(
                "crop must be at least {MIN_CROP_SIZE}x{MIN_CROP_SIZE} pixels, got {}x{}",
                area.width,
                area.height
            );
        }
        if area.x < 0.0
            || area.y < 0.0
            || area.right() > meta.width as f64
            || area.bottom() > meta.height as f64
        {
            bail!(
                "crop {} does not fit inside the {}x{} frame",
                area,
                meta.width,
                meta.height
            );
        }
        store.set_area(area);
    }

    if let Some(time) = edit.trim {
        if time.start < 0.0 || time.end > meta.duration {
            bail!(
                "trim {} is outside the video's {:.3}s duration",
                time,
                meta.duration
            );
        }
        if time.duration() < MIN_DURATION {
            bail!("trim must keep at least {MIN_DURATION}s, got {:.3}s", time.duration());
        }
        store.set_time(time);
    }

    if edit.flip_h {
        store.set_flip_h(true);
    }
    if edit.flip_v {
        store.set_flip_v(true);
    }
    if edit.mute {
        store.set_mute(true);
    }
    if edit.scale != 1.0 {
        store.set_scale(edit.scale);
    }

    Ok(())
}
