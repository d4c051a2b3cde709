//! Source metadata discovery via ffprobe.

use std::path::Path;
use std::process::Command;

use cropkit_common::{CropkitError, CropkitResult};
use cropkit_edit_model::VideoMeta;

/// Probe a video file for its natural dimensions and duration.
///
/// Files ffprobe cannot read are rejected here, before any edit state is
/// created for them.
pub fn probe_video(path: &Path) -> CropkitResult<VideoMeta> {
    if !path.exists() {
        return Err(CropkitError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let (width, height) = probe_dimensions(path)?;
    let duration = probe_duration(path)?;

    Ok(VideoMeta::new(width, height, duration))
}

fn probe_dimensions(path: &Path) -> CropkitResult<(u32, u32)> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "csv=p=0:s=x",
        ])
        .arg(path)
        .output()
        .map_err(|e| CropkitError::media(format!("Failed to run ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(CropkitError::media(format!(
            "ffprobe rejected {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    parse_dimensions(&raw).ok_or_else(|| {
        CropkitError::media(format!("No video stream found in {}", path.display()))
    })
}

fn probe_duration(path: &Path) -> CropkitResult<f64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "csv=p=0",
        ])
        .arg(path)
        .output()
        .map_err(|e| CropkitError::media(format!("Failed to run ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(CropkitError::media(format!(
            "ffprobe rejected {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    parse_duration(&raw).ok_or_else(|| {
        CropkitError::media(format!("No duration reported for {}", path.display()))
    })
}

fn parse_dimensions(raw: &str) -> Option<(u32, u32)> {
    let line = raw.lines().next()?.trim();
    let (w, h) = line.split_once('x')?;
    let width = w.parse::<u32>().ok()?;
    let height = h.parse::<u32>().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}

fn parse_duration(raw: &str) -> Option<f64> {
    let duration = raw.lines().next()?.trim().parse::<f64>().ok()?;
    if duration.is_finite() && duration > 0.0 {
        Some(duration)
    } else {
        None
    }
}
