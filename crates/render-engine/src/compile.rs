//! The command compiler: Transform + source metadata -> transcoding
//! instructions.
//!
//! A pure function. Same transform and metadata always produce a
//! byte-identical argument list, so plans can be previewed, diffed, and
//! unit-tested without ever invoking the transcoding engine.
//!
//! Convention: crop areas are stored in original-video pixel space. The
//! emitted `crop` filter follows `scale` in the chain and therefore
//! addresses post-scale pixels, so this compiler (and nothing else)
//! multiplies the rectangle by the scale factor before rounding.

use serde::{Deserialize, Serialize};

use cropkit_edit_model::{Transform, VideoMeta};

/// Video codec set on every render.
pub const VIDEO_CODEC: &str = "libx264";

/// Encoding speed preset set on every render.
pub const ENCODER_PRESET: &str = "veryfast";

/// The compiled transcoding instructions for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPlan {
    /// Ordered filter-spec strings (joined into `-vf` when non-empty).
    pub filters: Vec<String>,

    /// Ordered encoder argument list, ready for the transcoding engine.
    pub args: Vec<String>,

    /// Duration of the output clip in seconds, for progress reporting.
    pub output_duration_secs: f64,
}

/// Compile a transform against source metadata.
pub fn compile(transform: &Transform, meta: &VideoMeta) -> RenderPlan {
    let mut filters = Vec::new();
    let mut args = Vec::new();

    if transform.flip_h {
        filters.push("hflip".to_string());
    }
    if transform.flip_v {
        filters.push("vflip".to_string());
    }

    let scale = transform.scale;
    if scale != 1.0 {
        filters.push(format!(
            "scale={}:{}",
            trunc_even(meta.width as f64 * scale),
            trunc_even(meta.height as f64 * scale),
        ));
    }

    if let Some(area) = &transform.area {
        if !area.covers(meta) {
            filters.push(format!(
                "crop={}:{}:{}:{}",
                trunc_even(area.width * scale),
                trunc_even(area.height * scale),
                trunc_even(area.x * scale),
                trunc_even(area.y * scale),
            ));
        }
    }

    if !filters.is_empty() {
        args.push("-vf".to_string());
        args.push(filters.join(","));
    }

    let mut output_duration_secs = meta.duration;
    if let Some(time) = &transform.time {
        if time.start > 0.0 {
            args.push("-ss".to_string());
            args.push(format_secs(time.start));
        }
        if time.end < meta.duration {
            args.push("-t".to_string());
            args.push(format_secs(time.duration()));
        }
        output_duration_secs = time.duration();
    }

    args.push("-c:v".to_string());
    args.push(VIDEO_CODEC.to_string());
    args.push("-preset".to_string());
    args.push(ENCODER_PRESET.to_string());

    if transform.mute {
        args.push("-an".to_string());
    } else {
        args.push("-c:a".to_string());
        args.push("copy".to_string());
    }

    RenderPlan {
        filters,
        args,
        output_duration_secs,
    }
}

/// Truncate to an even pixel count. Common codecs reject odd dimensions.
fn trunc_even(value: f64) -> u32 {
    (value.max(0.0) as u32) / 2 * 2
}

/// Seconds with up to three decimals, trailing zeros trimmed.
fn format_secs(value: f64) -> String {
    let mut s = format!("{value:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropkit_edit_model::{Area, TimeRange};

    fn hd_meta() -> VideoMeta {
        VideoMeta::new(1920, 1080, 10.0)
    }

    #[test]
    fn test_default_transform_compiles_to_nothing() {
        let plan = compile(&Transform::default(), &hd_meta());
        assert!(plan.filters.is_empty());
        assert!(!plan.args.contains(&"-vf".to_string()));
        assert!(!plan.args.contains(&"-ss".to_string()));
        assert!(!plan.args.contains(&"-t".to_string()));
        assert_eq!(
            plan.args,
            vec!["-c:v", "libx264", "-preset", "veryfast", "-c:a", "copy"]
        );
        assert_eq!(plan.output_duration_secs, 10.0);
    }

    #[test]
    fn test_full_edit_fixture() {
        let meta = VideoMeta::new(200, 200, 10.0);
        let transform = Transform {
            flip_h: true,
            area: Some(Area::new(10.0, 10.0, 100.0, 60.0)),
            time: Some(TimeRange::new(2.0, 8.0)),
            mute: true,
            ..Transform::default()
        };

        let plan = compile(&transform, &meta);
        assert_eq!(plan.filters, vec!["hflip", "crop=100:60:10:10"]);
        assert_eq!(
            plan.args,
            vec![
                "-vf",
                "hflip,crop=100:60:10:10",
                "-ss",
                "2",
                "-t",
                "6",
                "-c:v",
                "libx264",
                "-preset",
                "veryfast",
                "-an",
            ]
        );
        assert_eq!(plan.output_duration_secs, 6.0);
    }

    #[test]
    fn test_filter_order_is_fixed() {
        let transform = Transform {
            flip_h: true,
            flip_v: true,
            scale: 0.5,
            area: Some(Area::new(0.0, 0.0, 400.0, 400.0)),
            ..Transform::default()
        };
        let plan = compile(&transform, &hd_meta());
        assert_eq!(
            plan.filters,
            vec!["hflip", "vflip", "scale=960:540", "crop=200:200:0:0"]
        );
    }

    #[test]
    fn test_scale_applies_to_crop_rectangle() {
        // Areas are stored in source pixels; the crop filter runs after the
        // scale filter, so the compiler maps the rectangle into post-scale
        // pixels.
        let transform = Transform {
            scale: 0.5,
            area: Some(Area::new(10.0, 10.0, 100.0, 60.0)),
            ..Transform::default()
        };
        let plan = compile(&transform, &hd_meta());
        assert_eq!(plan.filters, vec!["scale=960:540", "crop=50:30:4:4"]);
    }

    #[test]
    fn test_dimensions_truncate_to_even() {
        let transform = Transform {
            area: Some(Area::new(11.0, 13.0, 101.0, 61.0)),
            ..Transform::default()
        };
        let plan = compile(&transform, &hd_meta());
        assert_eq!(plan.filters, vec!["crop=100:60:10:12"]);

        let odd_scale = Transform {
            scale: 0.333,
            ..Transform::default()
        };
        let plan = compile(&odd_scale, &hd_meta());
        // 1920 * 0.333 = 639.36 -> 638; 1080 * 0.333 = 359.64 -> 358.
        assert_eq!(plan.filters, vec!["scale=638:358"]);
    }

    #[test]
    fn test_full_frame_area_emits_no_crop() {
        let meta = hd_meta();
        let transform = Transform {
            area: Some(Area::full(&meta)),
            ..Transform::default()
        };
        let plan = compile(&transform, &meta);
        assert!(plan.filters.is_empty());
        assert!(!plan.args.contains(&"-vf".to_string()));
    }

    #[test]
    fn test_full_duration_time_emits_nothing() {
        let transform = Transform {
            time: Some(TimeRange::new(0.0, 10.0)),
            ..Transform::default()
        };
        let plan = compile(&transform, &hd_meta());
        assert!(!plan.args.contains(&"-ss".to_string()));
        assert!(!plan.args.contains(&"-t".to_string()));
    }

    #[test]
    fn test_time_from_zero_emits_only_duration() {
        let transform = Transform {
            time: Some(TimeRange::new(0.0, 7.5)),
            ..Transform::default()
        };
        let plan = compile(&transform, &hd_meta());
        assert!(!plan.args.contains(&"-ss".to_string()));
        let t_idx = plan.args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(plan.args[t_idx + 1], "7.5");
    }

    #[test]
    fn test_time_to_end_emits_only_start() {
        let transform = Transform {
            time: Some(TimeRange::new(2.25, 10.0)),
            ..Transform::default()
        };
        let plan = compile(&transform, &hd_meta());
        let ss_idx = plan.args.iter().position(|a| a == "-ss").unwrap();
        assert_eq!(plan.args[ss_idx + 1], "2.25");
        assert!(!plan.args.contains(&"-t".to_string()));
    }

    #[test]
    fn test_audio_copied_unless_muted() {
        let plan = compile(&Transform::default(), &hd_meta());
        assert!(plan.args.ends_with(&["-c:a".to_string(), "copy".to_string()]));

        let muted = Transform {
            mute: true,
            ..Transform::default()
        };
        let plan = compile(&muted, &hd_meta());
        assert!(plan.args.ends_with(&["-an".to_string()]));
        assert!(!plan.args.contains(&"copy".to_string()));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let meta = hd_meta();
        let transform = Transform {
            flip_v: true,
            scale: 0.75,
            area: Some(Area::new(100.0, 50.0, 640.0, 480.0)),
            time: Some(TimeRange::new(1.0, 9.0)),
            mute: false,
            ..Transform::default()
        };
        let a = compile(&transform, &meta);
        let b = compile(&transform, &meta);
        assert_eq!(a, b);
    }

    #[test]
    fn test_format_secs_trims_trailing_zeros() {
        assert_eq!(format_secs(2.0), "2");
        assert_eq!(format_secs(6.5), "6.5");
        assert_eq!(format_secs(0.125), "0.125");
        assert_eq!(format_secs(1.0 / 3.0), "0.333");
    }

    #[test]
    fn test_trunc_even() {
        assert_eq!(trunc_even(101.0), 100);
        assert_eq!(trunc_even(100.9), 100);
        assert_eq!(trunc_even(99.0), 98);
        assert_eq!(trunc_even(-4.0), 0);
    }
}
