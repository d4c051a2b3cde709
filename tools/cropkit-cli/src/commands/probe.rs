//! Show source video metadata.

use std::path::PathBuf;

use cropkit_edit_model::human_time;
use cropkit_render_engine::probe_video;

pub fn run(input: PathBuf) -> anyhow::Result<()> {
    let meta = probe_video(&input)
        .map_err(|e| anyhow::anyhow!("Failed to probe {}: {e}", input.display()))?;

    println!("File: {}", input.display());
    println!("  Resolution: {}x{}", meta.width, meta.height);
    println!(
        "  Duration: {} ({:.3}s)",
        human_time(meta.duration),
        meta.duration
    );
    println!("  Aspect ratio: {:.4}", meta.aspect());

    Ok(())
}
