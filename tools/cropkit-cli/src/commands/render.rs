//! Render an edit through ffmpeg.

use std::io::Write;
use std::path::{Path, PathBuf};

use cropkit_common::{AppConfig, CancelToken};
use cropkit_edit_core::EditStore;
use cropkit_render_engine::{
    compile, probe_video, render_edit, LogCallback, ProgressCallback, RenderJob, RenderOutcome,
    Renderer,
};

use crate::EditArgs;

pub async fn run(input: PathBuf, output: Option<PathBuf>, edit: EditArgs) -> anyhow::Result<()> {
    let meta = probe_video(&input)
        .map_err(|e| anyhow::anyhow!("Failed to probe {}: {e}", input.display()))?;

    // Scoped so the (single-threaded) store is gone before any await.
    let plan = {
        let mut store = EditStore::new(meta);
        super::apply_edit(&mut store, &edit)?;
        tracing::debug!(transform = ?store.transform(), "Edit state committed");
        compile(store.transform(), store.meta())
    };

    let config = AppConfig::load();
    let output = output.unwrap_or_else(|| default_output(&config, &input));

    println!("Rendering: {}", input.display());
    println!("  Source: {meta}");
    println!("  Output: {}", output.display());
    if !plan.filters.is_empty() {
        println!("  Filters: {}", plan.filters.join(","));
    }

    let job = RenderJob {
        input,
        output,
        plan,
    };

    let renderer = Renderer::new();
    let cancel = CancelToken::new();

    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });

    let progress_cb: ProgressCallback = Box::new(|p| {
        print!(
            "\r  Progress: {:>5.1}% ({:.1}s encoded, ETA: {:.0}s)  ",
            p.progress * 100.0,
            p.out_time_secs,
            p.eta_secs,
        );
        std::io::stdout().flush().ok();
    });

    let log_cb: LogCallback = Box::new(|line| {
        eprintln!("  ffmpeg: {line}");
    });

    match render_edit(&renderer, job, cancel, Some(progress_cb), Some(log_cb)).await {
        Ok(RenderOutcome::Completed(path)) => {
            println!("\nRender complete: {}", path.display());
        }
        Ok(RenderOutcome::Cancelled) => {
            println!("\nRender cancelled");
        }
        Err(e) => {
            println!("\nRender failed: {e}");
        }
    }

    Ok(())
}

/// `<output_dir>/<input stem>.cropped.mp4`
fn default_output(config: &AppConfig, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    config.output_dir.join(format!("{stem}.cropped.mp4"))
}
