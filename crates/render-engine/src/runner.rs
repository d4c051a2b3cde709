//! ffmpeg execution: progress, log, cancellation, and the single-flight
//! guard.
//!
//! The runner treats ffmpeg as an opaque long-running operation with three
//! legal states: idle, running, and completed/cancelled. At most one
//! invocation runs at a time; a second request is rejected at the call
//! site. Progress is parsed from `-progress pipe:1` key/value output on
//! stdout; the textual log streams from stderr line by line.

use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cropkit_common::{CancelToken, CropkitError, CropkitResult};

use crate::compile::RenderPlan;

/// Progress callback for render execution.
pub type ProgressCallback = Box<dyn Fn(RenderProgress) + Send>;

/// Callback receiving each appended line of the transcoder's textual log.
pub type LogCallback = Box<dyn Fn(&str) + Send>;

/// A render ready to be executed.
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// Source video path.
    pub input: PathBuf,

    /// Output file path.
    pub output: PathBuf,

    /// Compiled instructions from the command compiler.
    pub plan: RenderPlan,
}

impl RenderJob {
    /// The complete ffmpeg argument list for this job: fixed prelude,
    /// input, compiled plan, output.
    pub fn command_args(&self) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-nostats".to_string(),
            "-progress".to_string(),
            "pipe:1".to_string(),
            "-i".to_string(),
            self.input.display().to_string(),
        ];
        args.extend(self.plan.args.iter().cloned());
        args.push(self.output.display().to_string());
        args
    }
}

/// Render progress report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderProgress {
    /// Fraction of the output clip encoded, `0..=1`.
    pub progress: f64,

    /// Output timestamp reached so far, seconds.
    pub out_time_secs: f64,

    /// Estimated time remaining in seconds.
    pub eta_secs: f64,

    /// Current stage.
    pub stage: RenderStage,
}

/// Stages of a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    Preparing,
    Encoding,
    Finalizing,
    Complete,
    Cancelled,
}

/// Terminal state of a render that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Output written to the given path.
    Completed(PathBuf),

    /// Stopped by the cancel token; progress/log state was reset and no
    /// failure was reported.
    Cancelled,
}

/// Executes renders, enforcing at most one running invocation.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    running: Arc<AtomicBool>,
}

/// Clears the running flag when the render leaves scope, whatever the
/// outcome.
struct RunGuard {
    running: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a render is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn try_acquire(&self) -> CropkitResult<RunGuard> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CropkitError::render("A render is already in progress"));
        }
        Ok(RunGuard {
            running: self.running.clone(),
        })
    }

    /// Execute a render job, blocking until completion, failure, or
    /// cancellation.
    pub fn render(
        &self,
        job: &RenderJob,
        cancel: &CancelToken,
        progress: Option<ProgressCallback>,
        log: Option<LogCallback>,
    ) -> CropkitResult<RenderOutcome> {
        let _guard = self.try_acquire()?;

        if !job.input.exists() {
            return Err(CropkitError::FileNotFound {
                path: job.input.clone(),
            });
        }
        if let Some(parent) = job.output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        if let Some(cb) = &progress {
            cb(RenderProgress {
                progress: 0.0,
                out_time_secs: 0.0,
                eta_secs: 0.0,
                stage: RenderStage::Preparing,
            });
        }

        let args = job.command_args();
        tracing::debug!(?args, "Running ffmpeg");

        let start = std::time::Instant::now();
        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CropkitError::render(format!("Failed to start ffmpeg: {e}")))?;

        tracing::info!(
            pid = child.id(),
            input = %job.input.display(),
            output = %job.output.display(),
            "ffmpeg process started"
        );

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CropkitError::render("Failed to capture ffmpeg stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| CropkitError::render("Failed to capture ffmpeg stderr"))?;

        // Drain stderr concurrently to avoid ffmpeg blocking on a full
        // stderr pipe; each line is both streamed to the caller and kept
        // for error reporting.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut collected = String::new();
            for line in BufReader::new(stderr).lines() {
                let Ok(line) = line else { break };
                if let Some(cb) = &log {
                    cb(&line);
                }
                collected.push_str(&line);
                collected.push('\n');
            }
            collected
        });

        let mut reader = BufReader::new(stdout);
        let mut line = String::new();
        let mut state = ProgressState::default();

        loop {
            if cancel.is_cancelled() {
                child.kill().ok();
                child.wait().ok();
                stderr_task.join().ok();
                if let Some(cb) = &progress {
                    cb(RenderProgress {
                        progress: 0.0,
                        out_time_secs: 0.0,
                        eta_secs: 0.0,
                        stage: RenderStage::Cancelled,
                    });
                }
                tracing::info!("Render cancelled");
                return Ok(RenderOutcome::Cancelled);
            }

            line.clear();
            let bytes = reader
                .read_line(&mut line)
                .map_err(|e| CropkitError::render(format!("Failed reading ffmpeg progress: {e}")))?;
            if bytes == 0 {
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some((key, value)) = trimmed.split_once('=') {
                state.update(key, value);
                if key == "progress" {
                    if let Some(cb) = &progress {
                        cb(progress_report(
                            &state,
                            job.plan.output_duration_secs,
                            start.elapsed().as_secs_f64(),
                        ));
                    }
                }
            }
        }

        let status = child
            .wait()
            .map_err(|e| CropkitError::render(format!("Failed to wait on ffmpeg: {e}")))?;

        let stderr_output = stderr_task
            .join()
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());

        if !status.success() {
            return Err(CropkitError::render(format!(
                "ffmpeg failed (status {}): {}",
                status,
                stderr_output.trim()
            )));
        }

        if let Some(cb) = &progress {
            cb(RenderProgress {
                progress: 1.0,
                out_time_secs: job.plan.output_duration_secs,
                eta_secs: 0.0,
                stage: RenderStage::Complete,
            });
        }

        tracing::info!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            output = %job.output.display(),
            "Render finished"
        );
        Ok(RenderOutcome::Completed(job.output.clone()))
    }
}

/// Execute a render job through a renderer.
///
/// The async entry point for hosts driving renders from a runtime; the
/// blocking subprocess management runs on the blocking thread pool. The
/// renderer's single-flight guard is shared with the caller's clone.
pub async fn render_edit(
    renderer: &Renderer,
    job: RenderJob,
    cancel: CancelToken,
    progress: Option<ProgressCallback>,
    log: Option<LogCallback>,
) -> CropkitResult<RenderOutcome> {
    let renderer = renderer.clone();
    tokio::task::spawn_blocking(move || renderer.render(&job, &cancel, progress, log))
        .await
        .map_err(|e| CropkitError::render(format!("Render task failed: {e}")))?
}

/// Whether a binary is reachable on PATH.
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[derive(Debug, Default)]
struct ProgressState {
    out_time_secs: f64,
    complete: bool,
}

impl ProgressState {
    fn update(&mut self, key: &str, value: &str) {
        match key {
            "out_time_ms" => {
                if let Ok(ms) = value.parse::<f64>() {
                    self.out_time_secs = ms / 1_000_000.0;
                }
            }
            "out_time_us" => {
                if let Ok(us) = value.parse::<f64>() {
                    self.out_time_secs = us / 1_000_000.0;
                }
            }
            "progress" => {
                self.complete = value == "end";
            }
            _ => {}
        }
    }
}

fn progress_report(
    state: &ProgressState,
    expected_duration_secs: f64,
    elapsed_secs: f64,
) -> RenderProgress {
    let progress = if expected_duration_secs <= 0.0 {
        0.0
    } else {
        (state.out_time_secs / expected_duration_secs).clamp(0.0, 1.0)
    };

    let eta_secs = if progress > 0.0 {
        ((elapsed_secs / progress) - elapsed_secs).max(0.0)
    } else {
        0.0
    };

    RenderProgress {
        progress: if state.complete { 1.0 } else { progress },
        out_time_secs: state.out_time_secs,
        eta_secs,
        stage: if state.complete {
            RenderStage::Finalizing
        } else {
            RenderStage::Encoding
        },
    }
}
