//! Cropkit CLI: command-line interface for crop/trim edits.
//!
//! Usage:
//!   cropkit probe <INPUT>          Show source video metadata
//!   cropkit plan <INPUT> [EDITS]   Compile an edit into ffmpeg arguments
//!   cropkit render <INPUT> [EDITS] Render an edit through ffmpeg
//!   cropkit check                  Check system capabilities

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "cropkit",
    about = "Visual crop and trim edits compiled to ffmpeg",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Edit state shared by `plan` and `render`.
#[derive(Args, Debug, Clone)]
struct EditArgs {
    /// Crop rectangle in source pixels, WxH+X+Y (e.g. 640x480+100+50)
    #[arg(long)]
    crop: Option<cropkit_edit_model::Area>,

    /// Trim range in seconds, START:END (e.g. 2.5:8)
    #[arg(long)]
    trim: Option<cropkit_edit_model::TimeRange>,

    /// Mirror horizontally
    #[arg(long)]
    flip_h: bool,

    /// Mirror vertically
    #[arg(long)]
    flip_v: bool,

    /// Drop the audio stream
    #[arg(long)]
    mute: bool,

    /// Output scale factor, 0.1 to 1.0
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Show source video metadata
    Probe {
        /// Path to the source video
        input: PathBuf,
    },

    /// Compile an edit into its filter chain and argument list
    Plan {
        /// Path to the source video
        input: PathBuf,

        #[command(flatten)]
        edit: EditArgs,

        /// Emit the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render an edit through ffmpeg
    Render {
        /// Path to the source video
        input: PathBuf,

        /// Output file path (defaults to <input stem>.cropped.mp4)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        edit: EditArgs,
    },

    /// Check system capabilities
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    cropkit_common::logging::init_logging(&cropkit_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Probe { input } => commands::probe::run(input),
        Commands::Plan { input, edit, json } => commands::plan::run(input, edit, json),
        Commands::Render {
            input,
            output,
            edit,
        } => commands::render::run(input, output, edit).await,
        Commands::Check => commands::check::run(),
    }
}
