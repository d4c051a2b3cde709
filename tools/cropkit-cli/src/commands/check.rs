//! Check system capabilities.

use cropkit_render_engine::command_exists;

pub fn run() -> anyhow::Result<()> {
    println!("Cropkit System Check");
    println!("{}", "=".repeat(50));

    let ffmpeg = command_exists("ffmpeg");
    let ffprobe = command_exists("ffprobe");

    println!(
        "{} ffmpeg (transcoding engine)",
        if ffmpeg { "[OK]" } else { "[MISSING]" }
    );
    println!(
        "{} ffprobe (metadata probe)",
        if ffprobe { "[OK]" } else { "[MISSING]" }
    );

    println!();
    if ffmpeg && ffprobe {
        println!("All required tools are available. Cropkit is ready.");
    } else {
        println!("Install ffmpeg (which provides ffprobe) and re-run this check.");
    }

    Ok(())
}
