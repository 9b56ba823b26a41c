use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::Command;

use dronemap_gps::trajectory::frame_label;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::process::{run_captured, run_checked};

/// Extract frames from the configured video with ffmpeg, then run a second
/// `showinfo` pass to produce the per-frame timestamp table.
///
/// Frames land in `frames/frame_%04d.png` under the output directory at the
/// configured step and quality tier; timestamps in `timestamps.csv` with
/// rows `frame_NNNN.png,pts_time`. Returns the frames directory.
pub fn extract_frames(config: &PipelineConfig) -> Result<PathBuf, PipelineError> {
    let frames_dir = config.frames_dir();
    std::fs::create_dir_all(&frames_dir)?;

    let filter = select_filter(config.frame_step, config.quality.scale_filter());
    let pattern = frames_dir.join("frame_%04d.png");

    log::info!("extracting frames from {} to {}", config.video.display(), frames_dir.display());
    run_checked("ffmpeg", || {
        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-i")
            .arg(&config.video)
            .arg("-vf")
            .arg(&filter)
            .args(["-vsync", "0"])
            .args(["-q:v", "1"])
            .arg(&pattern);
        cmd
    })?;

    // second decode pass; showinfo logs each selected frame on stderr
    let showinfo = format!("{filter},showinfo");
    let output = run_captured("ffmpeg", || {
        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-i")
            .arg(&config.video)
            .arg("-vf")
            .arg(&showinfo)
            .args(["-f", "null", "-"]);
        cmd
    })?;
    if !output.status.success() {
        return Err(PipelineError::ToolFailed {
            tool: "ffmpeg",
            code: output.status.code(),
        });
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let timestamps = parse_showinfo_timestamps(&stderr);
    log::info!("parsed {} frame timestamps", timestamps.len());

    let mut table = String::from("frame,timestamp\n");
    for (frame, pts_time) in &timestamps {
        let _ = writeln!(table, "{frame},{pts_time}");
    }
    std::fs::write(config.timestamps_file(), table)?;

    Ok(frames_dir)
}

/// The ffmpeg select filter keeping one frame of every `step`, with an
/// optional scale filter chained after it.
fn select_filter(step: u32, scale: Option<&str>) -> String {
    let select = format!("select=not(mod(n\\,{step}))");
    match scale {
        Some(scale) => format!("{select},{scale}"),
        None => select,
    }
}

/// Parse ffmpeg `showinfo` stderr into (frame label, pts seconds) pairs.
///
/// Only lines carrying a `pts_time:` field are frame reports; everything
/// else ffmpeg prints is ignored. Both `n:3` and the column-aligned
/// `n:   3` forms are handled.
pub fn parse_showinfo_timestamps(stderr: &str) -> Vec<(String, f64)> {
    stderr
        .lines()
        .filter(|line| line.contains("pts_time:"))
        .filter_map(|line| {
            let n = field_value(line, "n:")?.parse::<u32>().ok()?;
            let pts = field_value(line, "pts_time:")?.parse::<f64>().ok()?;
            Some((frame_label(n), pts))
        })
        .collect()
}

/// Value of a `key:value` field in a showinfo line, tolerating padding
/// between the key and the value.
fn field_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line.split(key).nth(1)?;
    rest.split_whitespace().next()
}
