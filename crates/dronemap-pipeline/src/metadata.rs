use std::process::Command;

use dronemap_gps::export::{write_gps_poses_csv, write_sensor_xml};
use dronemap_gps::metadata::parse_exiftool_json;
use dronemap_gps::smoothing::smooth_trajectory;
use dronemap_gps::Trajectory;

use crate::config::{PipelineConfig, ReconstructionEngine};
use crate::error::PipelineError;
use crate::process::run_captured;

/// Dump the video's metadata with `exiftool -json -g` and return the raw
/// JSON document.
pub fn acquire_metadata(config: &PipelineConfig) -> Result<String, PipelineError> {
    let output = run_captured("exiftool", || {
        let mut cmd = Command::new("exiftool");
        cmd.args(["-json", "-g"]).arg(&config.video);
        cmd
    })?;
    if !output.status.success() {
        return Err(PipelineError::ToolFailed {
            tool: "exiftool",
            code: output.status.code(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run the GPS stage: acquire metadata, parse it into a trajectory,
/// optionally smooth it, and write the export artifacts.
///
/// The raw exiftool dump is persisted to `gps_metadata.json`, the ECEF
/// pose CSV to `gps_poses.csv`, and — when the Meshroom engine is
/// selected — the sensor description to `sensor_data.xml`. Returns the
/// (possibly smoothed) trajectory.
pub fn extract_gps(config: &PipelineConfig) -> Result<Trajectory, PipelineError> {
    std::fs::create_dir_all(&config.output_dir)?;

    let document = acquire_metadata(config)?;
    std::fs::write(config.metadata_file(), &document)?;

    let trajectory = process_metadata(config, &document)?;
    log::info!(
        "exported {} GPS poses to {}",
        trajectory.len(),
        config.gps_csv().display()
    );
    Ok(trajectory)
}

/// The pure part of the GPS stage: parse, smooth, export. Split from
/// [`extract_gps`] so it is testable without exiftool installed.
pub(crate) fn process_metadata(
    config: &PipelineConfig,
    document: &str,
) -> Result<Trajectory, PipelineError> {
    let mut trajectory = parse_exiftool_json(document)?;
    if trajectory.is_empty() {
        log::warn!("no GPS records found in {}", config.video.display());
    }

    if config.smooth_gps {
        trajectory = smooth_trajectory(&trajectory, config.smoothing_window);
    }

    write_gps_poses_csv(&trajectory, config.gps_csv())?;
    if config.engine == ReconstructionEngine::Meshroom {
        write_sensor_xml(&trajectory, config.sensor_xml())?;
    }

    Ok(trajectory)
}
