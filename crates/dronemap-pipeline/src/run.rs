use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::frames::extract_frames;
use crate::metadata::extract_gps;
use crate::reconstruct::run_reconstruction;

/// Run the whole pipeline in order: frame extraction, GPS extraction and
/// export, reconstruction. Stages are sequential and a stage failure stops
/// the run; nothing is retried beyond the per-launch retry each stage
/// already applies.
///
/// Returns the photogrammetry working directory.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PathBuf, PipelineError> {
    extract_frames(config)?;
    let trajectory = extract_gps(config)?;
    if trajectory.is_empty() {
        log::warn!("proceeding without GPS poses; reconstruction will be unreferenced");
    }
    run_reconstruction(config)
}
