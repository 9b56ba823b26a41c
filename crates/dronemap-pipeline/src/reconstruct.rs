use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::{PipelineConfig, ReconstructionEngine};
use crate::error::PipelineError;
use crate::process::run_checked;

/// Run the reconstruction backend over the extracted frames.
///
/// For COLMAP this is the three-stage CLI pipeline (feature extraction,
/// exhaustive matching, mapping) into `photogrammetry/sparse`, with a
/// completion marker written on success. When GPS metadata is in use the
/// exported pose CSV must exist and the feature extractor is told to read
/// position priors. Meshroom invocation is not implemented and reports
/// [`PipelineError::Unsupported`]; its input artifacts are still produced
/// by the GPS stage.
///
/// Returns the photogrammetry working directory.
pub fn run_reconstruction(config: &PipelineConfig) -> Result<PathBuf, PipelineError> {
    let frames_dir = config.frames_dir();
    if !frames_dir.is_dir() {
        return Err(PipelineError::MissingInput(format!(
            "frames directory {} does not exist, extract frames first",
            frames_dir.display()
        )));
    }
    if config.use_gps_metadata && !config.gps_csv().is_file() {
        return Err(PipelineError::MissingInput(format!(
            "{} does not exist, extract GPS metadata first (or disable the GPS prior)",
            config.gps_csv().display()
        )));
    }

    match config.engine {
        ReconstructionEngine::Colmap => run_colmap(config, &frames_dir),
        ReconstructionEngine::Meshroom => {
            Err(PipelineError::Unsupported("meshroom reconstruction"))
        }
    }
}

fn run_colmap(config: &PipelineConfig, frames_dir: &Path) -> Result<PathBuf, PipelineError> {
    let photo_dir = config.photogrammetry_dir();
    let sparse_dir = photo_dir.join("sparse");
    std::fs::create_dir_all(&sparse_dir)?;

    let db_path = photo_dir.join("database.db");

    log::info!("running COLMAP feature extraction (this may take a while)");
    run_checked("colmap", || {
        let mut cmd = Command::new("colmap");
        cmd.args(feature_extractor_args(config, &db_path, frames_dir));
        cmd
    })?;

    log::info!("running COLMAP feature matching");
    run_checked("colmap", || {
        let mut cmd = Command::new("colmap");
        cmd.arg("exhaustive_matcher")
            .arg("--database_path")
            .arg(&db_path);
        if config.use_gpu {
            cmd.args(["--SiftMatching.use_gpu", "1"]);
        }
        cmd
    })?;

    log::info!("running COLMAP mapping");
    run_checked("colmap", || {
        let mut cmd = Command::new("colmap");
        cmd.arg("mapper")
            .arg("--database_path")
            .arg(&db_path)
            .arg("--image_path")
            .arg(frames_dir)
            .arg("--output_path")
            .arg(&sparse_dir);
        cmd
    })?;

    std::fs::write(
        photo_dir.join("colmap_completed.txt"),
        "COLMAP processing completed\n",
    )?;
    log::info!("COLMAP processing completed, results in {}", photo_dir.display());

    Ok(photo_dir)
}

/// Argument list for the COLMAP feature extraction stage. Split out of
/// [`run_colmap`] so the GPS-prior and GPU conditionals are testable
/// without COLMAP installed.
fn feature_extractor_args(
    config: &PipelineConfig,
    db_path: &Path,
    frames_dir: &Path,
) -> Vec<std::ffi::OsString> {
    let mut args: Vec<std::ffi::OsString> = vec![
        "feature_extractor".into(),
        "--database_path".into(),
        db_path.into(),
        "--image_path".into(),
        frames_dir.into(),
        "--ImageReader.single_camera".into(),
        "1".into(),
        "--ImageReader.camera_model".into(),
        "OPENCV".into(),
    ];
    if config.use_gps_metadata {
        args.push("--ImageReader.gps_prior".into());
        args.push("1".into());
    }
    if config.use_gpu {
        args.push("--SiftExtraction.use_gpu".into());
        args.push("1".into());
    }
    args
}

/// Locate the reconstruction's mesh artifact for the host application to
/// import: COLMAP's dense `fused.ply`, or the newest `.obj` under
/// Meshroom's texturing cache. `None` when the backend has not produced
/// one (e.g. only a sparse model exists).
pub fn find_model_artifact(photo_dir: &Path, engine: ReconstructionEngine) -> Option<PathBuf> {
    match engine {
        ReconstructionEngine::Colmap => {
            let fused = photo_dir.join("dense").join("fused.ply");
            fused.is_file().then_some(fused)
        }
        ReconstructionEngine::Meshroom => {
            let cache = photo_dir.join("MeshroomCache").join("Texturing");
            newest_with_extension(&cache, "obj")
        }
    }
}

fn newest_with_extension(dir: &Path, ext: &str) -> Option<PathBuf> {
    let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        let entries = match std::fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|e| e == ext) {
                let modified = entry
                    .metadata()
                    .and_then(|m| m.modified())
                    .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
                if newest.as_ref().map_or(true, |(t, _)| modified > *t) {
                    newest = Some((modified, path));
                }
            }
        }
    }
    newest.map(|(_, path)| path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconstruction_requires_frames() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::new(dir.path().join("v.mp4"), dir.path());
        assert!(matches!(
            run_reconstruction(&config),
            Err(PipelineError::MissingInput(_))
        ));
    }

    #[test]
    fn test_meshroom_reconstruction_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PipelineConfig::new(dir.path().join("v.mp4"), dir.path());
        config.engine = ReconstructionEngine::Meshroom;
        config.use_gps_metadata = false;
        std::fs::create_dir_all(config.frames_dir()).unwrap();
        assert!(matches!(
            run_reconstruction(&config),
            Err(PipelineError::Unsupported(_))
        ));
    }

    #[test]
    fn test_gps_prior_requires_pose_csv() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PipelineConfig::new(dir.path().join("v.mp4"), dir.path());
        std::fs::create_dir_all(config.frames_dir()).unwrap();

        // use_gps_metadata defaults to true but gps_poses.csv was never written
        assert!(matches!(
            run_reconstruction(&config),
            Err(PipelineError::MissingInput(_))
        ));

        // without the prior the stage proceeds past the input checks
        config.use_gps_metadata = false;
        config.engine = ReconstructionEngine::Meshroom;
        assert!(matches!(
            run_reconstruction(&config),
            Err(PipelineError::Unsupported(_))
        ));
    }

    #[test]
    fn test_feature_extractor_args_gps_prior() {
        let dir = std::path::Path::new("/data/out");
        let db = dir.join("photogrammetry/database.db");
        let frames = dir.join("frames");
        let mut config = PipelineConfig::new("/data/v.mp4", dir);

        let with_prior = feature_extractor_args(&config, &db, &frames);
        let prior: std::ffi::OsString = "--ImageReader.gps_prior".into();
        assert!(with_prior.contains(&prior));

        config.use_gps_metadata = false;
        let without_prior = feature_extractor_args(&config, &db, &frames);
        assert!(!without_prior.contains(&prior));
    }

    #[test]
    fn test_feature_extractor_args_gpu_toggle() {
        let dir = std::path::Path::new("/data/out");
        let db = dir.join("database.db");
        let frames = dir.join("frames");
        let mut config = PipelineConfig::new("/data/v.mp4", dir);
        config.use_gpu = false;

        let args = feature_extractor_args(&config, &db, &frames);
        let gpu: std::ffi::OsString = "--SiftExtraction.use_gpu".into();
        assert!(!args.contains(&gpu));
        assert_eq!(args[0], std::ffi::OsString::from("feature_extractor"));
        assert!(args.contains(&std::ffi::OsString::from("OPENCV")));
    }

    #[test]
    fn test_find_colmap_artifact() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_model_artifact(dir.path(), ReconstructionEngine::Colmap), None);

        let dense = dir.path().join("dense");
        std::fs::create_dir_all(&dense).unwrap();
        std::fs::write(dense.join("fused.ply"), "ply").unwrap();
        assert_eq!(
            find_model_artifact(dir.path(), ReconstructionEngine::Colmap),
            Some(dense.join("fused.ply"))
        );
    }

    #[test]
    fn test_find_meshroom_artifact_in_nested_cache() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir
            .path()
            .join("MeshroomCache")
            .join("Texturing")
            .join("abc123");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("texturedMesh.obj"), "o mesh").unwrap();

        assert_eq!(
            find_model_artifact(dir.path(), ReconstructionEngine::Meshroom),
            Some(nested.join("texturedMesh.obj"))
        );
    }
}
