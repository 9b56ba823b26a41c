//! External tool orchestration for the drone video to 3D pipeline.
//!
//! The heavy lifting lives elsewhere: ffmpeg decodes video, exiftool reads
//! metadata and COLMAP does the reconstruction. This crate owns the glue:
//! building the command lines, running each tool synchronously with a hard
//! success check, and wiring their file artifacts to the
//! [`dronemap_gps`] core crate.

mod config;
mod deps;
mod error;
mod frames;
mod metadata;
mod process;
mod reconstruct;
mod run;

pub use config::{FrameQuality, PipelineConfig, ReconstructionEngine};
pub use deps::{check_dependencies, ToolAvailability};
pub use error::PipelineError;
pub use frames::{extract_frames, parse_showinfo_timestamps};
pub use metadata::{acquire_metadata, extract_gps};
pub use reconstruct::{find_model_artifact, run_reconstruction};
pub use run::run_pipeline;
