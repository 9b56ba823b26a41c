#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Pose exporters (CSV and sensor-description XML).
pub mod export;

/// WGS84 geodetic to ECEF coordinate conversion.
pub mod geo;

/// ExifTool metadata document parsing.
pub mod metadata;

/// Moving-average trajectory smoothing.
pub mod smoothing;

/// Pose and trajectory data model.
pub mod trajectory;

pub use trajectory::{CameraIntrinsics, Orientation, Pose, Trajectory};
