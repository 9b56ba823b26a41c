//! Pose exporters for photogrammetry tools.
//!
//! Two independent serializers over one input: a CSV of ECEF poses
//! (consumed as a COLMAP pose prior) and an XML sensor description
//! (consumed by Meshroom/AliceVision). Text generation is pure; writing
//! the file is a separate thin wrapper so the serializers stay testable
//! without touching the filesystem.

mod csv;
mod xml;

pub use csv::{trajectory_to_csv, write_gps_poses_csv};
pub use xml::{trajectory_to_sensor_xml, write_sensor_xml};

use crate::geo::GeoError;

/// Error types for the export module.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A pose's geodetic position could not be converted to ECEF
    #[error("failed to convert pose {frame} to ECEF: {source}")]
    Convert {
        /// Frame label of the offending pose
        frame: String,
        /// Underlying conversion error
        source: GeoError,
    },

    /// Error writing the output file
    #[error("error writing output file: {0}")]
    Io(#[from] std::io::Error),

    /// Error emitting the XML document
    #[error("error serializing sensor XML: {0}")]
    Xml(String),
}

/// Shortest representation that round-trips and keeps a decimal point on
/// plain decimals, e.g. `35.0` rather than `35`. Keeps the CSV/XML output
/// byte-compatible with what the original tool wrote.
fn fmt_f64(value: f64) -> String {
    format!("{value:?}")
}
