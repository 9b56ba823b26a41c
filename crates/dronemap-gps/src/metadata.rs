use serde::Deserialize;

use crate::trajectory::{frame_label, CameraIntrinsics, Orientation, Pose, Trajectory};

/// Error types for the metadata module.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The document is not a valid ExifTool JSON dump
    #[error("failed to parse metadata document: {0}")]
    Json(#[from] serde_json::Error),
}

/// One per-media record of an ExifTool `-json -g` dump. All fields are
/// optional; the defaults applied when building a [`Pose`] are documented
/// on [`CameraIntrinsics`] and [`Pose`].
#[derive(Debug, Deserialize)]
struct MediaRecord {
    #[serde(rename = "GPS")]
    gps: Option<GpsGroup>,
    #[serde(rename = "FrameNumber")]
    frame_number: Option<u32>,
    #[serde(rename = "FocalLength")]
    focal_length: Option<f64>,
    #[serde(rename = "Aperture")]
    aperture: Option<f64>,
    #[serde(rename = "SensorWidth")]
    sensor_width: Option<f64>,
}

/// The `GPS` group of a media record.
#[derive(Debug, Deserialize)]
struct GpsGroup {
    #[serde(rename = "GPSLatitude")]
    latitude: Option<f64>,
    #[serde(rename = "GPSLongitude")]
    longitude: Option<f64>,
    #[serde(rename = "GPSAltitude")]
    altitude: Option<f64>,
    #[serde(rename = "GPSSpeed")]
    speed: Option<f64>,
}

/// Parse an ExifTool `-json -g` metadata dump into a [`Trajectory`].
///
/// One pose is emitted per record that carries a `GPS` group with both
/// latitude and longitude; records without them are skipped, this is not an
/// error. Records whose coordinates fall outside the valid WGS84 ranges are
/// skipped with a warning so one bad record never aborts the rest.
///
/// An `Ok` trajectory may be empty ("parsed fine, no GPS found"); `Err`
/// means the document itself is not parseable as an ExifTool dump.
///
/// # Example
///
/// ```
/// let doc = r#"[{"GPS": {"GPSLatitude": 47.0, "GPSLongitude": 8.0}}]"#;
/// let traj = dronemap_gps::metadata::parse_exiftool_json(doc).unwrap();
/// assert_eq!(traj.len(), 1);
/// ```
pub fn parse_exiftool_json(document: &str) -> Result<Trajectory, MetadataError> {
    let records: Vec<MediaRecord> = serde_json::from_str(document)?;

    let poses = records
        .iter()
        .filter_map(pose_from_record)
        .collect::<Vec<_>>();

    Ok(Trajectory::from_poses(poses))
}

fn pose_from_record(record: &MediaRecord) -> Option<Pose> {
    let gps = record.gps.as_ref()?;
    let (lat, lon) = match (gps.latitude, gps.longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return None,
    };

    let frame = frame_label(record.frame_number.unwrap_or(0));
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        log::warn!("skipping {frame}: coordinates ({lat}, {lon}) out of range");
        return None;
    }

    Some(Pose {
        frame,
        lat,
        lon,
        alt: gps.altitude.unwrap_or(0.0),
        speed: gps.speed.unwrap_or(0.0),
        orientation: Orientation::default(),
        camera: CameraIntrinsics {
            focal_length: record.focal_length.unwrap_or(24.0),
            aperture: record.aperture.unwrap_or(2.8),
            sensor_width: record.sensor_width.unwrap_or(13.2),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_RECORDS: &str = r#"[
        {"FrameNumber": 0, "GPS": {"GPSLatitude": 47.0, "GPSLongitude": 8.0, "GPSAltitude": 500.0}},
        {"FrameNumber": 1, "SourceFile": "clip.mp4"},
        {"FrameNumber": 2, "GPS": {"GPSLatitude": 47.0001, "GPSLongitude": 8.0001, "GPSAltitude": 510.0}}
    ]"#;

    #[test]
    fn test_records_without_gps_are_skipped() {
        let traj = parse_exiftool_json(THREE_RECORDS).unwrap();
        assert_eq!(traj.len(), 2);
        let labels: Vec<_> = traj.iter().map(|p| p.frame.as_str()).collect();
        assert_eq!(labels, ["frame_0000.png", "frame_0002.png"]);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let first = parse_exiftool_json(THREE_RECORDS).unwrap();
        let second = parse_exiftool_json(THREE_RECORDS).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_defaults_applied() {
        let doc = r#"[{"GPS": {"GPSLatitude": 47.0, "GPSLongitude": 8.0}}]"#;
        let traj = parse_exiftool_json(doc).unwrap();
        let pose = traj.get("frame_0000.png").unwrap();
        assert_eq!(pose.alt, 0.0);
        assert_eq!(pose.speed, 0.0);
        assert_eq!(pose.orientation, Orientation::default());
        assert_eq!(pose.camera.focal_length, 24.0);
        assert_eq!(pose.camera.aperture, 2.8);
        assert_eq!(pose.camera.sensor_width, 13.2);
    }

    #[test]
    fn test_camera_fields_from_record() {
        let doc = r#"[{
            "FrameNumber": 3,
            "FocalLength": 35.0,
            "Aperture": 4.0,
            "SensorWidth": 23.5,
            "GPS": {"GPSLatitude": 47.0, "GPSLongitude": 8.0, "GPSSpeed": 5.5}
        }]"#;
        let traj = parse_exiftool_json(doc).unwrap();
        let pose = traj.get("frame_0003.png").unwrap();
        assert_eq!(pose.camera.focal_length, 35.0);
        assert_eq!(pose.camera.aperture, 4.0);
        assert_eq!(pose.camera.sensor_width, 23.5);
        assert_eq!(pose.speed, 5.5);
    }

    #[test]
    fn test_missing_latitude_skips_record() {
        let doc = r#"[{"GPS": {"GPSLongitude": 8.0, "GPSAltitude": 500.0}}]"#;
        let traj = parse_exiftool_json(doc).unwrap();
        assert!(traj.is_empty());
    }

    #[test]
    fn test_out_of_range_coordinates_skipped() {
        let doc = r#"[
            {"FrameNumber": 0, "GPS": {"GPSLatitude": 91.0, "GPSLongitude": 8.0}},
            {"FrameNumber": 1, "GPS": {"GPSLatitude": 47.0, "GPSLongitude": 181.0}},
            {"FrameNumber": 2, "GPS": {"GPSLatitude": 47.0, "GPSLongitude": 8.0}}
        ]"#;
        let traj = parse_exiftool_json(doc).unwrap();
        assert_eq!(traj.len(), 1);
        assert!(traj.get("frame_0002.png").is_some());
    }

    #[test]
    fn test_unparseable_document_is_an_error() {
        assert!(parse_exiftool_json("not json at all").is_err());
        assert!(parse_exiftool_json(r#"{"GPS": {}}"#).is_err());
    }

    #[test]
    fn test_empty_document() {
        let traj = parse_exiftool_json("[]").unwrap();
        assert!(traj.is_empty());
    }
}
