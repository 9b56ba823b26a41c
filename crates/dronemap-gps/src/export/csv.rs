use std::fmt::Write as _;
use std::path::Path;

use super::{fmt_f64, ExportError};
use crate::geo::geodetic_to_ecef;
use crate::trajectory::Trajectory;

/// Serialize a trajectory as the `gps_poses.csv` pose-prior format:
/// a `frame,x,y,z,roll,pitch,yaw` header followed by one row per pose in
/// trajectory order, with positions converted to ECEF meters.
///
/// A pose whose conversion fails aborts the export with the offending
/// frame label; a silent placeholder row would poison the downstream
/// reconstruction.
pub fn trajectory_to_csv(trajectory: &Trajectory) -> Result<String, ExportError> {
    let mut out = String::from("frame,x,y,z,roll,pitch,yaw\n");

    for pose in trajectory {
        let [x, y, z] =
            geodetic_to_ecef(pose.lat, pose.lon, pose.alt).map_err(|source| {
                ExportError::Convert {
                    frame: pose.frame.clone(),
                    source,
                }
            })?;
        let o = &pose.orientation;
        // infallible on String
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{}",
            pose.frame,
            fmt_f64(x),
            fmt_f64(y),
            fmt_f64(z),
            fmt_f64(o.roll),
            fmt_f64(o.pitch),
            fmt_f64(o.yaw)
        );
    }

    Ok(out)
}

/// Serialize a trajectory with [`trajectory_to_csv`] and write it to `path`.
pub fn write_gps_poses_csv(trajectory: &Trajectory, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let csv = trajectory_to_csv(trajectory)?;
    std::fs::write(path, csv)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::{frame_label, Pose};
    use approx::assert_relative_eq;

    fn two_pose_trajectory() -> Trajectory {
        Trajectory::from_poses(vec![
            Pose::new(frame_label(0), 47.0, 8.0, 500.0),
            Pose::new(frame_label(2), 47.0001, 8.0001, 510.0),
        ])
    }

    #[test]
    fn test_header_and_row_count() {
        let csv = trajectory_to_csv(&two_pose_trajectory()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "frame,x,y,z,roll,pitch,yaw");
        assert!(lines[1].starts_with("frame_0000.png,"));
        assert!(lines[2].starts_with("frame_0002.png,"));
    }

    #[test]
    fn test_round_trip_matches_converter() {
        let traj = two_pose_trajectory();
        let csv = trajectory_to_csv(&traj).unwrap();

        for (line, pose) in csv.lines().skip(1).zip(traj.iter()) {
            let fields: Vec<&str> = line.split(',').collect();
            assert_eq!(fields.len(), 7);
            assert_eq!(fields[0], pose.frame);

            let expected = geodetic_to_ecef(pose.lat, pose.lon, pose.alt).unwrap();
            for (field, want) in fields[1..4].iter().zip(expected) {
                let got: f64 = field.parse().unwrap();
                assert_relative_eq!(got, want, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_empty_trajectory_is_header_only() {
        let csv = trajectory_to_csv(&Trajectory::default()).unwrap();
        assert_eq!(csv, "frame,x,y,z,roll,pitch,yaw\n");
    }

    #[test]
    fn test_orientation_written() {
        let mut pose = Pose::new(frame_label(0), 47.0, 8.0, 500.0);
        pose.orientation.roll = 1.5;
        pose.orientation.pitch = -2.0;
        pose.orientation.yaw = 90.0;
        let csv = trajectory_to_csv(&Trajectory::from_poses(vec![pose])).unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with(",1.5,-2.0,90.0"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gps_poses.csv");
        write_gps_poses_csv(&two_pose_trajectory(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, trajectory_to_csv(&two_pose_trajectory()).unwrap());
    }
}
