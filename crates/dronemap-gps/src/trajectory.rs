/// Camera body orientation in degrees.
///
/// Drone video metadata rarely carries attitude, so all components default
/// to 0.0 and pass through smoothing unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    /// Roll angle in degrees
    pub roll: f64,
    /// Pitch angle in degrees
    pub pitch: f64,
    /// Yaw angle in degrees
    pub yaw: f64,
}

/// Camera intrinsics as reported by the media metadata, with fallbacks for
/// a typical drone camera when the fields are absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    /// Focal length in millimeters (default 24.0)
    pub focal_length: f64,
    /// Aperture f-number (default 2.8)
    pub aperture: f64,
    /// Sensor width in millimeters (default 13.2, a 1-inch sensor)
    pub sensor_width: f64,
}

impl Default for CameraIntrinsics {
    fn default() -> Self {
        Self {
            focal_length: 24.0,
            aperture: 2.8,
            sensor_width: 13.2,
        }
    }
}

/// A single frame's position, orientation and camera parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    /// Frame label, e.g. "frame_0007.png", unique within a trajectory
    pub frame: String,
    /// Latitude in WGS84 degrees, in [-90, 90]
    pub lat: f64,
    /// Longitude in WGS84 degrees, in [-180, 180]
    pub lon: f64,
    /// Altitude in meters (0.0 when absent from metadata)
    pub alt: f64,
    /// Ground speed in m/s (0.0 when absent from metadata)
    pub speed: f64,
    /// Body orientation
    pub orientation: Orientation,
    /// Camera intrinsics
    pub camera: CameraIntrinsics,
}

impl Pose {
    /// Creates a pose at the given geodetic position with default
    /// orientation, speed and camera intrinsics.
    pub fn new(frame: impl Into<String>, lat: f64, lon: f64, alt: f64) -> Self {
        Self {
            frame: frame.into(),
            lat,
            lon,
            alt,
            speed: 0.0,
            orientation: Orientation::default(),
            camera: CameraIntrinsics::default(),
        }
    }
}

/// Format a frame index as the canonical frame label used across the
/// pipeline ("frame_0007.png" for index 7). Matches the `frame_%04d.png`
/// pattern ffmpeg writes extracted frames with.
pub fn frame_label(index: u32) -> String {
    format!("frame_{index:04}.png")
}

/// An ordered sequence of poses representing a flight path over time.
///
/// Poses are kept sorted by frame label; label order is what smoothing
/// treats as temporal adjacency. Labels are unique: inserting a pose with
/// an existing label replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    poses: Vec<Pose>,
}

impl Trajectory {
    /// Builds a trajectory from a set of poses, sorting by frame label and
    /// keeping the last pose for any duplicated label.
    pub fn from_poses(mut poses: Vec<Pose>) -> Self {
        poses.sort_by(|a, b| a.frame.cmp(&b.frame));
        // last-wins on duplicate labels; after a stable sort the later
        // insertion is the later element of each equal run
        poses.dedup_by(|next, prev| {
            if next.frame == prev.frame {
                std::mem::swap(prev, next);
                true
            } else {
                false
            }
        });
        Self { poses }
    }

    /// Number of poses.
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// True when the trajectory holds no poses.
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Iterates over poses in frame-label order.
    pub fn iter(&self) -> std::slice::Iter<'_, Pose> {
        self.poses.iter()
    }

    /// Looks up a pose by its frame label.
    pub fn get(&self, frame: &str) -> Option<&Pose> {
        self.poses.iter().find(|p| p.frame == frame)
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Pose;
    type IntoIter = std::slice::Iter<'a, Pose>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
