use crate::trajectory::{Pose, Trajectory};

/// Default moving-average window width.
pub const DEFAULT_WINDOW: usize = 5;

/// Smooth a GPS trajectory with a centered moving average of width `window`
/// applied independently to the latitude, longitude and altitude series.
/// Orientation, speed and camera fields pass through unchanged, as do the
/// frame labels and their ordering.
///
/// A trajectory with fewer poses than `window` is returned as-is: below the
/// window there is nothing meaningful to average, and the no-op is policy,
/// not a failure. A `window` of 0 or 1 is likewise an identity.
///
/// Edges are handled by replicating the first/last sample `window / 2`
/// times before convolving, so the output length equals the input length
/// and endpoints stay biased toward their original values instead of being
/// pulled toward zero.
pub fn smooth_trajectory(trajectory: &Trajectory, window: usize) -> Trajectory {
    if window <= 1 || trajectory.len() < window {
        return trajectory.clone();
    }

    let lat = moving_average(trajectory.iter().map(|p| p.lat), trajectory.len(), window);
    let lon = moving_average(trajectory.iter().map(|p| p.lon), trajectory.len(), window);
    let alt = moving_average(trajectory.iter().map(|p| p.alt), trajectory.len(), window);

    let poses = trajectory
        .iter()
        .enumerate()
        .map(|(i, pose)| Pose {
            lat: lat[i],
            lon: lon[i],
            alt: alt[i],
            ..pose.clone()
        })
        .collect();

    Trajectory::from_poses(poses)
}

/// Box filter with edge-replicated padding. Clamping the window indices to
/// the series bounds is equivalent to padding with `window / 2` copies of
/// each endpoint and taking the valid part of the convolution.
fn moving_average(series: impl Iterator<Item = f64>, len: usize, window: usize) -> Vec<f64> {
    let values: Vec<f64> = series.collect();
    debug_assert_eq!(values.len(), len);

    let half = window / 2;
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        let sum: f64 = (0..window)
            .map(|k| {
                let j = (i + k).saturating_sub(half).min(len - 1);
                values[j]
            })
            .sum();
        out.push(sum / window as f64);
    }
    out
}
