//! WGS84 geodetic to Earth-centered, Earth-fixed (ECEF) conversion.
//!
//! The original tool delegated this to a generic projection library
//! (EPSG:4326 to EPSG:4978); the transform is closed-form, so it is done
//! directly here. Invalid input is an explicit error rather than the
//! (0, 0, 0) sentinel the original returned, which a caller could not tell
//! apart from a legitimate near-origin coordinate.

/// WGS84 semi-major axis in meters.
pub const WGS84_A: f64 = 6_378_137.0;

/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Error types for the geo module.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// Latitude outside [-90, 90] degrees
    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude outside [-180, 180] degrees
    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// A coordinate component is NaN or infinite
    #[error("non-finite coordinate component")]
    NonFinite,
}

/// Convert a WGS84 geodetic coordinate (degrees, meters) to ECEF meters.
///
/// # Arguments
///
/// * `lat_deg` - Latitude in degrees, in [-90, 90].
/// * `lon_deg` - Longitude in degrees, in [-180, 180].
/// * `alt_m` - Altitude above the ellipsoid in meters.
///
/// # Returns
///
/// The `[x, y, z]` ECEF position in meters.
///
/// # Example
///
/// ```
/// use dronemap_gps::geo::geodetic_to_ecef;
///
/// let ecef = geodetic_to_ecef(0.0, 0.0, 0.0).unwrap();
/// assert!((ecef[0] - 6_378_137.0).abs() < 1e-6);
/// ```
pub fn geodetic_to_ecef(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Result<[f64; 3], GeoError> {
    if !lat_deg.is_finite() || !lon_deg.is_finite() || !alt_m.is_finite() {
        return Err(GeoError::NonFinite);
    }
    if !(-90.0..=90.0).contains(&lat_deg) {
        return Err(GeoError::LatitudeOutOfRange(lat_deg));
    }
    if !(-180.0..=180.0).contains(&lon_deg) {
        return Err(GeoError::LongitudeOutOfRange(lon_deg));
    }

    let e2 = WGS84_F * (2.0 - WGS84_F);
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();

    // prime vertical radius of curvature
    let n = WGS84_A / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    Ok([
        (n + alt_m) * cos_lat * cos_lon,
        (n + alt_m) * cos_lat * sin_lon,
        (n * (1.0 - e2) + alt_m) * sin_lat,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // WGS84 semi-minor axis
    const WGS84_B: f64 = 6_356_752.314_245_179;

    #[test]
    fn test_equator_prime_meridian() {
        let ecef = geodetic_to_ecef(0.0, 0.0, 0.0).unwrap();
        assert_relative_eq!(ecef[0], WGS84_A, epsilon = 1e-6);
        assert_relative_eq!(ecef[1], 0.0, epsilon = 1e-6);
        assert_relative_eq!(ecef[2], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_equator_east() {
        let ecef = geodetic_to_ecef(0.0, 90.0, 0.0).unwrap();
        assert_relative_eq!(ecef[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(ecef[1], WGS84_A, epsilon = 1e-6);
        assert_relative_eq!(ecef[2], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_north_pole() {
        let ecef = geodetic_to_ecef(90.0, 0.0, 0.0).unwrap();
        assert_relative_eq!(ecef[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(ecef[1], 0.0, epsilon = 1e-6);
        assert_relative_eq!(ecef[2], WGS84_B, epsilon = 1e-6);
    }

    #[test]
    fn test_altitude_adds_along_normal() {
        let surface = geodetic_to_ecef(0.0, 0.0, 0.0).unwrap();
        let lifted = geodetic_to_ecef(0.0, 0.0, 100.0).unwrap();
        assert_relative_eq!(lifted[0] - surface[0], 100.0, epsilon = 1e-6);
        assert_relative_eq!(lifted[1], 0.0, epsilon = 1e-6);
        assert_relative_eq!(lifted[2], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_out_of_range_is_error() {
        assert!(matches!(
            geodetic_to_ecef(90.5, 0.0, 0.0),
            Err(GeoError::LatitudeOutOfRange(_))
        ));
        assert!(matches!(
            geodetic_to_ecef(0.0, -180.5, 0.0),
            Err(GeoError::LongitudeOutOfRange(_))
        ));
        assert!(matches!(
            geodetic_to_ecef(f64::NAN, 0.0, 0.0),
            Err(GeoError::NonFinite)
        ));
    }

    #[test]
    fn test_known_location() {
        // Zurich-ish, checked against the standard closed-form transform
        let ecef = geodetic_to_ecef(47.0, 8.0, 500.0).unwrap();
        let norm = (ecef[0] * ecef[0] + ecef[1] * ecef[1] + ecef[2] * ecef[2]).sqrt();
        // geocentric radius must lie between the semi-minor and semi-major
        // axes plus the altitude
        assert!(norm > WGS84_B && norm < WGS84_A + 500.0);
        assert!(ecef[0] > 0.0 && ecef[1] > 0.0 && ecef[2] > 0.0);
    }
}
