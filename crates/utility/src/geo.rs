/// WGS-84 equatorial radius.
pub const WGS84_RADIUS_KM: f64 = 6378.137;
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Wraps an angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Wraps a longitude into `[-180, 180)`.
pub fn normalize_longitude(longitude: f64) -> f64 {
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

/// Converts an earth-fixed cartesian position (km) into geodetic
/// `(latitude, longitude, height_km)` on the WGS-84 ellipsoid.
pub fn ecef_to_geodetic(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let e2 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);
    let p = (x * x + y * y).sqrt();
    let longitude = y.atan2(x);

    // fixed-point iteration on the latitude, converges in a handful of steps
    let mut latitude = z.atan2(p * (1.0 - e2));
    let mut height = 0.0;
    for _ in 0..5 {
        let sin_lat = latitude.sin();
        let n = WGS84_RADIUS_KM / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        height = p / latitude.cos() - n;
        latitude = z.atan2(p * (1.0 - e2 * n / (n + height)));
    }

    (to_degrees(latitude), to_degrees(longitude), height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longitude_wraps_into_half_open_range() {
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-190.0), 170.0);
        assert_eq!(normalize_longitude(180.0), -180.0);
        assert_eq!(normalize_longitude(45.0), 45.0);
    }

    #[test]
    fn degrees_wrap_into_full_circle() {
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
    }

    #[test]
    fn geodetic_of_equator_and_pole() {
        let (lat, lon, height) = ecef_to_geodetic(WGS84_RADIUS_KM + 400.0, 0.0, 0.0);
        assert!(lat.abs() < 1e-9);
        assert!(lon.abs() < 1e-9);
        assert!((height - 400.0).abs() < 1e-6);

        // point 10 km above 45°N 90°E
        let e2 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);
        let phi = to_radians(45.0);
        let n = WGS84_RADIUS_KM / (1.0 - e2 * phi.sin().powi(2)).sqrt();
        let (lat, lon, height) = ecef_to_geodetic(
            0.0,
            (n + 10.0) * phi.cos(),
            (n * (1.0 - e2) + 10.0) * phi.sin(),
        );
        assert!((lat - 45.0).abs() < 1e-6);
        assert!((lon - 90.0).abs() < 1e-9);
        assert!((height - 10.0).abs() < 1e-3);
    }
}
