//! Short-range destination points.
//!
//! Both routines treat the earth as locally flat. That holds to within
//! a few meters over the 1.5-5 km upwind fetches we walk, but east/west
//! displacement degrades as `cos(latitude)` approaches zero near the
//! poles.

use crate::{constants::METERS_PER_DEG_LAT, GeoPoint};
use geo::geometry::Coord;

/// Returns the point `distance_m` meters from `origin` along
/// `bearing_deg` (clockwise from north).
///
/// Latitude is clamped to [-90, 90] and longitude wrapped into
/// [-180, 180], so the result is always a valid point even when the
/// walk crosses a pole or the antimeridian.
pub fn project(origin: GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
    let (sin_b, cos_b) = bearing_deg.to_radians().sin_cos();
    let north_m = distance_m * cos_b;
    let east_m = distance_m * sin_b;

    let lat = origin.lat() + north_m / METERS_PER_DEG_LAT;
    let lon = origin.lon() + east_m / (METERS_PER_DEG_LAT * origin.lat().to_radians().cos());

    GeoPoint::new_unchecked(lat.clamp(-90.0, 90.0), wrap_lon(lon))
}

/// Returns the projected coordinate `distance_m` meters from `origin`
/// along `bearing_deg`, where `origin` is already in a metric
/// projected coordinate system (x east, y north).
pub fn project_planar(origin: Coord<f64>, bearing_deg: f64, distance_m: f64) -> Coord<f64> {
    let (sin_b, cos_b) = bearing_deg.to_radians().sin_cos();
    Coord {
        x: origin.x + distance_m * sin_b,
        y: origin.y + distance_m * cos_b,
    }
}

fn wrap_lon(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::{project, project_planar, wrap_lon, Coord};
    use crate::{constants::METERS_PER_DEG_LAT, Bearing, GeoPoint};
    use approx::assert_abs_diff_eq;
    use geo::{HaversineDestination, HaversineDistance, Point};

    #[test]
    fn test_project_north_and_east() {
        let origin = GeoPoint::new(0.0, 0.0).unwrap();

        let north = project(origin, 0.0, METERS_PER_DEG_LAT);
        assert_abs_diff_eq!(north.lat(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(north.lon(), 0.0, epsilon = 1e-12);

        let east = project(origin, 90.0, METERS_PER_DEG_LAT);
        assert_abs_diff_eq!(east.lat(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(east.lon(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_project_corrects_meridian_convergence() {
        let origin = GeoPoint::new(60.0, 10.0).unwrap();
        // cos(60°) = 0.5, so a degree of longitude is half as long.
        let east = project(origin, 90.0, METERS_PER_DEG_LAT);
        assert_abs_diff_eq!(east.lon(), 12.0, epsilon = 1e-9);
        let west = project(origin, 270.0, METERS_PER_DEG_LAT);
        assert_abs_diff_eq!(west.lon(), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_project_zero_distance() {
        let origin = GeoPoint::new(44.2705, -71.30325).unwrap();
        for bearing in Bearing::ALL {
            assert_eq!(project(origin, bearing.degrees(), 0.0), origin);
        }
    }

    #[test]
    fn test_project_agrees_with_haversine_over_fetch() {
        let origin = GeoPoint::new(40.7128, -74.006).unwrap();
        let start = Point::from(origin);
        for bearing in Bearing::ALL {
            let flat = Point::from(project(origin, bearing.degrees(), 1524.0));
            let sphere = start.haversine_destination(bearing.degrees(), 1524.0);
            assert!(
                flat.haversine_distance(&sphere) < 5.0,
                "{bearing}: {flat:?} vs {sphere:?}"
            );
        }
    }

    #[test]
    fn test_project_stays_in_range() {
        let near_pole = GeoPoint::new(89.999, 179.999).unwrap();
        for bearing in Bearing::ALL {
            let point = project(near_pole, bearing.degrees(), 5000.0);
            assert!((-90.0..=90.0).contains(&point.lat()));
            assert!((-180.0..=180.0).contains(&point.lon()));
        }
    }

    #[test]
    fn test_wrap_lon() {
        assert_eq!(wrap_lon(180.0), 180.0);
        assert_eq!(wrap_lon(-180.0), -180.0);
        assert_abs_diff_eq!(wrap_lon(181.0), -179.0, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_lon(-181.0), 179.0, epsilon = 1e-12);
    }

    #[test]
    fn test_project_planar() {
        let origin = Coord {
            x: 1_000_000.0,
            y: 2_000_000.0,
        };
        let ne = project_planar(origin, 45.0, 2.0_f64.sqrt() * 30.0);
        assert_abs_diff_eq!(ne.x, 1_000_030.0, epsilon = 1e-6);
        assert_abs_diff_eq!(ne.y, 2_000_030.0, epsilon = 1e-6);
        let s = project_planar(origin, 180.0, 300.0);
        assert_abs_diff_eq!(s.x, 1_000_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(s.y, 1_999_700.0, epsilon = 1e-6);
    }
}
