//! Forward map projections from geographic coordinates into a
//! raster's native coordinate system.
//!
//! # References
//!
//! 1. Snyder, J.P., _Map Projections: A Working Manual_, USGS
//!    Professional Paper 1395, pp. 98-103 (Albers equal-area conic).
//! 1. [EPSG:5070](https://epsg.io/5070)

use crate::C;
use geo::geometry::Coord;

/// Maps (longitude, latitude) in degrees to a projected coordinate.
pub trait Projection: Send + Sync {
    fn forward(&self, lonlat: Coord<C>) -> Coord<C>;
}

/// Albers equal-area conic on an ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Albers {
    /// Semi-major axis (meters).
    a: C,
    /// First eccentricity.
    e: C,
    /// Central meridian (radians).
    lon_0: C,
    /// Cone constant.
    n: C,
    c: C,
    /// Radius of the parallel of origin.
    rho_0: C,
    false_easting: C,
    false_northing: C,
}

/// GRS80 semi-major axis (meters).
const GRS80_A: C = 6_378_137.0;

/// GRS80 inverse flattening.
const GRS80_INV_F: C = 298.257_222_101;

impl Albers {
    /// Returns EPSG:5070, NAD83 / Conus Albers, the native CRS of the
    /// NLCD land-cover rasters.
    pub fn conus() -> Self {
        Self::new(GRS80_A, GRS80_INV_F, 29.5, 45.5, 23.0, -96.0, 0.0, 0.0)
    }

    #[allow(clippy::too_many_arguments, clippy::many_single_char_names)]
    pub fn new(
        a: C,
        inv_f: C,
        lat_1: C,
        lat_2: C,
        lat_0: C,
        lon_0: C,
        false_easting: C,
        false_northing: C,
    ) -> Self {
        let f = 1.0 / inv_f;
        let e = (2.0 * f - f * f).sqrt();
        let (lat_1, lat_2, lat_0) = (lat_1.to_radians(), lat_2.to_radians(), lat_0.to_radians());

        let m_1 = m(e, lat_1);
        let m_2 = m(e, lat_2);
        let q_1 = q(e, lat_1);
        let q_2 = q(e, lat_2);
        let q_0 = q(e, lat_0);

        let n = if (lat_1 - lat_2).abs() < C::EPSILON {
            lat_1.sin()
        } else {
            (m_1 * m_1 - m_2 * m_2) / (q_2 - q_1)
        };
        let c = m_1 * m_1 + n * q_1;
        let rho_0 = a * (c - n * q_0).sqrt() / n;

        Self {
            a,
            e,
            lon_0: lon_0.to_radians(),
            n,
            c,
            rho_0,
            false_easting,
            false_northing,
        }
    }
}

impl Projection for Albers {
    fn forward(&self, Coord { x: lon, y: lat }: Coord<C>) -> Coord<C> {
        let rho = self.a * (self.c - self.n * q(self.e, lat.to_radians())).max(0.0).sqrt() / self.n;
        let theta = self.n * (lon.to_radians() - self.lon_0);
        Coord {
            x: self.false_easting + rho * theta.sin(),
            y: self.false_northing + self.rho_0 - rho * theta.cos(),
        }
    }
}

/// Snyder eq. 14-15.
fn m(e: C, phi: C) -> C {
    let sin_phi = phi.sin();
    phi.cos() / (1.0 - e * e * sin_phi * sin_phi).sqrt()
}

/// Snyder eq. 3-12.
fn q(e: C, phi: C) -> C {
    let sin_phi = phi.sin();
    let e_sin = e * sin_phi;
    (1.0 - e * e)
        * (sin_phi / (1.0 - e_sin * e_sin) - (1.0 / (2.0 * e)) * ((1.0 - e_sin) / (1.0 + e_sin)).ln())
}
