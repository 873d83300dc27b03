use crate::ExposureError;
use geo::geometry::{Coord, Point};
use std::fmt;

/// A validated geographic location in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Result<Self, ExposureError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ExposureError::Latitude(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(ExposureError::Longitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Builds a point from components already known to be in range.
    pub(crate) fn new_unchecked(lat: f64, lon: f64) -> Self {
        debug_assert!((-90.0..=90.0).contains(&lat));
        debug_assert!((-180.0..=180.0).contains(&lon));
        Self { lat, lon }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(GeoPoint { lat, lon }: GeoPoint) -> Self {
        Coord { x: lon, y: lat }
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(point: GeoPoint) -> Self {
        Point::from(Coord::from(point))
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// One of the eight compass directions upwind terrain is evaluated
/// along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bearing {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Bearing {
    /// All bearings, clockwise from north.
    pub const ALL: [Bearing; 8] = [
        Bearing::N,
        Bearing::NE,
        Bearing::E,
        Bearing::SE,
        Bearing::S,
        Bearing::SW,
        Bearing::W,
        Bearing::NW,
    ];

    /// Half the width of the sector each bearing stands for.
    const HALF_SECTOR_DEG: f64 = 22.5;

    /// Degrees clockwise from north.
    pub fn degrees(self) -> f64 {
        match self {
            Bearing::N => 0.0,
            Bearing::NE => 45.0,
            Bearing::E => 90.0,
            Bearing::SE => 135.0,
            Bearing::S => 180.0,
            Bearing::SW => 225.0,
            Bearing::W => 270.0,
            Bearing::NW => 315.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Bearing::N => "N",
            Bearing::NE => "NE",
            Bearing::E => "E",
            Bearing::SE => "SE",
            Bearing::S => "S",
            Bearing::SW => "SW",
            Bearing::W => "W",
            Bearing::NW => "NW",
        }
    }

    /// Returns the (start, end) of this bearing's 45° sector, in
    /// degrees clockwise from north. `start` is greater than `end` for
    /// the sector straddling north.
    pub fn sector(self) -> (f64, f64) {
        let start = (self.degrees() - Self::HALF_SECTOR_DEG).rem_euclid(360.0);
        let end = (self.degrees() + Self::HALF_SECTOR_DEG).rem_euclid(360.0);
        (start, end)
    }
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// ASCE 7 surface roughness / exposure category.
///
/// Variant order is not precedence; see
/// [`RoughnessCategory::precedence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoughnessCategory {
    /// Urban, suburban, wooded, or otherwise closely obstructed
    /// terrain.
    B,
    /// Open terrain with scattered obstructions.
    C,
    /// Flat, unobstructed terrain and water surfaces.
    D,
}

impl RoughnessCategory {
    /// Rank used to pick the governing exposure; higher ranks produce
    /// higher design wind loads.
    pub fn precedence(self) -> u8 {
        match self {
            RoughnessCategory::B => 0,
            RoughnessCategory::C => 1,
            RoughnessCategory::D => 2,
        }
    }

    pub fn letter(self) -> char {
        match self {
            RoughnessCategory::B => 'B',
            RoughnessCategory::C => 'C',
            RoughnessCategory::D => 'D',
        }
    }
}

impl Default for RoughnessCategory {
    fn default() -> Self {
        RoughnessCategory::C
    }
}

impl fmt::Display for RoughnessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::{Bearing, Coord, GeoPoint, RoughnessCategory};
    use crate::ExposureError;

    #[test]
    fn test_geo_point_validation() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
        assert!(matches!(
            GeoPoint::new(91.0, 0.0),
            Err(ExposureError::Latitude(_))
        ));
        assert!(matches!(
            GeoPoint::new(0.0, -181.0),
            Err(ExposureError::Longitude(_))
        ));
        assert!(matches!(
            GeoPoint::new(f64::NAN, 0.0),
            Err(ExposureError::Latitude(_))
        ));
    }

    #[test]
    fn test_geo_point_to_coord() {
        let point = GeoPoint::new(44.2705, -71.30325).unwrap();
        assert_eq!(
            Coord::from(point),
            Coord {
                x: -71.30325,
                y: 44.2705
            }
        );
    }

    #[test]
    fn test_bearings_evenly_spaced() {
        for (idx, bearing) in Bearing::ALL.iter().enumerate() {
            assert_eq!(bearing.degrees(), 45.0 * idx as f64);
            assert!((0.0..360.0).contains(&bearing.degrees()));
        }
    }

    #[test]
    fn test_sector() {
        assert_eq!(Bearing::N.sector(), (337.5, 22.5));
        assert_eq!(Bearing::E.sector(), (67.5, 112.5));
        assert_eq!(Bearing::NW.sector(), (292.5, 337.5));
    }

    #[test]
    fn test_precedence() {
        use RoughnessCategory::{B, C, D};
        assert!(D.precedence() > C.precedence());
        assert!(C.precedence() > B.precedence());
        assert_eq!(RoughnessCategory::default(), C);
        assert_eq!(D.to_string(), "D");
    }
}
