use crate::ExposureError;
use geo::geometry::Coord;
use landcover::{LandCoverCode, Projection};

/// The coordinate system a [`LandCoverLookup`] is queried in.
#[derive(Clone, Copy)]
pub enum Frame<'a> {
    /// Query coordinates are (longitude, latitude) in degrees.
    Geographic,

    /// Query coordinates are meters in `projection`'s coordinate
    /// system.
    Projected(&'a dyn Projection),
}

impl<'a> std::fmt::Debug for Frame<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frame::Geographic => f.write_str("Geographic"),
            Frame::Projected(_) => f.write_str("Projected"),
        }
    }
}

/// A source of land-cover codes.
///
/// Implementations must fold every per-point failure (out of extent,
/// no data, timeout, malformed response) into `Ok(None)`. `Err` is
/// reserved for failures of the source as a whole, which abort the
/// entire classification.
pub trait LandCoverLookup: Sync {
    /// Coordinate system `lookup` expects.
    fn frame(&self) -> Frame<'_> {
        Frame::Geographic
    }

    fn lookup(&self, coord: Coord<f64>) -> Result<Option<LandCoverCode>, ExposureError>;
}

/// Any infallible per-point function is a geographic lookup.
impl<F> LandCoverLookup for F
where
    F: Fn(Coord<f64>) -> Option<LandCoverCode> + Sync,
{
    fn lookup(&self, coord: Coord<f64>) -> Result<Option<LandCoverCode>, ExposureError> {
        Ok(self(coord))
    }
}

#[cfg(test)]
mod tests {
    use super::{Coord, Frame, LandCoverLookup};

    #[test]
    fn test_closure_lookup() {
        let water_north_of_equator = |coord: Coord<f64>| (coord.y > 0.0).then_some(11_u16);
        assert!(matches!(water_north_of_equator.frame(), Frame::Geographic));
        assert_eq!(
            water_north_of_equator
                .lookup(Coord { x: 0.0, y: 1.0 })
                .unwrap(),
            Some(11)
        );
        assert_eq!(
            water_north_of_equator
                .lookup(Coord { x: 0.0, y: -1.0 })
                .unwrap(),
            None
        );
    }
}
