use crate::{
    classify::classify,
    constants::{FETCH_HEIGHT_FACTOR, MAX_HEIGHT_FT, MAX_STEPS, METERS_PER_FOOT, MIN_FETCH_D_FT},
    lookup::{Frame, LandCoverLookup},
    math::{project, project_planar},
    Bearing, ExposureError, GeoPoint, RoughnessCategory,
};
use geo::geometry::Coord;
use landcover::LandCoverCode;
use std::sync::atomic::{AtomicBool, Ordering};

/// One classified point upwind of the site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionSample {
    pub bearing: Bearing,

    /// Distance from the site in meters.
    pub distance_m: f64,

    /// Location of this sample in the lookup's [`Frame`].
    pub coord: Coord<f64>,

    /// Land-cover code, `None` if the lookup had no data here.
    pub code: Option<LandCoverCode>,

    pub roughness: RoughnessCategory,
}

/// Returns the upwind distance, in feet, terrain is evaluated over
/// for a building `height_ft` tall.
pub fn fetch_distance_ft(height_ft: f64) -> f64 {
    (FETCH_HEIGHT_FACTOR * height_ft).max(MIN_FETCH_D_FT)
}

/// Walks outward from a site, one fixed step at a time, classifying
/// the land cover under each step.
pub struct Sampler<'a, L: ?Sized> {
    lookup: &'a L,

    /// Distance between consecutive samples (meters).
    step_m: f64,

    /// When set, abandons sampling with [`ExposureError::Cancelled`].
    cancel: Option<&'a AtomicBool>,
}

impl<'a, L> Sampler<'a, L>
where
    L: LandCoverLookup + ?Sized,
{
    pub fn new(lookup: &'a L, step_m: f64) -> Result<Self, ExposureError> {
        if !(step_m.is_finite() && step_m > 0.0) {
            return Err(ExposureError::StepSize(step_m));
        }
        Ok(Self {
            lookup,
            step_m,
            cancel: None,
        })
    }

    #[must_use]
    pub fn cancel_on(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn step_m(&self) -> f64 {
        self.step_m
    }

    /// Returns the number of samples taken along each bearing.
    ///
    /// Fails for heights outside (0, [`MAX_HEIGHT_FT`]] and when the
    /// count would exceed [`MAX_STEPS`].
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn step_count(&self, height_ft: f64) -> Result<usize, ExposureError> {
        if !(height_ft > 0.0 && height_ft <= MAX_HEIGHT_FT) {
            return Err(ExposureError::Height(height_ft));
        }
        let fetch_m = fetch_distance_ft(height_ft) * METERS_PER_FOOT;
        let steps = (fetch_m / self.step_m).floor();
        if steps > MAX_STEPS as f64 {
            return Err(ExposureError::StepCount(steps));
        }
        Ok(steps as usize)
    }

    /// Returns samples along `bearing`, nearest first.
    ///
    /// Sampling starts one step from `origin` and ends at the last
    /// whole step within the fetch distance. A point the lookup has no
    /// data for classifies as the default roughness and sampling
    /// carries on.
    pub fn sample(
        &self,
        origin: GeoPoint,
        bearing: Bearing,
        height_ft: f64,
    ) -> Result<Vec<DirectionSample>, ExposureError> {
        let steps = self.step_count(height_ft)?;
        let bearing_deg = bearing.degrees();
        let frame = self.lookup.frame();
        let projected_origin = match frame {
            Frame::Geographic => None,
            Frame::Projected(projection) => Some(projection.forward(origin.into())),
        };

        let mut samples = Vec::with_capacity(steps);
        for step in 1..=steps {
            if self.is_cancelled() {
                return Err(ExposureError::Cancelled);
            }
            #[allow(clippy::cast_precision_loss)]
            let distance_m = step as f64 * self.step_m;
            let coord = match projected_origin {
                None => project(origin, bearing_deg, distance_m).into(),
                Some(xy) => project_planar(xy, bearing_deg, distance_m),
            };
            let code = self.lookup.lookup(coord)?;
            samples.push(DirectionSample {
                bearing,
                distance_m,
                coord,
                code,
                roughness: classify(code),
            });
        }
        Ok(samples)
    }
}

/// Private API.
impl<'a, L: ?Sized> Sampler<'a, L> {
    fn is_cancelled(&self) -> bool {
        self.cancel
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }
}
