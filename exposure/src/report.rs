use crate::{
    constants::{DEFAULT_STEP_M, MAX_HEIGHT_FT, MAX_STEPS, REFERENCES},
    lookup::LandCoverLookup,
    reduce::{majority, FetchTally, Reducer},
    sample::{fetch_distance_ft, DirectionSample, Sampler},
    select::select,
    Bearing, ExposureError, GeoPoint, RoughnessCategory,
};
use landcover::LandCoverCode;
use log::{debug, warn};
use rayon::prelude::*;
use std::sync::{atomic::AtomicBool, Arc};

/// Whether a direction's exposure came from land-cover data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBasis {
    /// Every sample had a land-cover code.
    Measured,

    /// Some samples had no land-cover code and were treated as the
    /// default roughness.
    Partial { missing: usize },

    /// No sample had a land-cover code (or there were no samples);
    /// the exposure is the default.
    Defaulted,
}

/// Classified upwind terrain along one bearing.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionResult {
    pub bearing: Bearing,

    /// Samples ordered nearest first.
    pub samples: Vec<DirectionSample>,

    pub sample_count: usize,

    /// Most frequent known land-cover code.
    pub dominant_code: Option<LandCoverCode>,

    /// Most frequent sample roughness.
    pub roughness: RoughnessCategory,

    /// Exposure category after reduction.
    pub exposure: RoughnessCategory,

    pub basis: DataBasis,

    /// Human readable rationale for `exposure`.
    pub note: String,
}

impl DirectionResult {
    pub fn new(
        bearing: Bearing,
        samples: Vec<DirectionSample>,
        height_ft: f64,
        reducer: Reducer,
    ) -> Self {
        let sample_count = samples.len();
        let missing = samples.iter().filter(|s| s.code.is_none()).count();
        let basis = match missing {
            0 if sample_count > 0 => DataBasis::Measured,
            n if n == sample_count => DataBasis::Defaulted,
            n => DataBasis::Partial { missing: n },
        };

        let dominant_code = majority(samples.iter().filter_map(|s| s.code));
        let roughness = majority(samples.iter().map(|s| s.roughness)).unwrap_or_default();
        let exposure = match basis {
            DataBasis::Defaulted => RoughnessCategory::default(),
            _ => reducer.reduce(&samples, height_ft),
        };

        if basis == DataBasis::Defaulted && sample_count > 0 {
            warn!("{bearing}: no land-cover data for any of {sample_count} samples");
        }

        let note = note(&samples, height_ft, reducer, basis, exposure);
        Self {
            bearing,
            samples,
            sample_count,
            dominant_code,
            roughness,
            exposure,
            basis,
            note,
        }
    }

    /// Returns the angular sector this direction stands for.
    pub fn sector(&self) -> (f64, f64) {
        self.bearing.sector()
    }
}

fn note(
    samples: &[DirectionSample],
    height_ft: f64,
    reducer: Reducer,
    basis: DataBasis,
    exposure: RoughnessCategory,
) -> String {
    let n = samples.len();
    let base = match (basis, reducer) {
        (DataBasis::Defaulted, _) if n == 0 => format!(
            "no samples within the {:.0} ft fetch; defaulted to exposure {exposure}",
            fetch_distance_ft(height_ft)
        ),
        (DataBasis::Defaulted, _) => {
            format!("land-cover data unavailable for all {n} samples; defaulted to exposure {exposure}")
        }
        (_, Reducer::Majority) => {
            format!("{exposure} is the most frequent roughness among {n} samples")
        }
        (_, Reducer::Threshold) => {
            let tally = FetchTally::new(samples, height_ft);
            match exposure {
                RoughnessCategory::D => format!(
                    "roughness D extends {:.0} ft upwind, meeting the {:.0} ft requirement",
                    tally.d_ft, tally.required_d_ft
                ),
                RoughnessCategory::B => format!(
                    "roughness B extends {:.0} ft upwind, meeting the {:.0} ft requirement",
                    tally.b_ft, tally.required_b_ft
                ),
                RoughnessCategory::C => format!(
                    "neither roughness B ({:.0} of {:.0} ft) nor D ({:.0} of {:.0} ft) prevails upwind",
                    tally.b_ft, tally.required_b_ft, tally.d_ft, tally.required_d_ft
                ),
            }
        }
    };
    match basis {
        DataBasis::Partial { missing } => {
            format!("{base}; {missing} of {n} samples lacked land-cover data and count as C")
        }
        _ => base,
    }
}

/// Governing wind exposure for a site, with the per-direction
/// breakdown it was selected from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureReport {
    pub origin: GeoPoint,

    pub height_ft: f64,

    /// Distance between samples (meters).
    pub step_m: f64,

    pub reducer: Reducer,

    /// One result per bearing, in [`Bearing::ALL`] order.
    pub directions: [DirectionResult; 8],

    pub governing: RoughnessCategory,

    /// Standard sections the classification follows.
    pub references: [&'static str; 2],
}

impl ExposureReport {
    pub fn builder() -> ExposureReportBuilder {
        ExposureReportBuilder {
            lat: None,
            lon: None,
            height_ft: None,
            step_m: DEFAULT_STEP_M,
            reducer: Reducer::default(),
            cancel: None,
        }
    }

    pub fn direction(&self, bearing: Bearing) -> &DirectionResult {
        &self.directions[bearing as usize]
    }
}

pub struct ExposureReportBuilder {
    /// Site latitude (degrees, required).
    lat: Option<f64>,

    /// Site longitude (degrees, required).
    lon: Option<f64>,

    /// Building height (feet, required).
    height_ft: Option<f64>,

    /// Distance between samples (meters, defaults to 30).
    step_m: f64,

    /// Defaults to [`Reducer::Threshold`].
    reducer: Reducer,

    cancel: Option<Arc<AtomicBool>>,
}

impl ExposureReportBuilder {
    #[must_use]
    pub fn origin(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    #[must_use]
    pub fn height_ft(mut self, height_ft: f64) -> Self {
        self.height_ft = Some(height_ft);
        self
    }

    /// Distance between samples; should match the land-cover source's
    /// pixel size.
    #[must_use]
    pub fn step_size(mut self, meters: f64) -> Self {
        self.step_m = meters;
        self
    }

    #[must_use]
    pub fn reducer(mut self, reducer: Reducer) -> Self {
        self.reducer = reducer;
        self
    }

    /// Abandon the build, returning [`ExposureError::Cancelled`], once
    /// `flag` is set.
    #[must_use]
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Validates inputs, then samples all eight bearings in parallel.
    ///
    /// Heights above [`MAX_HEIGHT_FT`] and step sizes that would take
    /// more than [`MAX_STEPS`] samples per bearing are rejected before
    /// any lookup. Either every direction completes or no report is
    /// returned.
    pub fn build<L>(&self, lookup: &L) -> Result<ExposureReport, ExposureError>
    where
        L: LandCoverLookup + ?Sized,
    {
        let lat = self.lat.ok_or(ExposureError::Builder("latitude"))?;
        let lon = self.lon.ok_or(ExposureError::Builder("longitude"))?;
        let height_ft = self.height_ft.ok_or(ExposureError::Builder("height_ft"))?;

        let origin = GeoPoint::new(lat, lon)?;
        let sampler = {
            let sampler = Sampler::new(lookup, self.step_m)?;
            match self.cancel.as_deref() {
                Some(flag) => sampler.cancel_on(flag),
                None => sampler,
            }
        };
        let steps = sampler.step_count(height_ft)?;

        let now = std::time::Instant::now();
        let mut samples: [Vec<DirectionSample>; 8] = Default::default();
        samples
            .par_iter_mut()
            .zip(Bearing::ALL.par_iter())
            .try_for_each(|(slot, &bearing)| -> Result<(), ExposureError> {
                *slot = sampler.sample(origin, bearing, height_ft)?;
                Ok(())
            })?;
        let directions: [DirectionResult; 8] = std::array::from_fn(|idx| {
            DirectionResult::new(
                Bearing::ALL[idx],
                std::mem::take(&mut samples[idx]),
                height_ft,
                self.reducer,
            )
        });
        let governing = select(&directions);

        debug!(
            "exposure; site: {origin}, height: {height_ft} ft, steps: {steps}, governing: {governing}, exec: {:?}",
            now.elapsed()
        );

        Ok(ExposureReport {
            origin,
            height_ft,
            step_m: sampler.step_m(),
            reducer: self.reducer,
            directions,
            governing,
            references: REFERENCES,
        })
    }
}

/// Classifies the site at (`lat`, `lon`) for a building `height_ft`
/// tall, sampling at the default 30 m step with the threshold reducer.
pub fn classify_exposure<L>(
    lat: f64,
    lon: f64,
    height_ft: f64,
    lookup: &L,
) -> Result<ExposureReport, ExposureError>
where
    L: LandCoverLookup + ?Sized,
{
    ExposureReport::builder()
        .origin(lat, lon)
        .height_ft(height_ft)
        .build(lookup)
}
