//! # Wind Exposure
//!
//! `exposure` classifies a building site's ASCE 7 wind exposure
//! category from the land cover upwind of it.
//!
//! Terrain is sampled outward from the site along eight bearings. Each
//! sample's land-cover code maps to a surface roughness category, each
//! bearing's samples reduce to an exposure category, and the most
//! exposed bearing governs the site.
//!
//! ```no_run
//! use exposure::{classify_exposure, Crs, Rasters, TileMode};
//!
//! let nlcd = Rasters::new("data/nlcd", TileMode::MemMap, Crs::conus_albers())?;
//! let report = classify_exposure(41.52, -70.67, 35.0, &nlcd)?;
//! println!("exposure {}", report.governing);
//! # Ok::<(), exposure::ExposureError>(())
//! ```

pub mod classify;
pub mod constants;
mod error;
pub mod lookup;
mod math;
mod rasters;
pub mod reduce;
mod report;
pub mod sample;
pub mod select;
mod types;

pub use crate::{
    error::ExposureError,
    lookup::{Frame, LandCoverLookup},
    math::{project, project_planar},
    rasters::{Crs, Rasters, TileMode},
    reduce::Reducer,
    report::{classify_exposure, DataBasis, DirectionResult, ExposureReport, ExposureReportBuilder},
    sample::DirectionSample,
    types::{Bearing, GeoPoint, RoughnessCategory},
};
pub use {geo, landcover};
