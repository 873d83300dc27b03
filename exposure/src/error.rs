use crate::constants::{MAX_HEIGHT_FT, MAX_STEPS};
use landcover::LandCoverError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExposureError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),

    #[error("building height {0} ft is outside (0, {max}]", max = MAX_HEIGHT_FT)]
    Height(f64),

    #[error("step size {0} m must be greater than 0")]
    StepSize(f64),

    #[error("{0} samples per direction exceeds the limit of {max}", max = MAX_STEPS)]
    StepCount(f64),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("no land-cover rasters in {0}")]
    Path(PathBuf),

    #[error("{0}")]
    LandCover(#[from] LandCoverError),

    #[error("land-cover source unavailable: {0}")]
    Source(String),

    #[error("classification cancelled")]
    Cancelled,
}

impl ExposureError {
    /// Returns `true` if this error rejects the caller's input, as
    /// opposed to a failure of the land-cover source.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Builder(_)
                | Self::Latitude(_)
                | Self::Longitude(_)
                | Self::Height(_)
                | Self::StepSize(_)
                | Self::StepCount(_)
        )
    }
}
