use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LandCoverError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("missing header field {0} in {1}")]
    MissingField(&'static str, PathBuf),

    #[error("invalid header field {0} in {1}")]
    InvalidField(&'static str, PathBuf),

    #[error("unsupported raster {0} in {1}")]
    Unsupported(&'static str, PathBuf),

    #[error("no raster data file alongside {0}")]
    DataFile(PathBuf),

    #[error("invalid raster file len {0} for {1}")]
    RasterLen(u64, PathBuf),
}
