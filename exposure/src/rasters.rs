//! Land-cover raster aggregator.

use crate::{
    lookup::{Frame, LandCoverLookup},
    ExposureError,
};
use dashmap::DashMap;
use geo::geometry::{Coord, Rect};
use landcover::{Albers, Header, LandCoverCode, Raster};
use log::debug;
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Coordinate reference system the rasters are stored in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crs {
    /// Longitude/latitude degrees.
    Geographic,

    /// EPSG:5070 meters, as NLCD is distributed.
    ConusAlbers(Albers),
}

impl Crs {
    pub fn conus_albers() -> Self {
        Crs::ConusAlbers(Albers::conus())
    }
}

/// A set of land-cover raster tiles sharing one CRS, queried as a
/// single [`LandCoverLookup`].
pub struct Rasters {
    /// Header of every known tile; index is the tile key.
    headers: Vec<Header>,

    /// Extent of every known tile, parallel to `headers`.
    extents: Vec<Rect<f64>>,

    /// How to load tiles (in-memory or mapped).
    tile_mode: TileMode,

    crs: Crs,

    /// Tiles which have been loaded on demand.
    tiles: DashMap<usize, Arc<Raster>>,
}

impl Rasters {
    /// Opens `path`, either a single `.hdr` raster header or a
    /// directory of them.
    ///
    /// Only headers are read here; sample data is loaded the first time
    /// a tile is queried.
    pub fn new<P: AsRef<Path>>(
        path: P,
        tile_mode: TileMode,
        crs: Crs,
    ) -> Result<Self, ExposureError> {
        let path = path.as_ref();
        let header_paths: Vec<PathBuf> = if path.is_dir() {
            let mut header_paths = Vec::new();
            for entry in std::fs::read_dir(path)? {
                let entry_path = entry?.path();
                if is_header(&entry_path) {
                    header_paths.push(entry_path);
                }
            }
            header_paths.sort();
            header_paths
        } else if is_header(path) {
            vec![path.to_owned()]
        } else {
            Vec::new()
        };

        if header_paths.is_empty() {
            return Err(ExposureError::Path(path.to_owned()));
        }

        let headers = header_paths
            .iter()
            .map(Header::open)
            .collect::<Result<Vec<Header>, _>>()?;
        let extents = headers.iter().map(landcover::bounds).collect();
        debug!("found {} land-cover tiles in {path:?}", headers.len());

        Ok(Self {
            headers,
            extents,
            tile_mode,
            crs,
            tiles: DashMap::new(),
        })
    }

    /// Returns the number of tiles in this set.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns the finest pixel width across tiles, in meters, if the
    /// rasters are stored in a projected CRS.
    pub fn pixel_size_m(&self) -> Option<f64> {
        match self.crs {
            Crs::Geographic => None,
            Crs::ConusAlbers(_) => self
                .headers
                .iter()
                .map(|header| header.x_dim.min(header.y_dim))
                .reduce(f64::min),
        }
    }

    /// Returns the tile containing `coord`, if any.
    ///
    /// The tile is loaded from disk if it isn't already in memory.
    pub fn get(&self, coord: Coord<f64>) -> Result<Option<Arc<Raster>>, ExposureError> {
        let Some(key) = self.extents.iter().position(|extent| covers(extent, coord)) else {
            return Ok(None);
        };
        self.tiles
            .entry(key)
            .or_try_insert_with(|| self.load_tile(key).map(Arc::new))
            .map(|r| Some(r.clone()))
    }
}

/// Private API.
impl Rasters {
    fn load_tile(&self, key: usize) -> Result<Raster, ExposureError> {
        let header_path = &self.headers[key].path;
        debug!("loading {header_path:?}");
        let raster = match self.tile_mode {
            TileMode::InMem => Raster::load(header_path)?,
            TileMode::MemMap => Raster::memmap(header_path)?,
        };
        Ok(raster)
    }
}

impl LandCoverLookup for Rasters {
    fn frame(&self) -> Frame<'_> {
        match &self.crs {
            Crs::Geographic => Frame::Geographic,
            Crs::ConusAlbers(albers) => Frame::Projected(albers),
        }
    }

    fn lookup(&self, coord: Coord<f64>) -> Result<Option<LandCoverCode>, ExposureError> {
        Ok(self.get(coord)?.and_then(|tile| tile.get(coord)))
    }
}

/// How to handle tile data.
///
/// The trade off between loading tile data into memory versus memory
/// mapping is not obvious, and you should measure both before
/// deciding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileMode {
    /// Read tile and load into memory.
    ///
    /// A full CONUS NLCD raster is ~17 GB at 8 bits per sample; prefer
    /// memory mapping or clip it first.
    InMem,

    /// Memory map file contents.
    MemMap,
}

/// Returns `true` if `coord` falls in a pixel of `extent`. Like the
/// pixel grid, extents own their west and north edges.
fn covers(extent: &Rect<f64>, Coord { x, y }: Coord<f64>) -> bool {
    (extent.min().x..extent.max().x).contains(&x) && y > extent.min().y && y <= extent.max().y
}

fn is_header(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(OsStr::to_str)
            .map_or(false, |ext| ext.eq_ignore_ascii_case("hdr"))
}
