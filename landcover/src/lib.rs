//! Single-band land-cover rasters in ESRI `.hdr` + `.bil` layout.
//!
//! This is the layout `gdal_translate -of EHdr` produces from the
//! NLCD GeoTIFF releases, which keeps a raster indexable with nothing
//! more than a memory map.
//!
//! # References
//!
//! 1. [NLCD land cover class legend](https://www.mrlc.gov/data/legends/national-land-cover-database-class-legend-and-description)
//! 1. [GDAL EHdr driver](https://gdal.org/drivers/raster/ehdr.html)

mod error;
mod header;
mod projection;

pub use crate::{
    error::LandCoverError,
    header::{ByteOrder, Header},
    projection::{Albers, Projection},
};
pub use geo;
use byteorder::{BigEndian as BE, LittleEndian as LE, ReadBytesExt};
use geo::geometry::{Coord, Rect};
use memmap2::Mmap;
use std::{fs::File, io::BufReader, path::Path};

/// Base floating point type used for all coordinates.
pub type C = f64;

/// A land-cover classification code, e.g. NLCD `11` (open water).
pub type LandCoverCode = u16;

pub struct Raster {
    header: Header,

    /// Land-cover samples, row-major from the upper-left pixel.
    samples: SampleStore,
}

enum SampleStore {
    InMem(Box<[LandCoverCode]>),
    MemMap {
        raw: Mmap,
        nbits: u8,
        byte_order: ByteOrder,
    },
}

impl SampleStore {
    fn get_unchecked(&self, index: usize) -> LandCoverCode {
        match self {
            Self::InMem(samples) => samples[index],
            Self::MemMap { raw, nbits: 8, .. } => LandCoverCode::from(raw[index]),
            Self::MemMap {
                raw, byte_order, ..
            } => {
                let start = index * 2;
                let bytes = [raw[start], raw[start + 1]];
                match byte_order {
                    ByteOrder::Little => u16::from_le_bytes(bytes),
                    ByteOrder::Big => u16::from_be_bytes(bytes),
                }
            }
        }
    }
}

impl Raster {
    /// Returns a Raster read into memory from the header at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LandCoverError> {
        let header = Header::open(path)?;
        let data_path = Self::checked_data_path(&header)?;
        let mut file = BufReader::new(File::open(data_path)?);

        let count = header.rows * header.cols;
        let mut sample_store = Vec::with_capacity(count);
        for _ in 0..count {
            let sample = match (header.nbits, header.byte_order) {
                (8, _) => LandCoverCode::from(file.read_u8()?),
                (_, ByteOrder::Little) => file.read_u16::<LE>()?,
                (_, ByteOrder::Big) => file.read_u16::<BE>()?,
            };
            sample_store.push(sample);
        }

        Ok(Self {
            header,
            samples: SampleStore::InMem(sample_store.into_boxed_slice()),
        })
    }

    /// Returns a Raster using the memory-mapped data file as storage.
    pub fn memmap<P: AsRef<Path>>(path: P) -> Result<Self, LandCoverError> {
        let header = Header::open(path)?;
        let data_path = Self::checked_data_path(&header)?;
        let samples = {
            let file = File::open(data_path)?;
            let raw = unsafe { Mmap::map(&file)? };
            SampleStore::MemMap {
                raw,
                nbits: header.nbits,
                byte_order: header.byte_order,
            }
        };
        Ok(Self { header, samples })
    }

    /// Returns the land-cover code at `coord`, or `None` if `coord` is
    /// outside this raster or lands on a NODATA pixel.
    pub fn get(&self, coord: Coord<C>) -> Option<LandCoverCode> {
        let (row, col) = self.coord_to_rc(coord)?;
        let code = self.samples.get_unchecked(row * self.header.cols + col);
        match self.header.nodata {
            Some(nodata) if nodata == code => None,
            _ => Some(code),
        }
    }
}

/// Private API
impl Raster {
    fn checked_data_path(header: &Header) -> Result<std::path::PathBuf, LandCoverError> {
        let data_path = header.data_path()?;
        let len = data_path.metadata()?.len();
        if len == header.data_len() {
            Ok(data_path)
        } else {
            Err(LandCoverError::RasterLen(len, data_path))
        }
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn coord_to_rc(&self, Coord { x, y }: Coord<C>) -> Option<(usize, usize)> {
        let col = ((x - self.header.west()) / self.header.x_dim).floor();
        let row = ((self.header.north() - y) / self.header.y_dim).floor();
        let in_bounds = (0.0..self.header.cols as C).contains(&col)
            && (0.0..self.header.rows as C).contains(&row);
        in_bounds.then(|| (row as usize, col as usize))
    }
}

/// Returns the outer edges described by `header`.
pub fn bounds(header: &Header) -> Rect<C> {
    Rect::new(
        Coord {
            x: header.west(),
            y: header.south(),
        },
        Coord {
            x: header.east(),
            y: header.north(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::{bounds, Coord, LandCoverError, Raster};
    use std::{fs, path::PathBuf};
    use tempfile::TempDir;

    /// Writes a 3x4 NLCD-like tile in EPSG:5070 meters with its
    /// upper-left corner at (1_000_000, 2_000_030).
    ///
    /// ```text
    /// 11 11 11
    /// 21 22 23
    /// 41  0 42
    /// 81 82 90
    /// ```
    fn write_tile(dir: &TempDir, name: &str, nbits: u8, byte_order: &str) -> PathBuf {
        let codes: [u16; 12] = [11, 11, 11, 21, 22, 23, 41, 0, 42, 81, 82, 90];
        let header = format!(
            "BYTEORDER {byte_order}\nLAYOUT BIL\nNROWS 4\nNCOLS 3\nNBANDS 1\nNBITS {nbits}\n\
             ULXMAP 1000015\nULYMAP 2000015\nXDIM 30\nYDIM 30\nNODATA 0\n"
        );
        let data: Vec<u8> = match (nbits, byte_order) {
            (8, _) => codes.iter().map(|&c| c as u8).collect(),
            (_, "M") => codes.iter().flat_map(|c| c.to_be_bytes()).collect(),
            _ => codes.iter().flat_map(|c| c.to_le_bytes()).collect(),
        };
        let hdr_path = dir.path().join(format!("{name}.hdr"));
        fs::write(&hdr_path, header).unwrap();
        fs::write(dir.path().join(format!("{name}.bil")), data).unwrap();
        hdr_path
    }

    #[test]
    fn test_load_and_memmap_agree() {
        let dir = TempDir::new().unwrap();
        for (name, nbits, order) in [("u8", 8, "I"), ("u16le", 16, "I"), ("u16be", 16, "M")] {
            let path = write_tile(&dir, name, nbits, order);
            let loaded = Raster::load(&path).unwrap();
            let mapped = Raster::memmap(&path).unwrap();
            for idx in 0..12 {
                assert_eq!(
                    loaded.samples.get_unchecked(idx),
                    mapped.samples.get_unchecked(idx),
                    "{name} sample {idx}"
                );
            }
        }
    }

    #[test]
    fn test_get() {
        let dir = TempDir::new().unwrap();
        let raster = Raster::memmap(write_tile(&dir, "tile", 8, "I")).unwrap();
        // Center of upper-left pixel.
        assert_eq!(raster.get(Coord { x: 1_000_015.0, y: 2_000_015.0 }), Some(11));
        // Second row, third column.
        assert_eq!(raster.get(Coord { x: 1_000_075.0, y: 1_999_990.0 }), Some(23));
        // Bottom-right pixel, just inside the corner.
        assert_eq!(raster.get(Coord { x: 1_000_089.9, y: 1_999_910.1 }), Some(90));
    }

    #[test]
    fn test_nodata_returns_none() {
        let dir = TempDir::new().unwrap();
        let raster = Raster::load(write_tile(&dir, "tile", 16, "M")).unwrap();
        assert_eq!(raster.get(Coord { x: 1_000_045.0, y: 1_999_960.0 }), None);
    }

    #[test]
    fn test_out_of_bounds_get_returns_none() {
        let dir = TempDir::new().unwrap();
        let raster = Raster::load(write_tile(&dir, "tile", 8, "I")).unwrap();
        // A smidge north.
        assert_eq!(raster.get(Coord { x: 1_000_045.0, y: 2_000_031.0 }), None);
        // A smidge east.
        assert_eq!(raster.get(Coord { x: 1_000_091.0, y: 1_999_960.0 }), None);
        // A smidge south.
        assert_eq!(raster.get(Coord { x: 1_000_045.0, y: 1_999_909.0 }), None);
        // A smidge west.
        assert_eq!(raster.get(Coord { x: 999_999.0, y: 1_999_960.0 }), None);
    }

    #[test]
    fn test_bounds() {
        let dir = TempDir::new().unwrap();
        let raster = Raster::load(write_tile(&dir, "tile", 8, "I")).unwrap();
        let extent = bounds(&raster.header);
        assert_eq!(extent.min(), Coord { x: 1_000_000.0, y: 1_999_910.0 });
        assert_eq!(extent.max(), Coord { x: 1_000_090.0, y: 2_000_030.0 });
        assert_eq!((raster.header.rows, raster.header.cols), (4, 3));
    }

    #[test]
    fn test_truncated_data_file() {
        let dir = TempDir::new().unwrap();
        let path = write_tile(&dir, "tile", 16, "I");
        fs::write(dir.path().join("tile.bil"), [0_u8; 7]).unwrap();
        assert!(matches!(
            Raster::load(&path),
            Err(LandCoverError::RasterLen(7, _))
        ));
    }

    #[test]
    fn test_missing_data_file() {
        let dir = TempDir::new().unwrap();
        let path = write_tile(&dir, "tile", 8, "I");
        fs::remove_file(dir.path().join("tile.bil")).unwrap();
        assert!(matches!(
            Raster::memmap(&path),
            Err(LandCoverError::DataFile(_))
        ));
    }
}
