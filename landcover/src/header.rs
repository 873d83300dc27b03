//! ESRI `.hdr` raster header.
//!
//! # References
//!
//! 1. [ESRI BIL/BIP/BSQ](https://desktop.arcgis.com/en/arcmap/latest/manage-data/raster-and-images/bil-bip-and-bsq-raster-files.htm)
//! 1. [GDAL EHdr driver](https://gdal.org/drivers/raster/ehdr.html)

use crate::{LandCoverError, C};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Byte order of multi-byte samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// `BYTEORDER I` (Intel).
    Little,
    /// `BYTEORDER M` (Motorola).
    Big,
}

/// Parsed contents of a single-band `.hdr` file.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Path of the `.hdr` file itself.
    pub path: PathBuf,

    pub rows: usize,

    pub cols: usize,

    /// Bits per sample, either 8 or 16.
    pub nbits: u8,

    pub byte_order: ByteOrder,

    /// X coordinate of the _center_ of the upper-left pixel.
    pub ul_x: C,

    /// Y coordinate of the _center_ of the upper-left pixel.
    pub ul_y: C,

    /// Pixel width in raster units.
    pub x_dim: C,

    /// Pixel height in raster units.
    pub y_dim: C,

    /// Sample value marking absent data, if any.
    pub nodata: Option<u16>,
}

impl Header {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LandCoverError> {
        let text = fs::read_to_string(&path)?;
        Self::parse(&text, path.as_ref())
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self, LandCoverError> {
        let fields: Vec<(String, &str)> = text
            .lines()
            .filter_map(|line| {
                let mut words = line.split_whitespace();
                let key = words.next()?;
                let value = words.next()?;
                Some((key.to_ascii_uppercase(), value))
            })
            .collect();

        let raw = |key: &'static str| {
            fields
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, value)| *value)
        };
        let required = |key: &'static str| {
            raw(key).ok_or_else(|| LandCoverError::MissingField(key, path.to_owned()))
        };
        let invalid = |key: &'static str| LandCoverError::InvalidField(key, path.to_owned());

        let rows = required("NROWS")?
            .parse::<usize>()
            .map_err(|_| invalid("NROWS"))?;
        let cols = required("NCOLS")?
            .parse::<usize>()
            .map_err(|_| invalid("NCOLS"))?;
        let ul_x = required("ULXMAP")?
            .parse::<C>()
            .map_err(|_| invalid("ULXMAP"))?;
        let ul_y = required("ULYMAP")?
            .parse::<C>()
            .map_err(|_| invalid("ULYMAP"))?;
        let x_dim = required("XDIM")?
            .parse::<C>()
            .map_err(|_| invalid("XDIM"))?;
        let y_dim = required("YDIM")?
            .parse::<C>()
            .map_err(|_| invalid("YDIM"))?;

        if rows == 0 || cols == 0 {
            return Err(invalid(if rows == 0 { "NROWS" } else { "NCOLS" }));
        }
        if !(x_dim.is_finite() && x_dim > 0.0) {
            return Err(invalid("XDIM"));
        }
        if !(y_dim.is_finite() && y_dim > 0.0) {
            return Err(invalid("YDIM"));
        }

        let nbits = match raw("NBITS") {
            None => 8,
            Some(value) => value.parse::<u8>().map_err(|_| invalid("NBITS"))?,
        };
        if nbits != 8 && nbits != 16 {
            return Err(LandCoverError::Unsupported("bit depth", path.to_owned()));
        }

        if let Some(bands) = raw("NBANDS") {
            if bands.parse::<u32>().map_err(|_| invalid("NBANDS"))? != 1 {
                return Err(LandCoverError::Unsupported("band count", path.to_owned()));
            }
        }

        let byte_order = match raw("BYTEORDER").map(str::to_ascii_uppercase).as_deref() {
            None | Some("I" | "LSBFIRST") => ByteOrder::Little,
            Some("M" | "MSBFIRST") => ByteOrder::Big,
            Some(_) => return Err(invalid("BYTEORDER")),
        };

        // GDAL writes NODATA as a float literal, e.g. `NODATA 0.0`.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let nodata = match raw("NODATA").or_else(|| raw("NODATA_VALUE")) {
            None => None,
            Some(value) => {
                let value = value.parse::<C>().map_err(|_| invalid("NODATA"))?;
                (0.0..=C::from(u16::MAX))
                    .contains(&value)
                    .then_some(value as u16)
            }
        };

        Ok(Self {
            path: path.to_owned(),
            rows,
            cols,
            nbits,
            byte_order,
            ul_x,
            ul_y,
            x_dim,
            y_dim,
            nodata,
        })
    }

    /// Returns the number of bytes one sample occupies.
    pub fn sample_width(&self) -> usize {
        usize::from(self.nbits / 8)
    }

    /// Returns the expected size, in bytes, of the data file.
    pub fn data_len(&self) -> u64 {
        (self.rows * self.cols * self.sample_width()) as u64
    }

    /// Returns the path of the data file accompanying this header.
    pub fn data_path(&self) -> Result<PathBuf, LandCoverError> {
        ["bil", "bsq", "bip", "BIL", "BSQ", "BIP"]
            .iter()
            .map(|ext| self.path.with_extension(ext))
            .find(|candidate| candidate.exists())
            .ok_or_else(|| LandCoverError::DataFile(self.path.clone()))
    }

    /// West edge of the raster's extent.
    pub fn west(&self) -> C {
        self.ul_x - self.x_dim / 2.0
    }

    /// North edge of the raster's extent.
    pub fn north(&self) -> C {
        self.ul_y + self.y_dim / 2.0
    }

    /// East edge of the raster's extent.
    #[allow(clippy::cast_precision_loss)]
    pub fn east(&self) -> C {
        self.west() + self.cols as C * self.x_dim
    }

    /// South edge of the raster's extent.
    #[allow(clippy::cast_precision_loss)]
    pub fn south(&self) -> C {
        self.north() - self.rows as C * self.y_dim
    }
}

#[cfg(test)]
mod tests {
    use super::{ByteOrder, Header};
    use crate::LandCoverError;
    use std::path::Path;

    const NLCD_EXPORT: &str = "\
BYTEORDER      I
LAYOUT         BIL
NROWS          4
NCOLS          3
NBANDS         1
NBITS          8
BANDROWBYTES   3
TOTALROWBYTES  3
PIXELTYPE      UNSIGNEDINT
ULXMAP         1000015
ULYMAP         2000015
XDIM           30
YDIM           30
NODATA         0
";

    #[test]
    fn test_parse_gdal_export() {
        let header = Header::parse(NLCD_EXPORT, Path::new("tile.hdr")).unwrap();
        assert_eq!(header.rows, 4);
        assert_eq!(header.cols, 3);
        assert_eq!(header.nbits, 8);
        assert_eq!(header.byte_order, ByteOrder::Little);
        assert_eq!(header.nodata, Some(0));
        assert_eq!(header.data_len(), 12);
        assert_eq!(header.west(), 1_000_000.0);
        assert_eq!(header.north(), 2_000_030.0);
        assert_eq!(header.east(), 1_000_090.0);
        assert_eq!(header.south(), 1_999_910.0);
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let text = "nrows 2\nncols 2\nulxmap 0.5\nulymap 1.5\nxdim 1\nydim 1\nnbits 16\nbyteorder m\n";
        let header = Header::parse(text, Path::new("lower.hdr")).unwrap();
        assert_eq!(header.nbits, 16);
        assert_eq!(header.byte_order, ByteOrder::Big);
        assert_eq!(header.nodata, None);
    }

    #[test]
    fn test_missing_field() {
        let text = "NROWS 2\nNCOLS 2\nULXMAP 0\nULYMAP 0\nXDIM 1\n";
        assert!(matches!(
            Header::parse(text, Path::new("x.hdr")),
            Err(LandCoverError::MissingField("YDIM", _))
        ));
    }

    #[test]
    fn test_rejects_unsupported_layouts() {
        let base = "NROWS 2\nNCOLS 2\nULXMAP 0\nULYMAP 0\nXDIM 1\nYDIM 1\n";
        let multi_band = format!("{base}NBANDS 3\n");
        assert!(matches!(
            Header::parse(&multi_band, Path::new("x.hdr")),
            Err(LandCoverError::Unsupported("band count", _))
        ));
        let float_samples = format!("{base}NBITS 32\n");
        assert!(matches!(
            Header::parse(&float_samples, Path::new("x.hdr")),
            Err(LandCoverError::Unsupported("bit depth", _))
        ));
        let zero_dim = "NROWS 2\nNCOLS 2\nULXMAP 0\nULYMAP 0\nXDIM 0\nYDIM 1\n";
        assert!(matches!(
            Header::parse(zero_dim, Path::new("x.hdr")),
            Err(LandCoverError::InvalidField("XDIM", _))
        ));
    }
}
