use anyhow::{anyhow, Error as AnyError};
use clap::{Parser, Subcommand, ValueEnum};
use exposure::geo::geometry::Coord;
use std::{path::PathBuf, str::FromStr};

/// Classify a site's ASCE 7 wind exposure from upwind land cover.
#[derive(Parser, Debug, Clone)]
pub struct Cli {
    /// Land-cover raster header (.hdr), or a directory of them.
    #[arg(short, long)]
    pub raster: PathBuf,

    /// Coordinate system the rasters are stored in.
    #[arg(long, value_enum, default_value_t = CrsArg::ConusAlbers)]
    pub crs: CrsArg,

    /// Read tiles into memory instead of memory mapping them.
    #[arg(long, default_value_t = false)]
    pub in_mem: bool,

    /// Distance between samples, in meters. Defaults to the rasters'
    /// pixel size, or 30 m for geographic rasters.
    #[arg(short, long)]
    pub step: Option<f64>,

    /// Reduce each direction by majority vote instead of by upwind
    /// fetch length.
    #[arg(long, default_value_t = false)]
    pub majority: bool,

    /// Site "lat,lon" in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub site: LatLon,

    /// Mean roof height, in feet.
    #[arg(long)]
    pub height_ft: f64,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CrsArg {
    /// Longitude/latitude degrees.
    Geographic,

    /// EPSG:5070, as NLCD is distributed.
    ConusAlbers,
}

#[derive(Clone, Debug, Copy)]
pub struct LatLon(pub Coord<f64>);

impl FromStr for LatLon {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let (lat_str, lon_str) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("not a valid lat,lon"))?;
        let lat = f64::from_str(lat_str.trim())?;
        let lon = f64::from_str(lon_str.trim())?;
        Ok(Self(Coord { y: lat, x: lon }))
    }
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print the report as JSON to stdout.
    Json,

    /// Print a per-direction summary table to stdout.
    Table,

    /// Print every sample as CSV to stdout.
    Csv,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, LatLon};
    use clap::Parser;
    use std::str::FromStr;

    #[test]
    fn test_parse_lat_lon() {
        let LatLon(coord) = LatLon::from_str("41.52,-70.67").unwrap();
        assert_eq!(coord.y, 41.52);
        assert_eq!(coord.x, -70.67);
        assert!(LatLon::from_str("41.52").is_err());
        assert!(LatLon::from_str("north,west").is_err());
    }

    #[test]
    fn test_parse_cli() {
        let cli = Cli::try_parse_from([
            "windexp",
            "--raster",
            "nlcd",
            "--site",
            "41.52,-70.67",
            "--height-ft",
            "35",
            "table",
        ])
        .unwrap();
        assert_eq!(cli.height_ft, 35.0);
        assert_eq!(cli.step, None);
        assert!(!cli.majority);
        assert!(matches!(cli.cmd, Command::Table));
    }
}
