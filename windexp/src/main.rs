mod options;

use anyhow::Error as AnyError;
use clap::Parser;
use exposure::{
    constants::DEFAULT_STEP_M, Crs, DataBasis, ExposureReport, Rasters, Reducer, TileMode,
};
use log::info;
use options::{Cli, Command as CliCmd, CrsArg};
use serde::Serialize;
use std::io::Write;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() -> Result<(), AnyError> {
    let Cli {
        raster,
        crs,
        in_mem,
        step,
        majority,
        site,
        height_ft,
        cmd,
    } = Cli::parse();

    env_logger::init();

    let crs = match crs {
        CrsArg::Geographic => Crs::Geographic,
        CrsArg::ConusAlbers => Crs::conus_albers(),
    };
    let tile_mode = if in_mem {
        TileMode::InMem
    } else {
        TileMode::MemMap
    };
    let rasters = Rasters::new(raster, tile_mode, crs)?;
    let step = step
        .or_else(|| rasters.pixel_size_m())
        .unwrap_or(DEFAULT_STEP_M);
    let reducer = if majority {
        Reducer::Majority
    } else {
        Reducer::Threshold
    };
    info!("{} tiles, step: {step} m, reducer: {reducer:?}", rasters.len());

    let report = ExposureReport::builder()
        .origin(site.0.y, site.0.x)
        .height_ft(height_ft)
        .step_size(step)
        .reducer(reducer)
        .build(&rasters)?;

    match cmd {
        CliCmd::Json => print_json(&report)?,
        CliCmd::Table => print_table(&report)?,
        CliCmd::Csv => print_csv(&report)?,
    };
    Ok(())
}

fn print_json(report: &ExposureReport) -> Result<(), AnyError> {
    #[derive(Serialize)]
    struct JsonDirection<'a> {
        bearing: &'static str,
        sector: [f64; 2],
        sample_count: usize,
        dominant_code: Option<u16>,
        roughness: char,
        exposure: char,
        missing: usize,
        note: &'a str,
    }

    #[derive(Serialize)]
    struct JsonReport<'a> {
        location: [f64; 2],
        height_ft: f64,
        step_m: f64,
        exposure: char,
        directions: Vec<JsonDirection<'a>>,
        references: &'a [&'static str],
    }

    let directions = report
        .directions
        .iter()
        .map(|direction| {
            let (start, end) = direction.sector();
            JsonDirection {
                bearing: direction.bearing.name(),
                sector: [start, end],
                sample_count: direction.sample_count,
                dominant_code: direction.dominant_code,
                roughness: direction.roughness.letter(),
                exposure: direction.exposure.letter(),
                missing: missing(direction.basis, direction.sample_count),
                note: &direction.note,
            }
        })
        .collect();
    let reshaped = JsonReport {
        location: [report.origin.lat(), report.origin.lon()],
        height_ft: report.height_ft,
        step_m: report.step_m,
        exposure: report.governing.letter(),
        directions,
        references: &report.references,
    };
    let json = serde_json::to_string(&reshaped)?;
    println!("{json}");
    Ok(())
}

fn print_table(report: &ExposureReport) -> Result<(), AnyError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "site:     {}", report.origin)?;
    writeln!(stdout, "height:   {} ft", report.height_ft)?;
    writeln!(stdout, "exposure: {}", report.governing)?;
    writeln!(stdout)?;
    writeln!(
        stdout,
        "{:<4} {:>13} {:>7} {:>5} {:>9} {:>8}  note",
        "dir", "sector", "samples", "code", "roughness", "exposure"
    )?;
    for direction in &report.directions {
        let (start, end) = direction.sector();
        let code = direction
            .dominant_code
            .map_or_else(|| "-".to_string(), |code| code.to_string());
        writeln!(
            stdout,
            "{:<4} {:>13} {:>7} {:>5} {:>9} {:>8}  {}",
            direction.bearing.name(),
            format!("{start:.1}-{end:.1}"),
            direction.sample_count,
            code,
            direction.roughness,
            direction.exposure,
            direction.note
        )?;
    }
    writeln!(stdout)?;
    for reference in report.references {
        writeln!(stdout, "{reference}")?;
    }
    Ok(())
}

/// # Example
///
/// ```sh
/// cargo run -- --raster=data/nlcd --site=41.52,-70.67 --height-ft=35 csv > samples.csv
/// ```
fn print_csv(report: &ExposureReport) -> Result<(), AnyError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "Bearing,Distance,X,Y,Code,Roughness")?;
    for sample in report.directions.iter().flat_map(|d| d.samples.iter()) {
        let code = sample.code.map_or_else(String::new, |code| code.to_string());
        writeln!(
            stdout,
            "{},{},{},{},{code},{}",
            sample.bearing, sample.distance_m, sample.coord.x, sample.coord.y, sample.roughness
        )?;
    }
    Ok(())
}

fn missing(basis: DataBasis, sample_count: usize) -> usize {
    match basis {
        DataBasis::Measured => 0,
        DataBasis::Partial { missing } => missing,
        DataBasis::Defaulted => sample_count,
    }
}
