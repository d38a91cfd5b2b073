//! Command line tool to compute GPS satellite positions
//! from RINEX V2 navigation files.
//! Refer to README for command line arguments.

#[macro_use]
extern crate log;

mod cli;
mod report;

use cli::Cli;

use env_logger::{Builder, Target};
use thiserror::Error;

use brdc_orbit::prelude::{Error as OrbitError, NavFile, ParsingError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error")]
    StdioError(#[from] std::io::Error),
    #[error("failed to parse navigation file: {0}")]
    ParsingError(#[from] ParsingError),
    #[error("{0}")]
    OrbitError(#[from] OrbitError),
    #[error("invalid instant: {0}")]
    TimeError(#[from] brdc_orbit::epoch::ParsingError),
    #[error("invalid configuration: {0}")]
    ConfigError(#[from] serde_json::Error),
    #[error("invalid satellite \"{0}\"")]
    InvalidSatellite(String),
    #[error("missing navigation file")]
    MissingNavigationFile,
}

pub fn main() -> Result<(), Error> {
    let mut builder = Builder::from_default_env();
    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let cli = Cli::new();
    let cfg = cli.config()?;

    let path = cli.filepath().ok_or(Error::MissingNavigationFile)?;
    let nav = NavFile::from_file(path)?;
    info!(
        "loaded \"{}\": {} ephemeris record(s)",
        path.display(),
        nav.records().len()
    );
    for rejected in nav.rejected() {
        warn!("{}", rejected);
    }

    match (cli.sv()?, cli.utc()?) {
        (Some(sv), Some(utc)) => {
            let solution = nav.compute_position(sv, utc, &cfg)?;
            if let Some(advisory) = solution.advisory {
                warn!("{}", advisory);
            }
            if cli.json() {
                println!("{}", serde_json::to_string_pretty(&solution)?);
            } else {
                report::solution(&solution);
            }
        },
        _ => report::summary(&nav),
    }
    Ok(())
}
