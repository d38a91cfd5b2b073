use std::{fs::File, io::BufReader, path::PathBuf, str::FromStr};

use clap::{value_parser, Arg, ArgAction, ArgMatches, ColorChoice, Command};

use brdc_orbit::prelude::{CivilTime, Config, Constellation, SV};

use crate::Error;

pub struct Cli {
    /// Arguments passed by user
    pub matches: ArgMatches,
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}

impl Cli {
    /// Build new command line interface
    pub fn new() -> Self {
        let cmd = Command::new("brdc-cli")
            .version(env!("CARGO_PKG_VERSION"))
            .about("GPS satellite positions from broadcast ephemerides")
            .long_about(
                "brdc-cli loads a RINEX V2 GPS navigation file, lists its ephemerides
and computes the ECEF position of a satellite at a given UTC instant.",
            )
            .arg_required_else_help(true)
            .color(ColorChoice::Always)
            .arg(
                Arg::new("filepath")
                    .long("fp")
                    .short('f')
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .action(ArgAction::Set)
                    .required(true)
                    .help("RINEX V2 GPS navigation file (.n, possibly gzip compressed)"),
            )
            .arg(
                Arg::new("sv")
                    .long("sv")
                    .short('s')
                    .value_name("SV")
                    .action(ArgAction::Set)
                    .requires("utc")
                    .help("Satellite, either PRN number (\"7\") or SV (\"G07\")"),
            )
            .arg(
                Arg::new("utc")
                    .long("utc")
                    .short('t')
                    .value_name("\"YYYY-MM-DD HH:MM:SS\"")
                    .action(ArgAction::Set)
                    .requires("sv")
                    .help("Observation instant (UTC)"),
            )
            .arg(
                Arg::new("leap")
                    .long("leap")
                    .value_name("SECONDS")
                    .value_parser(value_parser!(u32))
                    .action(ArgAction::Set)
                    .help("GPS - UTC leap seconds. Overrides the file header and configuration."),
            )
            .arg(
                Arg::new("cfg")
                    .long("cfg")
                    .short('c')
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .action(ArgAction::Set)
                    .help("JSON configuration file")
                    .long_help(
                        "JSON configuration file. All fields are optional, for example:
{
    \"leap_seconds\": 18,
    \"validity_window_s\": 7200.0,
    \"max_kepler_iter\": 30,
    \"kepler_tolerance_rad\": 1e-12
}",
                    ),
            )
            .arg(
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .help("Print the solution in JSON"),
            );
        Self {
            matches: cmd.get_matches(),
        }
    }

    /// Returns NAV file path
    pub fn filepath(&self) -> Option<&PathBuf> {
        self.matches.get_one::<PathBuf>("filepath")
    }

    /// Returns requested satellite, if any
    pub fn sv(&self) -> Result<Option<SV>, Error> {
        match self.matches.get_one::<String>("sv") {
            Some(sv) => parse_sv(sv).map(Some),
            None => Ok(None),
        }
    }

    /// Returns requested instant, if any
    pub fn utc(&self) -> Result<Option<CivilTime>, Error> {
        match self.matches.get_one::<String>("utc") {
            Some(utc) => Ok(Some(CivilTime::from_str(utc)?)),
            None => Ok(None),
        }
    }

    /// Returns true if solution should be printed in JSON
    pub fn json(&self) -> bool {
        self.matches.get_flag("json")
    }

    /// Forms the [Config]: JSON file first, then command line overrides.
    pub fn config(&self) -> Result<Config, Error> {
        let mut cfg = match self.matches.get_one::<PathBuf>("cfg") {
            Some(path) => {
                let reader = BufReader::new(File::open(path)?);
                let cfg: Config = serde_json::from_reader(reader)?;
                info!("using custom configuration \"{}\"", path.display());
                cfg
            },
            None => Config::default(),
        };
        if let Some(leap) = self.matches.get_one::<u32>("leap") {
            cfg = cfg.with_leap_seconds(*leap);
        }
        Ok(cfg)
    }
}

/// Parses a GPS satellite from either a PRN number or an SV descriptor
fn parse_sv(content: &str) -> Result<SV, Error> {
    let content = content.trim();
    let sv = match content.parse::<u8>() {
        Ok(prn) => SV::new(Constellation::GPS, prn),
        Err(_) => {
            SV::from_str(content).map_err(|_| Error::InvalidSatellite(content.to_string()))?
        },
    };
    if sv.constellation != Constellation::GPS {
        return Err(Error::InvalidSatellite(content.to_string()));
    }
    Ok(sv)
}
