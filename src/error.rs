use thiserror::Error;

use gnss_rs::prelude::SV;

use crate::{
    cfg::Error as ConfigError,
    epoch::ParsingError as EpochParsingError,
    header::ParsingError as HeaderParsingError,
    navigation::{KeplerError, RecordError},
};

/// Errors that may rise when loading a NAV file
#[derive(Error, Debug)]
pub enum ParsingError {
    /// Failed to read the file
    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid or non supported header
    #[error("header: {0}")]
    Header(#[from] HeaderParsingError),
    /// Not a single ephemeris could be parsed. Contains all rejected records.
    #[error("no valid ephemeris ({} rejected record(s))", .0.len())]
    NoEphemeris(Vec<RecordError>),
}

/// Errors that may rise when computing a satellite position
#[derive(Error, Debug)]
pub enum Error {
    /// NAV file loading error
    #[error("parsing error: {0}")]
    Parsing(#[from] ParsingError),
    /// No ephemeris for this satellite
    #[error("no ephemeris for {0}")]
    NotFound(SV),
    /// Propagation error: invalid orbital elements
    #[error("range error: {0}")]
    Range(#[from] KeplerError),
    /// Invalid requested instant
    #[error("invalid instant: {0}")]
    Time(#[from] EpochParsingError),
    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
