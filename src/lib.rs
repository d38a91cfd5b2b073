#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*
 * brdc-orbit: GPS broadcast orbits, from RINEX V2 navigation files.
 * This library is shipped under the Mozilla Public License 2.0.
 *
 * Ephemeris model and propagation: IS-GPS-200, 20.3.3.4.3
 * File format: RINEX 2.11, table A4 (GPS navigation message file)
 */

extern crate gnss_rs as gnss;

pub mod cfg;
pub mod epoch;
pub mod error;
pub mod header;
pub mod leap;
pub mod navigation;
pub mod reader;
pub mod version;

mod constants;

#[cfg(test)]
mod tests;

use std::path::Path;

use itertools::Itertools;

#[cfg(feature = "log")]
use log::{debug, warn};

use crate::{
    cfg::Config,
    epoch::CivilTime,
    error::{Error, ParsingError},
    header::{split_header_body, Header},
    navigation::{parse_records, EphemerisRecord, RecordError, Selection, Solution},
    reader::BufferedReader,
};

use gnss::prelude::SV;
use hifitime::Epoch;

/// Package to include all basic structures
pub mod prelude {
    pub use crate::{
        cfg::Config,
        compute_position,
        epoch::CivilTime,
        error::{Error, ParsingError},
        header::{DeltaUtc, Header},
        leap::Leap,
        navigation::{
            compute, Advisory, ComputationResult, EphemerisRecord, FormatError, Helper, Kepler,
            KeplerError, Perturbations, RecordError, Selection, Solution,
        },
        version::Version,
        NavFile,
    };
    // pub re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
}

/// [NavFile] is a parsed RINEX V2 GPS navigation file.
/// It owns all ephemeris records, in file order, and is never
/// modified once parsed: it can be shared between threads freely.
#[derive(Debug)]
pub struct NavFile {
    /// File [Header]
    pub header: Header,
    /// Valid records, in file order
    records: Vec<EphemerisRecord>,
    /// Rejected records, in file order
    rejected: Vec<RecordError>,
}

impl NavFile {
    /// Parses NAV file content (header and body).
    /// Malformed records are rejected individually; this only fails on
    /// invalid header, or if not a single record could be parsed.
    pub fn parse(content: &str) -> Result<Self, ParsingError> {
        let (header, body) = split_header_body(content);
        let first_line = header.lines().count() + 1;
        let header = Header::parse(header)?;

        let (records, rejected) = parse_records(body, first_line);

        if records.is_empty() {
            return Err(ParsingError::NoEphemeris(rejected));
        }

        #[cfg(feature = "log")]
        {
            debug!("parsed {} ephemeris record(s)", records.len());
            if !rejected.is_empty() {
                warn!("rejected {} record(s)", rejected.len());
            }
        }

        Ok(Self {
            header,
            records,
            rejected,
        })
    }

    /// Loads a local NAV file. Files terminated by `.gz` are
    /// gzip decompressed (requires the `flate2` feature).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParsingError> {
        let content = BufferedReader::new(path.as_ref())?.read_content()?;
        Self::parse(&content)
    }

    /// Loads a gzip compressed local NAV file, whatever its name.
    #[cfg(feature = "flate2")]
    #[cfg_attr(docsrs, doc(cfg(feature = "flate2")))]
    pub fn from_gzip_file<P: AsRef<Path>>(path: P) -> Result<Self, ParsingError> {
        let content = BufferedReader::gzip(path.as_ref())?.read_content()?;
        Self::parse(&content)
    }

    /// Returns all valid [EphemerisRecord]s, in file order
    pub fn records(&self) -> &[EphemerisRecord] {
        &self.records
    }

    /// Returns all rejected records, in file order
    pub fn rejected(&self) -> &[RecordError] {
        &self.rejected
    }

    /// Returns all satellites for which we have at least one ephemeris,
    /// in ascending order
    pub fn satellites(&self) -> Vec<SV> {
        self.records.iter().map(|r| r.sv).sorted().dedup().collect()
    }

    /// Returns an iterator over this satellite's [EphemerisRecord]s, in file order
    pub fn ephemerides(&self, sv: SV) -> impl Iterator<Item = &EphemerisRecord> + '_ {
        self.records.iter().filter(move |r| r.sv == sv)
    }

    /// Selects the [EphemerisRecord] that best describes this satellite at t (GPST)
    pub fn select(&self, sv: SV, t: Epoch, cfg: &Config) -> Result<Selection<'_>, Error> {
        navigation::select(&self.records, sv, t, cfg.validity_window_s).ok_or(Error::NotFound(sv))
    }

    /// Computes this satellite's ECEF position at given civil (UTC) instant.
    /// Leap seconds are resolved by [Config], or this file's [Header].
    pub fn compute_position(
        &self,
        sv: SV,
        utc: CivilTime,
        cfg: &Config,
    ) -> Result<Solution, Error> {
        cfg.validate()?;

        let leap_seconds = cfg.leap_seconds(&self.header);
        let t = utc.to_gpst(leap_seconds)?;

        let selection = self.select(sv, t, cfg)?;
        let helper = selection.record.helper(t, cfg)?;
        let result = helper.result()?;

        Ok(Solution {
            sv,
            utc,
            leap_seconds,
            t,
            record: selection.record.clone(),
            advisory: selection.advisory,
            helper,
            result,
        })
    }
}

/// Loads given NAV file and computes this satellite's ECEF position
/// at given civil (UTC) instant.
pub fn compute_position<P: AsRef<Path>>(
    path: P,
    sv: SV,
    utc: CivilTime,
    cfg: &Config,
) -> Result<Solution, Error> {
    let nav = NavFile::from_file(path)?;
    nav.compute_position(sv, utc, cfg)
}
