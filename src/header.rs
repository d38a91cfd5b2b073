//! Describes a NAV `RINEX` (V2) header, includes
//! header parser and associated methods
use thiserror::Error;

use crate::{
    leap::{Leap, ParsingError as LeapParsingError},
    navigation::decode_fortran_f64,
    version::{ParsingError as VersionParsingError, Version},
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// End of Header section reached
pub const HEADER_END_MARKER: &str = "END OF HEADER";

/// Labels start at column 61
const LABEL_OFFSET: usize = 60;

/// Header section related errors
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("version parsing")]
    Version(#[from] VersionParsingError),
    #[error("non supported revision {0}")]
    NonSupportedRevision(Version),
    #[error("not a GPS navigation file (type \"{0}\")")]
    NotGpsNavigation(String),
    #[error("invalid ionospheric parameters")]
    IonosphericParameters,
    #[error("invalid DELTA-UTC parameters")]
    DeltaUtc,
    #[error("leap second parsing")]
    Leap(#[from] LeapParsingError),
}

/// UTC(USNO) parameters, to compute UTC from GPS time
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DeltaUtc {
    /// A0 (s)
    pub a0: f64,
    /// A1 (s.s⁻¹)
    pub a1: f64,
    /// reference time for UTC data (s of week)
    pub t: u32,
    /// UTC reference week number
    pub week: u32,
}

/// Navigation file [Header]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Header {
    /// File revision
    pub version: Version,
    /// Program that generated this file
    pub program: Option<String>,
    /// Agency that generated this file
    pub run_by: Option<String>,
    /// Creation date, as is
    pub date: Option<String>,
    /// Comments, in order of appearance
    pub comments: Vec<String>,
    /// Klobuchar alpha coefficients
    pub ion_alpha: Option<[f64; 4]>,
    /// Klobuchar beta coefficients
    pub ion_beta: Option<[f64; 4]>,
    /// UTC(USNO) parameters
    pub delta_utc: Option<DeltaUtc>,
    /// Leap seconds
    pub leap: Option<Leap>,
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Column slice that tolerates short (right trimmed) lines
fn columns(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    line.get(start.min(end)..end).unwrap_or("")
}

fn parse_klobuchar(content: &str) -> Result<[f64; 4], ParsingError> {
    let mut coefs = [0.0_f64; 4];
    for (i, coef) in coefs.iter_mut().enumerate() {
        let start = 2 + i * 12;
        *coef = decode_fortran_f64(columns(content, start, start + 12))
            .ok_or(ParsingError::IonosphericParameters)?;
    }
    Ok(coefs)
}

fn parse_delta_utc(content: &str) -> Result<DeltaUtc, ParsingError> {
    let a0 = decode_fortran_f64(columns(content, 3, 22)).ok_or(ParsingError::DeltaUtc)?;
    let a1 = decode_fortran_f64(columns(content, 22, 41)).ok_or(ParsingError::DeltaUtc)?;
    let t = columns(content, 41, 50)
        .trim()
        .parse::<u32>()
        .map_err(|_| ParsingError::DeltaUtc)?;
    let week = columns(content, 50, 59)
        .trim()
        .parse::<u32>()
        .map_err(|_| ParsingError::DeltaUtc)?;
    Ok(DeltaUtc { a0, a1, t, week })
}

impl Header {
    /// Parses the header section (everything up to and including
    /// the `END OF HEADER` line).
    pub fn parse(content: &str) -> Result<Self, ParsingError> {
        let mut header = Self::default();

        for line in content.lines() {
            if line.len() <= LABEL_OFFSET {
                continue;
            }
            // labels are ASCII: anything else is not a header line we understand
            let (Some(content), Some(marker)) = (line.get(..LABEL_OFFSET), line.get(LABEL_OFFSET..))
            else {
                continue;
            };
            let marker = marker.trim();

            match marker {
                "RINEX VERSION / TYPE" => {
                    let version = columns(content, 0, 9).parse::<Version>()?;
                    if !version.is_supported() {
                        return Err(ParsingError::NonSupportedRevision(version));
                    }
                    let file_type = columns(content, 20, 40).trim();
                    // GPS NAV files are 'N' typed, GLONASS NAV files are 'G' typed
                    if !file_type.starts_with('N') {
                        return Err(ParsingError::NotGpsNavigation(file_type.to_string()));
                    }
                    header.version = version;
                },
                "PGM / RUN BY / DATE" => {
                    header.program = non_empty(columns(content, 0, 20));
                    header.run_by = non_empty(columns(content, 20, 40));
                    header.date = non_empty(columns(content, 40, 60));
                },
                "COMMENT" => {
                    header.comments.push(content.trim_end().to_string());
                },
                "ION ALPHA" => {
                    header.ion_alpha = Some(parse_klobuchar(content)?);
                },
                "ION BETA" => {
                    header.ion_beta = Some(parse_klobuchar(content)?);
                },
                "DELTA-UTC: A0,A1,T,W" => {
                    header.delta_utc = Some(parse_delta_utc(content)?);
                },
                "LEAP SECONDS" => {
                    header.leap = Some(content.parse::<Leap>()?);
                },
                _ => {},
            }
        }
        Ok(header)
    }

    /// Leap second count (ΔtLS) described by this [Header], if any.
    pub fn leap_seconds(&self) -> Option<u32> {
        self.leap.map(|leap| leap.leap)
    }
}

/// Splits file content into (header, body), where header
/// is empty when no header delimiter was found.
/// The delimiter only counts when it is the label (columns 61-80).
pub(crate) fn split_header_body(content: &str) -> (&str, &str) {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        offset += line.len();
        let label = line.get(LABEL_OFFSET..).unwrap_or("").trim();
        if label == HEADER_END_MARKER {
            return content.split_at(offset);
        }
    }
    ("", content)
}
