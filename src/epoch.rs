//! Epoch parsing and civil time helpers
use hifitime::{Duration, Epoch, TimeScale};
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("invalid calendar date: {0}")]
    Calendar(#[from] hifitime::HifitimeError),
    #[error("expecting \"yy mm dd hh mm ss.s\" format")]
    FormatError,
    #[error("expecting \"YYYY-MM-DD HH:MM:SS\" format")]
    CivilFormatError,
    #[error("failed to parse years from \"{0}\"")]
    YearField(String),
    #[error("failed to parse months from \"{0}\"")]
    MonthField(String),
    #[error("failed to parse days from \"{0}\"")]
    DayField(String),
    #[error("failed to parse hours from \"{0}\"")]
    HoursField(String),
    #[error("failed to parse minutes field from \"{0}\"")]
    MinutesField(String),
    #[error("failed to parse seconds field from \"{0}\"")]
    SecondsField(String),
}

/// Old RINEX encodes the year on two digits:
/// 80..=99 are 19xx, 00..=79 are 20xx.
pub(crate) fn four_digit_year(y: i32) -> i32 {
    if y < 100 {
        if y < 80 {
            y + 2000
        } else {
            y + 1900
        }
    } else {
        y
    }
}

/// Splits fractional seconds into (seconds, nanoseconds).
fn seconds_nanos(item: &str) -> Result<(u8, u32), ParsingError> {
    let secs = item
        .trim()
        .parse::<f64>()
        .map_err(|_| ParsingError::SecondsField(item.to_string()))?;
    if !(0.0..61.0).contains(&secs) {
        return Err(ParsingError::SecondsField(item.to_string()));
    }
    let whole = secs.trunc();
    let nanos = ((secs - whole) * 1.0E9).round() as u32;
    Ok((whole as u8, nanos.min(999_999_999)))
}

/*
 * Parses a "yy mm dd hh mm ss.s" RINEX epoch descriptor,
 * interpreted as a datetime within specified TimeScale.
 */
pub(crate) fn parse_in_timescale(content: &str, ts: TimeScale) -> Result<Epoch, ParsingError> {
    let mut y = 0_i32;
    let mut m = 0_u8;
    let mut d = 0_u8;
    let mut hh = 0_u8;
    let mut mm = 0_u8;
    let mut ss = 0_u8;
    let mut ns = 0_u32;

    if content.split_ascii_whitespace().count() != 6 {
        return Err(ParsingError::FormatError);
    }

    for (field_index, item) in content.split_ascii_whitespace().enumerate() {
        match field_index {
            0 => {
                y = item
                    .parse::<i32>()
                    .map_err(|_| ParsingError::YearField(item.to_string()))?;
                y = four_digit_year(y);
            },
            1 => {
                m = item
                    .parse::<u8>()
                    .map_err(|_| ParsingError::MonthField(item.to_string()))?;
            },
            2 => {
                d = item
                    .parse::<u8>()
                    .map_err(|_| ParsingError::DayField(item.to_string()))?;
            },
            3 => {
                hh = item
                    .parse::<u8>()
                    .map_err(|_| ParsingError::HoursField(item.to_string()))?;
            },
            4 => {
                mm = item
                    .parse::<u8>()
                    .map_err(|_| ParsingError::MinutesField(item.to_string()))?;
            },
            _ => {
                (ss, ns) = seconds_nanos(item)?;
            },
        }
    }

    let epoch = Epoch::maybe_from_gregorian(y, m, d, hh, mm, ss, ns, ts)?;
    Ok(epoch)
}

/// [CivilTime] is a calendar timestamp, interpreted as UTC.
/// This is how observation instants are expressed by users.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CivilTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CivilTime {
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Converts this UTC timestamp to GPS time, applying
    /// GPS = UTC + ΔtLS where ΔtLS is the `leap_seconds` count.
    pub fn to_gpst(&self, leap_seconds: u32) -> Result<Epoch, ParsingError> {
        let civil = Epoch::maybe_from_gregorian(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            0,
            TimeScale::GPST,
        )?;
        Ok(civil + Duration::from_seconds(leap_seconds as f64))
    }
}

impl std::fmt::Display for CivilTime {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl FromStr for CivilTime {
    type Err = ParsingError;
    /// Parses "YYYY-MM-DD HH:MM:SS" (a 'T' separator is tolerated).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (date, time) = s
            .split_once(['T', ' '])
            .ok_or(ParsingError::CivilFormatError)?;

        let date: Vec<&str> = date.split('-').collect();
        let time: Vec<&str> = time.trim().split(':').collect();
        if date.len() != 3 || time.len() != 3 {
            return Err(ParsingError::CivilFormatError);
        }

        let year = date[0]
            .parse::<i32>()
            .map_err(|_| ParsingError::YearField(date[0].to_string()))?;
        let month = date[1]
            .parse::<u8>()
            .map_err(|_| ParsingError::MonthField(date[1].to_string()))?;
        let day = date[2]
            .parse::<u8>()
            .map_err(|_| ParsingError::DayField(date[2].to_string()))?;
        let hour = time[0]
            .parse::<u8>()
            .map_err(|_| ParsingError::HoursField(time[0].to_string()))?;
        let minute = time[1]
            .parse::<u8>()
            .map_err(|_| ParsingError::MinutesField(time[1].to_string()))?;
        let second = time[2]
            .parse::<u8>()
            .map_err(|_| ParsingError::SecondsField(time[2].to_string()))?;

        let civil = Self::new(year, month, day, hour, minute, second);
        // calendar validation
        let _ = civil.to_gpst(0)?;
        Ok(civil)
    }
}
