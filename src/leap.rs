//! Describes `leap` second information, contained in `header`
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::Serialize;

/// [Leap] to describe leap seconds.
/// GPS = UTC + ΔtLS
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Leap {
    /// current number (ΔtLS)
    pub leap: u32,
    /// ΔtLSF: future or past leap second(s)
    pub delta_tls: Option<u32>,
    /// week counter
    pub week: Option<u32>,
    /// day counter
    pub day: Option<u32>,
}

/// [Leap] parsing related errors
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("failed to parse leap second count")]
    ParseIntError(#[from] std::num::ParseIntError),
    #[error("empty leap second descriptor")]
    Empty,
}

impl Leap {
    /// Builds a new [Leap] object to describe leap seconds
    pub fn new(leap: u32, delta_tls: Option<u32>, week: Option<u32>, day: Option<u32>) -> Self {
        Self {
            leap,
            delta_tls,
            week,
            day,
        }
    }
}

impl std::str::FromStr for Leap {
    type Err = ParsingError;
    /// Builds [Leap] from standard RINEX descriptor (columns 1-60)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ls = Leap::default();
        // leap second has two formats
        let items: Vec<&str> = s.split_ascii_whitespace().collect();
        match items.len() {
            0 => return Err(ParsingError::Empty),
            1 | 2 => {
                // [1] simple format: basic
                ls.leap = items[0].trim().parse::<u32>()?;
            },
            _ => {
                // [2] complex format: advanced infos, I6 fields
                ls.leap = items[0].trim().parse::<u32>()?;
                ls.delta_tls = Some(items[1].trim().parse::<u32>()?);
                ls.week = Some(items[2].trim().parse::<u32>()?);
                if let Some(day) = items.get(3) {
                    ls.day = Some(day.trim().parse::<u32>()?);
                }
            },
        }
        Ok(ls)
    }
}
