//! RINEX revision
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Highest supported revision: the legacy GPS NAV format (V2.x)
pub const SUPPORTED_VERSION: Version = Version { major: 2, minor: 11 };

/// RINEX file [Version]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("invalid revision \"{0}\"")]
    InvalidRevision(String),
}

impl Default for Version {
    fn default() -> Self {
        SUPPORTED_VERSION
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

impl std::str::FromStr for Version {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ParsingError::InvalidRevision(s.to_string());
        match s.split_once('.') {
            Some((major, minor)) => {
                let major = major.trim().parse::<u8>().map_err(|_| invalid())?;
                let minor = if minor.trim().is_empty() {
                    0
                } else {
                    minor.trim().parse::<u8>().map_err(|_| invalid())?
                };
                Ok(Self { major, minor })
            },
            None => Ok(Self {
                major: s.parse::<u8>().map_err(|_| invalid())?,
                minor: 0,
            }),
        }
    }
}

impl Version {
    /// Builds a new [Version]
    pub fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Only the legacy (V2) layout is understood here.
    pub fn is_supported(&self) -> bool {
        self.major == SUPPORTED_VERSION.major
    }
}
