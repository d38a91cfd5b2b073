//! Propagation [Config]uration
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{constants::Constants, header::Header};

/// Configuration Error
#[derive(Debug, Error)]
pub enum Error {
    #[error("kepler solver iteration count must be positive")]
    NullIterationCount,
    #[error("invalid kepler solver tolerance {0}")]
    InvalidTolerance(f64),
    #[error("invalid validity window {0}")]
    InvalidValidityWindow(f64),
}

fn default_validity_window() -> f64 {
    Constants::VALIDITY_WINDOW_SECONDS
}

fn default_max_kepler_iter() -> usize {
    Constants::MAX_KEPLER_ITER
}

fn default_kepler_tolerance() -> f64 {
    Constants::KEPLER_TOLERANCE
}

/// [Config] gathers the caller's choices, that are not part of the
/// navigation message itself.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// GPS - UTC leap seconds (ΔtLS), applied when moving
    /// civil (UTC) instants to GPS time.
    /// When not defined, we use the value described in the file header,
    /// otherwise 18 s (in force since 2017).
    #[cfg_attr(feature = "serde", serde(default))]
    pub leap_seconds: Option<u32>,
    /// Broadcast ephemeris validity (s), on each side of ToE.
    /// Propagating further is permitted, but an advisory is emitted.
    #[cfg_attr(feature = "serde", serde(default = "default_validity_window"))]
    pub validity_window_s: f64,
    /// Maximal number of iterations in the Kepler equation solver
    #[cfg_attr(feature = "serde", serde(default = "default_max_kepler_iter"))]
    pub max_kepler_iter: usize,
    /// Kepler equation solver convergence criterion (rad)
    #[cfg_attr(feature = "serde", serde(default = "default_kepler_tolerance"))]
    pub kepler_tolerance_rad: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            leap_seconds: None,
            validity_window_s: default_validity_window(),
            max_kepler_iter: default_max_kepler_iter(),
            kepler_tolerance_rad: default_kepler_tolerance(),
        }
    }
}

impl Config {
    /// Copies and returns [Config] with given leap second count
    pub fn with_leap_seconds(&self, leap_seconds: u32) -> Self {
        let mut s = self.clone();
        s.leap_seconds = Some(leap_seconds);
        s
    }

    /// Verifies this [Config] is usable
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_kepler_iter == 0 {
            return Err(Error::NullIterationCount);
        }
        if !(self.kepler_tolerance_rad > 0.0 && self.kepler_tolerance_rad.is_finite()) {
            return Err(Error::InvalidTolerance(self.kepler_tolerance_rad));
        }
        if !(self.validity_window_s >= 0.0) {
            return Err(Error::InvalidValidityWindow(self.validity_window_s));
        }
        Ok(())
    }

    /// Resolves the leap second count to apply:
    /// user choice, then file [Header], then default value.
    pub fn leap_seconds(&self, header: &Header) -> u32 {
        self.leap_seconds
            .or(header.leap_seconds())
            .unwrap_or(Constants::DEFAULT_LEAP_SECONDS)
    }
}
