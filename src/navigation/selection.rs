//! Ephemeris selection
use gnss_rs::prelude::SV;
use hifitime::{Duration, Epoch};

#[cfg(feature = "log")]
use log::warn;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    epoch::CivilTime,
    navigation::{
        ephemeris::EphemerisRecord,
        kepler::{ComputationResult, Helper},
    },
};

/// [Advisory] conditions do not prevent the propagation,
/// they only indicate the result is not as accurate as it should be.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Advisory {
    /// Requested instant is too far from the selected ToE
    OutsideValidity {
        /// |t - ToE| (s)
        dt_s: f64,
        /// validity window (s)
        window_s: f64,
    },
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::OutsideValidity { dt_s, window_s } => write!(
                f,
                "|t - toe| = {:.0} s exceeds the {:.0} s validity window: degraded accuracy",
                dt_s, window_s
            ),
        }
    }
}

/// [Selection] is the [EphemerisRecord] that best describes
/// a satellite at a given instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    /// Index of the selected record, in file order
    pub index: usize,
    /// Selected record
    pub record: &'a EphemerisRecord,
    /// t - ToE
    pub dt: Duration,
    /// Possible [Advisory]
    pub advisory: Option<Advisory>,
}

/// Selects the record of this satellite whose ToE is the closest to t (GPST).
/// Ties are resolved in file order: first occurrence wins.
/// An [Advisory] is attached when |t - ToE| exceeds the validity window (s).
pub fn select(
    records: &[EphemerisRecord],
    sv: SV,
    t: Epoch,
    validity_window_s: f64,
) -> Option<Selection<'_>> {
    // min_by_key returns the first minimum
    let (index, record) = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.sv == sv)
        .min_by_key(|(_, record)| (t - record.toe_epoch).abs())?;

    let dt = t - record.toe_epoch;
    let dt_s = dt.abs().to_seconds();

    let advisory = if dt_s > validity_window_s {
        let advisory = Advisory::OutsideValidity {
            dt_s,
            window_s: validity_window_s,
        };
        #[cfg(feature = "log")]
        warn!("{}({}) - {}", sv, t, advisory);
        Some(advisory)
    } else {
        None
    };

    Some(Selection {
        index,
        record,
        dt,
        advisory,
    })
}

/// [Solution] is the complete outcome of a position request:
/// the selected ephemeris, the propagation details and the ECEF coordinates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Solution {
    /// Satellite
    pub sv: SV,
    /// Requested instant, as expressed by the user (UTC)
    pub utc: CivilTime,
    /// Leap seconds that were applied
    pub leap_seconds: u32,
    /// Requested instant, in GPST
    pub t: Epoch,
    /// Selected record
    pub record: EphemerisRecord,
    /// Possible [Advisory]
    pub advisory: Option<Advisory>,
    /// Propagation details
    pub helper: Helper,
    /// ECEF coordinates
    pub result: ComputationResult,
}
