//! GPS broadcast [EphemerisRecord]
use gnss_rs::prelude::SV;
use hifitime::Epoch;

#[cfg(feature = "serde")]
use serde::Serialize;

/// [Kepler] stores all keplerian parameters
#[derive(Default, Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Kepler {
    /// Square root of the semi major axis (m^1/2)
    pub sqrt_a: f64,
    /// Eccentricity (n.a)
    pub e: f64,
    /// Inclination angle at reference time (rad)
    pub i_0: f64,
    /// Longitude of ascending node of orbit plane at weekly epoch (rad)
    pub omega_0: f64,
    /// Mean anomaly at reference time (rad)
    pub m_0: f64,
    /// Argument of perigee (rad)
    pub omega: f64,
    /// Time of ephemeris (s of GPS week)
    pub toe: f64,
}

impl Kepler {
    /// Semi major axis (m)
    pub fn a(&self) -> f64 {
        self.sqrt_a.powi(2)
    }
}

/// Orbit [Perturbations]
#[derive(Default, Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Perturbations {
    /// Mean motion difference from computed value (rad.s⁻¹)
    pub dn: f64,
    /// Inclination rate of change (rad.s⁻¹)
    pub i_dot: f64,
    /// Right ascension rate of change (rad.s⁻¹)
    pub omega_dot: f64,
    /// Amplitude of sine harmonic correction term of the argument
    /// of latitude (rad)
    pub cus: f64,
    /// Amplitude of cosine harmonic correction term of the argument
    /// of latitude (rad)
    pub cuc: f64,
    /// Amplitude of sine harmonic correction term of the angle of inclination (rad)
    pub cis: f64,
    /// Amplitude of cosine harmonic correction term of the angle of inclination (rad)
    pub cic: f64,
    /// Amplitude of sine harmonic correction term of the orbit radius (m)
    pub crs: f64,
    /// Amplitude of cosine harmonic correction term of the orbit radius (m)
    pub crc: f64,
}

/// [EphemerisRecord] is one broadcast navigation message,
/// for one satellite at one reference epoch. Records are values:
/// they are built once, from text, and never modified.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EphemerisRecord {
    /// Satellite vehicle
    pub sv: SV,
    /// Time of clock, in GPST
    pub toc: Epoch,
    /// Time of ephemeris, in GPST
    pub toe_epoch: Epoch,
    /// Clock bias (s)
    pub clock_bias: f64,
    /// Clock drift (s.s⁻¹)
    pub clock_drift: f64,
    /// Clock drift rate (s.s⁻²)
    pub clock_drift_rate: f64,
    /// Issue of data, ephemeris
    pub iode: f64,
    /// Keplerian elements
    pub kepler: Kepler,
    /// Orbit perturbations
    pub perturbations: Perturbations,
    /// Codes on L2 channel
    pub l2_codes: Option<f64>,
    /// GPS week (continuous), to go with ToE
    pub week: Option<u32>,
    /// L2 P data flag
    pub l2p_flag: Option<f64>,
    /// SV accuracy (m)
    pub sv_accuracy: Option<f64>,
    /// SV health
    pub sv_health: Option<f64>,
    /// Total group delay (s)
    pub tgd: Option<f64>,
    /// Issue of data, clock
    pub iodc: Option<f64>,
    /// Transmission time of message (s of GPS week)
    pub transmission_time: Option<f64>,
    /// Fit interval (hours)
    pub fit_interval: Option<f64>,
}

impl EphemerisRecord {
    /// Builds a new [EphemerisRecord] from [Kepler]ian parameters
    /// and [Perturbations]. Clock terms are null, optional fields are omitted.
    pub fn new(
        sv: SV,
        toc: Epoch,
        toe_epoch: Epoch,
        kepler: Kepler,
        perturbations: Perturbations,
    ) -> Self {
        Self {
            sv,
            toc,
            toe_epoch,
            kepler,
            perturbations,
            clock_bias: 0.0,
            clock_drift: 0.0,
            clock_drift_rate: 0.0,
            iode: 0.0,
            l2_codes: None,
            week: None,
            l2p_flag: None,
            sv_accuracy: None,
            sv_health: None,
            tgd: None,
            iodc: None,
            transmission_time: None,
            fit_interval: None,
        }
    }

    /// Copies and returns [EphemerisRecord] with given clock terms
    pub fn with_clock(&self, bias: f64, drift: f64, drift_rate: f64) -> Self {
        let mut s = self.clone();
        s.clock_bias = bias;
        s.clock_drift = drift;
        s.clock_drift_rate = drift_rate;
        s
    }

    /// Copies and returns [EphemerisRecord] with given [Kepler]ian parameters
    pub fn with_kepler(&self, kepler: Kepler) -> Self {
        let mut s = self.clone();
        s.kepler = kepler;
        s
    }

    /// Copies and returns [EphemerisRecord] with given orbit [Perturbations]
    pub fn with_perturbations(&self, perturbations: Perturbations) -> Self {
        let mut s = self.clone();
        s.perturbations = perturbations;
        s
    }

    /// Satellite PRN number
    pub fn prn(&self) -> u8 {
        self.sv.prn
    }

    /// Clock (bias, drift, drift rate) triplet
    pub fn sv_clock(&self) -> (f64, f64, f64) {
        (self.clock_bias, self.clock_drift, self.clock_drift_rate)
    }

    /// Returns true if this satellite is declared healthy,
    /// or when health is not described.
    pub fn is_healthy(&self) -> bool {
        self.sv_health.map(|h| h == 0.0).unwrap_or(true)
    }
}
