//! IS-GPS-200 broadcast orbit propagation
use hifitime::Epoch;
use nalgebra::{Rotation3, Vector3};
use thiserror::Error;

#[cfg(feature = "log")]
use log::error;

#[cfg(feature = "serde")]
use serde::Serialize;

use gnss_rs::prelude::SV;

use crate::{
    cfg::Config,
    constants::{Constants, Omega, GM},
    navigation::ephemeris::EphemerisRecord,
};

/// Orbit propagation errors. These all describe corrupted or
/// physically implausible orbital elements.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeplerError {
    #[error("eccentricity {0} is outside [0, 1)")]
    Eccentricity(f64),
    #[error("invalid semi major axis (sqrt(a)={0})")]
    SemiMajorAxis(f64),
    #[error("kepler equation did not converge within {0} iterations")]
    NotConverged(usize),
    #[error("non finite orbital state")]
    NonFinite,
}

/// Applies the GPS week rollover correction to a ToE offset (s):
/// the result always lies within [-302400, 302400].
pub fn wrap_half_week(t: f64) -> f64 {
    if t > Constants::HALF_WEEK_SECONDS {
        t - Constants::WEEK_SECONDS
    } else if t < -Constants::HALF_WEEK_SECONDS {
        t + Constants::WEEK_SECONDS
    } else {
        t
    }
}

/// Solves Kepler's equation M = E - e.sin(E) by fixed point iteration,
/// seeded with E = M. Returns (E, number of iterations).
pub fn solve_kepler(
    m_k: f64,
    e: f64,
    max_iter: usize,
    tolerance: f64,
) -> Result<(f64, usize), KeplerError> {
    if !(0.0..1.0).contains(&e) {
        return Err(KeplerError::Eccentricity(e));
    }
    let mut e_k = m_k;
    for iter in 1..=max_iter {
        let next = m_k + e * e_k.sin();
        if !next.is_finite() {
            return Err(KeplerError::NonFinite);
        }
        let delta = (next - e_k).abs();
        e_k = next;
        if delta < tolerance {
            return Ok((e_k, iter));
        }
    }
    Err(KeplerError::NotConverged(max_iter))
}

/// ECEF coordinates of a satellite, at one instant
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ComputationResult {
    /// ECEF x (m)
    pub x: f64,
    /// ECEF y (m)
    pub y: f64,
    /// ECEF z (m)
    pub z: f64,
    /// Distance to Earth's center (m)
    pub range_from_center: f64,
}

impl ComputationResult {
    /// ECEF position [Vector3] (m)
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

/// [Helper] gathers the intermediate quantities of the orbit propagation.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Helper {
    /// Satellite
    pub sv: SV,
    /// Time elapsed since ToE (s), rollover corrected
    pub t_k: f64,
    /// Semi major axis (m)
    pub a: f64,
    /// Computed mean motion (rad.s⁻¹)
    pub n0: f64,
    /// Corrected mean motion (rad.s⁻¹)
    pub n: f64,
    /// Mean anomaly (rad)
    pub m_k: f64,
    /// Eccentric anomaly (rad)
    pub e_k: f64,
    /// Kepler solver iterations
    pub iterations: usize,
    /// True anomaly (rad)
    pub v_k: f64,
    /// Argument of latitude (rad)
    pub phi_k: f64,
    /// Argument of latitude correction (rad)
    pub du_k: f64,
    /// Radius correction (m)
    pub dr_k: f64,
    /// Inclination correction (rad)
    pub di_k: f64,
    /// Corrected argument of latitude (rad)
    pub u_k: f64,
    /// Corrected radius (m)
    pub r_k: f64,
    /// Corrected inclination (rad)
    pub i_k: f64,
    /// Corrected longitude of ascending node (rad)
    pub omega_k: f64,
    /// Position in the orbital plane (m)
    pub orbit_xy: (f64, f64),
}

impl Helper {
    /// Returns orbital plane to ECEF [Rotation3] matrix
    fn orbit_to_ecef_rotation_matrix(&self) -> Rotation3<f64> {
        // Positive angles mean counterclockwise rotation
        let rotation_x = Rotation3::from_axis_angle(&Vector3::x_axis(), self.i_k);
        let rotation_z = Rotation3::from_axis_angle(&Vector3::z_axis(), self.omega_k);
        rotation_z * rotation_x
    }

    /// ECEF position [Vector3] (m)
    pub fn ecef_position(&self) -> Vector3<f64> {
        let (x, y) = self.orbit_xy;
        self.orbit_to_ecef_rotation_matrix() * Vector3::new(x, y, 0.0)
    }

    /// Forms the [ComputationResult]
    pub fn result(&self) -> Result<ComputationResult, KeplerError> {
        let pos = self.ecef_position();
        let range_from_center = pos.norm();
        if !(pos.iter().all(|c| c.is_finite()) && range_from_center.is_finite()) {
            return Err(KeplerError::NonFinite);
        }
        Ok(ComputationResult {
            x: pos[0],
            y: pos[1],
            z: pos[2],
            range_from_center,
        })
    }
}

impl EphemerisRecord {
    /// Returns time elapsed (s) between ToE and t, rollover corrected.
    /// t must be expressed in GPST.
    pub fn t_k(&self, t: Epoch) -> f64 {
        wrap_half_week((t - self.toe_epoch).to_seconds())
    }

    /// Propagates this ephemeris to t (GPST), returning all intermediate
    /// quantities. Solver settings are taken from [Config].
    pub fn helper(&self, t: Epoch, cfg: &Config) -> Result<Helper, KeplerError> {
        let kepler = &self.kepler;
        let perturbations = &self.perturbations;

        if !(kepler.sqrt_a > 0.0 && kepler.sqrt_a.is_finite()) {
            return Err(KeplerError::SemiMajorAxis(kepler.sqrt_a));
        }
        if !(0.0..1.0).contains(&kepler.e) {
            #[cfg(feature = "log")]
            error!("{}({}) - eccentricity {} is out of range", self.sv, self.toe_epoch, kepler.e);
            return Err(KeplerError::Eccentricity(kepler.e));
        }

        let t_k = self.t_k(t);

        let a = kepler.a();
        let n0 = (GM::GPS / a.powi(3)).sqrt(); // computed mean motion
        let n = n0 + perturbations.dn; // corrected mean motion
        let m_k = (kepler.m_0 + n * t_k).rem_euclid(std::f64::consts::TAU);

        let (e_k, iterations) =
            match solve_kepler(m_k, kepler.e, cfg.max_kepler_iter, cfg.kepler_tolerance_rad) {
                Ok(solution) => solution,
                Err(e) => {
                    #[cfg(feature = "log")]
                    error!("{}({}) - {}", self.sv, self.toe_epoch, e);
                    return Err(e);
                },
            };

        // true anomaly
        let (sin_e_k, cos_e_k) = e_k.sin_cos();
        let v_k = ((1.0 - kepler.e.powi(2)).sqrt() * sin_e_k).atan2(cos_e_k - kepler.e);

        let phi_k = v_k + kepler.omega; // argument of latitude
        let (x2_sin_phi_k, x2_cos_phi_k) = (2.0 * phi_k).sin_cos();

        // second harmonic perturbations
        let du_k = perturbations.cus * x2_sin_phi_k + perturbations.cuc * x2_cos_phi_k;
        let dr_k = perturbations.crs * x2_sin_phi_k + perturbations.crc * x2_cos_phi_k;
        let di_k = perturbations.cis * x2_sin_phi_k + perturbations.cic * x2_cos_phi_k;

        let u_k = phi_k + du_k;
        let r_k = a * (1.0 - kepler.e * cos_e_k) + dr_k;
        let i_k = kepler.i_0 + perturbations.i_dot * t_k + di_k;

        // position in orbital plane
        let orbit_xy = (r_k * u_k.cos(), r_k * u_k.sin());

        // longitude of ascending node, Earth rotation since weekly epoch
        let omega_k = kepler.omega_0 + (perturbations.omega_dot - Omega::GPS) * t_k
            - Omega::GPS * kepler.toe;

        Ok(Helper {
            sv: self.sv,
            t_k,
            a,
            n0,
            n,
            m_k,
            e_k,
            iterations,
            v_k,
            phi_k,
            du_k,
            dr_k,
            di_k,
            u_k,
            r_k,
            i_k,
            omega_k,
            orbit_xy,
        })
    }

    /// Computes the ECEF position at t (GPST), using given [Config].
    pub fn kepler2position(&self, t: Epoch, cfg: &Config) -> Result<ComputationResult, KeplerError> {
        self.helper(t, cfg)?.result()
    }
}

/// Computes the ECEF position described by this [EphemerisRecord] at t (GPST),
/// with default solver settings. This is a pure function of its inputs.
pub fn compute(record: &EphemerisRecord, t: Epoch) -> Result<ComputationResult, KeplerError> {
    record.kepler2position(t, &Config::default())
}
