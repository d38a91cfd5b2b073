use crate::prelude::*;
use rand::Rng;

/// Earth center distance bounds of a GPS satellite (m)
pub const GPS_RANGE_BOUNDS: (f64, f64) = (20.0E6, 27.0E6);

/// Returns absolute path to given test resource
pub fn test_resource(relative: &str) -> String {
    env!("CARGO_MANIFEST_DIR").to_owned() + "/test_resources/" + relative
}

/*
 * Panics if this position is not a valid GPS orbital position
 */
pub fn check_gps_position(result: &ComputationResult) {
    let (min, max) = GPS_RANGE_BOUNDS;
    assert!(
        result.range_from_center >= min && result.range_from_center <= max,
        "{} m is not a GPS orbit",
        result.range_from_center
    );
    let norm = (result.x.powi(2) + result.y.powi(2) + result.z.powi(2)).sqrt();
    assert!(
        (norm - result.range_from_center).abs() < 1.0E-6,
        "range_from_center does not match (x, y, z)"
    );
}

/*
 * Generates a physically valid GPS ephemeris,
 * with typical elements and perturbations magnitude.
 */
pub fn random_gps_record<R: Rng>(rng: &mut R, max_eccentricity: f64) -> EphemerisRecord {
    use std::f64::consts::PI;

    let prn = rng.gen_range(1..=32);
    let week = rng.gen_range(2000..2400);
    let toe_sow = 7200 * rng.gen_range(0..84_u64);
    let toe_epoch = Epoch::from_time_of_week(week, toe_sow * 1_000_000_000, TimeScale::GPST);

    let kepler = Kepler {
        sqrt_a: rng.gen_range(5153.5..5153.8),
        e: rng.gen_range(0.0..max_eccentricity),
        i_0: rng.gen_range(0.93..0.99),
        omega_0: rng.gen_range(-PI..PI),
        m_0: rng.gen_range(-PI..PI),
        omega: rng.gen_range(-PI..PI),
        toe: toe_sow as f64,
    };

    let perturbations = Perturbations {
        dn: rng.gen_range(3.0E-9..6.0E-9),
        i_dot: rng.gen_range(-5.0E-10..5.0E-10),
        omega_dot: rng.gen_range(-9.0E-9..-7.5E-9),
        cus: rng.gen_range(-1.5E-5..1.5E-5),
        cuc: rng.gen_range(-1.5E-5..1.5E-5),
        cis: rng.gen_range(-2.0E-7..2.0E-7),
        cic: rng.gen_range(-2.0E-7..2.0E-7),
        crs: rng.gen_range(-200.0..200.0),
        crc: rng.gen_range(100.0..400.0),
    };

    EphemerisRecord::new(
        SV::new(Constellation::GPS, prn),
        toe_epoch,
        toe_epoch,
        kepler,
        perturbations,
    )
}
