//! Text reports
use itertools::Itertools;

use brdc_orbit::prelude::{EphemerisRecord, NavFile, Solution};

/// Prints file content: header and ephemerides per satellite
pub fn summary(nav: &NavFile) {
    let header = &nav.header;
    println!("RINEX {} GPS navigation", header.version);
    if let Some(program) = &header.program {
        println!("program    : {}", program);
    }
    if let Some(run_by) = &header.run_by {
        println!("run by     : {}", run_by);
    }
    match header.leap_seconds() {
        Some(leap) => println!("leap       : {} s", leap),
        None => println!("leap       : not specified"),
    }
    println!(
        "satellites : {}",
        nav.satellites().iter().map(|sv| sv.to_string()).join(", ")
    );
    for sv in nav.satellites() {
        println!("{}", sv);
        for record in nav.ephemerides(sv) {
            println!(
                "  toe {} | iode {:>4} | sqrt(a) {:.6} | e {:.10} | healthy {}",
                record.toe_epoch,
                record.iode,
                record.kepler.sqrt_a,
                record.kepler.e,
                record.is_healthy(),
            );
        }
    }
    if !nav.rejected().is_empty() {
        println!("rejected records: {}", nav.rejected().len());
    }
}

fn record(record: &EphemerisRecord) {
    let (af0, af1, af2) = record.sv_clock();
    let kepler = &record.kepler;
    let perturbations = &record.perturbations;
    println!("ephemeris  : {} toc {} toe {}", record.sv, record.toc, record.toe_epoch);
    println!("  af0 {:e} af1 {:e} af2 {:e}", af0, af1, af2);
    println!(
        "  sqrt(a) {} e {} i0 {} Omega0 {} M0 {} omega {}",
        kepler.sqrt_a, kepler.e, kepler.i_0, kepler.omega_0, kepler.m_0, kepler.omega
    );
    println!(
        "  dn {:e} OmegaDot {:e} IDOT {:e}",
        perturbations.dn, perturbations.omega_dot, perturbations.i_dot
    );
    println!(
        "  Cuc {:e} Cus {:e} Crc {} Crs {} Cic {:e} Cis {:e}",
        perturbations.cuc,
        perturbations.cus,
        perturbations.crc,
        perturbations.crs,
        perturbations.cic,
        perturbations.cis
    );
}

/// Prints a position [Solution]
pub fn solution(solution: &Solution) {
    println!(
        "{} at {} UTC ({} GPST, leap {} s)",
        solution.sv, solution.utc, solution.t, solution.leap_seconds
    );
    record(&solution.record);

    let helper = &solution.helper;
    println!("propagation:");
    println!("  t_k   {:.3} s", helper.t_k);
    println!("  a     {:.3} m", helper.a);
    println!("  n0    {:e} rad/s", helper.n0);
    println!("  n     {:e} rad/s", helper.n);
    println!("  M_k   {:.12} rad", helper.m_k);
    println!("  E_k   {:.12} rad ({} iterations)", helper.e_k, helper.iterations);
    println!("  v_k   {:.12} rad", helper.v_k);
    println!("  phi_k {:.12} rad", helper.phi_k);
    println!("  u_k   {:.12} rad", helper.u_k);
    println!("  r_k   {:.3} m", helper.r_k);
    println!("  i_k   {:.12} rad", helper.i_k);
    println!("  Omega {:.12} rad", helper.omega_k);

    let result = &solution.result;
    println!("ECEF:");
    println!("  X {:.3} m", result.x);
    println!("  Y {:.3} m", result.y);
    println!("  Z {:.3} m", result.z);
    println!("  R {:.3} m", result.range_from_center);
}
