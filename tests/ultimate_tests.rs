//! Ultimate capacity solves against the rectangular stress block hand
//! calculation, plus the squash and pure-tension bounds.
//!
//! The beam's compression force is quantized by its 5 mm strips: one strip
//! entering the block is worth 0.85 * 32 * 1500 = 40.8 kN, so equilibrium
//! converges onto a riser of the staircase residual and the reported axial
//! force can sit up to half a quantum from the target.

mod common;

use approx::assert_relative_eq;
use rc_section::prelude::*;

use common::{circular_column, rect_beam};

#[test]
fn beam_capacity_matches_the_stress_block_hand_calculation() {
    let section = rect_beam();
    let ultimate = section.ultimate_capacity(0.0, 0.0).unwrap();

    // a = A_s f_y / (0.85 f_c b) = 55.1 mm, d_n = a / 0.8214 = 67.0 mm,
    // M = A_s f_y (d - a/2) = 1.946e8 N mm for the continuum section; the
    // strip mesh carries its block at the strip centroids and lands a
    // fraction of a percent below that
    eprintln!(
        "beam: d_n = {:.2}, m_xy = {:.4e}, n = {:.1}",
        ultimate.d_n, ultimate.m_xy, ultimate.n
    );
    assert_relative_eq!(ultimate.m_xy, 1.9435e8, max_relative = 0.01);
    assert_relative_eq!(ultimate.d_n, 66.96, max_relative = 0.01);
    assert!(ultimate.n.abs() < 21e3);
    assert!(ultimate.m_y.abs() < 1.0);
    assert_eq!(ultimate.theta, 0.0);

    // d to the bar layer is 247.5 + 210 = 457.5 from the top strip
    assert_relative_eq!(ultimate.k_u, 66.96 / 457.5, max_relative = 0.01);
}

#[test]
fn capacity_solves_are_deterministic() {
    let section = rect_beam();
    let a = section.ultimate_capacity(0.0, 0.0).unwrap();
    let b = section.ultimate_capacity(0.0, 0.0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn sagging_and_hogging_capacities_of_a_symmetric_column_agree() {
    let section = circular_column();
    let sagging = section.ultimate_capacity(0.0, 1.5e6).unwrap();
    let hogging = section
        .ultimate_capacity(std::f64::consts::PI, 1.5e6)
        .unwrap();

    assert_relative_eq!(sagging.m_xy, hogging.m_xy, max_relative = 0.02);
    assert!(sagging.m_x > 0.0);
    assert!(hogging.m_x < 0.0);
}

#[test]
fn axial_force_beyond_the_squash_load_has_no_equilibrium() {
    let section = rect_beam();
    let (_, squash) = section.axial_capacity_bounds(0.0).unwrap();

    match section.ultimate_capacity(0.0, 2.0 * squash.n) {
        Err(SectionError::NoEquilibrium { n_target, n_hi, .. }) => {
            assert!(n_hi < n_target);
        }
        other => panic!("expected no equilibrium, got {other:?}"),
    }
}

#[test]
fn axial_bounds_are_the_uniform_strain_integrals() {
    let section = rect_beam();
    let (tension, squash) = section.axial_capacity_bounds(0.0).unwrap();

    // all concrete cracked, both bars at -f_y
    assert_relative_eq!(tension.n, -900.0 * 500.0, max_relative = 1e-9);
    // full block plus both bars at +f_y
    assert_relative_eq!(
        squash.n,
        0.85 * 32.0 * 150_000.0 + 450e3,
        max_relative = 1e-9
    );

    assert_eq!(tension.d_n, f64::NEG_INFINITY);
    assert_eq!(squash.d_n, f64::INFINITY);
    assert_eq!(tension.k_u, 0.0);
    assert_eq!(squash.k_u, 0.0);

    // the bars sit 201.9 mm below the elastic centroid, so both bound
    // profiles carry a moment about the reference
    assert_relative_eq!(tension.m_x, 9.0865e7, max_relative = 1e-3);
    assert_relative_eq!(squash.m_x, -5.791e7, max_relative = 1e-3);
}

#[test]
fn ultimate_stress_reproduces_the_solved_state() {
    let section = rect_beam();
    let ultimate = section.ultimate_capacity(0.0, 0.0).unwrap();
    let report = section.ultimate_stress(&ultimate).unwrap();

    assert_relative_eq!(report.n, ultimate.n, max_relative = 1e-9);
    assert_relative_eq!(report.m_x, ultimate.m_x, max_relative = 1e-9);

    // block stress at the top, yielded steel at the bottom
    assert_relative_eq!(
        report.max_concrete_stress().unwrap(),
        0.85 * 32.0,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        report.min_reinforcement_stress().unwrap(),
        -500.0,
        max_relative = 1e-12
    );

    // the anchor strain sits at the extreme compression fiber
    let top = report
        .records
        .iter()
        .cloned()
        .reduce(|a, b| if a.y > b.y { a } else { b })
        .unwrap();
    assert_relative_eq!(top.strain, 0.003, max_relative = 1e-9);
}

#[test]
fn squash_stress_is_uniform() {
    let section = rect_beam();
    let (_, squash) = section.axial_capacity_bounds(0.0).unwrap();
    let report = section.ultimate_stress(&squash).unwrap();

    assert_relative_eq!(report.n, squash.n, max_relative = 1e-9);
    assert_relative_eq!(
        report.max_concrete_stress().unwrap(),
        report.min_concrete_stress().unwrap(),
        max_relative = 1e-12
    );
    assert_relative_eq!(
        report.max_reinforcement_stress().unwrap(),
        500.0,
        max_relative = 1e-12
    );
}
