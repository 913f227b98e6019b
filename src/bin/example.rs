//! Section analysis example - 600 mm circular column
//!
//! Units are N, mm and MPa throughout. Run with RUST_LOG=debug for the
//! solver's step-by-step log.

use std::f64::consts::TAU;

use rc_section::prelude::*;

/// Mesh a circular section into annular sector fibers, each placed at its
/// area centroid
fn circular_fibers(radius: f64, rings: usize, sectors: usize, material: MaterialId) -> Vec<Fiber> {
    let mut fibers = Vec::with_capacity(rings * sectors);
    let half = TAU / sectors as f64 / 2.0;
    for ring in 0..rings {
        let r0 = radius * ring as f64 / rings as f64;
        let r1 = radius * (ring + 1) as f64 / rings as f64;
        let area = half * (r1 * r1 - r0 * r0);
        let r_c = (2.0 / 3.0) * (r1.powi(3) - r0.powi(3)) / (r1 * r1 - r0 * r0) * half.sin()
            / half;
        for sector in 0..sectors {
            let angle = (sector as f64 + 0.5) * TAU / sectors as f64;
            fibers.push(Fiber::concrete(
                r_c * angle.cos(),
                r_c * angle.sin(),
                area,
                material,
            ));
        }
    }
    fibers
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== 600 mm circular column, 10 N24 bars, N* = 1500 kN ===\n");

    let mut builder = SectionBuilder::new();
    let concrete = builder.add_material(Material::concrete(40.0, 32_800.0, 3.8));
    let steel = builder.add_material(Material::steel(500.0));

    builder.add_fibers(circular_fibers(300.0, 12, 24, concrete));
    // 10 bars of 310 mm2 on a 255 mm circle (45 mm cover to bar centre)
    for bar in 0..10 {
        let angle = bar as f64 * TAU / 10.0;
        builder.add_fiber(Fiber::bar(
            255.0 * angle.cos(),
            255.0 * angle.sin(),
            310.0,
            steel,
        ));
    }
    let section = builder.build()?;
    let n_star = 1.5e6;

    let gross = section.gross_properties();
    println!("Gross properties:");
    println!("  A      = {:.0} mm2", gross.total_area);
    println!("  EA     = {:.3e} N", gross.e_a);
    println!("  EI_xx  = {:.3e} N.mm2", gross.e_ixx);
    println!(
        "  EI_11  = {:.3e} N.mm2 at phi = {:.1} deg",
        gross.e_i11,
        gross.phi.to_degrees()
    );

    let m_cr = section.cracking_moment(0.0, n_star)?;
    println!("\nCracking moment under N*: {:.1} kN.m", m_cr / 1e6);

    let cracked = section.cracked_properties(0.0)?;
    println!("Cracked neutral axis depth: {:.1} mm", cracked.d_nc);
    println!("Cracked EI_uu: {:.3e} N.mm2", cracked.e_iuu());

    println!("\nRunning moment-curvature trace...");
    let config = MomentCurvatureConfig::default();
    let trace = section.moment_curvature(0.0, n_star, &config)?;
    println!(
        "  {} points, ended by {:?}",
        trace.points.len(),
        trace.termination
    );
    println!(
        "  Peak moment: {:.1} kN.m",
        trace.max_resultant_moment() / 1e6
    );
    for point in trace.points.iter().step_by((trace.points.len() / 5).max(1)) {
        println!(
            "    kappa = {:.3e} /mm  M = {:8.1} kN.m  d_n = {:7.1} mm  {:?}",
            point.kappa,
            point.resultant_moment() / 1e6,
            point.d_n,
            point.state
        );
    }

    let ultimate = section.ultimate_capacity(0.0, n_star)?;
    println!("\nUltimate capacity under N*:");
    println!("  M_u = {:.1} kN.m", ultimate.m_xy / 1e6);
    println!("  d_n = {:.1} mm, k_u = {:.3}", ultimate.d_n, ultimate.k_u);

    let stresses = section.ultimate_stress(&ultimate)?;
    println!(
        "  Concrete stress range: {:.1} to {:.1} MPa",
        stresses.min_concrete_stress().unwrap_or(0.0),
        stresses.max_concrete_stress().unwrap_or(0.0)
    );
    println!(
        "  Steel stress range: {:.1} to {:.1} MPa",
        stresses.min_reinforcement_stress().unwrap_or(0.0),
        stresses.max_reinforcement_stress().unwrap_or(0.0)
    );

    println!("\nMoment interaction diagram (theta = 0):");
    let diagram = section.moment_interaction(0.0, &InteractionConfig::default())?;
    println!(
        "  {} points, {} failed",
        diagram.num_successful(),
        diagram.num_failed()
    );
    for point in diagram.points.iter().step_by((diagram.points.len() / 6).max(1)) {
        println!(
            "    N = {:9.1} kN   M = {:8.1} kN.m",
            point.n / 1e3,
            point.m_xy / 1e6
        );
    }
    println!(
        "  Section check at (N*, 0.7 M_u): {}",
        if diagram.contains(n_star, 0.7 * ultimate.m_xy) {
            "OK"
        } else {
            "FAILS"
        }
    );

    println!("\nBiaxial bending diagram at N*:");
    let biaxial = section.biaxial_bending(n_star, &InteractionConfig::default())?;
    for point in biaxial.points.iter().step_by((biaxial.points.len() / 6).max(1)) {
        println!(
            "    theta = {:5.1} deg   Mx = {:8.1}  My = {:8.1} kN.m",
            point.theta.to_degrees(),
            point.m_x / 1e6,
            point.m_y / 1e6
        );
    }

    println!("\n=== Analysis complete ===");
    Ok(())
}
