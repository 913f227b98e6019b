//! Shared test sections
//!
//! Units are N, mm and MPa. Hand-calculation reference values quoted in the
//! test files assume these exact fixtures.
#![allow(dead_code)]

use std::f64::consts::TAU;

use rc_section::prelude::*;

/// 300 x 500 rectangular beam in 5 mm strips with two 450 mm2 bars at
/// y = -210 (460 mm effective depth from the top face).
///
/// Concrete: f_c = 32 MPa, E_c = 30 000 MPa, f_t = 3.0 MPa.
/// Steel: f_y = 500 MPa, E_s = 200 000 MPa.
pub fn rect_beam() -> Section {
    let mut builder = SectionBuilder::new();
    let concrete = builder.add_material(Material::concrete(32.0, 30_000.0, 3.0));
    let steel = builder.add_material(Material::steel(500.0));
    for i in 0..100 {
        let y = -247.5 + 5.0 * i as f64;
        builder.add_fiber(Fiber::concrete(0.0, y, 1500.0, concrete));
    }
    builder.add_fiber(Fiber::bar(-100.0, -210.0, 450.0, steel));
    builder.add_fiber(Fiber::bar(100.0, -210.0, 450.0, steel));
    builder.build().unwrap()
}

/// 600 mm circular column with 10 bars of 310 mm2 on a 255 mm circle.
///
/// Concrete: f_c = 40 MPa, E_c = 32 800 MPa, f_t = 3.8 MPa.
/// Steel: f_y = 500 MPa. The mesh is 12 radial rings by 24 sectors, with
/// each annular sector fiber at its area centroid, so the layout is
/// symmetric under reflection in both axes.
pub fn circular_column() -> Section {
    let mut builder = SectionBuilder::new();
    let concrete = builder.add_material(Material::concrete(40.0, 32_800.0, 3.8));
    let steel = builder.add_material(Material::steel(500.0));

    let (rings, sectors) = (12, 24);
    let half = TAU / sectors as f64 / 2.0;
    for ring in 0..rings {
        let r0 = 300.0 * ring as f64 / rings as f64;
        let r1 = 300.0 * (ring + 1) as f64 / rings as f64;
        let area = half * (r1 * r1 - r0 * r0);
        let r_c = (2.0 / 3.0) * (r1.powi(3) - r0.powi(3)) / (r1 * r1 - r0 * r0) * half.sin()
            / half;
        for sector in 0..sectors {
            let angle = (sector as f64 + 0.5) * TAU / sectors as f64;
            builder.add_fiber(Fiber::concrete(
                r_c * angle.cos(),
                r_c * angle.sin(),
                area,
                concrete,
            ));
        }
    }
    for bar in 0..10 {
        let angle = bar as f64 * TAU / 10.0;
        builder.add_fiber(Fiber::bar(
            255.0 * angle.cos(),
            255.0 * angle.sin(),
            310.0,
            steel,
        ));
    }
    builder.build().unwrap()
}
