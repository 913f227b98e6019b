//! Stress reconstruction
//!
//! Rebuilds per-fiber strains, stresses and lever arms from previously solved
//! states so they can be plotted or checked against hand calculations. The
//! reconstructors reuse the integrator's fiber response rather than the solve
//! loop; summing a report's fiber forces recovers the actions it was built
//! from, up to the linearity of the underlying laws.

use nalgebra::{Matrix2, Vector2};

use crate::analysis::ultimate::{anchor_strain, governing_tensile_strain};
use crate::error::{SectionError, SectionResult};
use crate::integrator::{fiber_response, IntegrationRegime};
use crate::material::ProfileVariant;
use crate::properties::CrackedProperties;
use crate::results::{FiberStress, MomentCurvatureResults, StressReport, UltimateResult};
use crate::section::Section;
use crate::strain::{local_coords, StrainPlane};

/// How fiber stresses follow from strains in a report
#[derive(Clone, Copy)]
enum StressModel {
    /// Transformed-section elasticity: `stress = elastic_modulus * strain`
    /// for every fiber, with no cracking or nonlinearity
    TransformedElastic,
    /// Full constitutive response through the chosen profile variant and
    /// crack regime
    Law {
        variant: ProfileVariant,
        regime: IntegrationRegime,
    },
}

fn build_report(
    section: &Section,
    plane: &StrainPlane,
    model: StressModel,
) -> SectionResult<StressReport> {
    let (x_ref, y_ref) = section.reference();
    let materials = section.materials();
    let mut records = Vec::with_capacity(section.fibers().len());
    let (mut n, mut m_x, mut m_y) = (0.0, 0.0, 0.0);

    for fiber in section.fibers() {
        let strain = plane.strain_at(fiber.x, fiber.y);
        let stress = match model {
            StressModel::TransformedElastic => {
                let material = materials
                    .get(fiber.material.0)
                    .ok_or(SectionError::MaterialNotFound(fiber.material.0))?;
                material.elastic_modulus() * strain
            }
            StressModel::Law { variant, regime } => {
                fiber_response(fiber, materials, plane, variant, regime)?.1
            }
        };
        let force = stress * fiber.area;
        let (lever_x, lever_y) = (fiber.x - x_ref, fiber.y - y_ref);
        n += force;
        m_x += force * lever_y;
        m_y -= force * lever_x;
        records.push(FiberStress {
            x: fiber.x,
            y: fiber.y,
            area: fiber.area,
            material: fiber.material,
            role: fiber.role,
            strain,
            stress,
            force,
            lever_x,
            lever_y,
        });
    }

    Ok(StressReport {
        records,
        n,
        m_x,
        m_y,
        reference: (x_ref, y_ref),
    })
}

/// Uncracked elastic stresses under combined axial force and biaxial moments
///
/// Moments are taken about the section's moment reference. The strain plane
/// comes from the gross transformed-section relations, so summing the report
/// reproduces the requested actions exactly.
pub(crate) fn uncracked_stress(
    section: &Section,
    n: f64,
    m_x: f64,
    m_y: f64,
) -> SectionResult<StressReport> {
    let gross = section.gross_properties();
    let (x_ref, y_ref) = section.reference();

    // moments about the E-weighted centroid decouple from the axial term
    let m_x_c = m_x + (y_ref - gross.cy) * n;
    let m_y_c = m_y - (x_ref - gross.cx) * n;

    let stiffness = Matrix2::new(gross.e_ixy, gross.e_ixx, -gross.e_iyy, -gross.e_ixy);
    let coeffs = stiffness
        .lu()
        .solve(&Vector2::new(m_x_c, m_y_c))
        .ok_or_else(|| {
            SectionError::DegenerateGeometry(
                "bending stiffness matrix is singular".to_string(),
            )
        })?;
    let (b, c) = (coeffs[0], coeffs[1]);

    // strain at the global origin, then the equivalent rotated plane
    let e0 = n / gross.e_a - b * gross.cx - c * gross.cy;
    let kappa = b.hypot(c);
    let plane = if kappa == 0.0 {
        StrainPlane::uniform(0.0, e0)
    } else {
        StrainPlane::service((-b).atan2(c), -e0 / kappa, kappa)
    };
    build_report(section, &plane, StressModel::TransformedElastic)
}

/// Cracked elastic stresses under an axial force and a moment about the
/// cracked section's bending axis
///
/// Valid while every participating fiber stays on the initial branch of its
/// service law.
pub(crate) fn cracked_stress(
    section: &Section,
    cracked: &CrackedProperties,
    n: f64,
    m: f64,
) -> SectionResult<StressReport> {
    let e_iuu = cracked.e_iuu();
    if !(cracked.e_a > 0.0) || !(e_iuu > 0.0) {
        return Err(SectionError::DegenerateGeometry(
            "cracked section has no stiffness about the bending axis".to_string(),
        ));
    }

    let kappa = m / e_iuu;
    let plane = if kappa == 0.0 {
        StrainPlane::uniform(cracked.theta, n / cracked.e_a)
    } else {
        let (_, v_c) = local_coords(cracked.theta, cracked.cx, cracked.cy);
        StrainPlane::service(cracked.theta, v_c - n / (cracked.e_a * kappa), kappa)
    };
    build_report(
        section,
        &plane,
        StressModel::Law {
            variant: ProfileVariant::Service,
            regime: IntegrationRegime::Cracked,
        },
    )
}

/// Service stresses at a curvature along a moment-curvature trace
///
/// Inside the traced range the neutral axis is interpolated between solved
/// points. Below the first traced point the response is still uncracked
/// elastic, so the plane is rebuilt from the gross properties at the trace's
/// axial force target.
pub(crate) fn service_stress(
    section: &Section,
    trace: &MomentCurvatureResults,
    kappa: f64,
) -> SectionResult<StressReport> {
    if kappa < 0.0 {
        return Err(SectionError::InvalidInput(format!(
            "curvature must be non-negative, got {kappa:.4e}"
        )));
    }

    if let Some(point) = trace.interpolate(kappa) {
        let extent = section.extent(trace.theta)?;
        let plane = StrainPlane::service(trace.theta, extent.v_max - point.d_n, point.kappa);
        return build_report(
            section,
            &plane,
            StressModel::Law {
                variant: ProfileVariant::Service,
                regime: IntegrationRegime::Cracked,
            },
        );
    }

    let first = trace
        .points
        .first()
        .ok_or_else(|| SectionError::InvalidInput("trace has no points".to_string()))?;
    if kappa < first.kappa {
        let gross = section.gross_properties();
        let plane = if kappa == 0.0 {
            StrainPlane::uniform(trace.theta, trace.n_target / gross.e_a)
        } else {
            let (_, v_c) = local_coords(trace.theta, gross.cx, gross.cy);
            StrainPlane::service(
                trace.theta,
                v_c - trace.n_target / (gross.e_a * kappa),
                kappa,
            )
        };
        return build_report(section, &plane, StressModel::TransformedElastic);
    }

    Err(SectionError::InvalidInput(format!(
        "curvature {kappa:.4e} is beyond the traced range ending at {:.4e}",
        trace.points[trace.points.len() - 1].kappa
    )))
}

/// Service stresses at the curvature where the trace first reaches a
/// resultant moment
pub(crate) fn service_stress_at_moment(
    section: &Section,
    trace: &MomentCurvatureResults,
    m: f64,
) -> SectionResult<StressReport> {
    let kappa = trace.kappa_at_moment(m).ok_or_else(|| {
        SectionError::InvalidInput(format!(
            "moment {m:.4e} is never reached along the trace"
        ))
    })?;
    service_stress(section, trace, kappa)
}

/// Ultimate stresses for a solved ultimate limit state
///
/// The degenerate squash and pure-tension results rebuild their uniform
/// strain profiles; every other result rebuilds the anchored profile from
/// its neutral-axis depth.
pub(crate) fn ultimate_stress(
    section: &Section,
    result: &UltimateResult,
) -> SectionResult<StressReport> {
    let anchor = anchor_strain(section)?;
    let plane = if result.d_n == f64::INFINITY {
        StrainPlane::uniform(result.theta, anchor)
    } else if result.d_n == f64::NEG_INFINITY {
        let strain = governing_tensile_strain(section).unwrap_or(-anchor);
        StrainPlane::uniform(result.theta, strain)
    } else {
        let extent = section.extent(result.theta)?;
        StrainPlane::ultimate(result.theta, extent.v_max, result.d_n, anchor)
    };
    build_report(
        section,
        &plane,
        StressModel::Law {
            variant: ProfileVariant::Ultimate,
            regime: IntegrationRegime::Cracked,
        },
    )
}
