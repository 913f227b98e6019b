//! Ultimate limit state capacity
//!
//! Anchors the strain profile at the governing ultimate compressive strain on
//! the extreme compression fiber and solves for the neutral-axis depth that
//! balances the axial force target. The attainable axial range is bounded by
//! two degenerate uniform-strain profiles, pure tension and squash, reported
//! with `d_n = f64::NEG_INFINITY` and `d_n = f64::INFINITY` respectively.

use log::debug;

use crate::analysis::UltimateConfig;
use crate::error::{SectionError, SectionResult};
use crate::fiber::FiberRole;
use crate::integrator::{integrate, IntegrationRegime, InternalActions};
use crate::material::ProfileVariant;
use crate::results::UltimateResult;
use crate::section::Section;
use crate::solver::solve_bracketed;
use crate::strain::{local_coords, StrainPlane};

/// Governing extreme-fiber compressive strain for ultimate profiles
pub(crate) fn anchor_strain(section: &Section) -> SectionResult<f64> {
    section.gross_properties().ultimate_strain.ok_or_else(|| {
        SectionError::InvalidInput(
            "no material defines an ultimate compressive strain".to_string(),
        )
    })
}

fn ultimate_actions(
    section: &Section,
    plane: &StrainPlane,
) -> SectionResult<InternalActions> {
    integrate(
        section.fibers(),
        section.materials(),
        section.reference(),
        plane,
        ProfileVariant::Ultimate,
        IntegrationRegime::Cracked,
    )
}

/// Neutral-axis depth ratio d_n / d, with d the depth from the extreme
/// compression fiber to the extreme tension bar
fn neutral_axis_ratio(section: &Section, theta: f64, v_max: f64, d_n: f64) -> f64 {
    let mut v_bar: Option<f64> = None;
    for fiber in section.fibers() {
        if fiber.role != FiberRole::LumpedReinforcement || fiber.area == 0.0 {
            continue;
        }
        let (_, v) = local_coords(theta, fiber.x, fiber.y);
        v_bar = Some(match v_bar {
            Some(current) => current.min(v),
            None => v,
        });
    }
    match v_bar {
        Some(v) if v_max - v > 0.0 => d_n / (v_max - v),
        _ => 0.0,
    }
}

/// Solve the ultimate limit state at bending angle `theta` for an axial
/// force target, bracketing d_n from the section depth
pub(crate) fn capacity(
    section: &Section,
    theta: f64,
    n_target: f64,
    config: &UltimateConfig,
) -> SectionResult<UltimateResult> {
    let d_t = section.extent(theta)?.depth();
    if d_t <= 0.0 {
        return Err(SectionError::DegenerateGeometry(
            "section has no depth perpendicular to the bending axis".to_string(),
        ));
    }
    let bracket = (1e-6 * d_t, config.bracket_scale * d_t);
    capacity_with_bracket(section, theta, n_target, bracket, config)
}

/// Solve the ultimate limit state with an explicit d_n bracket
///
/// Sweeps warm-start neighboring solves through here with a narrowed bracket.
pub(crate) fn capacity_with_bracket(
    section: &Section,
    theta: f64,
    n_target: f64,
    bracket: (f64, f64),
    config: &UltimateConfig,
) -> SectionResult<UltimateResult> {
    let extent = section.extent(theta)?;
    let anchor = anchor_strain(section)?;

    let residual = |d_n: f64| -> SectionResult<f64> {
        let plane = StrainPlane::ultimate(theta, extent.v_max, d_n, anchor);
        Ok(ultimate_actions(section, &plane)?.n - n_target)
    };
    let solution = solve_bracketed(residual, bracket, n_target, &config.solver)?;

    let plane = StrainPlane::ultimate(theta, extent.v_max, solution.root, anchor);
    let actions = ultimate_actions(section, &plane)?;
    debug!(
        "ultimate capacity at theta = {theta:.4}, n_target = {n_target:.1}: \
         d_n = {:.3}, m_xy = {:.4e}",
        solution.root,
        actions.resultant_moment()
    );

    Ok(UltimateResult {
        theta,
        d_n: solution.root,
        n: actions.n,
        m_x: actions.m_x,
        m_y: actions.m_y,
        m_xy: actions.resultant_moment(),
        k_u: neutral_axis_ratio(section, theta, extent.v_max, solution.root),
    })
}

/// Pure-tension and squash limits of the section, in that order
///
/// These bound the axial force targets for which a bending solution exists
/// and anchor the ends of a moment-interaction sweep.
pub(crate) fn axial_bounds(
    section: &Section,
    theta: f64,
) -> SectionResult<(UltimateResult, UltimateResult)> {
    let anchor = anchor_strain(section)?;
    let tension_strain = governing_tensile_strain(section).unwrap_or(-anchor);

    let uniform = |d_n: f64, strain: f64| -> SectionResult<UltimateResult> {
        let actions = ultimate_actions(section, &StrainPlane::uniform(theta, strain))?;
        Ok(UltimateResult {
            theta,
            d_n,
            n: actions.n,
            m_x: actions.m_x,
            m_y: actions.m_y,
            m_xy: actions.resultant_moment(),
            k_u: 0.0,
        })
    };

    let tension = uniform(f64::NEG_INFINITY, tension_strain)?;
    let squash = uniform(f64::INFINITY, anchor)?;
    debug!(
        "axial bounds: tension n = {:.1}, squash n = {:.1}",
        tension.n, squash.n
    );
    Ok((tension, squash))
}

/// Tightest tensile strain limit declared by any material a fiber uses
pub(crate) fn governing_tensile_strain(section: &Section) -> Option<f64> {
    let materials = section.materials();
    let mut governing: Option<f64> = None;
    for fiber in section.fibers() {
        if fiber.area == 0.0 {
            continue;
        }
        let limit = materials
            .get(fiber.material.0)
            .and_then(|m| m.profile(ProfileVariant::Ultimate).tensile_strain_limit());
        if let Some(limit) = limit {
            governing = Some(match governing {
                Some(current) => current.max(limit),
                None => limit,
            });
        }
    }
    governing
}
