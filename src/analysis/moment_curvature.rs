//! Moment-curvature analysis
//!
//! Steps curvature monotonically, solving section equilibrium at every step
//! and watching the per-fiber strains for cracking, yielding and strain-limit
//! exceedance. Termination at a strain limit is the natural end of the
//! response, not an error: the accumulated trace is always returned.

use log::{debug, warn};

use crate::analysis::MomentCurvatureConfig;
use crate::error::{SectionError, SectionResult};
use crate::integrator::{integrate, IntegrationRegime};
use crate::material::ProfileVariant;
use crate::results::{
    MomentCurvaturePoint, MomentCurvatureResults, ResponseState, TerminationCause,
};
use crate::section::Section;
use crate::solver::solve_bracketed;
use crate::strain::StrainPlane;

/// Outcome of scanning per-fiber strains at a candidate equilibrium point
struct StrainScan {
    /// Most advanced response state the strains imply
    detected: ResponseState,
    /// First strain-limit exceedance found, as (material, strain, limit)
    violation: Option<(String, f64, f64)>,
}

fn scan_strains(section: &Section, plane: &StrainPlane) -> SectionResult<StrainScan> {
    let materials = section.materials();
    let mut detected = ResponseState::Elastic;
    let mut violation: Option<(String, f64, f64)> = None;

    for fiber in section.fibers() {
        if fiber.area == 0.0 {
            continue;
        }
        let material = materials
            .get(fiber.material.0)
            .ok_or(SectionError::MaterialNotFound(fiber.material.0))?;
        let strain = plane.strain_at(fiber.x, fiber.y);

        if violation.is_none() {
            if let Some(limit) = material.service.compressive_strain_limit() {
                if strain > limit {
                    violation = Some((material.name.clone(), strain, limit));
                }
            }
            if let Some(limit) = material.service.tensile_strain_limit() {
                if strain < limit {
                    violation = Some((material.name.clone(), strain, limit));
                }
            }
        }

        if fiber.role.is_concrete() && strain < material.cracking_strain() {
            detected = detected.max(ResponseState::Cracked);
        }
        if fiber.role.is_reinforcement() {
            if let Some(yield_strain) = material.yield_strain() {
                if strain.abs() > yield_strain {
                    detected = detected.max(ResponseState::PostYield);
                }
            }
        }
    }

    Ok(StrainScan {
        detected,
        violation,
    })
}

/// Run a moment-curvature trace at bending angle `theta` under a constant
/// axial force target
pub(crate) fn run(
    section: &Section,
    theta: f64,
    n_target: f64,
    config: &MomentCurvatureConfig,
) -> SectionResult<MomentCurvatureResults> {
    config.validate().map_err(SectionError::InvalidInput)?;
    let extent = section.extent(theta)?;
    let d_t = extent.depth();
    if d_t <= 0.0 {
        return Err(SectionError::DegenerateGeometry(
            "section has no depth perpendicular to the bending axis".to_string(),
        ));
    }
    debug!(
        "moment-curvature trace: theta = {theta:.4}, n_target = {n_target:.1}, \
         depth = {d_t:.1}"
    );

    let mut points: Vec<MomentCurvaturePoint> = Vec::new();
    let mut state = ResponseState::Elastic;
    let mut kappa = 0.0_f64;
    let mut inc = config.kappa_inc;
    // jump_retries resets on every accepted point; limit_retries is spent
    // once and never refunded, so a trace that keeps landing past a strain
    // limit terminates instead of creeping toward it forever
    let mut jump_retries = 0usize;
    let mut limit_retries = 0usize;

    let termination = loop {
        if points.len() >= config.max_points {
            break TerminationCause::PointBudget {
                points: points.len(),
            };
        }

        let mut kappa_trial = kappa + inc;
        let mut at_ceiling = false;
        if let Some(kappa_max) = config.kappa_max {
            if kappa_trial >= kappa_max {
                kappa_trial = kappa_max;
                at_ceiling = true;
            }
        }

        // neutral axis swept from beyond the tension face to beyond the
        // compression face, bounded by the strain cap
        let bracket = (
            -config.strain_cap / kappa_trial,
            d_t + config.strain_cap / kappa_trial,
        );
        let plane_at = |d_n: f64| StrainPlane::service(theta, extent.v_max - d_n, kappa_trial);
        let residual = |d_n: f64| -> SectionResult<f64> {
            let actions = integrate(
                section.fibers(),
                section.materials(),
                section.reference(),
                &plane_at(d_n),
                ProfileVariant::Service,
                IntegrationRegime::Cracked,
            )?;
            Ok(actions.n - n_target)
        };

        match solve_bracketed(residual, bracket, n_target, &config.solver) {
            Ok(solution) => {
                let plane = plane_at(solution.root);
                let actions = integrate(
                    section.fibers(),
                    section.materials(),
                    section.reference(),
                    &plane,
                    ProfileVariant::Service,
                    IntegrationRegime::Cracked,
                )?;

                let scan = scan_strains(section, &plane)?;
                if let Some((material, strain, limit)) = scan.violation {
                    if config.adaptive && limit_retries < config.max_step_retries {
                        inc /= config.kappa_mult;
                        limit_retries += 1;
                        continue;
                    }
                    break TerminationCause::StrainLimit {
                        material,
                        strain,
                        limit,
                    };
                }

                if config.adaptive && !points.is_empty() {
                    let m_prev = points[points.len() - 1].resultant_moment();
                    let m_here = actions.resultant_moment();
                    let jump = if m_here != 0.0 {
                        ((m_here - m_prev) / m_here).abs()
                    } else {
                        0.0
                    };
                    if jump > config.delta_m_max && jump_retries < config.max_step_retries {
                        inc /= config.kappa_mult;
                        jump_retries += 1;
                        continue;
                    }
                    if jump < config.delta_m_min && limit_retries == 0 {
                        inc = (inc * config.kappa_mult).min(config.kappa_inc_max);
                    }
                }

                jump_retries = 0;
                state = state.max(scan.detected);
                debug!(
                    "kappa = {kappa_trial:.4e}: d_n = {:.3}, m = {:.3e} ({:?})",
                    solution.root,
                    actions.resultant_moment(),
                    state
                );
                points.push(MomentCurvaturePoint {
                    kappa: kappa_trial,
                    d_n: solution.root,
                    n: actions.n,
                    m_x: actions.m_x,
                    m_y: actions.m_y,
                    state,
                });
                kappa = kappa_trial;

                if at_ceiling {
                    break TerminationCause::CurvatureCeiling { kappa: kappa_trial };
                }
            }
            Err(error) => {
                if points.is_empty() {
                    return Err(error);
                }
                warn!("equilibrium solve failed at kappa = {kappa_trial:.4e}: {error}");
                break TerminationCause::SolverFailure {
                    kappa: kappa_trial,
                    error,
                };
            }
        }
    };

    debug!(
        "trace finished with {} points: {termination:?}",
        points.len()
    );
    Ok(MomentCurvatureResults {
        theta,
        n_target,
        points,
        final_state: ResponseState::Terminated,
        termination,
    })
}
