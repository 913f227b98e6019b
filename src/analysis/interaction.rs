//! Interaction diagram sweeps
//!
//! Both sweeps repeatedly invoke the ultimate capacity solve: the
//! moment-interaction diagram walks axial force targets between the pure
//! tension and squash bounds at a fixed bending angle, the biaxial diagram
//! walks bending angles at a fixed axial force. A failed point is recorded
//! and skipped rather than aborting the sweep, so one awkward equilibrium
//! state does not cost the whole diagram.

use std::f64::consts::TAU;

use log::{debug, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::analysis::{ultimate, InteractionConfig};
use crate::error::{SectionError, SectionResult};
use crate::results::{
    BiaxialBendingResults, MomentInteractionResults, SweepFailure, UltimateResult,
};
use crate::section::Section;

/// Solve one ultimate point, probing a narrowed bracket around the previous
/// neutral-axis depth first when one is available
fn solve_with_hint(
    section: &Section,
    theta: f64,
    n_target: f64,
    hint: Option<f64>,
    config: &InteractionConfig,
) -> SectionResult<UltimateResult> {
    let d_t = section.extent(theta)?.depth();
    if d_t <= 0.0 {
        return Err(SectionError::DegenerateGeometry(
            "section has no depth perpendicular to the bending axis".to_string(),
        ));
    }
    let full = (1e-6 * d_t, config.ultimate.bracket_scale * d_t);

    if config.warm_start {
        if let Some(d_n) = hint {
            let lo = (d_n - config.warm_window * d_t).max(full.0);
            let hi = (d_n + config.warm_window * d_t).min(full.1);
            if lo < hi {
                match ultimate::capacity_with_bracket(
                    section,
                    theta,
                    n_target,
                    (lo, hi),
                    &config.ultimate,
                ) {
                    Ok(point) => return Ok(point),
                    Err(error) => {
                        debug!(
                            "warm bracket ({lo:.3}, {hi:.3}) missed at \
                             n_target = {n_target:.1}: {error}; retrying full bracket"
                        );
                    }
                }
            }
        }
    }
    ultimate::capacity_with_bracket(section, theta, n_target, full, &config.ultimate)
}

#[cfg(not(feature = "parallel"))]
fn sweep<F>(targets: &[f64], solve_one: F) -> (Vec<UltimateResult>, Vec<SweepFailure>)
where
    F: Fn(f64, Option<f64>) -> SectionResult<UltimateResult>,
{
    let mut points = Vec::with_capacity(targets.len());
    let mut failures = Vec::new();
    let mut hint: Option<f64> = None;
    for &parameter in targets {
        match solve_one(parameter, hint) {
            Ok(point) => {
                hint = Some(point.d_n);
                points.push(point);
            }
            Err(error) => {
                warn!("sweep point at {parameter:.4} failed: {error}");
                hint = None;
                failures.push(SweepFailure { parameter, error });
            }
        }
    }
    (points, failures)
}

/// Parallel sweep; solves are independent so neighbor warm starts do not
/// apply, but the sweep order of the output is preserved
#[cfg(feature = "parallel")]
fn sweep<F>(targets: &[f64], solve_one: F) -> (Vec<UltimateResult>, Vec<SweepFailure>)
where
    F: Fn(f64, Option<f64>) -> SectionResult<UltimateResult> + Sync,
{
    let solved: Vec<(f64, SectionResult<UltimateResult>)> = targets
        .par_iter()
        .map(|&parameter| (parameter, solve_one(parameter, None)))
        .collect();

    let mut points = Vec::with_capacity(targets.len());
    let mut failures = Vec::new();
    for (parameter, result) in solved {
        match result {
            Ok(point) => points.push(point),
            Err(error) => {
                warn!("sweep point at {parameter:.4} failed: {error}");
                failures.push(SweepFailure { parameter, error });
            }
        }
    }
    (points, failures)
}

/// Moment-interaction diagram at a fixed bending angle
///
/// Points run in ascending axial force from the pure-tension bound to the
/// squash bound, with `config.n_points` solved states in between.
pub(crate) fn moment_interaction(
    section: &Section,
    theta: f64,
    config: &InteractionConfig,
) -> SectionResult<MomentInteractionResults> {
    let (tension, squash) = ultimate::axial_bounds(section, theta)?;
    let (n_min, n_max) = (tension.n, squash.n);
    let targets: Vec<f64> = (0..config.n_points)
        .map(|i| n_min + (i + 1) as f64 * (n_max - n_min) / (config.n_points + 1) as f64)
        .collect();

    let (solved, failures) = sweep(&targets, |n_target, hint| {
        solve_with_hint(section, theta, n_target, hint, config)
    });

    let mut points = Vec::with_capacity(solved.len() + 2);
    points.push(tension);
    points.extend(solved);
    points.push(squash);
    debug!(
        "moment interaction at theta = {theta:.4}: {} points, {} failures",
        points.len(),
        failures.len()
    );
    Ok(MomentInteractionResults {
        theta,
        points,
        failures,
    })
}

/// Biaxial bending diagram at a fixed axial force target
///
/// Bending angles run ascending over `[0, 2π)`; the resulting polygon of
/// `(m_x, m_y)` capacities closes back on the first point implicitly.
pub(crate) fn biaxial_bending(
    section: &Section,
    n_target: f64,
    config: &InteractionConfig,
) -> SectionResult<BiaxialBendingResults> {
    let angles: Vec<f64> = (0..config.n_points)
        .map(|i| i as f64 * TAU / config.n_points.max(1) as f64)
        .collect();

    let (points, failures) = sweep(&angles, |theta, hint| {
        solve_with_hint(section, theta, n_target, hint, config)
    });

    debug!(
        "biaxial bending at n_target = {n_target:.1}: {} points, {} failures",
        points.len(),
        failures.len()
    );
    Ok(BiaxialBendingResults {
        n_target,
        points,
        failures,
    })
}
