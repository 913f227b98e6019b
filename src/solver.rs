//! Scalar root finding for section equilibrium
//!
//! The equilibrium residual is piecewise-differentiable: fiber participation
//! switches at the tension cutoff and bars yield at discrete strains. Pure
//! Newton or secant iteration can diverge across those kinks, so the solver
//! maintains a shrinking sign-change bracket and falls back to bisection
//! whenever a secant step leaves the bracket or fails to reduce the residual.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::{SectionError, SectionResult};

/// Convergence controls for the equilibrium root finder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Absolute residual tolerance in N
    pub force_tolerance: f64,
    /// Bracket width tolerance relative to the initial bracket span
    pub bracket_tolerance: f64,
    /// Iteration budget for a single solve
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            force_tolerance: 1e-2,
            bracket_tolerance: 1e-9,
            max_iterations: 100,
        }
    }
}

impl SolverConfig {
    pub fn with_force_tolerance(mut self, tolerance: f64) -> Self {
        self.force_tolerance = tolerance;
        self
    }

    pub fn with_bracket_tolerance(mut self, tolerance: f64) -> Self {
        self.bracket_tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }
}

/// A converged root
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootSolution {
    pub root: f64,
    /// Residual at the root, or at the nearest evaluated point when
    /// convergence came from bracket collapse
    pub residual: f64,
    pub iterations: usize,
}

/// Find a root of `f` inside a bracket with known end residuals
///
/// `f_bracket` holds the residuals already evaluated at the bracket ends;
/// they must straddle zero. Converges when the residual magnitude drops
/// below `force_tolerance` or the bracket collapses below
/// `bracket_tolerance` times the initial span.
pub fn find_root<F>(
    mut f: F,
    bracket: (f64, f64),
    f_bracket: (f64, f64),
    config: &SolverConfig,
) -> SectionResult<RootSolution>
where
    F: FnMut(f64) -> SectionResult<f64>,
{
    let (mut lo, mut hi) = bracket;
    let (mut f_lo, mut f_hi) = f_bracket;
    let span = (hi - lo).abs();

    if f_lo.abs() < config.force_tolerance {
        return Ok(RootSolution {
            root: lo,
            residual: f_lo,
            iterations: 0,
        });
    }
    if f_hi.abs() < config.force_tolerance {
        return Ok(RootSolution {
            root: hi,
            residual: f_hi,
            iterations: 0,
        });
    }
    if (f_lo > 0.0) == (f_hi > 0.0) {
        return Err(SectionError::AnalysisFailed(
            "root finder requires a sign change across the bracket".to_string(),
        ));
    }

    // the two most recent evaluations drive the secant step
    let (mut x_prev, mut f_prev) = (lo, f_lo);
    let (mut x_curr, mut f_curr) = (hi, f_hi);
    let mut force_bisect = false;

    for iteration in 1..=config.max_iterations {
        let midpoint = 0.5 * (lo + hi);
        let denom = f_curr - f_prev;
        let mut x_next = if force_bisect || denom == 0.0 {
            midpoint
        } else {
            x_curr - f_curr * (x_curr - x_prev) / denom
        };

        let (b_lo, b_hi) = if lo < hi { (lo, hi) } else { (hi, lo) };
        if !(x_next > b_lo && x_next < b_hi) {
            x_next = midpoint;
        }

        let f_next = f(x_next)?;
        trace!(
            "root iteration {iteration}: x = {x_next:.6e}, residual = {f_next:.6e}"
        );

        if f_next.abs() < config.force_tolerance {
            return Ok(RootSolution {
                root: x_next,
                residual: f_next,
                iterations: iteration,
            });
        }

        // shrink the bracket around the sign change
        if (f_next > 0.0) == (f_lo > 0.0) {
            lo = x_next;
            f_lo = f_next;
        } else {
            hi = x_next;
            f_hi = f_next;
        }

        if (hi - lo).abs() < config.bracket_tolerance * span {
            let (root, residual) = if f_lo.abs() < f_hi.abs() {
                (lo, f_lo)
            } else {
                (hi, f_hi)
            };
            return Ok(RootSolution {
                root,
                residual,
                iterations: iteration,
            });
        }

        force_bisect = f_next.abs() >= f_curr.abs();
        (x_prev, f_prev) = (x_curr, f_curr);
        (x_curr, f_curr) = (x_next, f_next);
    }

    let (best_estimate, residual) = if f_lo.abs() < f_hi.abs() {
        (lo, f_lo)
    } else {
        (hi, f_hi)
    };
    Err(SectionError::DidNotConverge {
        iterations: config.max_iterations,
        best_estimate,
        residual,
    })
}

/// Evaluate the residual at both bracket ends and solve for its root
///
/// The closure is the equilibrium residual `n(x) - n_target`. A bracket whose
/// end residuals share a sign means the target axial force is not attainable
/// under the strain model; that is reported as [`SectionError::NoEquilibrium`]
/// carrying the attainable axial forces at the bracket ends.
pub fn solve_bracketed<F>(
    mut f: F,
    bracket: (f64, f64),
    n_target: f64,
    config: &SolverConfig,
) -> SectionResult<RootSolution>
where
    F: FnMut(f64) -> SectionResult<f64>,
{
    let f_lo = f(bracket.0)?;
    let f_hi = f(bracket.1)?;

    let within_tolerance =
        f_lo.abs() < config.force_tolerance || f_hi.abs() < config.force_tolerance;
    if !within_tolerance && (f_lo > 0.0) == (f_hi > 0.0) {
        let n_a = f_lo + n_target;
        let n_b = f_hi + n_target;
        return Err(SectionError::NoEquilibrium {
            n_target,
            n_lo: n_a.min(n_b),
            n_hi: n_a.max(n_b),
        });
    }

    find_root(f, bracket, (f_lo, f_hi), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_residual_converges_fast() {
        let config = SolverConfig::default();
        let sol = solve_bracketed(|x| Ok(x - 3.0), (0.0, 10.0), 0.0, &config).unwrap();
        assert_relative_eq!(sol.root, 3.0, epsilon = 1e-6);
        assert!(sol.iterations <= 3);
    }

    #[test]
    fn test_kinked_monotone_residual() {
        // slope changes by two orders of magnitude at the root
        let f = |x: f64| {
            Ok(if x < 2.0 {
                0.1 * (x - 2.0)
            } else {
                10.0 * (x - 2.0)
            })
        };
        let config = SolverConfig::default().with_force_tolerance(1e-8);
        let sol = solve_bracketed(f, (-10.0, 10.0), 0.0, &config).unwrap();
        assert_relative_eq!(sol.root, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_endpoint_already_converged() {
        let config = SolverConfig::default();
        let sol = solve_bracketed(|x| Ok(x), (0.0, 10.0), 0.0, &config).unwrap();
        assert_eq!(sol.root, 0.0);
        assert_eq!(sol.iterations, 0);
    }

    #[test]
    fn test_no_sign_change_reports_attainable_range() {
        let config = SolverConfig::default();
        // residual for a target 50 above anything attainable
        let err = solve_bracketed(|x| Ok(x.abs() - 50.0), (-10.0, 20.0), 100.0, &config)
            .unwrap_err();
        match err {
            SectionError::NoEquilibrium { n_target, n_lo, n_hi } => {
                assert_eq!(n_target, 100.0);
                assert_relative_eq!(n_lo, 60.0, epsilon = 1e-12);
                assert_relative_eq!(n_hi, 70.0, epsilon = 1e-12);
            }
            other => panic!("expected NoEquilibrium, got {other:?}"),
        }
    }

    #[test]
    fn test_iteration_budget_exhaustion() {
        let config = SolverConfig::default()
            .with_max_iterations(1)
            .with_force_tolerance(1e-12)
            .with_bracket_tolerance(0.0);
        let err = solve_bracketed(|x| Ok(x * x * x - 2.0), (0.0, 10.0), 0.0, &config)
            .unwrap_err();
        assert!(matches!(
            err,
            SectionError::DidNotConverge { iterations: 1, .. }
        ));
    }

    #[test]
    fn test_closure_errors_propagate() {
        let config = SolverConfig::default();
        let err = solve_bracketed(
            |_| Err(SectionError::EmptySection),
            (0.0, 1.0),
            0.0,
            &config,
        )
        .unwrap_err();
        assert_eq!(err, SectionError::EmptySection);
    }

    #[test]
    fn test_steep_tanh_like_residual_stays_bracketed() {
        // near-flat tails with a steep core, a shape secant steps overshoot
        let f = |x: f64| Ok((50.0 * (x - 1.0)).tanh());
        let config = SolverConfig::default().with_force_tolerance(1e-10);
        let sol = solve_bracketed(f, (-100.0, 100.0), 0.0, &config).unwrap();
        assert_relative_eq!(sol.root, 1.0, epsilon = 1e-6);
    }
}
