//! Analysis engines and their configuration
//!
//! The engines themselves are crate-internal; they are reached through the
//! methods on [`crate::section::Section`]. Only their configuration types are
//! public.

pub(crate) mod interaction;
pub(crate) mod moment_curvature;
pub(crate) mod stress;
pub(crate) mod ultimate;

use serde::{Deserialize, Serialize};

use crate::solver::SolverConfig;

/// Options for a moment-curvature trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentCurvatureConfig {
    /// Initial curvature increment per step (1/mm)
    pub kappa_inc: f64,
    /// Growth factor applied to the increment after a smooth step, and the
    /// divisor used when a step is rejected and retried
    pub kappa_mult: f64,
    /// Ceiling on the curvature increment
    pub kappa_inc_max: f64,
    /// Relative moment jump below which the increment is grown
    pub delta_m_min: f64,
    /// Relative moment jump above which a step is rejected and retried with
    /// a smaller increment
    pub delta_m_max: f64,
    /// Enable adaptive increment control
    pub adaptive: bool,
    /// Retry budget for rejected steps. Moment-jump rejections count
    /// consecutively and reset on each accepted point; strain-limit
    /// rejections draw on the budget once each, so a trace pinned against a
    /// strain limit terminates after at most this many shrinks
    pub max_step_retries: usize,
    /// Optional curvature ceiling ending the trace early
    pub kappa_max: Option<f64>,
    /// Hard cap on accepted points, bounding traces of sections whose
    /// materials define no strain limits
    pub max_points: usize,
    /// Strain magnitude cap bounding how far the neutral axis may travel
    /// beyond the section faces during the equilibrium solve
    pub strain_cap: f64,
    /// Root-finder controls for the per-step equilibrium solve
    pub solver: SolverConfig,
}

impl Default for MomentCurvatureConfig {
    fn default() -> Self {
        Self {
            kappa_inc: 1e-7,
            kappa_mult: 2.0,
            kappa_inc_max: 5e-6,
            delta_m_min: 0.15,
            delta_m_max: 0.3,
            adaptive: true,
            max_step_retries: 12,
            kappa_max: None,
            max_points: 1000,
            strain_cap: 0.1,
            solver: SolverConfig::default(),
        }
    }
}

impl MomentCurvatureConfig {
    /// Fixed-increment stepping at the given curvature increment
    pub fn fixed(kappa_inc: f64) -> Self {
        Self {
            kappa_inc,
            adaptive: false,
            ..Self::default()
        }
    }

    pub fn with_kappa_inc(mut self, kappa_inc: f64) -> Self {
        self.kappa_inc = kappa_inc;
        self
    }

    pub fn with_kappa_max(mut self, kappa_max: f64) -> Self {
        self.kappa_max = Some(kappa_max);
        self
    }

    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.adaptive = adaptive;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if !(self.kappa_inc > 0.0) || !self.kappa_inc.is_finite() {
            return Err(format!("kappa_inc must be positive, got {}", self.kappa_inc));
        }
        if self.kappa_mult <= 1.0 {
            return Err(format!("kappa_mult must exceed 1, got {}", self.kappa_mult));
        }
        if self.kappa_inc_max < self.kappa_inc {
            return Err("kappa_inc_max is below kappa_inc".to_string());
        }
        if !(self.delta_m_min > 0.0) || self.delta_m_max <= self.delta_m_min {
            return Err("moment-jump thresholds must satisfy 0 < min < max".to_string());
        }
        if !(self.strain_cap > 0.0) {
            return Err("strain_cap must be positive".to_string());
        }
        if self.max_points == 0 {
            return Err("max_points must be positive".to_string());
        }
        if let Some(kappa_max) = self.kappa_max {
            if !(kappa_max > 0.0) {
                return Err("kappa_max must be positive".to_string());
            }
        }
        Ok(())
    }
}

/// Options for a single ultimate capacity solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UltimateConfig {
    /// Upper neutral-axis bracket as a multiple of the section depth
    pub bracket_scale: f64,
    /// Root-finder controls
    pub solver: SolverConfig,
}

impl Default for UltimateConfig {
    fn default() -> Self {
        Self {
            bracket_scale: 6.0,
            solver: SolverConfig::default(),
        }
    }
}

impl UltimateConfig {
    pub fn with_bracket_scale(mut self, bracket_scale: f64) -> Self {
        self.bracket_scale = bracket_scale;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }
}

/// Options for interaction-diagram sweeps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Number of solved points: interior axial-force targets for the
    /// moment-interaction sweep, angles for the biaxial sweep
    pub n_points: usize,
    /// Warm-start each solve from the neighbouring point's neutral axis
    pub warm_start: bool,
    /// Half-width of the warm-start probe window as a fraction of the
    /// section depth
    pub warm_window: f64,
    /// Per-point ultimate solve options
    pub ultimate: UltimateConfig,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            n_points: 24,
            warm_start: true,
            warm_window: 0.25,
            ultimate: UltimateConfig::default(),
        }
    }
}

impl InteractionConfig {
    pub fn with_n_points(mut self, n_points: usize) -> Self {
        self.n_points = n_points;
        self
    }

    pub fn with_warm_start(mut self, warm_start: bool) -> Self {
        self.warm_start = warm_start;
        self
    }

    pub fn with_ultimate(mut self, ultimate: UltimateConfig) -> Self {
        self.ultimate = ultimate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moment_curvature_defaults_are_valid() {
        let config = MomentCurvatureConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.kappa_inc, 1e-7);
        assert_eq!(config.kappa_mult, 2.0);
        assert_eq!(config.kappa_inc_max, 5e-6);
        assert!(config.adaptive);
    }

    #[test]
    fn test_fixed_stepping_builder() {
        let config = MomentCurvatureConfig::fixed(2.5e-7).with_kappa_max(1e-4);
        assert!(!config.adaptive);
        assert_eq!(config.kappa_inc, 2.5e-7);
        assert_eq!(config.kappa_max, Some(1e-4));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_stepping() {
        assert!(MomentCurvatureConfig::default()
            .with_kappa_inc(-1.0)
            .validate()
            .is_err());
        let mut config = MomentCurvatureConfig::default();
        config.kappa_mult = 0.5;
        assert!(config.validate().is_err());
        let mut config = MomentCurvatureConfig::default();
        config.delta_m_max = config.delta_m_min / 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_interaction_builder() {
        let config = InteractionConfig::default()
            .with_n_points(12)
            .with_warm_start(false);
        assert_eq!(config.n_points, 12);
        assert!(!config.warm_start);
    }
}
