//! Error types for section analysis

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for section analysis operations
///
/// Kept `Clone + Serialize` so sweep results can record per-point failures.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SectionError {
    #[error("Material id {0} not registered in section")]
    MaterialNotFound(usize),

    #[error("Section has no fibers")]
    EmptySection,

    #[error(
        "No equilibrium for axial force {n_target:.3} N: attainable axial \
         forces at the bracket ends are [{n_lo:.3}, {n_hi:.3}] N"
    )]
    NoEquilibrium { n_target: f64, n_lo: f64, n_hi: f64 },

    #[error(
        "Root finding did not converge after {iterations} iterations \
         (best estimate {best_estimate:.6e}, residual {residual:.3} N)"
    )]
    DidNotConverge {
        iterations: usize,
        best_estimate: f64,
        residual: f64,
    },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error(
        "Material '{material}' returned non-finite stress {stress} at strain {strain}"
    )]
    InvalidMaterialResponse {
        material: String,
        strain: f64,
        stress: f64,
    },

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for section analysis operations
pub type SectionResult<T> = Result<T, SectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_equilibrium_message_reports_bracket() {
        let err = SectionError::NoEquilibrium {
            n_target: 1000.0,
            n_lo: -250.0,
            n_hi: -40.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("1000.000"));
        assert!(msg.contains("-250.000"));
        assert!(msg.contains("-40.000"));
    }

    #[test]
    fn errors_are_cloneable_for_sweep_accounting() {
        let err = SectionError::DidNotConverge {
            iterations: 100,
            best_estimate: 123.4,
            residual: 5.6,
        };
        let copy = err.clone();
        assert_eq!(err, copy);
    }
}
