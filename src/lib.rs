//! Fiber-based reinforced concrete section analysis
//!
//! Cross-sections are modelled as collections of fibers, each carrying an
//! area, a position and a material stress-strain law. Under the plane-
//! sections assumption the library resolves the section response to combined
//! axial force and biaxial bending, supporting:
//! - Gross and cracked transformed-section elastic properties
//! - Cracking moments about an arbitrary bending axis
//! - Moment-curvature traces with adaptive curvature stepping
//! - Ultimate bending capacity at a fixed axial force
//! - Moment-interaction and biaxial bending capacity diagrams
//! - Per-fiber stress reports reconstructed from solved states
//!
//! Strains, stresses and axial forces are compression positive. Bending
//! angles are measured anticlockwise from the x axis and moments follow the
//! right-hand rule about the section's moment reference.
//!
//! ## Example
//! ```rust
//! use rc_section::prelude::*;
//!
//! // 300 x 500 beam in 10 mm strips with two 450 mm2 bars near the soffit
//! let mut builder = SectionBuilder::new();
//! let concrete = builder.add_material(Material::concrete(32.0, 30_100.0, 3.4));
//! let steel = builder.add_material(Material::steel(500.0));
//! for i in 0..50 {
//!     let y = -245.0 + 10.0 * i as f64;
//!     builder.add_fiber(Fiber::concrete(0.0, y, 3000.0, concrete));
//! }
//! builder.add_fiber(Fiber::bar(-100.0, -210.0, 450.0, steel));
//! builder.add_fiber(Fiber::bar(100.0, -210.0, 450.0, steel));
//! let section = builder.build().unwrap();
//!
//! // sagging capacity under pure bending, in N mm
//! let ultimate = section.ultimate_capacity(0.0, 0.0).unwrap();
//! assert!(ultimate.m_xy > 150e6);
//! ```

pub mod analysis;
pub mod error;
pub mod fiber;
pub mod integrator;
pub mod material;
pub mod properties;
pub mod results;
pub mod section;
pub mod solver;
pub mod strain;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{InteractionConfig, MomentCurvatureConfig, UltimateConfig};
    pub use crate::error::{SectionError, SectionResult};
    pub use crate::fiber::{Fiber, FiberRole, MaterialId};
    pub use crate::material::{Material, ProfileVariant, StressStrainProfile};
    pub use crate::properties::{CrackedProperties, GrossProperties};
    pub use crate::results::{
        BiaxialBendingResults, FiberStress, MomentCurvaturePoint, MomentCurvatureResults,
        MomentInteractionResults, ResponseState, StressReport, SweepFailure, TerminationCause,
        UltimateResult,
    };
    pub use crate::section::{Section, SectionBuilder};
    pub use crate::solver::{RootSolution, SolverConfig};
    pub use crate::strain::{BendingExtent, StrainPlane};
}
