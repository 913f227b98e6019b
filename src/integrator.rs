//! Stress integration over the fiber set
//!
//! Given a strain plane, integrates stress × area (and × lever arm) over
//! every fiber to produce the net internal actions. Lever arms are measured
//! from a fixed reference point, not from the neutral axis.

use serde::{Deserialize, Serialize};

use crate::error::{SectionError, SectionResult};
use crate::fiber::Fiber;
use crate::material::{Material, ProfileVariant};
use crate::strain::StrainPlane;

/// Whether concrete fibers strained past their cracking strain contribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrationRegime {
    /// All fibers contribute regardless of strain sign
    Uncracked,
    /// Concrete-role fibers whose strain lies below the material cracking
    /// strain carry zero stress
    Cracked,
}

/// Net internal actions of a stress state
///
/// `n` in N (compression positive), moments in N·mm about the reference
/// point: `m_x` about the x axis (positive compresses +y), `m_y` about the
/// y axis (positive compresses -x).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InternalActions {
    pub n: f64,
    pub m_x: f64,
    pub m_y: f64,
}

impl InternalActions {
    pub const ZERO: Self = Self {
        n: 0.0,
        m_x: 0.0,
        m_y: 0.0,
    };

    /// Resultant bending moment magnitude, always non-negative
    pub fn resultant_moment(&self) -> f64 {
        self.m_x.hypot(self.m_y)
    }

    /// Moment component about the bending axis at angle theta
    pub fn moment_about(&self, theta: f64) -> f64 {
        let (sin, cos) = theta.sin_cos();
        self.m_x * cos + self.m_y * sin
    }
}

/// Strain and stress of a single fiber under a strain plane
///
/// This is the per-fiber primitive shared between the integration loop and
/// the stress reconstructor.
pub fn fiber_response(
    fiber: &Fiber,
    materials: &[Material],
    plane: &StrainPlane,
    variant: ProfileVariant,
    regime: IntegrationRegime,
) -> SectionResult<(f64, f64)> {
    let material = materials
        .get(fiber.material.0)
        .ok_or(SectionError::MaterialNotFound(fiber.material.0))?;

    let strain = plane.strain_at(fiber.x, fiber.y);

    let cracked_out = regime == IntegrationRegime::Cracked
        && fiber.role.is_concrete()
        && strain < material.cracking_strain();
    let stress = if cracked_out {
        0.0
    } else {
        material.stress(strain, variant)
    };

    if !stress.is_finite() {
        return Err(SectionError::InvalidMaterialResponse {
            material: material.name.clone(),
            strain,
            stress,
        });
    }
    Ok((strain, stress))
}

/// Integrate the stress field into net internal actions
///
/// # Arguments
/// * `fibers` - The fiber set to integrate over; zero-area fibers are skipped
/// * `materials` - Material table indexed by the fibers' material ids
/// * `reference` - (x, y) point the lever arms are measured from
/// * `plane` - The strain plane to evaluate
/// * `variant` - Service or ultimate material laws
/// * `regime` - Uncracked or cracked concrete participation
pub fn integrate(
    fibers: &[Fiber],
    materials: &[Material],
    reference: (f64, f64),
    plane: &StrainPlane,
    variant: ProfileVariant,
    regime: IntegrationRegime,
) -> SectionResult<InternalActions> {
    let (x_ref, y_ref) = reference;
    let mut actions = InternalActions::ZERO;

    for fiber in fibers {
        if fiber.area == 0.0 {
            continue;
        }
        let (_, stress) = fiber_response(fiber, materials, plane, variant, regime)?;
        let force = stress * fiber.area;
        actions.n += force;
        actions.m_x += force * (fiber.y - y_ref);
        actions.m_y -= force * (fiber.x - x_ref);
    }

    Ok(actions)
}
