//! Cross-section fibers

use serde::{Deserialize, Serialize};

/// Index into a section's material table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub usize);

/// Role of a fiber within the cross-section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FiberRole {
    /// Meshed concrete region element
    Concrete,
    /// Meshed reinforcement region element
    MeshedReinforcement,
    /// Lumped reinforcing bar treated as a point area
    LumpedReinforcement,
}

impl FiberRole {
    pub fn is_concrete(&self) -> bool {
        matches!(self, FiberRole::Concrete)
    }

    pub fn is_reinforcement(&self) -> bool {
        matches!(
            self,
            FiberRole::MeshedReinforcement | FiberRole::LumpedReinforcement
        )
    }
}

/// An area element of the cross-section carrying one material
///
/// Positions in mm from the global origin, area in mm². Fibers are immutable
/// once the section is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fiber {
    pub x: f64,
    pub y: f64,
    pub area: f64,
    pub material: MaterialId,
    pub role: FiberRole,
}

impl Fiber {
    pub fn new(x: f64, y: f64, area: f64, material: MaterialId, role: FiberRole) -> Self {
        Self {
            x,
            y,
            area,
            material,
            role,
        }
    }

    /// A meshed concrete fiber
    pub fn concrete(x: f64, y: f64, area: f64, material: MaterialId) -> Self {
        Self::new(x, y, area, material, FiberRole::Concrete)
    }

    /// A lumped reinforcing bar
    pub fn bar(x: f64, y: f64, area: f64, material: MaterialId) -> Self {
        Self::new(x, y, area, material, FiberRole::LumpedReinforcement)
    }
}
