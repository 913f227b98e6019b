//! Section assembly and the analysis entry points
//!
//! A [`Section`] owns its fibers and materials and exposes every analysis as
//! a method. Sections are assembled through [`SectionBuilder`], which checks
//! the geometry and material parameters once at build time so the solvers can
//! assume a well-formed model.

use serde::{Deserialize, Serialize};

use crate::analysis::{
    interaction, moment_curvature, stress, ultimate, InteractionConfig, MomentCurvatureConfig,
    UltimateConfig,
};
use crate::error::{SectionError, SectionResult};
use crate::fiber::{Fiber, MaterialId};
use crate::material::Material;
use crate::properties::{self, CrackedProperties, GrossProperties};
use crate::results::{
    BiaxialBendingResults, MomentCurvatureResults, MomentInteractionResults, StressReport,
    UltimateResult,
};
use crate::strain::{bending_extent, BendingExtent};

/// Collects materials and fibers, then validates them into a [`Section`]
///
/// Materials are registered first so their [`MaterialId`]s can be attached
/// to fibers:
///
/// ```
/// use rc_section::prelude::*;
///
/// let mut builder = SectionBuilder::new();
/// let concrete = builder.add_material(Material::concrete(32.0, 30_000.0, 3.0));
/// let steel = builder.add_material(Material::steel(500.0));
/// builder.add_fiber(Fiber::concrete(0.0, 0.0, 10_000.0, concrete));
/// builder.add_fiber(Fiber::concrete(0.0, 100.0, 10_000.0, concrete));
/// builder.add_fiber(Fiber::bar(0.0, -40.0, 450.0, steel));
/// let section = builder.build()?;
/// assert_eq!(section.fibers().len(), 3);
/// # Ok::<(), SectionError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SectionBuilder {
    fibers: Vec<Fiber>,
    materials: Vec<Material>,
    reference: Option<(f64, f64)>,
}

impl SectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material and return the id fibers use to reference it
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn add_fiber(&mut self, fiber: Fiber) {
        self.fibers.push(fiber);
    }

    pub fn add_fibers(&mut self, fibers: impl IntoIterator<Item = Fiber>) {
        self.fibers.extend(fibers);
    }

    /// Take moments about `(x, y)` instead of the E-weighted gross centroid
    pub fn moment_centroid(&mut self, x: f64, y: f64) {
        self.reference = Some((x, y));
    }

    /// Validate the model and compute its gross properties
    pub fn build(self) -> SectionResult<Section> {
        if self.fibers.is_empty() {
            return Err(SectionError::EmptySection);
        }
        for (index, fiber) in self.fibers.iter().enumerate() {
            if !fiber.x.is_finite() || !fiber.y.is_finite() || !fiber.area.is_finite() {
                return Err(SectionError::InvalidInput(format!(
                    "fiber {index} has non-finite geometry"
                )));
            }
            if fiber.area < 0.0 {
                return Err(SectionError::InvalidInput(format!(
                    "fiber {index} has negative area {}",
                    fiber.area
                )));
            }
            if fiber.material.0 >= self.materials.len() {
                return Err(SectionError::MaterialNotFound(fiber.material.0));
            }
        }
        for material in &self.materials {
            material.validate().map_err(|problem| {
                SectionError::InvalidInput(format!(
                    "material '{}': {problem}",
                    material.name
                ))
            })?;
        }
        if let Some((x, y)) = self.reference {
            if !x.is_finite() || !y.is_finite() {
                return Err(SectionError::InvalidInput(
                    "moment centroid must be finite".to_string(),
                ));
            }
        }

        let gross = properties::compute_gross(&self.fibers, &self.materials)?;
        let reference = self.reference.unwrap_or((gross.cx, gross.cy));
        Ok(Section {
            fibers: self.fibers,
            materials: self.materials,
            gross,
            reference,
        })
    }
}

/// A validated fiber section ready for analysis
///
/// All strains, stresses and axial forces are compression positive; bending
/// angles are measured anticlockwise from the x axis, with the compression
/// side of the section at larger rotated `v` coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    fibers: Vec<Fiber>,
    materials: Vec<Material>,
    gross: GrossProperties,
    reference: (f64, f64),
}

impl Section {
    pub fn fibers(&self) -> &[Fiber] {
        &self.fibers
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub(crate) fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Point moments and lever arms are taken about
    pub fn reference(&self) -> (f64, f64) {
        self.reference
    }

    /// Elastic gross (uncracked) transformed-section properties
    pub fn gross_properties(&self) -> &GrossProperties {
        &self.gross
    }

    /// Fiber extents perpendicular to the bending axis at angle `theta`
    pub(crate) fn extent(&self, theta: f64) -> SectionResult<BendingExtent> {
        bending_extent(theta, self.fibers.iter().map(|f| (f.x, f.y)))
            .ok_or(SectionError::EmptySection)
    }

    /// Moment at which the concrete first cracks in tension, bending about
    /// `theta` under axial force `n`
    pub fn cracking_moment(&self, theta: f64, n: f64) -> SectionResult<f64> {
        properties::cracking_moment(&self.fibers, &self.materials, &self.gross, theta, n)
    }

    /// Fully cracked transformed-section properties about `theta`
    pub fn cracked_properties(&self, theta: f64) -> SectionResult<CrackedProperties> {
        properties::cracked_properties(&self.fibers, &self.materials, theta)
    }

    /// Trace the moment-curvature response about `theta` while holding the
    /// axial force at `n_target`
    pub fn moment_curvature(
        &self,
        theta: f64,
        n_target: f64,
        config: &MomentCurvatureConfig,
    ) -> SectionResult<MomentCurvatureResults> {
        moment_curvature::run(self, theta, n_target, config)
    }

    /// Ultimate bending capacity about `theta` at axial force `n_target`
    pub fn ultimate_capacity(&self, theta: f64, n_target: f64) -> SectionResult<UltimateResult> {
        self.ultimate_capacity_with(theta, n_target, &UltimateConfig::default())
    }

    pub fn ultimate_capacity_with(
        &self,
        theta: f64,
        n_target: f64,
        config: &UltimateConfig,
    ) -> SectionResult<UltimateResult> {
        ultimate::capacity(self, theta, n_target, config)
    }

    /// Pure-tension and squash axial limits about `theta`, in that order
    pub fn axial_capacity_bounds(
        &self,
        theta: f64,
    ) -> SectionResult<(UltimateResult, UltimateResult)> {
        ultimate::axial_bounds(self, theta)
    }

    /// Moment-interaction diagram about `theta`
    pub fn moment_interaction(
        &self,
        theta: f64,
        config: &InteractionConfig,
    ) -> SectionResult<MomentInteractionResults> {
        interaction::moment_interaction(self, theta, config)
    }

    /// Biaxial bending capacity diagram at axial force `n_target`
    pub fn biaxial_bending(
        &self,
        n_target: f64,
        config: &InteractionConfig,
    ) -> SectionResult<BiaxialBendingResults> {
        interaction::biaxial_bending(self, n_target, config)
    }

    /// Uncracked elastic stresses under `n`, `m_x`, `m_y` about the moment
    /// reference
    pub fn uncracked_stress(&self, n: f64, m_x: f64, m_y: f64) -> SectionResult<StressReport> {
        stress::uncracked_stress(self, n, m_x, m_y)
    }

    /// Cracked elastic stresses under axial force `n` and moment `m` about
    /// the cracked section's bending axis
    pub fn cracked_stress(
        &self,
        cracked: &CrackedProperties,
        n: f64,
        m: f64,
    ) -> SectionResult<StressReport> {
        stress::cracked_stress(self, cracked, n, m)
    }

    /// Service stresses at curvature `kappa` along a traced response
    pub fn service_stress(
        &self,
        trace: &MomentCurvatureResults,
        kappa: f64,
    ) -> SectionResult<StressReport> {
        stress::service_stress(self, trace, kappa)
    }

    /// Service stresses where the traced response first reaches resultant
    /// moment `m`
    pub fn service_stress_at_moment(
        &self,
        trace: &MomentCurvatureResults,
        m: f64,
    ) -> SectionResult<StressReport> {
        stress::service_stress_at_moment(self, trace, m)
    }

    /// Stresses for a solved ultimate limit state
    pub fn ultimate_stress(&self, result: &UltimateResult) -> SectionResult<StressReport> {
        stress::ultimate_stress(self, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_fiber_builder() -> (SectionBuilder, MaterialId) {
        let mut builder = SectionBuilder::new();
        let concrete = builder.add_material(Material::concrete(32.0, 30_000.0, 3.0));
        builder.add_fiber(Fiber::concrete(0.0, -50.0, 1000.0, concrete));
        builder.add_fiber(Fiber::concrete(0.0, 50.0, 1000.0, concrete));
        (builder, concrete)
    }

    #[test]
    fn test_build_empty_section() {
        let err = SectionBuilder::new().build().unwrap_err();
        assert_eq!(err, SectionError::EmptySection);
    }

    #[test]
    fn test_build_rejects_unknown_material() {
        let (mut builder, _) = two_fiber_builder();
        builder.add_fiber(Fiber::concrete(0.0, 0.0, 10.0, MaterialId(5)));
        assert_eq!(builder.build().unwrap_err(), SectionError::MaterialNotFound(5));
    }

    #[test]
    fn test_build_rejects_negative_area() {
        let (mut builder, concrete) = two_fiber_builder();
        builder.add_fiber(Fiber::concrete(0.0, 0.0, -1.0, concrete));
        assert!(matches!(
            builder.build(),
            Err(SectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_build_rejects_non_finite_coordinates() {
        let (mut builder, concrete) = two_fiber_builder();
        builder.add_fiber(Fiber::concrete(f64::NAN, 0.0, 10.0, concrete));
        assert!(matches!(
            builder.build(),
            Err(SectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_default_reference_is_centroid() {
        let (builder, _) = two_fiber_builder();
        let section = builder.build().unwrap();
        let (x, y) = section.reference();
        assert_relative_eq!(x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_moment_centroid_override() {
        let (mut builder, _) = two_fiber_builder();
        builder.moment_centroid(10.0, -20.0);
        let section = builder.build().unwrap();
        assert_eq!(section.reference(), (10.0, -20.0));
    }

    #[test]
    fn test_material_lookup() {
        let (builder, concrete) = two_fiber_builder();
        let section = builder.build().unwrap();
        assert_eq!(section.material(concrete).unwrap().name, "concrete 32 MPa");
        assert!(section.material(MaterialId(9)).is_none());
    }
}
