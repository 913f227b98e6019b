//! Material stress-strain laws
//!
//! Strains and stresses are compression-positive throughout. Every law is
//! evaluated pointwise per fiber: `stress(strain) -> stress`.

use serde::{Deserialize, Serialize};

/// Selects which of a material's two stress-strain laws drives an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileVariant {
    /// Serviceability law (elastic properties, moment-curvature)
    Service,
    /// Ultimate law (capacity analyses, e.g. stress-block truncation)
    Ultimate,
}

/// Stress-strain law evaluated pointwise on fiber strains
///
/// Stresses in MPa, strains dimensionless, compression positive. Concrete
/// laws return zero stress in tension; tensile resistance before cracking is
/// handled by [`Material::flexural_tensile_strength`], not by the law itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StressStrainProfile {
    /// Linear elastic in both tension and compression
    Linear { elastic_modulus: f64 },

    /// Linear elastic in compression, zero stress in tension
    LinearNoTension { elastic_modulus: f64 },

    /// Bilinear concrete: linear ascent to the peak strain, then a constant
    /// plateau at the compressive strength up to the ultimate strain
    BilinearConcrete {
        compressive_strength: f64,
        strain_peak: f64,
        strain_ultimate: f64,
    },

    /// Parabolic ascent to the peak strain, then a constant plateau
    /// (Eurocode 2 parabola-rectangle with exponent 2)
    ParabolaRectangle {
        compressive_strength: f64,
        strain_peak: f64,
        strain_ultimate: f64,
    },

    /// Equivalent rectangular stress block for ultimate analysis: a uniform
    /// stress of `alpha * compressive_strength` over the block, zero outside.
    /// Under a linear strain profile anchored at `ultimate_strain`, strains
    /// above `ultimate_strain * (1 - gamma)` lie within a block of depth
    /// `gamma * d_n` from the compression face.
    RectangularStressBlock {
        compressive_strength: f64,
        alpha: f64,
        gamma: f64,
        ultimate_strain: f64,
    },

    /// Symmetric elastic-perfectly-plastic law for reinforcement
    ElasticPlastic {
        elastic_modulus: f64,
        yield_strength: f64,
        fracture_strain: f64,
    },

    /// User-fit piecewise-linear law through `(strain, stress)` points sorted
    /// by ascending strain; stress is clamped to the end values outside the
    /// fitted range
    Piecewise { points: Vec<(f64, f64)> },
}

impl StressStrainProfile {
    /// Evaluate the stress at a given strain
    pub fn stress(&self, strain: f64) -> f64 {
        match self {
            Self::Linear { elastic_modulus } => elastic_modulus * strain,

            Self::LinearNoTension { elastic_modulus } => {
                if strain > 0.0 {
                    elastic_modulus * strain
                } else {
                    0.0
                }
            }

            Self::BilinearConcrete {
                compressive_strength,
                strain_peak,
                ..
            } => {
                if strain <= 0.0 {
                    0.0
                } else if strain < *strain_peak {
                    compressive_strength * strain / strain_peak
                } else {
                    *compressive_strength
                }
            }

            Self::ParabolaRectangle {
                compressive_strength,
                strain_peak,
                ..
            } => {
                if strain <= 0.0 {
                    0.0
                } else if strain < *strain_peak {
                    let r = strain / strain_peak;
                    compressive_strength * (1.0 - (1.0 - r) * (1.0 - r))
                } else {
                    *compressive_strength
                }
            }

            Self::RectangularStressBlock {
                compressive_strength,
                alpha,
                gamma,
                ultimate_strain,
            } => {
                if strain > ultimate_strain * (1.0 - gamma) {
                    alpha * compressive_strength
                } else {
                    0.0
                }
            }

            Self::ElasticPlastic {
                elastic_modulus,
                yield_strength,
                ..
            } => (elastic_modulus * strain).clamp(-yield_strength, *yield_strength),

            Self::Piecewise { points } => {
                match points.first().zip(points.last()) {
                    None => 0.0,
                    Some((first, last)) => {
                        if strain <= first.0 {
                            first.1
                        } else if strain >= last.0 {
                            last.1
                        } else {
                            // strain lies strictly inside the fitted range
                            let mut stress = last.1;
                            for pair in points.windows(2) {
                                let (s0, f0) = pair[0];
                                let (s1, f1) = pair[1];
                                if strain <= s1 {
                                    stress = f0 + (f1 - f0) * (strain - s0) / (s1 - s0);
                                    break;
                                }
                            }
                            stress
                        }
                    }
                }
            }
        }
    }

    /// Initial compressive tangent modulus, used for transformed-section
    /// elastic properties. Zero for laws with no initial stiffness
    /// (e.g. the rectangular stress block).
    pub fn elastic_modulus(&self) -> f64 {
        match self {
            Self::Linear { elastic_modulus }
            | Self::LinearNoTension { elastic_modulus }
            | Self::ElasticPlastic { elastic_modulus, .. } => *elastic_modulus,

            Self::BilinearConcrete {
                compressive_strength,
                strain_peak,
                ..
            } => compressive_strength / strain_peak,

            Self::ParabolaRectangle {
                compressive_strength,
                strain_peak,
                ..
            } => 2.0 * compressive_strength / strain_peak,

            Self::RectangularStressBlock { .. } => 0.0,

            Self::Piecewise { points } => {
                if points.len() < 2 {
                    return 0.0;
                }
                // slope of the segment containing zero strain, or the nearest
                // end segment when zero lies outside the fitted range
                let mut segment = &points[points.len() - 2..];
                for pair in points.windows(2) {
                    if pair[1].0 > 0.0 {
                        segment = pair;
                        break;
                    }
                }
                let (s0, f0) = segment[0];
                let (s1, f1) = segment[1];
                (f1 - f0) / (s1 - s0)
            }
        }
    }

    /// Compressive strain limit (positive), if the law defines one
    pub fn compressive_strain_limit(&self) -> Option<f64> {
        match self {
            Self::BilinearConcrete { strain_ultimate, .. }
            | Self::ParabolaRectangle { strain_ultimate, .. } => Some(*strain_ultimate),
            Self::RectangularStressBlock { ultimate_strain, .. } => Some(*ultimate_strain),
            Self::ElasticPlastic { fracture_strain, .. } => Some(*fracture_strain),
            Self::Piecewise { points } => points
                .last()
                .map(|p| p.0)
                .filter(|s| *s > 0.0),
            Self::Linear { .. } | Self::LinearNoTension { .. } => None,
        }
    }

    /// Tensile strain limit (negative), if the law defines one
    pub fn tensile_strain_limit(&self) -> Option<f64> {
        match self {
            Self::ElasticPlastic { fracture_strain, .. } => Some(-fracture_strain),
            Self::Piecewise { points } => points
                .first()
                .map(|p| p.0)
                .filter(|s| *s < 0.0),
            _ => None,
        }
    }

    /// Yield strain of an elastic-plastic law
    pub fn yield_strain(&self) -> Option<f64> {
        match self {
            Self::ElasticPlastic {
                elastic_modulus,
                yield_strength,
                ..
            } => Some(yield_strength / elastic_modulus),
            _ => None,
        }
    }

    /// Check parameters, returning a description of the first problem found
    pub fn validate(&self) -> Result<(), String> {
        let all_finite = |vals: &[f64]| vals.iter().all(|v| v.is_finite());
        match self {
            Self::Linear { elastic_modulus } | Self::LinearNoTension { elastic_modulus } => {
                if !elastic_modulus.is_finite() || *elastic_modulus <= 0.0 {
                    return Err(format!("elastic modulus must be positive, got {elastic_modulus}"));
                }
            }
            Self::BilinearConcrete {
                compressive_strength,
                strain_peak,
                strain_ultimate,
            }
            | Self::ParabolaRectangle {
                compressive_strength,
                strain_peak,
                strain_ultimate,
            } => {
                if !all_finite(&[*compressive_strength, *strain_peak, *strain_ultimate]) {
                    return Err("concrete law parameters must be finite".to_string());
                }
                if *compressive_strength <= 0.0 || *strain_peak <= 0.0 {
                    return Err("compressive strength and peak strain must be positive".to_string());
                }
                if *strain_ultimate < *strain_peak {
                    return Err(format!(
                        "ultimate strain {strain_ultimate} is below peak strain {strain_peak}"
                    ));
                }
            }
            Self::RectangularStressBlock {
                compressive_strength,
                alpha,
                gamma,
                ultimate_strain,
            } => {
                if !all_finite(&[*compressive_strength, *alpha, *gamma, *ultimate_strain]) {
                    return Err("stress block parameters must be finite".to_string());
                }
                if *compressive_strength <= 0.0 || *ultimate_strain <= 0.0 {
                    return Err("strength and ultimate strain must be positive".to_string());
                }
                if *alpha <= 0.0 || *alpha > 1.0 || *gamma <= 0.0 || *gamma > 1.0 {
                    return Err(format!("alpha {alpha} and gamma {gamma} must lie in (0, 1]"));
                }
            }
            Self::ElasticPlastic {
                elastic_modulus,
                yield_strength,
                fracture_strain,
            } => {
                if !all_finite(&[*elastic_modulus, *yield_strength, *fracture_strain]) {
                    return Err("elastic-plastic parameters must be finite".to_string());
                }
                if *elastic_modulus <= 0.0 || *yield_strength <= 0.0 {
                    return Err("modulus and yield strength must be positive".to_string());
                }
                if *fracture_strain <= yield_strength / elastic_modulus {
                    return Err("fracture strain must exceed the yield strain".to_string());
                }
            }
            Self::Piecewise { points } => {
                if points.len() < 2 {
                    return Err("piecewise law needs at least two points".to_string());
                }
                for pair in points.windows(2) {
                    if !pair[0].0.is_finite() || !pair[0].1.is_finite() {
                        return Err("piecewise points must be finite".to_string());
                    }
                    if pair[1].0 <= pair[0].0 {
                        return Err("piecewise strains must be strictly increasing".to_string());
                    }
                }
            }
        }
        Ok(())
    }
}

/// A section material: a service law, an ultimate law and a flexural
/// tensile strength, shared by reference across many fibers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Law used for elastic properties and moment-curvature analysis
    pub service: StressStrainProfile,
    /// Law used for ultimate capacity analysis
    pub ultimate: StressStrainProfile,
    /// Modulus of rupture f_t in MPa; governs the cracking strain. Zero for
    /// reinforcement.
    pub flexural_tensile_strength: f64,
}

impl Material {
    /// Create a material from explicit laws
    pub fn new(
        name: impl Into<String>,
        service: StressStrainProfile,
        ultimate: StressStrainProfile,
        flexural_tensile_strength: f64,
    ) -> Self {
        Self {
            name: name.into(),
            service,
            ultimate,
            flexural_tensile_strength,
        }
    }

    /// Concrete with a bilinear service law and a rectangular stress block at
    /// ultimate. `f_c` in MPa, `elastic_modulus` in MPa, `f_t` in MPa.
    pub fn concrete(f_c: f64, elastic_modulus: f64, f_t: f64) -> Self {
        // block depth factor per ACI 318: 0.85 down to 0.65 above 28 MPa
        let gamma = (0.85 - 0.05 * (f_c - 28.0) / 7.0).clamp(0.65, 0.85);
        Self {
            name: format!("concrete {f_c:.0} MPa"),
            service: StressStrainProfile::BilinearConcrete {
                compressive_strength: f_c,
                strain_peak: f_c / elastic_modulus,
                strain_ultimate: 0.0035,
            },
            ultimate: StressStrainProfile::RectangularStressBlock {
                compressive_strength: f_c,
                alpha: 0.85,
                gamma,
                ultimate_strain: 0.003,
            },
            flexural_tensile_strength: f_t,
        }
    }

    /// Reinforcing steel, elastic-perfectly-plastic in both variants.
    /// `f_y` in MPa.
    pub fn steel(f_y: f64) -> Self {
        let law = StressStrainProfile::ElasticPlastic {
            elastic_modulus: 200e3, // 200 GPa
            yield_strength: f_y,
            fracture_strain: 0.05,
        };
        Self {
            name: format!("steel {f_y:.0} MPa"),
            service: law.clone(),
            ultimate: law,
            flexural_tensile_strength: 0.0,
        }
    }

    /// The law driving a given analysis variant
    pub fn profile(&self, variant: ProfileVariant) -> &StressStrainProfile {
        match variant {
            ProfileVariant::Service => &self.service,
            ProfileVariant::Ultimate => &self.ultimate,
        }
    }

    /// Stress at a strain under the given variant
    pub fn stress(&self, strain: f64, variant: ProfileVariant) -> f64 {
        self.profile(variant).stress(strain)
    }

    /// Elastic modulus of the service law
    pub fn elastic_modulus(&self) -> f64 {
        self.service.elastic_modulus()
    }

    /// Strain at which the material cracks in tension (negative), from the
    /// flexural tensile strength and the service elastic modulus
    pub fn cracking_strain(&self) -> f64 {
        -self.flexural_tensile_strength / self.service.elastic_modulus()
    }

    /// Yield strain of the service law, if it has one
    pub fn yield_strain(&self) -> Option<f64> {
        self.service.yield_strain()
    }

    /// Compressive strain limit of the ultimate law, if defined
    pub fn ultimate_compressive_strain(&self) -> Option<f64> {
        self.ultimate.compressive_strain_limit()
    }

    /// Check laws and parameters
    pub fn validate(&self) -> Result<(), String> {
        self.service
            .validate()
            .map_err(|e| format!("material '{}' service law: {e}", self.name))?;
        self.ultimate
            .validate()
            .map_err(|e| format!("material '{}' ultimate law: {e}", self.name))?;
        if !self.flexural_tensile_strength.is_finite() || self.flexural_tensile_strength < 0.0 {
            return Err(format!(
                "material '{}': flexural tensile strength must be non-negative",
                self.name
            ));
        }
        if self.service.elastic_modulus() <= 0.0 {
            return Err(format!(
                "material '{}': service law has no initial stiffness",
                self.name
            ));
        }
        Ok(())
    }
}
