//! Elastic section properties
//!
//! Transformed-section (modulus-weighted) properties of the gross section,
//! the elastic cracking moment, and cracked-section properties for a given
//! bending direction. All second moments are E-weighted (units N·mm²)
//! so dissimilar materials combine without a modular ratio.

use log::debug;
use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};

use crate::error::{SectionError, SectionResult};
use crate::fiber::Fiber;
use crate::material::Material;
use crate::solver::{find_root, SolverConfig};
use crate::strain::{bending_extent, local_coords};

/// E-weighted second moment about a bending axis at angle theta, from
/// centroidal values
fn rotate_second_moment(e_ixx: f64, e_iyy: f64, e_ixy: f64, theta: f64) -> f64 {
    let (sin, cos) = theta.sin_cos();
    e_ixx * cos * cos + e_iyy * sin * sin - 2.0 * e_ixy * sin * cos
}

/// Modulus-weighted elastic properties of the gross (uncracked) section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrossProperties {
    pub total_area: f64,
    pub concrete_area: f64,
    pub reinforcement_area: f64,
    /// Axial rigidity ΣE·A in N
    pub e_a: f64,
    /// Modulus-weighted centroid
    pub cx: f64,
    pub cy: f64,
    /// Centroidal E-weighted second moments in N·mm²
    pub e_ixx: f64,
    pub e_iyy: f64,
    pub e_ixy: f64,
    /// Principal E-weighted second moments and the angle of the major
    /// principal bending axis, normalized to [0, π)
    pub e_i11: f64,
    pub e_i22: f64,
    pub phi: f64,
    /// E-weighted section moduli about the centroidal axes
    pub e_zxx_plus: f64,
    pub e_zxx_minus: f64,
    pub e_zyy_plus: f64,
    pub e_zyy_minus: f64,
    /// Governing compressive strain limit for ultimate analysis: the minimum
    /// over materials of concrete fibers, falling back to reinforcement
    /// limits for sections without concrete
    pub ultimate_strain: Option<f64>,
}

impl GrossProperties {
    /// E-weighted second moment about the bending axis at angle theta
    pub fn e_iuu(&self, theta: f64) -> f64 {
        rotate_second_moment(self.e_ixx, self.e_iyy, self.e_ixy, theta)
    }
}

/// Elastic properties of the cracked section for one bending direction
///
/// Participating fibers are all reinforcement plus the concrete on the
/// compression side of the cracked neutral axis, solved for pure bending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrackedProperties {
    /// Bending axis orientation the crack state was solved for
    pub theta: f64,
    /// Cracked neutral-axis depth below the extreme compression fiber
    pub d_nc: f64,
    /// Neutral-axis position along the local v axis
    pub v_na: f64,
    /// Axial rigidity of the participating set
    pub e_a: f64,
    /// Centroid of the participating set
    pub cx: f64,
    pub cy: f64,
    /// Centroidal E-weighted second moments of the participating set
    pub e_ixx: f64,
    pub e_iyy: f64,
    pub e_ixy: f64,
    /// Number of participating fibers with non-zero area
    pub n_participating: usize,
}

impl CrackedProperties {
    /// E-weighted second moment about the cracked bending axis
    pub fn e_iuu(&self) -> f64 {
        rotate_second_moment(self.e_ixx, self.e_iyy, self.e_ixy, self.theta)
    }
}

fn material_for<'a>(
    materials: &'a [Material],
    fiber: &Fiber,
) -> SectionResult<&'a Material> {
    materials
        .get(fiber.material.0)
        .ok_or(SectionError::MaterialNotFound(fiber.material.0))
}

/// Compute gross transformed-section properties over the fiber set
pub(crate) fn compute_gross(
    fibers: &[Fiber],
    materials: &[Material],
) -> SectionResult<GrossProperties> {
    if fibers.is_empty() {
        return Err(SectionError::EmptySection);
    }

    let mut total_area = 0.0;
    let mut concrete_area = 0.0;
    let mut reinforcement_area = 0.0;
    let mut e_a = 0.0;
    let mut e_qx = 0.0;
    let mut e_qy = 0.0;
    let mut e_ixx_g = 0.0;
    let mut e_iyy_g = 0.0;
    let mut e_ixy_g = 0.0;
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);

    for fiber in fibers {
        let material = material_for(materials, fiber)?;
        let ea = material.elastic_modulus() * fiber.area;

        total_area += fiber.area;
        if fiber.role.is_concrete() {
            concrete_area += fiber.area;
        } else {
            reinforcement_area += fiber.area;
        }
        e_a += ea;
        e_qx += ea * fiber.y;
        e_qy += ea * fiber.x;
        e_ixx_g += ea * fiber.y * fiber.y;
        e_iyy_g += ea * fiber.x * fiber.x;
        e_ixy_g += ea * fiber.x * fiber.y;

        if fiber.area > 0.0 {
            x_min = x_min.min(fiber.x);
            x_max = x_max.max(fiber.x);
            y_min = y_min.min(fiber.y);
            y_max = y_max.max(fiber.y);
        }
    }

    if !(e_a > 0.0) || total_area <= 0.0 {
        return Err(SectionError::DegenerateGeometry(
            "section has zero axial rigidity".to_string(),
        ));
    }

    let cx = e_qy / e_a;
    let cy = e_qx / e_a;
    let e_ixx = e_ixx_g - e_a * cy * cy;
    let e_iyy = e_iyy_g - e_a * cx * cx;
    let e_ixy = e_ixy_g - e_a * cx * cy;

    // principal bending axes from the quadratic form v' M v with
    // v = (cos theta, sin theta)
    let m = Matrix2::new(e_ixx, -e_ixy, -e_ixy, e_iyy);
    let eigen = m.symmetric_eigen();
    let (major, minor) = if eigen.eigenvalues[0] >= eigen.eigenvalues[1] {
        (0, 1)
    } else {
        (1, 0)
    };
    let e_i11 = eigen.eigenvalues[major];
    let e_i22 = eigen.eigenvalues[minor];
    let axis = eigen.eigenvectors.column(major);
    // the eigenvector sign is arbitrary; fold the axis angle into [0, π)
    let mut phi = axis[1].atan2(axis[0]);
    if phi < 0.0 {
        phi += std::f64::consts::PI;
    }
    if phi >= std::f64::consts::PI {
        phi -= std::f64::consts::PI;
    }

    let ultimate_strain = governing_ultimate_strain(fibers, materials);

    Ok(GrossProperties {
        total_area,
        concrete_area,
        reinforcement_area,
        e_a,
        cx,
        cy,
        e_ixx,
        e_iyy,
        e_ixy,
        e_i11,
        e_i22,
        phi,
        e_zxx_plus: e_ixx / (y_max - cy),
        e_zxx_minus: e_ixx / (cy - y_min),
        e_zyy_plus: e_iyy / (x_max - cx),
        e_zyy_minus: e_iyy / (cx - x_min),
        ultimate_strain,
    })
}

fn governing_ultimate_strain(fibers: &[Fiber], materials: &[Material]) -> Option<f64> {
    let min_over = |concrete_only: bool| {
        fibers
            .iter()
            .filter(|f| !concrete_only || f.role.is_concrete())
            .filter_map(|f| materials.get(f.material.0))
            .filter_map(|m| m.ultimate_compressive_strain())
            .min_by(|a, b| a.total_cmp(b))
    };
    min_over(true).or_else(|| min_over(false))
}

/// Elastic cracking moment about the bending axis at angle theta under
/// axial force n (compression positive)
///
/// Cracking occurs when the tensile stress at the extreme tension fiber of
/// any concrete material reaches its flexural tensile strength; the minimum
/// moment across concrete materials governs.
pub(crate) fn cracking_moment(
    fibers: &[Fiber],
    materials: &[Material],
    gross: &GrossProperties,
    theta: f64,
    n: f64,
) -> SectionResult<f64> {
    let e_iuu = gross.e_iuu(theta);
    let (_, v_c) = local_coords(theta, gross.cx, gross.cy);

    let mut m_cr: Option<f64> = None;
    for id in 0..materials.len() {
        let mut d_max = 0.0_f64;
        let mut present = false;
        for fiber in fibers {
            if fiber.material.0 == id && fiber.role.is_concrete() && fiber.area > 0.0 {
                present = true;
                let (_, v) = local_coords(theta, fiber.x, fiber.y);
                d_max = d_max.max(v_c - v);
            }
        }
        if !present || d_max <= 0.0 {
            continue;
        }
        let material = &materials[id];
        let f_t = material.flexural_tensile_strength;
        let m = (f_t / material.elastic_modulus() + n / gross.e_a) * e_iuu / d_max;
        m_cr = Some(match m_cr {
            None => m,
            Some(current) => current.min(m),
        });
    }

    m_cr.ok_or_else(|| {
        SectionError::AnalysisFailed(
            "no concrete fibers on the tension side of the bending axis".to_string(),
        )
    })
}

/// Solve for the cracked neutral axis and the cracked elastic properties
///
/// The cracked neutral axis under pure bending passes through the centroid
/// of the participating set, so its position is the root of the E-weighted
/// first moment of that set about the trial axis.
pub(crate) fn cracked_properties(
    fibers: &[Fiber],
    materials: &[Material],
    theta: f64,
) -> SectionResult<CrackedProperties> {
    let extent = bending_extent(theta, fibers.iter().map(|f| (f.x, f.y)))
        .ok_or(SectionError::EmptySection)?;
    let depth = extent.depth();
    if depth <= 0.0 {
        return Err(SectionError::DegenerateGeometry(
            "section has no depth perpendicular to the bending axis".to_string(),
        ));
    }

    // fiber data in the local frame, resolved once
    let mut local = Vec::with_capacity(fibers.len());
    let mut e_a_all = 0.0;
    for fiber in fibers {
        let material = material_for(materials, fiber)?;
        let (_, v) = local_coords(theta, fiber.x, fiber.y);
        let ea = material.elastic_modulus() * fiber.area;
        e_a_all += ea;
        local.push((v, ea, fiber.role.is_concrete()));
    }

    let first_moment = |v_na: f64| -> SectionResult<f64> {
        let mut q = 0.0;
        for &(v, ea, concrete) in &local {
            if !concrete || v >= v_na {
                q += ea * (v - v_na);
            }
        }
        Ok(q)
    };

    let bracket = (extent.v_min, extent.v_max);
    let q_lo = first_moment(bracket.0)?;
    let q_hi = first_moment(bracket.1)?;
    if (q_lo > 0.0) == (q_hi > 0.0) && q_lo.abs() > 0.0 && q_hi.abs() > 0.0 {
        return Err(SectionError::DegenerateGeometry(
            "cracked neutral axis is not bracketed by the section extents".to_string(),
        ));
    }

    // first-moment residual scale is E·A·depth
    let config = SolverConfig {
        force_tolerance: e_a_all * depth * 1e-12,
        bracket_tolerance: 1e-12,
        max_iterations: 100,
    };
    let solution = find_root(first_moment, bracket, (q_lo, q_hi), &config)?;
    let v_na = solution.root;
    debug!(
        "cracked neutral axis at theta = {theta:.4}: v_na = {v_na:.3} \
         ({} iterations)",
        solution.iterations
    );

    let mut e_a = 0.0;
    let mut e_qx = 0.0;
    let mut e_qy = 0.0;
    let mut e_ixx_g = 0.0;
    let mut e_iyy_g = 0.0;
    let mut e_ixy_g = 0.0;
    let mut n_participating = 0;
    for fiber in fibers {
        let (_, v) = local_coords(theta, fiber.x, fiber.y);
        if fiber.role.is_concrete() && v < v_na {
            continue;
        }
        let material = material_for(materials, fiber)?;
        let ea = material.elastic_modulus() * fiber.area;
        e_a += ea;
        e_qx += ea * fiber.y;
        e_qy += ea * fiber.x;
        e_ixx_g += ea * fiber.y * fiber.y;
        e_iyy_g += ea * fiber.x * fiber.x;
        e_ixy_g += ea * fiber.x * fiber.y;
        if fiber.area > 0.0 {
            n_participating += 1;
        }
    }

    if !(e_a > 0.0) {
        return Err(SectionError::DegenerateGeometry(
            "cracked section has zero axial rigidity".to_string(),
        ));
    }

    let cx = e_qy / e_a;
    let cy = e_qx / e_a;
    Ok(CrackedProperties {
        theta,
        d_nc: extent.v_max - v_na,
        v_na,
        e_a,
        cx,
        cy,
        e_ixx: e_ixx_g - e_a * cy * cy,
        e_iyy: e_iyy_g - e_a * cx * cx,
        e_ixy: e_ixy_g - e_a * cx * cy,
        n_participating,
    })
}
