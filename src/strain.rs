//! Strain geometry: the rotated bending frame and linear strain planes
//!
//! A bending direction θ defines a local (u, v) frame: u runs along the
//! neutral-axis direction, v perpendicular to it with the compression side
//! positive. Plane sections remain plane, so every strain state is a linear
//! function of v.

use serde::{Deserialize, Serialize};

/// Transform global (x, y) into the local bending frame at angle theta
///
/// # Arguments
/// * `theta` - Bending axis orientation in radians
/// * `x`, `y` - Global coordinates
///
/// # Returns
/// (u, v) with u along the bending axis and v perpendicular to it
pub fn local_coords(theta: f64, x: f64, y: f64) -> (f64, f64) {
    let (sin, cos) = theta.sin_cos();
    (x * cos + y * sin, -x * sin + y * cos)
}

/// Transform local (u, v) back into global coordinates
pub fn global_coords(theta: f64, u: f64, v: f64) -> (f64, f64) {
    let (sin, cos) = theta.sin_cos();
    (u * cos - v * sin, u * sin + v * cos)
}

/// Section extent perpendicular to the bending axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BendingExtent {
    /// Extreme tension-side fiber position
    pub v_min: f64,
    /// Extreme compression-side fiber position
    pub v_max: f64,
}

impl BendingExtent {
    /// Total section depth perpendicular to the bending axis
    pub fn depth(&self) -> f64 {
        self.v_max - self.v_min
    }
}

/// Scan points for the extreme local-v positions at a bending angle
///
/// Returns `None` for an empty point set.
pub fn bending_extent(
    theta: f64,
    points: impl IntoIterator<Item = (f64, f64)>,
) -> Option<BendingExtent> {
    let mut extent: Option<BendingExtent> = None;
    for (x, y) in points {
        let (_, v) = local_coords(theta, x, y);
        extent = Some(match extent {
            None => BendingExtent { v_min: v, v_max: v },
            Some(e) => BendingExtent {
                v_min: e.v_min.min(v),
                v_max: e.v_max.max(v),
            },
        });
    }
    extent
}

/// How the linear strain field is parameterized
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StrainKind {
    /// Curvature-driven service profile: ε = κ·(v − v_na)
    Service { kappa: f64 },
    /// Ultimate profile anchored at the extreme compression fiber:
    /// ε = ε_a·(v − v_na)/d_n, so the fiber at depth 0 carries ε_a
    Ultimate { anchor_strain: f64, d_n: f64 },
    /// Uniform strain over the whole section (neutral axis at infinity)
    Uniform { strain: f64 },
}

/// A linear strain field over the section for one bending direction
///
/// Compression positive. For the uniform kind `v_na` has no meaning and is
/// stored as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrainPlane {
    /// Bending axis orientation in radians
    pub theta: f64,
    /// Neutral-axis position along the local v axis
    pub v_na: f64,
    pub kind: StrainKind,
}

impl StrainPlane {
    /// Service plane at curvature kappa with the neutral axis at v_na
    pub fn service(theta: f64, v_na: f64, kappa: f64) -> Self {
        Self {
            theta,
            v_na,
            kind: StrainKind::Service { kappa },
        }
    }

    /// Ultimate plane with neutral-axis depth d_n below the extreme
    /// compression fiber at v_max, anchored at anchor_strain there
    pub fn ultimate(theta: f64, v_max: f64, d_n: f64, anchor_strain: f64) -> Self {
        Self {
            theta,
            v_na: v_max - d_n,
            kind: StrainKind::Ultimate { anchor_strain, d_n },
        }
    }

    /// Uniform strain plane (degenerate squash or pure-tension profile)
    pub fn uniform(theta: f64, strain: f64) -> Self {
        Self {
            theta,
            v_na: 0.0,
            kind: StrainKind::Uniform { strain },
        }
    }

    /// Strain at a global point
    pub fn strain_at(&self, x: f64, y: f64) -> f64 {
        let (_, v) = local_coords(self.theta, x, y);
        match self.kind {
            StrainKind::Service { kappa } => kappa * (v - self.v_na),
            StrainKind::Ultimate { anchor_strain, d_n } => {
                anchor_strain * (v - self.v_na) / d_n
            }
            StrainKind::Uniform { strain } => strain,
        }
    }

    /// Curvature of the plane (zero for uniform strain)
    pub fn curvature(&self) -> f64 {
        match self.kind {
            StrainKind::Service { kappa } => kappa,
            StrainKind::Ultimate { anchor_strain, d_n } => anchor_strain / d_n,
            StrainKind::Uniform { .. } => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_local_frame_round_trip() {
        let theta = 0.7;
        let (u, v) = local_coords(theta, 123.0, -45.0);
        let (x, y) = global_coords(theta, u, v);
        assert_relative_eq!(x, 123.0, epsilon = 1e-10);
        assert_relative_eq!(y, -45.0, epsilon = 1e-10);
    }

    #[test]
    fn test_theta_zero_v_is_y() {
        let (u, v) = local_coords(0.0, 3.0, 7.0);
        assert_relative_eq!(u, 3.0, epsilon = 1e-12);
        assert_relative_eq!(v, 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_theta_quarter_turn_v_is_minus_x() {
        // bending about the y axis: compression side is -x
        let (u, v) = local_coords(FRAC_PI_2, 3.0, 7.0);
        assert_relative_eq!(u, 7.0, epsilon = 1e-12);
        assert_relative_eq!(v, -3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bending_extent_selects_extremes() {
        let points = [(0.0, -150.0), (10.0, 0.0), (-5.0, 150.0)];
        let e = bending_extent(0.0, points).unwrap();
        assert_relative_eq!(e.v_min, -150.0, epsilon = 1e-12);
        assert_relative_eq!(e.v_max, 150.0, epsilon = 1e-12);
        assert_relative_eq!(e.depth(), 300.0, epsilon = 1e-12);
        assert!(bending_extent(0.0, std::iter::empty()).is_none());
    }

    #[test]
    fn test_service_plane_strain() {
        // neutral axis at v = 50, curvature 1e-5
        let plane = StrainPlane::service(0.0, 50.0, 1e-5);
        assert_relative_eq!(plane.strain_at(0.0, 150.0), 1e-3, epsilon = 1e-15);
        assert_relative_eq!(plane.strain_at(0.0, 50.0), 0.0, epsilon = 1e-15);
        assert_relative_eq!(plane.strain_at(0.0, -50.0), -1e-3, epsilon = 1e-15);
        assert_relative_eq!(plane.curvature(), 1e-5, epsilon = 1e-20);
    }

    #[test]
    fn test_ultimate_plane_hits_anchor_at_extreme_fiber() {
        // section top at v = 300, neutral axis 200 below it
        let plane = StrainPlane::ultimate(0.0, 300.0, 200.0, 0.003);
        assert_relative_eq!(plane.strain_at(0.0, 300.0), 0.003, epsilon = 1e-15);
        assert_relative_eq!(plane.strain_at(0.0, 100.0), 0.0, epsilon = 1e-15);
        assert_relative_eq!(plane.strain_at(0.0, 0.0), -0.0015, epsilon = 1e-15);
        assert_relative_eq!(plane.curvature(), 0.003 / 200.0, epsilon = 1e-20);
    }

    #[test]
    fn test_uniform_plane_ignores_position() {
        let plane = StrainPlane::uniform(1.2, 0.0025);
        assert_eq!(plane.strain_at(500.0, -500.0), 0.0025);
        assert_eq!(plane.strain_at(0.0, 0.0), 0.0025);
        assert_eq!(plane.curvature(), 0.0);
    }
}
