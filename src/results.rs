//! Result types for section analyses

use serde::{Deserialize, Serialize};

use crate::error::SectionError;
use crate::fiber::{FiberRole, MaterialId};

/// Response regime of the section along a moment-curvature trace
///
/// States only move forward: once cracked the section stays cracked, once a
/// bar has yielded the response stays post-yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResponseState {
    /// No concrete fiber strained past its cracking strain
    Elastic,
    /// Some concrete excluded from tension
    Cracked,
    /// Some reinforcement fiber past its yield strain
    PostYield,
    /// A strain limit or the curvature ceiling has been reached
    Terminated,
}

/// Why a moment-curvature trace ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TerminationCause {
    /// A fiber strain exceeded its material's ultimate or fracture limit
    StrainLimit {
        material: String,
        strain: f64,
        limit: f64,
    },
    /// The configured curvature ceiling was reached
    CurvatureCeiling { kappa: f64 },
    /// The accepted-point budget ran out before any strain limit was hit
    PointBudget { points: usize },
    /// The equilibrium solve failed beyond the first accepted point
    SolverFailure { kappa: f64, error: SectionError },
}

/// One accepted point of a moment-curvature trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentCurvaturePoint {
    pub kappa: f64,
    /// Resolved neutral-axis depth below the extreme compression fiber
    pub d_n: f64,
    /// Net axial force at equilibrium (equals the target within tolerance)
    pub n: f64,
    pub m_x: f64,
    pub m_y: f64,
    /// Response state after evaluating this point's fiber strains
    pub state: ResponseState,
}

impl MomentCurvaturePoint {
    /// Resultant bending moment magnitude
    pub fn resultant_moment(&self) -> f64 {
        self.m_x.hypot(self.m_y)
    }
}

/// A complete moment-curvature trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentCurvatureResults {
    /// Bending axis orientation in radians
    pub theta: f64,
    /// Axial force target held through the trace
    pub n_target: f64,
    /// Accepted points in strictly increasing curvature order
    pub points: Vec<MomentCurvaturePoint>,
    /// State machine position when the trace ended; always `Terminated` for
    /// a completed trace
    pub final_state: ResponseState,
    /// Why the trace ended
    pub termination: TerminationCause,
}

impl MomentCurvatureResults {
    /// Largest resultant moment reached along the trace
    pub fn max_resultant_moment(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.resultant_moment())
            .fold(0.0, f64::max)
    }

    /// Linearly interpolate the trace at a curvature inside its range
    ///
    /// The interpolated state is the state of the later bracketing point.
    /// Returns `None` outside `[first.kappa, last.kappa]`.
    pub fn interpolate(&self, kappa: f64) -> Option<MomentCurvaturePoint> {
        let first = self.points.first()?;
        if kappa < first.kappa || kappa > self.points.last()?.kappa {
            return None;
        }
        if kappa == first.kappa {
            return Some(*first);
        }
        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if kappa <= b.kappa {
                let t = (kappa - a.kappa) / (b.kappa - a.kappa);
                return Some(MomentCurvaturePoint {
                    kappa,
                    d_n: a.d_n + t * (b.d_n - a.d_n),
                    n: a.n + t * (b.n - a.n),
                    m_x: a.m_x + t * (b.m_x - a.m_x),
                    m_y: a.m_y + t * (b.m_y - a.m_y),
                    state: if t > 0.0 { b.state } else { a.state },
                });
            }
        }
        None
    }

    /// Curvature at which the resultant moment first reaches `m`, linearly
    /// interpolated; includes the virtual elastic segment from the origin to
    /// the first point. `None` if `m` is never reached.
    pub fn kappa_at_moment(&self, m: f64) -> Option<f64> {
        let first = self.points.first()?;
        let m_first = first.resultant_moment();
        if m <= m_first {
            if m_first == 0.0 {
                return Some(first.kappa);
            }
            return Some(first.kappa * m / m_first);
        }
        let mut prev = (first.kappa, m_first);
        for point in &self.points[1..] {
            let here = (point.kappa, point.resultant_moment());
            if (m > prev.1 && m <= here.1) || (m < prev.1 && m >= here.1) {
                let t = (m - prev.1) / (here.1 - prev.1);
                return Some(prev.0 + t * (here.0 - prev.0));
            }
            prev = here;
        }
        None
    }
}

/// A solved ultimate limit state
///
/// `d_n` is `f64::INFINITY` for the pure-compression squash profile and
/// `f64::NEG_INFINITY` for the pure-tension profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UltimateResult {
    /// Bending axis orientation in radians
    pub theta: f64,
    /// Neutral-axis depth below the extreme compression fiber
    pub d_n: f64,
    pub n: f64,
    pub m_x: f64,
    pub m_y: f64,
    /// Resultant moment magnitude, always non-negative
    pub m_xy: f64,
    /// Neutral-axis depth ratio d_n / d to the extreme tension
    /// reinforcement; zero when the section has no reinforcement or the
    /// profile is degenerate
    pub k_u: f64,
}

/// A sweep point that failed to solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepFailure {
    /// The swept parameter value (axial force target or bending angle)
    pub parameter: f64,
    pub error: SectionError,
}

/// Moment-interaction diagram: ultimate capacity swept over axial force
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentInteractionResults {
    /// Bending axis orientation in radians
    pub theta: f64,
    /// Successful points in ascending axial force order
    pub points: Vec<UltimateResult>,
    /// Failed sweep points, recorded instead of aborting the sweep
    pub failures: Vec<SweepFailure>,
}

impl MomentInteractionResults {
    pub fn num_successful(&self) -> usize {
        self.points.len()
    }

    pub fn num_failed(&self) -> usize {
        self.failures.len()
    }

    /// Test whether an (n, m) pair lies inside the interaction polygon
    ///
    /// The polygon is formed in the (m, n) plane from the ordered points,
    /// closed back to the first point.
    pub fn contains(&self, n: f64, m: f64) -> bool {
        let polygon: Vec<(f64, f64)> = self.points.iter().map(|p| (p.m_xy, p.n)).collect();
        point_in_polygon(m, n, &polygon)
    }
}

/// Biaxial bending diagram: ultimate capacity swept over bending angle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiaxialBendingResults {
    /// Axial force target held through the sweep
    pub n_target: f64,
    /// Successful points in ascending bending angle order
    pub points: Vec<UltimateResult>,
    pub failures: Vec<SweepFailure>,
}

impl BiaxialBendingResults {
    pub fn num_successful(&self) -> usize {
        self.points.len()
    }

    pub fn num_failed(&self) -> usize {
        self.failures.len()
    }

    /// Test whether an (m_x, m_y) pair lies inside the closed polar
    /// capacity curve
    pub fn contains(&self, m_x: f64, m_y: f64) -> bool {
        let polygon: Vec<(f64, f64)> = self.points.iter().map(|p| (p.m_x, p.m_y)).collect();
        point_in_polygon(m_x, m_y, &polygon)
    }
}

/// Stress, strain and force of a single fiber under a reconstructed state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiberStress {
    pub x: f64,
    pub y: f64,
    pub area: f64,
    pub material: MaterialId,
    pub role: FiberRole,
    pub strain: f64,
    pub stress: f64,
    /// stress × area
    pub force: f64,
    /// Lever arms from the report's reference point
    pub lever_x: f64,
    pub lever_y: f64,
}

/// Per-fiber stress report for a solved or assumed state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressReport {
    pub records: Vec<FiberStress>,
    /// Re-integrated net actions of the records
    pub n: f64,
    pub m_x: f64,
    pub m_y: f64,
    /// Point the lever arms are measured from
    pub reference: (f64, f64),
}

impl StressReport {
    pub fn resultant_moment(&self) -> f64 {
        self.m_x.hypot(self.m_y)
    }

    /// Largest compressive concrete stress
    pub fn max_concrete_stress(&self) -> Option<f64> {
        self.stress_extreme(|r| r.role.is_concrete(), f64::max)
    }

    /// Largest tensile (most negative) concrete stress
    pub fn min_concrete_stress(&self) -> Option<f64> {
        self.stress_extreme(|r| r.role.is_concrete(), f64::min)
    }

    /// Largest compressive reinforcement stress
    pub fn max_reinforcement_stress(&self) -> Option<f64> {
        self.stress_extreme(|r| r.role.is_reinforcement(), f64::max)
    }

    /// Largest tensile (most negative) reinforcement stress
    pub fn min_reinforcement_stress(&self) -> Option<f64> {
        self.stress_extreme(|r| r.role.is_reinforcement(), f64::min)
    }

    fn stress_extreme(
        &self,
        filter: impl Fn(&FiberStress) -> bool,
        pick: impl Fn(f64, f64) -> f64,
    ) -> Option<f64> {
        self.records
            .iter()
            .filter(|r| filter(r))
            .map(|r| r.stress)
            .reduce(pick)
    }
}

/// Even-odd ray casting against a closed polygon
///
/// The final edge from the last vertex back to the first closes the
/// boundary. Points exactly on an edge are not guaranteed either way.
fn point_in_polygon(px: f64, py: f64, vertices: &[(f64, f64)]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (xi, yi) = vertices[i];
        let (xj, yj) = vertices[j];
        if (yi > py) != (yj > py) {
            let x_cross = xi + (py - yi) * (xj - xi) / (yj - yi);
            if px < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
