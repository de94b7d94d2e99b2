// relhydro\crates\rh_physics\src/schemes/riemann/hlle.rs

//! HLLE 求解器
//!
//! ```text
//! λ_L = min(λ-_L, λ-_R, 0),  λ_R = max(λ+_L, λ+_R, 0)
//! F* = (λ_R F_L - λ_L F_R + λ_L λ_R (U_R - U_L)) / (λ_R - λ_L)
//! ```

use rh_foundation::Direction;

use super::physics::FaceState;
use super::traits::{RiemannFlux, RiemannSolver};
use crate::eos::EquationOfState;
use crate::geometry::Metric;

/// 波速区间宽度下限，低于此值退化为中心平均
const MIN_FAN_WIDTH: f64 = 1.0e-14;

/// HLLE 求解器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HlleSolver;

impl RiemannSolver for HlleSolver {
    fn name(&self) -> &'static str {
        "hlle"
    }

    #[inline]
    fn solve<E: EquationOfState>(
        &self,
        _eos: &E,
        left: &FaceState,
        right: &FaceState,
        metric: &Metric,
        dir: Direction,
    ) -> RiemannFlux {
        let (lm_l, lp_l) = left.wave_speeds(metric, dir);
        let (lm_r, lp_r) = right.wave_speeds(metric, dir);
        let sl = lm_l.min(lm_r).min(0.0);
        let sr = lp_l.max(lp_r).max(0.0);

        let fl = left.flux(metric, dir);
        let fr = right.flux(metric, dir);
        let width = sr - sl;

        let mut hydro = if width > MIN_FAN_WIDTH {
            let du = right.conserved_vector(metric) - left.conserved_vector(metric);
            (1.0 / width) * (sr * fl - sl * fr + (sl * sr) * du)
        } else {
            0.5 * (fl + fr)
        };
        hydro.field[dir.index()] = 0.0;
        RiemannFlux::new(hydro, (-sl).max(sr))
    }
}
