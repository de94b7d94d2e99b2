// relhydro\crates\rh_physics\src/schemes/riemann/llf.rs

//! 局部 Lax-Friedrichs (Rusanov) 求解器
//!
//! ```text
//! F* = ½ (F_L + F_R - λ_max (U_R - U_L))
//! λ_max = max(|λ±_L|, |λ±_R|)
//! ```
//!
//! 耗散最大，也是 FOFC 回退所用的求解器。

use rh_foundation::Direction;

use super::physics::FaceState;
use super::traits::{RiemannFlux, RiemannSolver};
use crate::eos::EquationOfState;
use crate::geometry::Metric;

/// LLF 求解器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LlfSolver;

impl RiemannSolver for LlfSolver {
    fn name(&self) -> &'static str {
        "llf"
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
        let lambda = lm_l.abs().max(lp_l.abs()).max(lm_r.abs()).max(lp_r.abs());

        let fl = left.flux(metric, dir);
        let fr = right.flux(metric, dir);
        let du = right.conserved_vector(metric) - left.conserved_vector(metric);

        let mut hydro = 0.5 * (fl + fr - lambda * du);
        hydro.field[dir.index()] = 0.0;
        RiemannFlux::new(hydro, lambda)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eos::{EosFloors, IdealGas};
    use crate::state::Primitive;
    use glam::DVec3;

    #[test]
    fn test_consistency() {
        let eos = IdealGas::new(5.0 / 3.0, 1.0, EosFloors::default()).unwrap();
        let m = Metric::minkowski();
        let prim = Primitive::new(1.0, DVec3::new(0.4, 0.1, 0.0), 0.5, 0.0);
        let face = FaceState::new(&eos, prim, DVec3::new(0.2, 0.3, 0.0), &m);
        let flux = LlfSolver.solve(&eos, &face, &face, &m, Direction::X1);
        let exact = face.flux(&m, Direction::X1);
        assert!((flux.hydro.mass - exact.mass).abs() < 1e-14);
        assert!((flux.hydro.momentum - exact.momentum).length() < 1e-14);
        assert!((flux.hydro.energy - exact.energy).abs() < 1e-14);
        assert!((flux.hydro.field - exact.field).length() < 1e-14);
    }
}
