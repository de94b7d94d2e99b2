// relhydro\crates\rh_physics\src/schemes/riemann/advection.rs

//! 纯对流求解器
//!
//! 只输运守恒量，不含压强与磁应力项：
//! 以面平均输运速度 `ṽ = ½ (ṽ_L + ṽ_R)` 迎风取 `U`。
//! 磁场按 `F_B^j = B^j ṽ^d` 的迎风形式输运，法向分量通量为零。

use rh_foundation::Direction;

use super::physics::FaceState;
use super::traits::{RiemannFlux, RiemannSolver};
use crate::eos::EquationOfState;
use crate::geometry::Metric;

/// 对流求解器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvectionSolver;

impl RiemannSolver for AdvectionSolver {
    fn name(&self) -> &'static str {
        "advection"
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
        let vface = 0.5 * (left.transport_velocity(metric, dir) + right.transport_velocity(metric, dir));
        let upwind = if vface >= 0.0 { left } else { right };
        let mut hydro = vface * upwind.conserved_vector(metric);
        hydro.field[dir.index()] = 0.0;
        RiemannFlux::new(hydro, vface.abs())
    }
}
