// relhydro\crates\rh_physics\src/schemes/riemann/mod.rs

//! Riemann 求解器模块
//!
//! 提供 3+1 GR(M)HD 界面通量：
//!
//! - [`LlfSolver`]: 局部 Lax-Friedrichs，最鲁棒，FOFC 回退使用
//! - [`HlleSolver`]: 两波 HLLE
//! - [`HllcSolver`]: 三波 HLLC，正确处理接触间断
//! - [`RoeSolver`]: 特征分解型
//! - [`AdvectionSolver`]: 纯对流
//!
//! # 求解器选择指南
//!
//! | 求解器 | 时空 | 磁场 | 状态方程 |
//! |--------|------|------|----------|
//! | LLF | 任意 | 支持 | 任意 |
//! | HLLE | 任意 | 支持 | 任意 |
//! | HLLC | 平直 | 否 | 绝热 |
//! | Roe | 平直 | 否 | 绝热 |
//! | Advection | 任意 | 支持 | 任意 |
//!
//! 被动标量不参与 Riemann 求解，统一按质量通量符号迎风。

mod advection;
mod hllc;
mod hlle;
mod llf;
pub mod physics;
mod roe;
mod traits;

pub use advection::AdvectionSolver;
pub use hllc::HllcSolver;
pub use hlle::HlleSolver;
pub use llf::LlfSolver;
pub use physics::{wave_speeds, FaceState};
pub use roe::{RoeEigensystem, RoeSolver};
pub use traits::{HydroVector, RiemannFlux, RiemannSolver};

use rh_config::RiemannSolverKind;
use rh_foundation::Direction;

use crate::eos::EquationOfState;
use crate::geometry::Metric;

/// 求解器封闭集合
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnyRiemannSolver {
    /// LLF
    Llf(LlfSolver),
    /// HLLE
    Hlle(HlleSolver),
    /// HLLC
    Hllc(HllcSolver),
    /// Roe
    Roe(RoeSolver),
    /// 对流
    Advection(AdvectionSolver),
}

impl AnyRiemannSolver {
    /// 按类型构造
    pub fn from_kind(kind: RiemannSolverKind) -> Self {
        match kind {
            RiemannSolverKind::Llf => Self::Llf(LlfSolver),
            RiemannSolverKind::Hlle => Self::Hlle(HlleSolver),
            RiemannSolverKind::Hllc => Self::Hllc(HllcSolver),
            RiemannSolverKind::Roe => Self::Roe(RoeSolver::default()),
            RiemannSolverKind::Advection => Self::Advection(AdvectionSolver),
        }
    }

    /// 求解界面通量并按质量通量迎风计算标量通量
    #[inline]
    pub fn solve_with_scalars<E: EquationOfState>(
        &self,
        eos: &E,
        left: &FaceState,
        right: &FaceState,
        metric: &Metric,
        dir: Direction,
    ) -> RiemannFlux {
        let mut flux = self.solve(eos, left, right, metric, dir);
        flux.upwind_scalars(left.prim.scalars(), right.prim.scalars());
        flux
    }
}

impl RiemannSolver for AnyRiemannSolver {
    fn name(&self) -> &'static str {
        match self {
            Self::Llf(s) => s.name(),
            Self::Hlle(s) => s.name(),
            Self::Hllc(s) => s.name(),
            Self::Roe(s) => s.name(),
            Self::Advection(s) => s.name(),
        }
    }

    #[inline]
    fn solve<E: EquationOfState>(
        &self,
        eos: &E,
        left: &FaceState,
        right: &FaceState,
        metric: &Metric,
        dir: Direction,
    ) -> RiemannFlux {
        match self {
            Self::Llf(s) => s.solve(eos, left, right, metric, dir),
            Self::Hlle(s) => s.solve(eos, left, right, metric, dir),
            Self::Hllc(s) => s.solve(eos, left, right, metric, dir),
            Self::Roe(s) => s.solve(eos, left, right, metric, dir),
            Self::Advection(s) => s.solve(eos, left, right, metric, dir),
        }
    }
}
