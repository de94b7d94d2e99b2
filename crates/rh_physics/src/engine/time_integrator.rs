// relhydro\crates\rh_physics\src/engine/time_integrator.rs

//! SSP Runge-Kutta 时间积分器（低存储形式）
//!
//! 每个子步执行
//!
//! ```text
//! u0 ← γ0 u0 + γ1 u1 - β Δt ∇·F(u0)
//! ```
//!
//! 其中 `u1` 是第一个子步开始时拷贝的 `u^n`。
//!
//! ### SSP-RK2 (Heun)
//!
//! ```text
//! (γ0, γ1, β) = (0, 1, 1), (1/2, 1/2, 1/2)
//! ```
//!
//! ### SSP-RK3 (Shu-Osher)
//!
//! ```text
//! (γ0, γ1, β) = (0, 1, 1), (1/4, 3/4, 1/4), (2/3, 1/3, 2/3)
//! ```
//!
//! ## 参考文献
//!
//! Gottlieb, S., Shu, C.-W., & Tadmor, E. (2001). Strong stability-preserving
//! high-order time discretization methods. SIAM Review, 43(1), 89-112.

use rh_config::IntegratorKind;

/// 单个子步的权重
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageWeights {
    /// 当前寄存器系数
    pub gamma0: f64,
    /// 步初寄存器系数
    pub gamma1: f64,
    /// 散度系数
    pub beta: f64,
}

impl StageWeights {
    const fn new(gamma0: f64, gamma1: f64, beta: f64) -> Self {
        Self { gamma0, gamma1, beta }
    }
}

const RK1: [StageWeights; 1] = [StageWeights::new(0.0, 1.0, 1.0)];
const RK2: [StageWeights; 2] = [StageWeights::new(0.0, 1.0, 1.0), StageWeights::new(0.5, 0.5, 0.5)];
const RK3: [StageWeights; 3] = [
    StageWeights::new(0.0, 1.0, 1.0),
    StageWeights::new(0.25, 0.75, 0.25),
    StageWeights::new(2.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0),
];

/// 时间积分器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeIntegrator {
    kind: IntegratorKind,
}

impl TimeIntegrator {
    /// 按类型创建
    pub fn new(kind: IntegratorKind) -> Self {
        Self { kind }
    }

    /// 类型
    pub fn kind(&self) -> IntegratorKind {
        self.kind
    }

    /// 子步数
    pub fn nstages(&self) -> usize {
        self.weights().len()
    }

    /// 全部子步权重
    pub fn weights(&self) -> &'static [StageWeights] {
        match self.kind {
            IntegratorKind::Rk1 => &RK1,
            IntegratorKind::Rk2 => &RK2,
            IntegratorKind::Rk3 => &RK3,
        }
    }

    /// 第 `stage` 个子步（从 1 开始）的权重
    pub fn stage(&self, stage: usize) -> Option<StageWeights> {
        stage.checked_sub(1).and_then(|s| self.weights().get(s).copied())
    }
}
