// relhydro\crates\rh_physics\src/types.rs

//! 变量下标与常量
//!
//! 守恒量数组: `(D, S_1, S_2, S_3, τ, D·Y_0, …)`，均乘以 √γ。
//! 原始量数组: `(ρ, u^1, u^2, u^3, P, Y_0, …)`，其中 `u^i = W v^i`。
//! 磁场数组: `(B^1, B^2, B^3)`，同样乘以 √γ。

pub use rh_config::MAX_SCALARS;

/// 密度（守恒 D / 原始 ρ）
pub const IDN: usize = 0;
/// 动量 S_1
pub const IM1: usize = 1;
/// 动量 S_2
pub const IM2: usize = 2;
/// 动量 S_3
pub const IM3: usize = 3;
/// 能量 τ = E - D
pub const IEN: usize = 4;

/// 速度 u^1
pub const IVX: usize = 1;
/// 速度 u^2
pub const IVY: usize = 2;
/// 速度 u^3
pub const IVZ: usize = 3;
/// 压强
pub const IPR: usize = 4;

/// 流体变量个数
pub const NHYDRO: usize = 5;

/// 磁场分量个数
pub const NMAG: usize = 3;

/// 单元变量上限（流体 + 标量）
pub const NVAR_MAX: usize = NHYDRO + MAX_SCALARS;
