// relhydro\crates\rh_config\src/kinds.rs

//! 命名选项枚举
//!
//! 每个枚举都可以从 JSON（小写名称）反序列化，也可以通过 `FromStr` 从
//! 命令行字符串解析。未知名称返回 [`ConfigError::UnknownName`]。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// 为枚举生成 `as_str` / `Display` / `FromStr`
macro_rules! named_kind {
    ($ty:ident, $label:expr, { $($variant:ident => $name:literal $(, $alias:literal)*;)+ }) => {
        impl $ty {
            /// 全部可选项
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// 规范名称
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lower = s.trim().to_ascii_lowercase();
                match lower.as_str() {
                    $($name $(| $alias)* => Ok($ty::$variant),)+
                    _ => Err(ConfigError::UnknownName { kind: $label, name: s.to_string() }),
                }
            }
        }
    };
}

/// 状态方程类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EosKind {
    /// 理想气体
    #[default]
    IdealGas,
    /// 分段多方
    PiecewisePolytrope,
    /// 表格状态方程（表由外部提供）
    Tabulated,
    /// 等温（非绝热）
    Isothermal,
}

named_kind!(EosKind, "状态方程", {
    IdealGas => "ideal_gas", "ideal", "idealgas";
    PiecewisePolytrope => "piecewise_polytrope", "pwp", "polytrope";
    Tabulated => "tabulated", "table";
    Isothermal => "isothermal";
});

impl EosKind {
    /// 是否绝热（存在独立的能量方程）
    pub const fn is_adiabatic(self) -> bool {
        !matches!(self, EosKind::Isothermal)
    }
}

/// 重构格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReconstructionKind {
    /// 零阶（donor cell）
    Dc,
    /// 分段线性
    #[default]
    Plm,
    /// 分段抛物（CW84 极值削平）
    Ppm4,
    /// 分段抛物（保极值限制器）
    Ppmx,
    /// 五阶 WENO-Z
    Wenoz,
}

named_kind!(ReconstructionKind, "重构格式", {
    Dc => "dc", "donor_cell";
    Plm => "plm";
    Ppm4 => "ppm4", "ppm";
    Ppmx => "ppmx";
    Wenoz => "wenoz", "weno5z";
});

impl ReconstructionKind {
    /// 所需的最少幽灵单元层数
    pub const fn required_ghosts(self) -> usize {
        match self {
            ReconstructionKind::Dc => 1,
            ReconstructionKind::Plm => 2,
            ReconstructionKind::Ppm4 | ReconstructionKind::Ppmx | ReconstructionKind::Wenoz => 3,
        }
    }

    /// 是否需要状态方程底值保护界面状态
    pub const fn needs_floors(self) -> bool {
        matches!(
            self,
            ReconstructionKind::Ppm4 | ReconstructionKind::Ppmx | ReconstructionKind::Wenoz
        )
    }
}

/// PLM 斜率限制器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SlopeLimiterKind {
    /// Minmod（最耗散）
    Minmod,
    /// Van Leer 调和平均
    #[default]
    VanLeer,
    /// 单调中心（MC）
    Mc,
}

named_kind!(SlopeLimiterKind, "斜率限制器", {
    Minmod => "minmod";
    VanLeer => "vanleer", "van_leer";
    Mc => "mc", "monotonized_central";
});

/// 近似 Riemann 求解器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiemannSolverKind {
    /// 局部 Lax-Friedrichs
    Llf,
    /// HLLE
    #[default]
    Hlle,
    /// HLLC（需绝热状态方程）
    Hllc,
    /// Roe
    Roe,
    /// 纯对流
    Advection,
}

named_kind!(RiemannSolverKind, "Riemann 求解器", {
    Llf => "llf", "rusanov";
    Hlle => "hlle";
    Hllc => "hllc";
    Roe => "roe";
    Advection => "advection", "advect";
});

impl RiemannSolverKind {
    /// 是否要求绝热状态方程
    pub const fn requires_adiabatic(self) -> bool {
        matches!(self, RiemannSolverKind::Hllc | RiemannSolverKind::Roe)
    }

    /// 是否仅支持平直时空
    pub const fn requires_flat(self) -> bool {
        matches!(self, RiemannSolverKind::Hllc | RiemannSolverKind::Roe)
    }

    /// 是否支持磁场
    pub const fn supports_magnetic(self) -> bool {
        !matches!(self, RiemannSolverKind::Hllc | RiemannSolverKind::Roe)
    }
}

/// SSP Runge-Kutta 时间积分器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntegratorKind {
    /// 前向 Euler
    Rk1,
    /// SSP-RK2（Heun）
    #[default]
    Rk2,
    /// SSP-RK3（Shu-Osher）
    Rk3,
}

named_kind!(IntegratorKind, "时间积分器", {
    Rk1 => "rk1", "euler";
    Rk2 => "rk2", "heun";
    Rk3 => "rk3";
});

impl IntegratorKind {
    /// 子步数
    pub const fn nstages(self) -> usize {
        match self {
            IntegratorKind::Rk1 => 1,
            IntegratorKind::Rk2 => 2,
            IntegratorKind::Rk3 => 3,
        }
    }
}

/// 单块幽灵单元边界类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryKind {
    /// 周期
    #[default]
    Periodic,
    /// 零梯度外流
    Outflow,
    /// 反射（法向动量与磁场取反）
    Reflecting,
}

named_kind!(BoundaryKind, "边界", {
    Periodic => "periodic";
    Outflow => "outflow";
    Reflecting => "reflecting", "reflect";
});
