// relhydro\crates\rh_config\src/lib.rs

//! RelHydro Config Layer
//!
//! 配置层：流体更新所需的全部参数均集中在一个显式的 [`HydroConfig`] 中，
//! 由网格块或求解器实例持有，不存在进程级可变全局状态。
//!
//! # 模块概览
//!
//! - [`kinds`]: 状态方程、重构、Riemann 求解器、时间积分器、边界类型枚举
//! - [`hydro_config`]: `HydroConfig` 及子配置，JSON 读写与校验
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! rh_cli      ─> HydroConfig::from_file, HydroBuilder
//! rh_physics  ─> 根据 HydroConfig 构建状态方程、通量管线和任务图
//! rh_config   ─> 本层
//! rh_foundation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod hydro_config;
pub mod kinds;

pub use error::ConfigError;
pub use hydro_config::{
    EosConfig, ExcisionConfig, FloorConfig, HydroConfig, MeshConfig, PolytropeConfig,
    PrimitiveSolverConfig, ReconstructionConfig, MAX_POLYTROPE_PIECES, MAX_SCALARS,
};
pub use kinds::{
    BoundaryKind, EosKind, IntegratorKind, ReconstructionKind, RiemannSolverKind, SlopeLimiterKind,
};
