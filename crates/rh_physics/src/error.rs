// relhydro\crates\rh_physics\src/error.rs

//! 构建期与驱动期错误
//!
//! 逐单元的数值失败不走这里，由 [`crate::primitive::SolverResult`] 表示并在本地恢复。

use rh_config::ConfigError;
use rh_foundation::RhError;
use thiserror::Error;

use crate::eos::EosError;
use crate::tasks::TaskGraphError;

/// 构建错误：全部在第一个时间步之前报告
#[derive(Error, Debug)]
pub enum SetupError {
    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 状态方程参数错误
    #[error(transparent)]
    Eos(#[from] EosError),

    /// 网格块参数错误
    #[error(transparent)]
    Mesh(#[from] RhError),

    /// 任务图错误
    #[error(transparent)]
    TaskGraph(#[from] TaskGraphError),

    /// 几何提供者与网格块尺寸不符
    #[error("几何提供者尺寸 {actual:?} 与网格块 {expected:?} 不符")]
    GeometryMismatch {
        /// 网格块数组维度
        expected: [usize; 3],
        /// 几何提供者维度
        actual: [usize; 3],
    },

    /// 求解器与几何不兼容
    #[error("{solver} 求解器只支持平直时空")]
    RequiresFlatSpace {
        /// 求解器名称
        solver: &'static str,
    },
}

/// 驱动错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverError {
    /// 边界交换在限定轮数内未完成
    #[error("周期 {cycle} 子步 {stage} 在 {passes} 轮调度后仍未完成")]
    Stalled {
        /// 周期
        cycle: u64,
        /// 子步
        stage: usize,
        /// 已执行轮数
        passes: usize,
    },

    /// 时间步无效
    #[error("时间步无效: {dt}")]
    InvalidTimestep {
        /// 时间步
        dt: f64,
    },

    /// 没有网格块
    #[error("驱动器中没有网格块")]
    NoBlocks,
}
