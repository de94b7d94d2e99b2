// relhydro\crates\rh_physics\src/primitive/result.rs

//! 反演结果
//!
//! 内核只返回 `Copy` 的错误码与结果结构，不使用 `Result<_, Box<dyn Error>>`。

use std::fmt;

/// 守恒量→原始量反演的错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SolverError {
    /// 成功
    #[default]
    Success,
    /// 密度超过上限
    RhoTooBig,
    /// 密度低于底值（仅在底值视为失败时出现）
    RhoTooSmall,
    /// 守恒量含 NaN/Inf
    NansInCons,
    /// 磁化度超过上限
    MagTooBig,
    /// 根区间无效
    BracketingFailed,
    /// 迭代未收敛或能量底值（仅在底值视为失败时出现）
    NoSolution,
}

impl SolverError {
    /// 是否成功
    #[inline]
    pub fn is_success(self) -> bool {
        self == SolverError::Success
    }

    /// 诊断名称
    pub const fn as_str(self) -> &'static str {
        match self {
            SolverError::Success => "SUCCESS",
            SolverError::RhoTooBig => "RHO_TOO_BIG",
            SolverError::RhoTooSmall => "RHO_TOO_SMALL",
            SolverError::NansInCons => "NANS_IN_CONS",
            SolverError::MagTooBig => "MAG_TOO_BIG",
            SolverError::BracketingFailed => "BRACKETING_FAILED",
            SolverError::NoSolution => "NO_SOLUTION",
        }
    }
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单元反演结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverResult {
    /// 错误分类
    pub error: SolverError,
    /// 主函数根求解迭代次数
    pub iterations: usize,
    /// 原始量被底值修正
    pub prim_floor: bool,
    /// 守恒量被底值修正
    pub cons_floor: bool,
    /// 守恒量已按修正后的原始量重写
    pub cons_adjusted: bool,
}

impl SolverResult {
    /// 失败结果
    #[inline]
    pub fn failure(error: SolverError) -> Self {
        Self { error, ..Self::default() }
    }

    /// 是否成功
    #[inline]
    pub fn is_success(&self) -> bool {
        self.error.is_success()
    }

    /// 守恒量是否被修改，需要写回数组
    #[inline]
    pub fn conserved_changed(&self) -> bool {
        self.cons_floor || self.cons_adjusted
    }
}
