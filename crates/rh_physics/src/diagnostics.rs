// relhydro\crates\rh_physics\src/diagnostics.rs

//! 周期诊断
//!
//! 每块在一个周期内累计底值、修正与失败计数，驱动器在周期结束时合并。

use serde::Serialize;

use crate::engine::SweepStats;
use crate::primitive::ConversionStats;

/// 一个周期的诊断计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CycleDiagnostics {
    /// 周期编号
    pub cycle: u64,
    /// 周期结束时刻
    pub time: f64,
    /// 本周期使用的时间步
    pub dt: f64,
    /// 所有子步的调度轮数之和
    pub passes: usize,
    /// FOFC 标记的单元数（所有子步）
    pub fofc_cells: usize,
    /// 退回一阶的面数
    pub fallback_faces: usize,
    /// 反演失败单元数
    pub failures: usize,
    /// 原始量底值次数
    pub prim_floors: usize,
    /// 守恒量底值次数
    pub cons_floors: usize,
    /// 守恒量重写次数
    pub cons_adjusted: usize,
    /// 挖除单元数
    pub excised: usize,
    /// 原始量→守恒量输出非有限的单元数
    pub nonfinite: usize,
    /// 单元最大迭代次数
    pub max_iterations: usize,
}

impl CycleDiagnostics {
    /// 计入一次批量反演
    pub fn record_conversion(&mut self, stats: &ConversionStats) {
        self.failures += stats.failures;
        self.prim_floors += stats.prim_floors;
        self.cons_floors += stats.cons_floors;
        self.cons_adjusted += stats.cons_adjusted;
        self.excised += stats.excised;
        self.max_iterations = self.max_iterations.max(stats.max_iterations);
    }

    /// 计入一次通量计算
    pub fn record_sweep(&mut self, stats: &SweepStats) {
        self.fallback_faces += stats.fallbacks;
    }

    /// 合并计数（不含周期编号与时间）
    pub fn merge(mut self, other: &CycleDiagnostics) -> Self {
        self.passes = self.passes.max(other.passes);
        self.fofc_cells += other.fofc_cells;
        self.fallback_faces += other.fallback_faces;
        self.failures += other.failures;
        self.prim_floors += other.prim_floors;
        self.cons_floors += other.cons_floors;
        self.cons_adjusted += other.cons_adjusted;
        self.excised += other.excised;
        self.nonfinite += other.nonfinite;
        self.max_iterations = self.max_iterations.max(other.max_iterations);
        self
    }

    /// 底值事件总数（原始量与守恒量分别计）
    pub fn floor_corrected(&self) -> usize {
        self.prim_floors + self.cons_floors
    }

    /// 是否有任何退化事件
    pub fn is_clean(&self) -> bool {
        self.fofc_cells == 0
            && self.fallback_faces == 0
            && self.failures == 0
            && self.floor_corrected() == 0
            && self.nonfinite == 0
    }
}

impl std::fmt::Display for CycleDiagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cycle={} t={:.6e} dt={:.6e} fofc={} floors={} adjusted={} failures={} excised={}",
            self.cycle,
            self.time,
            self.dt,
            self.fofc_cells,
            self.floor_corrected(),
            self.cons_adjusted,
            self.failures,
            self.excised
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_sums_counts() {
        let mut a = CycleDiagnostics::default();
        a.record_conversion(&ConversionStats { cells: 10, failures: 1, prim_floors: 2, ..Default::default() });
        let b = CycleDiagnostics { fofc_cells: 3, passes: 7, ..Default::default() };
        let m = a.merge(&b);
        assert_eq!(m.failures, 1);
        assert_eq!(m.floor_corrected(), 2);
        assert_eq!(m.fofc_cells, 3);
        assert_eq!(m.passes, 7);
        assert!(!m.is_clean());
        assert!(CycleDiagnostics::default().is_clean());
    }
}
