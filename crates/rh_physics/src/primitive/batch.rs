// relhydro\crates\rh_physics\src/primitive/batch.rs

//! 逐块批量变换
//!
//! 内核按单元并行执行，单元结果归约为 [`ConversionStats`]。
//! 日志只在内核返回之后记录，内核本身不写日志。

use glam::DVec3;
use rayon::prelude::*;
use rh_foundation::{CellArray, CellRange};
use serde::Serialize;

use super::policy::ErrorPolicy;
use super::result::SolverResult;
use super::solver::{ExcisionParams, PrimitiveSolver};
use crate::eos::EquationOfState;
use crate::geometry::{GeometryProvider, Metric};
use crate::state::{load_field, Conserved, Primitive};

/// 批量反演统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    /// 处理的单元数
    pub cells: usize,
    /// 失败单元数
    pub failures: usize,
    /// 原始量底值次数
    pub prim_floors: usize,
    /// 守恒量底值次数
    pub cons_floors: usize,
    /// 守恒量重写次数
    pub cons_adjusted: usize,
    /// 挖除单元数
    pub excised: usize,
    /// 单元最大迭代次数
    pub max_iterations: usize,
}

impl ConversionStats {
    fn record(mut self, result: &SolverResult) -> Self {
        self.cells += 1;
        if !result.is_success() {
            self.failures += 1;
        }
        self.prim_floors += result.prim_floor as usize;
        self.cons_floors += result.cons_floor as usize;
        self.cons_adjusted += result.cons_adjusted as usize;
        self.max_iterations = self.max_iterations.max(result.iterations);
        self
    }

    fn excised() -> Self {
        Self { cells: 1, excised: 1, ..Self::default() }
    }

    /// 合并两份统计
    pub fn merge(self, other: Self) -> Self {
        Self {
            cells: self.cells + other.cells,
            failures: self.failures + other.failures,
            prim_floors: self.prim_floors + other.prim_floors,
            cons_floors: self.cons_floors + other.cons_floors,
            cons_adjusted: self.cons_adjusted + other.cons_adjusted,
            excised: self.excised + other.excised,
            max_iterations: self.max_iterations.max(other.max_iterations),
        }
    }
}

#[inline]
fn cell_field(bfield: Option<&CellArray>, k: usize, j: usize, i: usize, metric: &Metric) -> DVec3 {
    bfield.map_or(DVec3::ZERO, |b| load_field(b.cell(k, j, i), metric.sqrt_det))
}

fn log_failure(k: usize, j: usize, i: usize, cons: &Conserved, metric: &Metric, result: &SolverResult) {
    log::warn!(
        "变量反演失败 ({}) @ (k={}, j={}, i={}): D={:e}, S=({:e}, {:e}, {:e}), tau={:e}, DY={:?}; \
         alpha={:e}, beta=({:e}, {:e}, {:e}), gamma_dd={:?}",
        result.error,
        k,
        j,
        i,
        cons.d,
        cons.s.x,
        cons.s.y,
        cons.s.z,
        cons.tau,
        cons.scalars(),
        metric.alpha,
        metric.beta.x,
        metric.beta.y,
        metric.beta.z,
        metric.g_dd,
    );
}

/// 权威的守恒量→原始量批量变换
///
/// - 无论成败都写入求解器给出的原始量（失败时为大气态）。
/// - 守恒量被底值或能量钳制修正时写回（致密化）。
/// - 失败另记录 `warn` 日志，附守恒量与度规。
/// - 挖除单元：强制给定状态并重写守恒量，不迭代。
#[allow(clippy::too_many_arguments)]
pub fn conserved_to_primitive<E, P, G>(
    solver: &PrimitiveSolver<E, P>,
    geometry: &G,
    cons: &mut CellArray,
    bfield: Option<&CellArray>,
    prim: &mut CellArray,
    range: &CellRange,
    nscalars: usize,
    excision: Option<&ExcisionParams>,
) -> ConversionStats
where
    E: EquationOfState,
    P: ErrorPolicy,
    G: GeometryProvider + ?Sized,
{
    let dims = cons.dims();
    cons.par_cells_mut()
        .zip(prim.par_cells_mut())
        .enumerate()
        .map(|(idx, (ucell, wcell))| {
            let (k, j, i) = CellArray::unravel(dims, idx);
            if !range.contains(k, j, i) {
                return ConversionStats::default();
            }
            let metric = geometry.metric(k, j, i);
            let b = cell_field(bfield, k, j, i, &metric);
            let mut point = Conserved::load(ucell, nscalars, metric.sqrt_det);

            if let Some(params) = excision.filter(|_| geometry.is_excised(k, j, i)) {
                let w = solver.excise(&mut point, b, &metric, params);
                w.store(wcell);
                point.store(ucell, metric.sqrt_det);
                return ConversionStats::excised();
            }

            let original = point;
            let (w, result) = solver.con_to_prim(&mut point, b, &metric);
            w.store(wcell);
            if result.conserved_changed() {
                point.store(ucell, metric.sqrt_det);
            }
            if !result.is_success() {
                log_failure(k, j, i, &original, &metric, &result);
            }
            ConversionStats::default().record(&result)
        })
        .reduce(ConversionStats::default, ConversionStats::merge)
}

/// 只探测底值的批量变换（FOFC 使用）
///
/// 不修改任何数组。底值事件按失败处理；`flags[cell]` 被置位的单元数作为返回值。
/// 挖除单元不在此处标记，由调用方处理。
pub fn probe_floors<E, P, G>(
    solver: &PrimitiveSolver<E, P>,
    geometry: &G,
    cons: &CellArray,
    bfield: Option<&CellArray>,
    range: &CellRange,
    nscalars: usize,
    flags: &mut [bool],
) -> usize
where
    E: EquationOfState,
    P: ErrorPolicy,
    G: GeometryProvider + ?Sized,
{
    let dims = cons.dims();
    let policy = solver.policy().with_floor_failures();
    flags
        .par_iter_mut()
        .zip(cons.par_cells())
        .enumerate()
        .map(|(idx, (flag, ucell))| {
            let (k, j, i) = CellArray::unravel(dims, idx);
            if !range.contains(k, j, i) || geometry.is_excised(k, j, i) {
                return 0;
            }
            let metric = geometry.metric(k, j, i);
            let b = cell_field(bfield, k, j, i, &metric);
            let mut point = Conserved::load(ucell, nscalars, metric.sqrt_det);
            let (_, result) = solver.invert(&policy, &mut point, b, &metric);
            if result.is_success() {
                0
            } else {
                *flag = true;
                1
            }
        })
        .sum()
}

/// 原始量→守恒量批量变换，返回输出非有限的单元数
///
/// 原始量温度先由压强补全。非有限输出记录 `error` 日志并附完整状态。
pub fn primitive_to_conserved<E, P, G>(
    solver: &PrimitiveSolver<E, P>,
    geometry: &G,
    prim: &CellArray,
    bfield: Option<&CellArray>,
    cons: &mut CellArray,
    range: &CellRange,
    nscalars: usize,
) -> usize
where
    E: EquationOfState,
    P: ErrorPolicy,
    G: GeometryProvider + ?Sized,
{
    let dims = cons.dims();
    cons.par_cells_mut()
        .zip(prim.par_cells())
        .enumerate()
        .map(|(idx, (ucell, wcell))| {
            let (k, j, i) = CellArray::unravel(dims, idx);
            if !range.contains(k, j, i) {
                return 0;
            }
            let metric = geometry.metric(k, j, i);
            let b = cell_field(bfield, k, j, i, &metric);
            let mut w = Primitive::load(wcell, nscalars);
            solver.complete(&mut w);
            let point = solver.prim_to_con(&w, b, &metric);
            point.store(ucell, metric.sqrt_det);
            if point.is_finite() {
                0
            } else {
                log::error!(
                    "原始量→守恒量输出非有限 @ (k={}, j={}, i={}): prim={:?}, B={:?}, cons={:?}, metric={:?}",
                    k,
                    j,
                    i,
                    w,
                    b,
                    point,
                    metric
                );
                1
            }
        })
        .sum()
}
