// relhydro\crates\rh_physics\src/engine/update.rs

//! 通量散度与守恒量更新

use rayon::prelude::*;
use rh_foundation::{CellArray, CellRange, Direction};

use super::time_integrator::StageWeights;
use crate::block::MeshBlock;

/// 面数组中单元上侧面的下标
#[inline]
fn upper_face(dir: Direction, k: usize, j: usize, i: usize) -> (usize, usize, usize) {
    match dir {
        Direction::X1 => (k, j, i + 1),
        Direction::X2 => (k, j + 1, i),
        Direction::X3 => (k + 1, j, i),
    }
}

/// 单个数组的散度：`div(v) = Σ_d (F_d(上侧) - F_d(下侧)) / Δx_d`
fn divergence_of(
    out: &mut CellArray,
    fluxes: &[CellArray; 3],
    active: &[bool; 3],
    dx: &[f64; 3],
    range: &CellRange,
) {
    let dims = out.dims();
    out.par_cells_mut().enumerate().for_each(|(idx, cell)| {
        cell.iter_mut().for_each(|x| *x = 0.0);
        let (k, j, i) = CellArray::unravel(dims, idx);
        if !range.contains(k, j, i) {
            return;
        }
        for dir in Direction::ALL {
            let d = dir.index();
            if !active[d] {
                continue;
            }
            let (ku, ju, iu) = upper_face(dir, k, j, i);
            let lower = fluxes[d].cell(k, j, i);
            let upper = fluxes[d].cell(ku, ju, iu);
            let inv_dx = 1.0 / dx[d];
            for (v, x) in cell.iter_mut().enumerate() {
                *x += (upper[v] - lower[v]) * inv_dx;
            }
        }
    });
}

/// 由面通量计算活动单元的散度（流体与磁场）
pub fn compute_divergence(block: &mut MeshBlock) {
    let active = Direction::ALL.map(|d| block.is_active(d));
    let range = block.active_range();
    divergence_of(&mut block.divf, &block.flux, &active, &block.dx, &range);
    divergence_of(&mut block.divb, &block.bflux, &active, &block.dx, &range);
}

/// `out = γ0 base + γ1 u1 - β dt div`，只更新活动单元
///
/// `base` 为 `None` 时原地使用 `out` 作为 `u0`。
fn combine(
    out: &mut CellArray,
    base: Option<&CellArray>,
    u1: &CellArray,
    div: &CellArray,
    weights: StageWeights,
    dt: f64,
    range: &CellRange,
) {
    let dims = out.dims();
    let StageWeights { gamma0, gamma1, beta } = weights;
    let kernel = |idx: usize, o: &mut [f64], a: Option<&[f64]>, b: &[f64], f: &[f64]| {
        let (k, j, i) = CellArray::unravel(dims, idx);
        if !range.contains(k, j, i) {
            return;
        }
        for v in 0..o.len() {
            let u0 = a.map_or(o[v], |a| a[v]);
            o[v] = gamma0 * u0 + gamma1 * b[v] - beta * dt * f[v];
        }
    };
    match base {
        Some(base) => out
            .par_cells_mut()
            .zip(base.par_cells())
            .zip(u1.par_cells().zip(div.par_cells()))
            .enumerate()
            .for_each(|(idx, ((o, a), (b, f)))| kernel(idx, o, Some(a), b, f)),
        None => out
            .par_cells_mut()
            .zip(u1.par_cells().zip(div.par_cells()))
            .enumerate()
            .for_each(|(idx, (o, (b, f)))| kernel(idx, o, None, b, f)),
    }
}

/// 原地更新 `u0`、`b0`
pub fn apply_update(block: &mut MeshBlock, weights: StageWeights, dt: f64, magnetized: bool) {
    let range = block.active_range();
    combine(&mut block.u0, None, &block.u1, &block.divf, weights, dt, &range);
    if magnetized {
        combine(&mut block.b0, None, &block.b1, &block.divb, weights, dt, &range);
    }
}

/// 把试探更新写入 `u_trial`、`b_trial`，不改动 `u0`
///
/// 活动区外的单元保持 `u0` 的值，便于后续整块检查。
pub fn trial_update(block: &mut MeshBlock, weights: StageWeights, dt: f64, magnetized: bool) {
    let range = block.active_range();
    block.u_trial.as_mut_slice().copy_from_slice(block.u0.as_slice());
    combine(&mut block.u_trial, Some(&block.u0), &block.u1, &block.divf, weights, dt, &range);
    if magnetized {
        block.b_trial.as_mut_slice().copy_from_slice(block.b0.as_slice());
        combine(&mut block.b_trial, Some(&block.b0), &block.b1, &block.divb, weights, dt, &range);
    }
}

/// 步初拷贝 `u1 ← u0`（含幽灵层）
pub fn copy_conserved(block: &mut MeshBlock, magnetized: bool) {
    block.u1.as_mut_slice().copy_from_slice(block.u0.as_slice());
    if magnetized {
        block.b1.as_mut_slice().copy_from_slice(block.b0.as_slice());
    }
}
