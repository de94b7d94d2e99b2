// relhydro\crates\rh_physics\src/engine/timestep.rs

//! CFL 时间步
//!
//! $$ \Delta t = C \cdot \min_{cells,\,d} \frac{\Delta x_d}{\max(|\lambda^-_d|, |\lambda^+_d|)} $$
//!
//! 特征速度由当前原始量计算（带磁场时为快磁声速）。挖除单元不参与，
//! 原始量或波速非有限的单元跳过并记录 `warn` 日志。

use glam::DVec3;
use rayon::prelude::*;
use rh_foundation::float::all_finite;
use rh_foundation::{CellArray, Direction};

use crate::block::MeshBlock;
use crate::eos::EquationOfState;
use crate::geometry::GeometryProvider;
use crate::schemes::riemann::FaceState;
use crate::state::{load_field, Primitive};

/// 波速下限，防止静止真空得到无穷大步长
const MIN_WAVE_SPEED: f64 = 1.0e-12;

/// 计算块的新时间步
pub fn new_timestep<E, G>(eos: &E, geometry: &G, block: &MeshBlock, cfl: f64, magnetized: bool) -> f64
where
    E: EquationOfState,
    G: GeometryProvider + ?Sized,
{
    let dims = block.dims();
    let range = block.active_range();
    let active = Direction::ALL.map(|d| block.is_active(d));
    let dx = block.dx;

    let (dt_min, skipped) = block
        .w0
        .par_cells()
        .enumerate()
        .filter_map(|(idx, w)| {
            let (k, j, i) = CellArray::unravel(dims, idx);
            if !range.contains(k, j, i) || geometry.is_excised(k, j, i) {
                return None;
            }
            if !all_finite(w) {
                return Some((f64::INFINITY, 1));
            }
            let metric = geometry.metric(k, j, i);
            let b = if magnetized {
                load_field(block.b0.cell(k, j, i), metric.sqrt_det)
            } else {
                DVec3::ZERO
            };
            let state = FaceState::new(eos, Primitive::load(w, block.nscalars), b, &metric);
            let mut dt = f64::INFINITY;
            for d in Direction::ALL.into_iter().filter(|d| active[d.index()]) {
                let (lm, lp) = state.wave_speeds(&metric, d);
                let speed = lm.abs().max(lp.abs());
                if speed.is_nan() {
                    return Some((f64::INFINITY, 1));
                }
                dt = dt.min(dx[d.index()] / speed.max(MIN_WAVE_SPEED));
            }
            Some((dt, 0))
        })
        .reduce(|| (f64::INFINITY, 0usize), |a, b| (a.0.min(b.0), a.1 + b.1));

    if skipped > 0 {
        log::warn!("时间步计算跳过 {} 个原始量或波速非有限的单元", skipped);
    }

    if dt_min.is_finite() {
        cfl * dt_min
    } else {
        // 全部挖除或状态无效时按光速估计
        let dx_min = Direction::ALL
            .into_iter()
            .filter(|d| active[d.index()])
            .map(|d| dx[d.index()])
            .fold(f64::INFINITY, f64::min);
        cfl * dx_min
    }
}
