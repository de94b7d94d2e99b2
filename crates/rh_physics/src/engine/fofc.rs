// relhydro\crates\rh_physics\src/engine/fofc.rs

//! 一阶通量修正（FOFC）
//!
//! 用高阶通量做一次试探更新，只探测底值地反解试探守恒量；
//! 失败或被挖除的单元在所有活动方向上的两个面改用一阶（DC + LLF）通量，
//! 随后重算散度。修正后的通量才被时间推进接受。

use rayon::prelude::*;
use rh_foundation::Direction;

use super::flux_pipeline::FluxPipeline;
use super::time_integrator::StageWeights;
use super::update::{compute_divergence, trial_update};
use crate::block::MeshBlock;
use crate::eos::EquationOfState;
use crate::geometry::GeometryProvider;
use crate::primitive::{probe_floors, ErrorPolicy, PrimitiveSolver};

/// 执行修正，返回被标记的单元数
pub fn first_order_correction<E, P, G>(
    pipeline: &FluxPipeline,
    solver: &PrimitiveSolver<E, P>,
    geometry: &G,
    block: &mut MeshBlock,
    weights: StageWeights,
    dt: f64,
) -> usize
where
    E: EquationOfState,
    P: ErrorPolicy,
    G: GeometryProvider + ?Sized,
{
    let magnetized = pipeline.is_magnetized();
    trial_update(block, weights, dt, magnetized);

    block.clear_fofc();
    let range = block.active_range();
    let bfield = magnetized.then_some(&block.b_trial);
    probe_floors(solver, geometry, &block.u_trial, bfield, &range, block.nscalars, &mut block.fofc);

    for (k, j, i) in range.iter() {
        if geometry.is_excised(k, j, i) {
            let idx = block.cell_index(k, j, i);
            block.fofc[idx] = true;
        }
    }
    let flagged = block.fofc.iter().filter(|&&f| f).count();
    if flagged == 0 {
        return 0;
    }

    for dir in Direction::ALL {
        if !block.is_active(dir) {
            continue;
        }
        let faces = flagged_faces(block, dir);
        let fluxes: Vec<_> = {
            let view: &MeshBlock = block;
            faces
                .par_iter()
                .map(|&(k, j, i)| pipeline.first_order_flux(solver.eos(), geometry, view, dir, k, j, i))
                .collect()
        };
        for (&(k, j, i), f) in faces.iter().zip(&fluxes) {
            f.store(block.flux[dir.index()].cell_mut(k, j, i));
            if magnetized {
                f.store_field(block.bflux[dir.index()].cell_mut(k, j, i));
            }
        }
    }

    compute_divergence(block);
    log::debug!("FOFC: {} 个单元改用一阶通量", flagged);
    flagged
}

/// 被标记单元在方向 `dir` 上的两个面（去重、有序）
fn flagged_faces(block: &MeshBlock, dir: Direction) -> Vec<(usize, usize, usize)> {
    let (dk, dj, di) = MeshBlock::offset(dir);
    let mut faces: Vec<_> = block
        .active_range()
        .iter()
        .filter(|&(k, j, i)| block.fofc[block.cell_index(k, j, i)])
        .flat_map(|(k, j, i)| [(k, j, i), (k + dk, j + dj, i + di)])
        .collect();
    faces.sort_unstable();
    faces.dedup();
    faces
}
