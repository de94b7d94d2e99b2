// relhydro\crates\rh_physics\tests/upwinding.rs

//! 被动标量迎风
//!
//! 对每个界面、每个标量：质量通量 `F_D >= 0` 时标量通量等于 `F_D * Y_L`，
//! 否则等于 `F_D * Y_R`。使用一阶重构时界面两侧状态就是相邻单元值，
//! 因此可以逐位比较。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rh_config::{HydroConfig, ReconstructionKind, RiemannSolverKind};
use rh_foundation::Direction;
use rh_physics::geometry::Minkowski;
use rh_physics::types::{IDN, IPR, IVX, NHYDRO};
use rh_physics::{AnyEos, FluxPipeline, MeshBlock};

const NSCALARS: usize = 3;

fn setup(nx: [usize; 3], solver: RiemannSolverKind, seed: u64) -> (MeshBlock, FluxPipeline, AnyEos) {
    let mut config = HydroConfig::default();
    config.mesh.nx = nx;
    config.nscalars = NSCALARS;
    config.reconstruction.kind = ReconstructionKind::Dc;
    config.riemann_solver = solver;
    config.validate().unwrap();

    let mut block = MeshBlock::from_config(&config.mesh, config.nscalars).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    for (k, j, i) in block.full_range().iter() {
        let cell = block.w0.cell_mut(k, j, i);
        cell[IDN] = rng.gen_range(0.5..2.0);
        for c in 0..3 {
            cell[IVX + c] = rng.gen_range(-0.6..0.6);
        }
        cell[IPR] = rng.gen_range(0.1..1.0);
        for y in cell[NHYDRO..NHYDRO + NSCALARS].iter_mut() {
            *y = rng.gen_range(0.0..1.0);
        }
    }
    let pipeline = FluxPipeline::from_config(&config);
    let eos = AnyEos::from_config(&config, None).unwrap();
    (block, pipeline, eos)
}

/// 检查方向 `dir` 上全部活动面，返回 (正通量面数, 负通量面数)
fn check_direction(block: &MeshBlock, dir: Direction) -> (usize, usize) {
    let (dk, dj, di) = MeshBlock::offset(dir);
    let (mut positive, mut negative) = (0, 0);
    let mut faces = block.active_range();
    match dir {
        Direction::X1 => faces.iu += 1,
        Direction::X2 => faces.ju += 1,
        Direction::X3 => faces.ku += 1,
    }
    for (k, j, i) in faces.iter() {
        let f = block.flux[dir.index()].cell(k, j, i);
        let mass = f[IDN];
        let upwind = if mass >= 0.0 {
            positive += 1;
            block.w0.cell(k - dk, j - dj, i - di)
        } else {
            negative += 1;
            block.w0.cell(k, j, i)
        };
        for n in 0..NSCALARS {
            assert_eq!(
                f[NHYDRO + n],
                mass * upwind[NHYDRO + n],
                "{dir:?} face ({k},{j},{i}) scalar {n}: F_D={mass:e}"
            );
        }
    }
    (positive, negative)
}

#[test]
fn test_scalar_flux_follows_mass_flux_for_every_solver() {
    for (seed, &solver) in RiemannSolverKind::ALL.iter().enumerate() {
        let (mut block, pipeline, eos) = setup([32, 1, 1], solver, 100 + seed as u64);
        let stats = pipeline.compute_fluxes(&eos, &Minkowski, &mut block);
        assert_eq!(stats.fallbacks, 0, "{solver}");

        let (positive, negative) = check_direction(&block, Direction::X1);
        assert_eq!(positive + negative, 33, "{solver}");
        assert!(positive > 0 && negative > 0, "{solver}: both flux signs should occur");
    }
}

#[test]
fn test_scalar_upwinding_in_every_direction() {
    let (mut block, pipeline, eos) = setup([6, 5, 4], RiemannSolverKind::Hlle, 7);
    pipeline.compute_fluxes(&eos, &Minkowski, &mut block);
    let mut total = 0;
    for dir in Direction::ALL {
        let (p, n) = check_direction(&block, dir);
        total += p + n;
    }
    // 7·5·4 + 6·6·4 + 6·5·5
    assert_eq!(total, 140 + 144 + 150);
}

#[test]
fn test_first_order_flux_upwinds_scalars() {
    let (block, pipeline, eos) = setup([16, 1, 1], RiemannSolverKind::Roe, 11);
    for i in block.is..=block.ie + 1 {
        let flux = pipeline.first_order_flux(&eos, &Minkowski, &block, Direction::X1, 0, 0, i);
        let mass = flux.hydro.mass;
        let upwind = if mass >= 0.0 { block.w0.cell(0, 0, i - 1) } else { block.w0.cell(0, 0, i) };
        for n in 0..NSCALARS {
            assert_eq!(flux.scalars[n], mass * upwind[NHYDRO + n]);
        }
        assert_eq!(flux.nscalars, NSCALARS);
    }
}
