// relhydro\crates\rh_physics\tests/static_equilibrium.rs

//! 静态平衡回归测试
//!
//! 均匀、静止的流体经过一个完整周期后，内部通量散度为零，
//! 原始量在浮点误差范围内保持不变。覆盖所有重构方案与求解器组合，
//! 以及弯曲（但均匀）度规下的磁化情形。

use glam::DVec3;
use rh_config::{HydroConfig, IntegratorKind, ReconstructionKind, RiemannSolverKind};
use rh_physics::geometry::{Metric, MetricField, Minkowski, SymTensor3};
use rh_physics::types::{IDN, IPR, IVX, NHYDRO};
use rh_physics::{
    BoundaryExchange, Driver, GeometryProvider, HydroBlock, HydroBuilder, LocalBoundary, MeshBlock, Primitive,
};

// ============================================================================
// 辅助函数
// ============================================================================

const RHO0: f64 = 1.0;
const P0: f64 = 0.1;

fn config(nx: [usize; 3], recon: ReconstructionKind, solver: RiemannSolverKind) -> HydroConfig {
    let mut config = HydroConfig::default();
    config.mesh.nx = nx;
    config.reconstruction.kind = recon;
    config.riemann_solver = solver;
    config.fofc = true;
    config
}

fn at_rest(_: [f64; 3]) -> (Primitive, DVec3) {
    (Primitive::new(RHO0, DVec3::ZERO, P0, 0.0), DVec3::ZERO)
}

fn max_divergence(mesh: &MeshBlock) -> f64 {
    mesh.active_range()
        .iter()
        .flat_map(|(k, j, i)| mesh.divf.cell(k, j, i)[..NHYDRO].to_vec())
        .fold(0.0, |m: f64, x| m.max(x.abs()))
}

fn assert_unchanged<G: GeometryProvider, X: BoundaryExchange>(block: &HydroBlock<G, X>, label: &str) {
    let mesh = block.mesh();
    for (k, j, i) in mesh.active_range().iter() {
        let w = mesh.w0.cell(k, j, i);
        assert!((w[IDN] - RHO0).abs() < 1e-12, "{label}: rho={} @ ({k},{j},{i})", w[IDN]);
        assert!((w[IPR] - P0).abs() < 1e-12, "{label}: P={} @ ({k},{j},{i})", w[IPR]);
        for c in 0..3 {
            assert!(w[IVX + c].abs() < 1e-12, "{label}: u{c}={} @ ({k},{j},{i})", w[IVX + c]);
        }
    }
}

fn run_one_cycle(block: HydroBlock<impl GeometryProvider, LocalBoundary>, label: &str) {
    let mut driver = Driver::new(vec![block]).unwrap();
    let diag = driver.step().unwrap();

    assert_eq!(diag.failures, 0, "{label}");
    assert_eq!(diag.fofc_cells, 0, "{label}");
    assert_eq!(diag.fallback_faces, 0, "{label}");
    assert_eq!(diag.floor_corrected(), 0, "{label}");

    let block = &driver.blocks()[0];
    let div = max_divergence(block.mesh());
    assert!(div < 1e-12, "{label}: max |div F| = {div:e}");
    assert_unchanged(block, label);
}

// ============================================================================
// 平直时空
// ============================================================================

#[test]
fn test_static_state_all_reconstructions_and_solvers_1d() {
    for &recon in ReconstructionKind::ALL {
        for &solver in RiemannSolverKind::ALL {
            let label = format!("{recon}/{solver}");
            let mut block = HydroBuilder::new(config([16, 1, 1], recon, solver)).build_local(Minkowski).unwrap();
            assert_eq!(block.set_primitives(at_rest), 0);
            run_one_cycle(block, &label);
        }
    }
}

#[test]
fn test_static_state_2d_with_rk3() {
    for recon in [ReconstructionKind::Plm, ReconstructionKind::Wenoz] {
        let mut cfg = config([8, 6, 1], recon, RiemannSolverKind::Hlle);
        cfg.integrator = IntegratorKind::Rk3;
        let mut block = HydroBuilder::new(cfg).build_local(Minkowski).unwrap();
        block.set_primitives(at_rest);
        run_one_cycle(block, &format!("2d/{recon}"));
    }
}

#[test]
fn test_static_state_3d() {
    let mut block = HydroBuilder::new(config([4, 4, 4], ReconstructionKind::Ppm4, RiemannSolverKind::Llf))
        .build_local(Minkowski)
        .unwrap();
    block.set_primitives(at_rest);
    run_one_cycle(block, "3d/ppm4");
}

// ============================================================================
// 弯曲度规与磁场
// ============================================================================

#[test]
fn test_static_magnetized_state_in_uniform_curved_metric() {
    for solver in [RiemannSolverKind::Llf, RiemannSolverKind::Hlle] {
        let mut cfg = config([12, 1, 1], ReconstructionKind::Ppmx, solver);
        cfg.magnetized = true;
        let dims = MeshBlock::from_config(&cfg.mesh, cfg.nscalars).unwrap().dims();
        let geometry = MetricField::from_fn(dims, |_, _, _| {
            let g = SymTensor3 { xx: 1.3, xy: 0.05, xz: 0.0, yy: 1.1, yz: 0.0, zz: 0.9 };
            Metric::new(g, 0.8, DVec3::ZERO)
        });

        let mut block = HydroBuilder::new(cfg).build_local(geometry).unwrap();
        block.set_primitives(|_| (Primitive::new(RHO0, DVec3::ZERO, P0, 0.0), DVec3::new(0.3, 0.2, -0.1)));
        let b_before = block.mesh().b0.clone();

        let label = format!("mhd/{solver}");
        let mut driver = Driver::new(vec![block]).unwrap();
        let diag = driver.step().unwrap();
        assert_eq!(diag.failures, 0, "{label}");

        let block = &driver.blocks()[0];
        let mesh = block.mesh();
        assert!(max_divergence(mesh) < 1e-12, "{label}");
        for (k, j, i) in mesh.active_range().iter() {
            for c in 0..3 {
                let before = b_before.get(c, k, j, i);
                assert!((mesh.b0.get(c, k, j, i) - before).abs() < 1e-12, "{label}: B{c} changed");
                assert!(mesh.divb.get(c, k, j, i).abs() < 1e-12, "{label}");
            }
        }
        for (k, j, i) in mesh.active_range().iter() {
            let w = mesh.w0.cell(k, j, i);
            assert!((w[IDN] - RHO0).abs() < 1e-10, "{label}: rho={}", w[IDN]);
            assert!((w[IPR] - P0).abs() < 1e-10, "{label}: P={}", w[IPR]);
            assert!(DVec3::new(w[IVX], w[IVX + 1], w[IVX + 2]).length() < 1e-10, "{label}");
        }
    }
}

#[test]
fn test_static_state_survives_many_cycles() {
    let mut block = HydroBuilder::new(config([32, 1, 1], ReconstructionKind::Wenoz, RiemannSolverKind::Hllc))
        .build_local(Minkowski)
        .unwrap();
    block.set_primitives(at_rest);
    let mut driver = Driver::new(vec![block]).unwrap();
    let history = driver.run(f64::INFINITY, 20).unwrap();
    assert_eq!(history.len(), 20);
    assert!(history.iter().all(|d| d.is_clean()));
    assert_unchanged(&driver.blocks()[0], "many cycles");
    assert_eq!(driver.cycle(), 20);
}
