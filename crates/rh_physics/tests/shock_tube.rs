// relhydro\crates\rh_physics\tests/shock_tube.rs

//! 激波管与一阶通量修正
//!
//! - 相对论激波管（Martí & Müller 问题 1）：正性、亚光速、远场不受扰动、总量守恒
//! - 周期边界下的平滑波：总质量与总能量守恒到舍入误差
//! - 向近真空膨胀：启用 FOFC 后状态保持有限且不低于底值

use glam::DVec3;
use rh_config::{BoundaryKind, HydroConfig, IntegratorKind, ReconstructionKind, RiemannSolverKind};
use rh_physics::geometry::Minkowski;
use rh_physics::types::{IDN, IEN, IPR, IVX, NHYDRO};
use rh_physics::{Driver, HydroBlock, HydroBuilder, LocalBoundary, MeshBlock, Primitive};

// ============================================================================
// 辅助函数
// ============================================================================

type Block = HydroBlock<Minkowski, LocalBoundary>;

fn tube_config(nx: usize, recon: ReconstructionKind, solver: RiemannSolverKind) -> HydroConfig {
    let mut config = HydroConfig::default();
    config.mesh.nx = [nx, 1, 1];
    config.mesh.x_min = [0.0, -0.5, -0.5];
    config.mesh.x_max = [1.0, 0.5, 0.5];
    config.mesh.boundaries = [BoundaryKind::Outflow; 3];
    config.reconstruction.kind = recon;
    config.riemann_solver = solver;
    config.integrator = IntegratorKind::Rk3;
    config.cfl = 0.4;
    config
}

fn total(mesh: &MeshBlock, var: usize) -> f64 {
    mesh.active_range().iter().map(|(k, j, i)| mesh.u0.get(var, k, j, i)).sum::<f64>() * mesh.dx[0]
}

fn assert_physical(block: &Block, rho_min: f64) {
    let mesh = block.mesh();
    for (k, j, i) in mesh.active_range().iter() {
        let w = mesh.w0.cell(k, j, i);
        assert!(w[..NHYDRO].iter().all(|x| x.is_finite()), "cell {i}: {w:?}");
        assert!(w[IDN] >= rho_min, "cell {i}: rho={}", w[IDN]);
        assert!(w[IPR] >= 0.0, "cell {i}: P={}", w[IPR]);
        assert!(mesh.u0.cell(k, j, i)[..NHYDRO].iter().all(|x| x.is_finite()));
    }
}

fn marti_muller(x: [f64; 3]) -> (Primitive, DVec3) {
    let prim = if x[0] < 0.5 {
        Primitive::new(10.0, DVec3::ZERO, 40.0 / 3.0, 0.0)
    } else {
        Primitive::new(1.0, DVec3::ZERO, 1e-6, 0.0)
    };
    (prim, DVec3::ZERO)
}

// ============================================================================
// 激波管
// ============================================================================

#[test]
fn test_relativistic_shock_tube() {
    for (recon, solver, fofc) in [
        (ReconstructionKind::Plm, RiemannSolverKind::Hlle, false),
        (ReconstructionKind::Ppm4, RiemannSolverKind::Hllc, true),
        (ReconstructionKind::Wenoz, RiemannSolverKind::Llf, true),
    ] {
        let mut config = tube_config(200, recon, solver);
        config.fofc = fofc;
        let mut block = HydroBuilder::new(config).build_local(Minkowski).unwrap();
        assert_eq!(block.set_primitives(marti_muller), 0);
        let mass0 = total(block.mesh(), IDN);
        let energy0 = total(block.mesh(), IEN);

        let mut driver = Driver::new(vec![block]).unwrap();
        let history = driver.run(0.4, 10_000).unwrap();
        assert!((driver.time() - 0.4).abs() < 1e-13, "{recon}/{solver}");
        assert_eq!(history.iter().map(|d| d.nonfinite).sum::<usize>(), 0, "{recon}/{solver}");
        if !fofc {
            assert_eq!(history.iter().map(|d| d.failures).sum::<usize>(), 0, "{recon}/{solver}");
        }

        let block = &driver.blocks()[0];
        assert_physical(block, 0.0);

        // 波尚未到达边界：守恒量总量不变
        let mesh = block.mesh();
        assert!((total(mesh, IDN) - mass0).abs() < 1e-11 * mass0, "{recon}/{solver}: mass");
        if !fofc {
            assert!((total(mesh, IEN) - energy0).abs() < 1e-11 * energy0, "{recon}/{solver}: energy");
        }

        // 远场保持初值
        let far_left = mesh.w0.cell(0, 0, mesh.is + 10);
        assert!((far_left[IDN] - 10.0).abs() < 1e-12);
        let far_right = mesh.w0.cell(0, 0, mesh.ie - 10);
        assert!((far_right[IDN] - 1.0).abs() < 1e-12);

        // 激波后的致密壳层向右运动，且处处亚光速
        let (mut shell_rho, mut shell_v) = (0.0_f64, 0.0_f64);
        for (k, j, i) in mesh.active_range().iter() {
            let u = mesh.w0.get(IVX, k, j, i);
            let v = u / (1.0 + u * u).sqrt();
            assert!(v.abs() < 1.0);
            let x = mesh.cell_center(k, j, i)[0];
            if (0.6..0.85).contains(&x) {
                shell_rho = shell_rho.max(mesh.w0.get(IDN, k, j, i));
                shell_v = shell_v.max(v);
            }
        }
        assert!(shell_rho > 3.0, "{recon}/{solver}: shell rho={shell_rho}");
        assert!(shell_v > 0.5, "{recon}/{solver}: shell v={shell_v}");
    }
}

// ============================================================================
// 周期守恒
// ============================================================================

#[test]
fn test_periodic_wave_conserves_totals() {
    let mut config = tube_config(64, ReconstructionKind::Plm, RiemannSolverKind::Hlle);
    config.mesh.boundaries = [BoundaryKind::Periodic; 3];
    config.nscalars = 1;
    let mut block = HydroBuilder::new(config).build_local(Minkowski).unwrap();
    block.set_primitives(|x| {
        let phase = 2.0 * std::f64::consts::PI * x[0];
        let prim = Primitive::new(1.0 + 0.2 * phase.sin(), DVec3::new(0.3, 0.0, 0.0), 1.0, 0.0)
            .with_scalars(&[0.5 + 0.5 * phase.cos()]);
        (prim, DVec3::ZERO)
    });
    let mass0 = total(block.mesh(), IDN);
    let energy0 = total(block.mesh(), IEN);
    let scalar0 = total(block.mesh(), NHYDRO);

    let mut driver = Driver::new(vec![block]).unwrap();
    let history = driver.run(f64::INFINITY, 50).unwrap();
    assert!(history.iter().all(|d| d.failures == 0 && d.floor_corrected() == 0));

    let mesh = driver.blocks()[0].mesh();
    assert!((total(mesh, IDN) - mass0).abs() < 1e-12 * mass0);
    assert!((total(mesh, IEN) - energy0).abs() < 1e-12 * energy0);
    assert!((total(mesh, NHYDRO) - scalar0).abs() < 1e-12 * scalar0);
    for (k, j, i) in mesh.active_range().iter() {
        let y = mesh.w0.get(NHYDRO, k, j, i);
        assert!((-1e-12..=1.0 + 1e-12).contains(&y), "Y={y} @ {i}");
    }
}

// ============================================================================
// 近真空与 FOFC
// ============================================================================

#[test]
fn test_expansion_into_vacuum_with_fofc() {
    let mut config = tube_config(100, ReconstructionKind::Wenoz, RiemannSolverKind::Hlle);
    config.fofc = true;
    config.floors.density = 1e-10;
    let rho_floor = config.floors.density;

    let mut block = HydroBuilder::new(config).build_local(Minkowski).unwrap();
    block.set_primitives(|x| {
        let prim = if x[0] < 0.5 {
            Primitive::new(1.0, DVec3::ZERO, 1.0, 0.0)
        } else {
            Primitive::new(rho_floor, DVec3::ZERO, 1e-16, 0.0)
        };
        (prim, DVec3::ZERO)
    });

    let mut driver = Driver::new(vec![block]).unwrap();
    let history = driver.run(f64::INFINITY, 40).unwrap();
    assert_eq!(history.len(), 40);
    assert_eq!(history.iter().map(|d| d.nonfinite).sum::<usize>(), 0);
    assert!(history.iter().all(|d| d.dt.is_finite() && d.dt > 0.0));
    assert_physical(&driver.blocks()[0], rho_floor);
}

#[test]
fn test_fofc_disabled_never_flags() {
    let mut block = HydroBuilder::new(tube_config(64, ReconstructionKind::Plm, RiemannSolverKind::Hlle))
        .build_local(Minkowski)
        .unwrap();
    block.set_primitives(marti_muller);
    let mut driver = Driver::new(vec![block]).unwrap();
    let history = driver.run(f64::INFINITY, 10).unwrap();
    assert!(history.iter().all(|d| d.fofc_cells == 0));
}
