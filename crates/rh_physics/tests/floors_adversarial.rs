// relhydro\crates\rh_physics\tests/floors_adversarial.rs

//! 底值、修正一致性与对抗输入
//!
//! - 输入密度低于底值时，输出密度恰为底值且 `prim_floor` 置位
//! - 只要 `prim_floor` 或 `cons_adjusted` 置位，存储的守恒量与由修正后原始量重新生成的守恒量一致
//! - 任意对抗输入都不会中断批量变换，失败以非 SUCCESS 结果返回

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rh_foundation::{CellArray, CellRange};
use rh_physics::eos::{EosFloors, IdealGas};
use rh_physics::geometry::{Metric, MetricField, Minkowski, SymTensor3};
use rh_physics::primitive::{conserved_to_primitive, primitive_to_conserved, ErrorPolicy};
use rh_physics::types::{IDN, IEN, IM1, IPR, NHYDRO};
use rh_physics::{Conserved, ExcisionParams, Primitive, PrimitiveSolver, ResetFloor, SolverError};

const RHO_FLOOR: f64 = 1e-10;

fn solver() -> PrimitiveSolver<IdealGas> {
    let floors = EosFloors { density: RHO_FLOOR, temperature: 1e-12, threshold: 1.0, max_density: 1e12 };
    let eos = IdealGas::new(4.0 / 3.0, 1.0, floors).unwrap();
    PrimitiveSolver::new(eos, ResetFloor::default(), 1e-15, 60)
}

fn curved() -> Metric {
    let g = SymTensor3 { xx: 1.2, xy: 0.05, xz: 0.0, yy: 1.1, yz: -0.02, zz: 0.95 };
    Metric::new(g, 0.7, DVec3::new(0.1, 0.0, -0.05))
}

fn state(s: &PrimitiveSolver<IdealGas>, rho: f64, vel: DVec3, p: f64) -> Primitive {
    let mut prim = Primitive::new(rho, vel, p, 0.0);
    s.complete(&mut prim);
    prim
}

// ============================================================================
// 底值单调性
// ============================================================================

#[test]
fn test_density_below_floor_lands_exactly_on_floor() {
    let s = solver();
    let mut rng = StdRng::seed_from_u64(0xf100_0001);
    for sample in 0..300 {
        let metric = if sample % 2 == 0 { Metric::minkowski() } else { curved() };
        let rho = RHO_FLOOR * (rng.gen_range((-6.0f64)..(-0.01)) * std::f64::consts::LN_10).exp();
        let vel = DVec3::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0), 0.0);
        let prim = state(&s, rho, vel, rho * rng.gen_range(1e-3..1.0));

        let mut cons = s.prim_to_con(&prim, DVec3::ZERO, &metric);
        let (back, result) = s.con_to_prim(&mut cons, DVec3::ZERO, &metric);
        assert!(result.is_success(), "sample {sample}: {:?}", result.error);
        assert!(result.prim_floor, "sample {sample}: rho={rho:e} D={:e}", cons.d);
        assert_eq!(back.rho, RHO_FLOOR, "sample {sample}");
        assert_eq!(back.vel, DVec3::ZERO, "sample {sample}");
    }
}

#[test]
fn test_moving_cell_floored_through_primitive_path() {
    // D = ρW 高于底值，但 ρ 低于底值
    let s = solver();
    let prim = state(&s, 0.5 * RHO_FLOOR, DVec3::new(3.0, 0.0, 0.0), 1e-13);
    let mut cons = s.prim_to_con(&prim, DVec3::ZERO, &Metric::minkowski());
    assert!(cons.d > RHO_FLOOR);
    let (back, result) = s.con_to_prim(&mut cons, DVec3::ZERO, &Metric::minkowski());
    assert!(result.prim_floor && !result.cons_floor);
    assert!(result.cons_adjusted);
    assert_eq!(back.rho, RHO_FLOOR);
}

// ============================================================================
// 修正一致性
// ============================================================================

#[test]
fn test_adjusted_conserved_matches_corrected_primitive_exactly() {
    let s = solver();
    let metric = curved();
    let b = DVec3::new(1e-6, 0.0, 2e-6);
    let cases = [
        Conserved::new(1e-14, DVec3::new(1e-15, 0.0, 0.0), 1e-15),
        Conserved::new(2e-10, DVec3::new(1.5e-9, 0.0, 0.0), 5e-9),
        Conserved::new(1.0, DVec3::ZERO, -0.3),
        Conserved::new(1.0, DVec3::new(0.5, 0.1, 0.0), 1e-20),
        Conserved::new(-1.0, DVec3::ZERO, 1.0),
    ];
    let mut adjusted = 0;
    for (n, original) in cases.iter().enumerate() {
        let mut cons = *original;
        let (prim, result) = s.con_to_prim(&mut cons, b, &metric);
        assert!(result.is_success(), "case {n}: {:?}", result.error);
        if result.prim_floor || result.cons_adjusted {
            adjusted += 1;
            assert_eq!(cons, s.prim_to_con(&prim, b, &metric), "case {n}");
        }
    }
    // 近真空与负密度两例必然经过密度底值
    assert!(adjusted >= 2, "{adjusted}");
}

#[test]
fn test_batch_writes_back_adjusted_conserved() {
    let s = solver();
    let dims = [1, 1, 6];
    let geometry = MetricField::from_fn(dims, |_, _, i| {
        let g = 1.0 + 0.1 * i as f64;
        Metric::new(SymTensor3::diagonal(g, g, g), 0.9, DVec3::ZERO)
    });
    let range = CellRange::new((0, 0), (0, 0), (0, 5));

    // 各行依次为：健康态、低密度运动、负能量、近真空、横向运动、能量近零
    let mut cons = CellArray::zeros(NHYDRO, 1, 1, 6);
    let rows: [[f64; NHYDRO]; 6] = [
        [1.0, 0.1, 0.0, 0.0, 0.5],
        [2e-10, 1.5e-9, 0.0, 0.0, 5e-9],
        [1.0, 0.0, 0.0, 0.0, -0.3],
        [1e-14, 0.0, 0.0, 0.0, 1e-16],
        [0.5, 0.0, 0.2, 0.0, 0.4],
        [1.0, 0.0, 0.0, 0.0, 1e-30],
    ];
    for (i, row) in rows.iter().enumerate() {
        let sqrt_det = (1.0 + 0.1 * i as f64).powi(3).sqrt();
        for (v, x) in row.iter().enumerate() {
            cons.set(v, 0, 0, i, x * sqrt_det);
        }
    }
    let mut prim = CellArray::zeros(NHYDRO, 1, 1, 6);
    let stats = conserved_to_primitive(&s, &geometry, &mut cons, None, &mut prim, &range, 0, None);
    assert_eq!(stats.failures, 0);
    assert!(stats.cons_floors >= 3, "{stats:?}");

    // 由存储的原始量重新生成守恒量，应与存储值一致
    let mut regenerated = CellArray::zeros(NHYDRO, 1, 1, 6);
    assert_eq!(primitive_to_conserved(&s, &geometry, &prim, None, &mut regenerated, &range, 0), 0);
    for (a, b) in cons.as_slice().iter().zip(regenerated.as_slice()) {
        assert!((a - b).abs() <= 1e-10 * a.abs().max(1e-20), "{a:e} vs {b:e}");
    }
    for i in 0..6 {
        assert!(prim.get(IDN, 0, 0, i) >= RHO_FLOOR);
    }
}

// ============================================================================
// 对抗输入
// ============================================================================

#[test]
fn test_energy_below_rest_mass_reports_failure_in_probe_mode() {
    let s = solver();
    let probe = s.policy().with_floor_failures();
    let mut cons = Conserved::new(1.0, DVec3::ZERO, -2.0);
    let (_, result) = s.invert(&probe, &mut cons, DVec3::ZERO, &Metric::minkowski());
    assert!(!result.is_success());
    assert_eq!(result.error, SolverError::NoSolution);

    // 复位策略下同一输入被底值修正而非失败
    let mut cons = Conserved::new(1.0, DVec3::ZERO, -2.0);
    let (prim, result) = s.con_to_prim(&mut cons, DVec3::ZERO, &Metric::minkowski());
    assert!(result.is_success());
    assert!(result.cons_floor);
    assert!(prim.pressure >= 0.0);
}

#[test]
fn test_batch_survives_adversarial_block() {
    let s = solver();
    let n = 64;
    let range = CellRange::new((0, 0), (0, 0), (0, n - 1));
    let mut rng = StdRng::seed_from_u64(0xbad_c0de);

    let mut cons = CellArray::zeros(NHYDRO, 1, 1, n);
    let mut field = CellArray::zeros(3, 1, 1, n);
    let mut expected_failures = 0;
    for i in 0..n {
        let cell = cons.cell_mut(0, 0, i);
        match i % 8 {
            0 => {
                cell[IDN] = f64::NAN;
                expected_failures += 1;
            }
            1 => {
                cell[IDN] = 1.0;
                cell[IEN] = f64::INFINITY;
                expected_failures += 1;
            }
            2 => {
                cell[IDN] = -rng.gen_range(0.0..10.0);
                cell[IEN] = rng.gen_range(-1.0..1.0);
            }
            3 => {
                cell[IDN] = 1.0;
                cell[IEN] = -rng.gen_range(1.0..100.0);
            }
            4 => {
                // 动量远超能量
                cell[IDN] = 1.0;
                cell[IM1] = rng.gen_range(10.0..1e3);
                cell[IEN] = 0.1;
            }
            5 => {
                cell[IDN] = 1e-3;
                cell[IEN] = 1.0;
                field.cell_mut(0, 0, i).copy_from_slice(&[1e3, 0.0, 0.0]);
                expected_failures += 1;
            }
            6 => {
                cell[IDN] = 0.0;
                cell[IEN] = 0.0;
            }
            _ => {
                cell[IDN] = rng.gen_range(0.1..10.0);
                cell[IEN] = rng.gen_range(0.1..10.0);
            }
        }
    }

    let mut prim = CellArray::zeros(NHYDRO, 1, 1, n);
    for i in 0..n {
        prim.cell_mut(0, 0, i).copy_from_slice(&[1.0, 0.0, 0.0, 0.0, 1.0]);
    }
    let stats = conserved_to_primitive(&s, &Minkowski, &mut cons, Some(&field), &mut prim, &range, 0, None);

    assert_eq!(stats.cells, n);
    assert!(stats.failures >= expected_failures, "{stats:?}");
    for i in 0..n {
        let w = prim.cell(0, 0, i);
        assert!(w.iter().all(|x| x.is_finite()), "cell {i}: {w:?}");
        assert!(w[IDN] > 0.0 && w[IPR] >= 0.0, "cell {i}: {w:?}");
    }
}

#[test]
fn test_nonfinite_primitive_input_is_counted_not_fatal() {
    let s = solver();
    let range = CellRange::new((0, 0), (0, 0), (0, 2));
    let mut prim = CellArray::zeros(NHYDRO, 1, 1, 3);
    for i in 0..3 {
        prim.cell_mut(0, 0, i).copy_from_slice(&[1.0, 0.0, 0.0, 0.0, 1.0]);
    }
    prim.set(IPR, 0, 0, 1, f64::NAN);
    let mut cons = CellArray::zeros(NHYDRO, 1, 1, 3);
    assert_eq!(primitive_to_conserved(&s, &Minkowski, &prim, None, &mut cons, &range, 0), 1);
    assert!(cons.get(IEN, 0, 0, 0).is_finite());
    assert!(cons.get(IEN, 0, 0, 2).is_finite());
}

#[test]
fn test_excision_overrides_any_input() {
    let s = solver();
    let geometry = MetricField::from_fn([1, 1, 4], |_, _, _| curved()).with_excision(|_, _, i| i >= 2);
    let range = CellRange::new((0, 0), (0, 0), (0, 3));
    let mut cons = CellArray::zeros(NHYDRO + 1, 1, 1, 4);
    for i in 0..4 {
        cons.cell_mut(0, 0, i).copy_from_slice(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.5]);
    }
    cons.set(IDN, 0, 0, 3, f64::NAN);
    let mut prim = CellArray::zeros(NHYDRO + 1, 1, 1, 4);
    let params = ExcisionParams { density: 1e-6, pressure: 1e-9 };
    let stats = conserved_to_primitive(&s, &geometry, &mut cons, None, &mut prim, &range, 1, Some(&params));

    assert_eq!(stats.excised, 2);
    assert_eq!(stats.failures, 0);
    for i in 2..4 {
        assert_eq!(prim.get(IDN, 0, 0, i), 1e-6);
        assert!((prim.get(IPR, 0, 0, i) - 1e-9).abs() < 1e-20);
        assert!(cons.cell(0, 0, i).iter().all(|x| x.is_finite()));
    }
    // 标量按 DY/D 拷回
    assert!((prim.get(NHYDRO, 0, 0, 2) - 0.5).abs() < 1e-14);
}
