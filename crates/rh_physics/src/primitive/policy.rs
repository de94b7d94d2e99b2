// relhydro\crates\rh_physics\src/primitive/policy.rs

//! 底值与失败策略
//!
//! 策略在编译期作为泛型参数传给求解器，内核中没有动态分发。
//! 探测模式（floors-only）下底值事件被视为失败：
//! 密度底值对应 `RhoTooSmall`，温度/能量底值对应 `NoSolution`。

use glam::DVec3;
use rh_config::FloorConfig;

use super::result::SolverError;
use crate::eos::EquationOfState;
use crate::state::{Conserved, Primitive};

/// 底值事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorEvent {
    /// 未触发
    None,
    /// 密度（大气）底值
    Density,
    /// 温度或能量底值
    Energy,
}

impl FloorEvent {
    /// 是否触发
    #[inline]
    pub fn applied(self) -> bool {
        self != FloorEvent::None
    }

    /// 探测模式下对应的错误
    #[inline]
    pub fn as_error(self) -> SolverError {
        match self {
            FloorEvent::None => SolverError::Success,
            FloorEvent::Density => SolverError::RhoTooSmall,
            FloorEvent::Energy => SolverError::NoSolution,
        }
    }
}

/// 失败策略 trait
pub trait ErrorPolicy: Send + Sync + Clone {
    /// 对原始量施加底值
    fn primitive_floor<E: EquationOfState>(&self, eos: &E, prim: &mut Primitive) -> FloorEvent;

    /// 对守恒量施加底值，`bsq = B^i B_i`
    fn conserved_floor<E: EquationOfState>(&self, eos: &E, cons: &mut Conserved, bsq: f64) -> FloorEvent;

    /// 底值是否视为失败
    fn fail_on_floor(&self) -> bool;

    /// 最大 Lorentz 因子
    fn max_lorentz(&self) -> f64;

    /// 最大 B²/D
    fn max_bsq(&self) -> f64;

    /// 底值视为失败的副本（用于探测）
    fn with_floor_failures(&self) -> Self;
}

/// 重置到底值的策略
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResetFloor {
    /// 底值是否视为失败
    pub fail_on_floor: bool,
    /// 最大 Lorentz 因子
    pub max_lorentz: f64,
    /// 最大 B²/D
    pub max_bsq: f64,
}

impl Default for ResetFloor {
    fn default() -> Self {
        Self::from_config(&FloorConfig::default())
    }
}

impl ResetFloor {
    /// 从底值配置构造
    pub fn from_config(cfg: &FloorConfig) -> Self {
        Self { fail_on_floor: false, max_lorentz: cfg.max_lorentz, max_bsq: cfg.max_bsq }
    }
}

impl ErrorPolicy for ResetFloor {
    /// 低于 `density` 的单元重置为大气（ρ = 底值、静止、温度底值）；
    /// 介于 `density` 与 `density * threshold` 之间的单元速度清零并施加温度底值；
    /// 其余单元只施加温度底值。
    fn primitive_floor<E: EquationOfState>(&self, eos: &E, prim: &mut Primitive) -> FloorEvent {
        let floors = eos.floors();
        let event = if prim.rho < floors.density {
            prim.rho = floors.density;
            prim.vel = DVec3::ZERO;
            prim.temperature = floors.temperature;
            FloorEvent::Density
        } else if prim.rho < floors.density * floors.threshold
            && (prim.vel != DVec3::ZERO || prim.temperature < floors.temperature)
        {
            prim.vel = DVec3::ZERO;
            prim.temperature = prim.temperature.max(floors.temperature);
            FloorEvent::Density
        } else if prim.temperature < floors.temperature {
            prim.temperature = floors.temperature;
            FloorEvent::Energy
        } else {
            FloorEvent::None
        };

        if event.applied() {
            let n = prim.rho / eos.baryon_mass();
            prim.pressure = eos.pressure(n, prim.temperature, prim.scalars());
        }
        event
    }

    fn conserved_floor<E: EquationOfState>(&self, eos: &E, cons: &mut Conserved, bsq: f64) -> FloorEvent {
        let floors = eos.floors();
        let mb = eos.baryon_mass();

        if cons.d < floors.density {
            // 保持成分比例
            let old_d = cons.d;
            for y in cons.scalars[..cons.nscalars].iter_mut() {
                *y = if old_d > 0.0 { (*y / old_d).clamp(0.0, 1.0) * floors.density } else { 0.0 };
            }
            let n = floors.density / mb;
            cons.d = floors.density;
            cons.s = DVec3::ZERO;
            cons.tau = eos.energy(n, floors.temperature, cons.scalars()) - floors.density + 0.5 * bsq;
            return FloorEvent::Density;
        }

        let n = cons.d / mb;
        let mut ys = [0.0; crate::types::MAX_SCALARS];
        for (y, dy) in ys.iter_mut().zip(cons.scalars()) {
            *y = dy / cons.d;
        }
        let tau_min = eos.energy(n, floors.temperature, &ys[..cons.nscalars]) - cons.d + 0.5 * bsq;
        if cons.tau < tau_min {
            cons.tau = tau_min;
            return FloorEvent::Energy;
        }
        FloorEvent::None
    }

    #[inline]
    fn fail_on_floor(&self) -> bool {
        self.fail_on_floor
    }

    #[inline]
    fn max_lorentz(&self) -> f64 {
        self.max_lorentz
    }

    #[inline]
    fn max_bsq(&self) -> f64 {
        self.max_bsq
    }

    fn with_floor_failures(&self) -> Self {
        Self { fail_on_floor: true, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eos::{EosFloors, IdealGas};

    fn eos(threshold: f64) -> IdealGas {
        let floors = EosFloors { density: 1e-6, temperature: 1e-8, threshold, max_density: 1e10 };
        IdealGas::new(4.0 / 3.0, 1.0, floors).unwrap()
    }

    #[test]
    fn test_density_floor_resets_to_atmosphere() {
        let eos = eos(1.0);
        let mut prim = Primitive::new(1e-9, DVec3::new(0.5, 0.0, 0.0), 1e-3, 1e6);
        let event = ResetFloor::default().primitive_floor(&eos, &mut prim);
        assert_eq!(event, FloorEvent::Density);
        assert_eq!(prim.rho, 1e-6);
        assert_eq!(prim.vel, DVec3::ZERO);
        assert_eq!(prim.temperature, 1e-8);
        assert!((prim.pressure - 1e-14).abs() < 1e-28);
    }

    #[test]
    fn test_threshold_zeroes_velocity_only() {
        let eos = eos(10.0);
        let mut prim = Primitive::new(5e-6, DVec3::new(0.1, 0.0, 0.0), 5e-6, 1.0);
        let event = ResetFloor::default().primitive_floor(&eos, &mut prim);
        assert_eq!(event, FloorEvent::Density);
        assert_eq!(prim.rho, 5e-6);
        assert_eq!(prim.vel, DVec3::ZERO);
        assert_eq!(prim.temperature, 1.0);
    }

    #[test]
    fn test_temperature_floor() {
        let eos = eos(1.0);
        let mut prim = Primitive::new(1.0, DVec3::new(0.1, 0.0, 0.0), 0.0, 0.0);
        let event = ResetFloor::default().primitive_floor(&eos, &mut prim);
        assert_eq!(event, FloorEvent::Energy);
        assert_eq!(prim.temperature, 1e-8);
        assert_eq!(prim.vel.x, 0.1);
    }

    #[test]
    fn test_no_floor_for_healthy_state() {
        let eos = eos(1.0);
        let mut prim = Primitive::new(1.0, DVec3::ZERO, 1.0, 1.0);
        let before = prim;
        assert_eq!(ResetFloor::default().primitive_floor(&eos, &mut prim), FloorEvent::None);
        assert_eq!(prim, before);
    }

    #[test]
    fn test_conserved_energy_floor() {
        let eos = eos(1.0);
        let mut cons = Conserved::new(1.0, DVec3::ZERO, -0.5);
        let event = ResetFloor::default().conserved_floor(&eos, &mut cons, 0.0);
        assert_eq!(event, FloorEvent::Energy);
        assert!(cons.tau > 0.0);
        assert_eq!(event.as_error(), SolverError::NoSolution);
    }

    #[test]
    fn test_conserved_density_floor() {
        let eos = eos(1.0);
        let mut cons = Conserved::new(1e-9, DVec3::new(1.0, 0.0, 0.0), 1.0);
        let event = ResetFloor::default().conserved_floor(&eos, &mut cons, 0.0);
        assert_eq!(event, FloorEvent::Density);
        assert_eq!(cons.d, 1e-6);
        assert_eq!(cons.s, DVec3::ZERO);
        assert_eq!(event.as_error(), SolverError::RhoTooSmall);
    }

    #[test]
    fn test_with_floor_failures() {
        let policy = ResetFloor::default();
        assert!(!policy.fail_on_floor());
        assert!(policy.with_floor_failures().fail_on_floor());
    }
}
