// relhydro\crates\rh_physics\src/schemes/riemann/traits.rs

//! Riemann 求解器统一接口

use std::ops::{Add, Mul, Sub};

use glam::DVec3;
use rh_foundation::float::all_finite;
use rh_foundation::Direction;

use super::physics::FaceState;
use crate::eos::EquationOfState;
use crate::geometry::Metric;
use crate::types::{IDN, IEN, IM1, MAX_SCALARS, NHYDRO};

/// 流体 + 磁场分量（守恒量或通量，均已致密化）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HydroVector {
    /// D
    pub mass: f64,
    /// S_j
    pub momentum: DVec3,
    /// τ
    pub energy: f64,
    /// B^j
    pub field: DVec3,
}

impl HydroVector {
    /// 零向量
    pub const ZERO: Self = Self { mass: 0.0, momentum: DVec3::ZERO, energy: 0.0, field: DVec3::ZERO };

    /// 全部分量是否有限
    pub fn is_finite(&self) -> bool {
        self.mass.is_finite() && self.momentum.is_finite() && self.energy.is_finite() && self.field.is_finite()
    }
}

impl Add for HydroVector {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            mass: self.mass + rhs.mass,
            momentum: self.momentum + rhs.momentum,
            energy: self.energy + rhs.energy,
            field: self.field + rhs.field,
        }
    }
}

impl Sub for HydroVector {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            mass: self.mass - rhs.mass,
            momentum: self.momentum - rhs.momentum,
            energy: self.energy - rhs.energy,
            field: self.field - rhs.field,
        }
    }
}

impl Mul<HydroVector> for f64 {
    type Output = HydroVector;

    #[inline]
    fn mul(self, rhs: HydroVector) -> HydroVector {
        HydroVector {
            mass: self * rhs.mass,
            momentum: self * rhs.momentum,
            energy: self * rhs.energy,
            field: self * rhs.field,
        }
    }
}

/// 界面数值通量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiemannFlux {
    /// 流体与感应方程通量
    pub hydro: HydroVector,
    /// 被动标量通量 F(D·Y_n)
    pub scalars: [f64; MAX_SCALARS],
    /// 标量个数
    pub nscalars: usize,
    /// 最大波速 |λ|
    pub max_wave_speed: f64,
}

impl RiemannFlux {
    /// 由流体通量与最大波速构造，标量通量置零
    pub fn new(hydro: HydroVector, max_wave_speed: f64) -> Self {
        Self { hydro, scalars: [0.0; MAX_SCALARS], nscalars: 0, max_wave_speed }
    }

    /// 按质量通量符号迎风计算标量通量
    ///
    /// `F_D >= 0` 取左态 Y，否则取右态 Y。
    #[inline]
    pub fn upwind_scalars(&mut self, left: &[f64], right: &[f64]) {
        let fd = self.hydro.mass;
        let upwind = if fd >= 0.0 { left } else { right };
        self.nscalars = upwind.len();
        for (f, y) in self.scalars.iter_mut().zip(upwind) {
            *f = fd * y;
        }
    }

    /// 写入通量数组单元（流体 + 标量）
    #[inline]
    pub fn store(&self, cell: &mut [f64]) {
        cell[IDN] = self.hydro.mass;
        cell[IM1] = self.hydro.momentum.x;
        cell[IM1 + 1] = self.hydro.momentum.y;
        cell[IM1 + 2] = self.hydro.momentum.z;
        cell[IEN] = self.hydro.energy;
        cell[NHYDRO..NHYDRO + self.nscalars].copy_from_slice(&self.scalars[..self.nscalars]);
    }

    /// 写入磁场通量数组单元
    #[inline]
    pub fn store_field(&self, cell: &mut [f64]) {
        cell[0] = self.hydro.field.x;
        cell[1] = self.hydro.field.y;
        cell[2] = self.hydro.field.z;
    }

    /// 检查数值有效性
    pub fn is_valid(&self) -> bool {
        self.hydro.is_finite()
            && all_finite(&self.scalars[..self.nscalars])
            && self.max_wave_speed.is_finite()
    }
}

/// Riemann 求解器 trait
///
/// 输入为界面左右态（已补全温度）与面度规，输出致密化的数值通量。
/// 标量通量不在此计算，由 [`RiemannFlux::upwind_scalars`] 统一迎风。
pub trait RiemannSolver: Send + Sync {
    /// 求解器名称
    fn name(&self) -> &'static str;

    /// 求解界面通量
    fn solve<E: EquationOfState>(
        &self,
        eos: &E,
        left: &FaceState,
        right: &FaceState,
        metric: &Metric,
        dir: Direction,
    ) -> RiemannFlux;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_arithmetic() {
        let a = HydroVector { mass: 1.0, momentum: DVec3::X, energy: 2.0, field: DVec3::Z };
        let b = 2.0 * a - a;
        assert_eq!(a, b);
        assert_eq!((a - a), HydroVector::ZERO);
    }

    #[test]
    fn test_upwind_scalars_follow_mass_flux() {
        let mut flux = RiemannFlux::new(HydroVector { mass: 2.0, ..HydroVector::ZERO }, 1.0);
        flux.upwind_scalars(&[0.25, 0.5], &[0.75, 1.0]);
        assert_eq!(&flux.scalars[..2], &[0.5, 1.0]);

        let mut flux = RiemannFlux::new(HydroVector { mass: -2.0, ..HydroVector::ZERO }, 1.0);
        flux.upwind_scalars(&[0.25, 0.5], &[0.75, 1.0]);
        assert_eq!(&flux.scalars[..2], &[-1.5, -2.0]);
    }

    #[test]
    fn test_store_layout() {
        let mut flux = RiemannFlux::new(
            HydroVector { mass: 1.0, momentum: DVec3::new(2.0, 3.0, 4.0), energy: 5.0, field: DVec3::ONE },
            0.0,
        );
        flux.upwind_scalars(&[0.5], &[0.0]);
        let mut cell = [0.0; NHYDRO + 1];
        flux.store(&mut cell);
        assert_eq!(cell, [1.0, 2.0, 3.0, 4.0, 5.0, 0.5]);
    }
}
