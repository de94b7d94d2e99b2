// relhydro\crates\rh_physics\src/state.rs

//! 单元点状态
//!
//! 块数组中存放的是致密化的守恒量（乘以 √γ），点状态 [`Conserved`]
//! 则是未致密化的值，求解器内核只处理点状态。
//! 两种点状态都是定长、`Copy` 的，不在内核中分配堆内存。

use glam::DVec3;
use rh_foundation::float::all_finite;

use crate::types::{IDN, IEN, IM1, IPR, IVX, MAX_SCALARS, NHYDRO};

/// 原始量点状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    /// 静质量密度 ρ
    pub rho: f64,
    /// 空间速度 u^i = W v^i
    pub vel: DVec3,
    /// 压强
    pub pressure: f64,
    /// 温度
    pub temperature: f64,
    /// 被动标量个数
    pub nscalars: usize,
    /// 标量质量分数 Y_n
    pub scalars: [f64; MAX_SCALARS],
}

impl Primitive {
    /// 无标量的原始量
    pub fn new(rho: f64, vel: DVec3, pressure: f64, temperature: f64) -> Self {
        Self { rho, vel, pressure, temperature, nscalars: 0, scalars: [0.0; MAX_SCALARS] }
    }

    /// 设置标量（超出上限的部分被截断）
    pub fn with_scalars(mut self, ys: &[f64]) -> Self {
        let n = ys.len().min(MAX_SCALARS);
        self.nscalars = n;
        self.scalars[..n].copy_from_slice(&ys[..n]);
        self
    }

    /// 有效的标量切片
    #[inline]
    pub fn scalars(&self) -> &[f64] {
        &self.scalars[..self.nscalars]
    }

    /// 从原始量数组的单元切片读取；温度需由调用方根据状态方程补全
    #[inline]
    pub fn load(cell: &[f64], nscalars: usize) -> Self {
        let mut prim = Self::new(
            cell[IDN],
            DVec3::new(cell[IVX], cell[IVX + 1], cell[IVX + 2]),
            cell[IPR],
            0.0,
        );
        prim.nscalars = nscalars;
        prim.scalars[..nscalars].copy_from_slice(&cell[NHYDRO..NHYDRO + nscalars]);
        prim
    }

    /// 写入原始量数组的单元切片
    #[inline]
    pub fn store(&self, cell: &mut [f64]) {
        cell[IDN] = self.rho;
        cell[IVX] = self.vel.x;
        cell[IVX + 1] = self.vel.y;
        cell[IVX + 2] = self.vel.z;
        cell[IPR] = self.pressure;
        cell[NHYDRO..NHYDRO + self.nscalars].copy_from_slice(self.scalars());
    }

    /// 全部分量是否有限
    pub fn is_finite(&self) -> bool {
        self.rho.is_finite()
            && self.vel.is_finite()
            && self.pressure.is_finite()
            && self.temperature.is_finite()
            && all_finite(self.scalars())
    }
}

/// 守恒量点状态（未致密化）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conserved {
    /// D = ρW
    pub d: f64,
    /// 协变动量 S_i
    pub s: DVec3,
    /// τ = E - D
    pub tau: f64,
    /// 被动标量个数
    pub nscalars: usize,
    /// D·Y_n
    pub scalars: [f64; MAX_SCALARS],
}

impl Conserved {
    /// 无标量的守恒量
    pub fn new(d: f64, s: DVec3, tau: f64) -> Self {
        Self { d, s, tau, nscalars: 0, scalars: [0.0; MAX_SCALARS] }
    }

    /// 有效的标量切片
    #[inline]
    pub fn scalars(&self) -> &[f64] {
        &self.scalars[..self.nscalars]
    }

    /// 从致密化数组读取并除以 √γ
    #[inline]
    pub fn load(cell: &[f64], nscalars: usize, sqrt_det: f64) -> Self {
        let inv = 1.0 / sqrt_det;
        let mut cons = Self::new(
            cell[IDN] * inv,
            DVec3::new(cell[IM1], cell[IM1 + 1], cell[IM1 + 2]) * inv,
            cell[IEN] * inv,
        );
        cons.nscalars = nscalars;
        for n in 0..nscalars {
            cons.scalars[n] = cell[NHYDRO + n] * inv;
        }
        cons
    }

    /// 乘以 √γ 写回致密化数组
    #[inline]
    pub fn store(&self, cell: &mut [f64], sqrt_det: f64) {
        cell[IDN] = self.d * sqrt_det;
        cell[IM1] = self.s.x * sqrt_det;
        cell[IM1 + 1] = self.s.y * sqrt_det;
        cell[IM1 + 2] = self.s.z * sqrt_det;
        cell[IEN] = self.tau * sqrt_det;
        for n in 0..self.nscalars {
            cell[NHYDRO + n] = self.scalars[n] * sqrt_det;
        }
    }

    /// 全部分量是否有限
    pub fn is_finite(&self) -> bool {
        self.d.is_finite()
            && self.s.is_finite()
            && self.tau.is_finite()
            && all_finite(self.scalars())
    }
}

/// 从致密化磁场数组读取 B^i
#[inline]
pub fn load_field(cell: &[f64], sqrt_det: f64) -> DVec3 {
    DVec3::new(cell[0], cell[1], cell[2]) / sqrt_det
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_load_store() {
        let prim = Primitive::new(1.0, DVec3::new(0.1, -0.2, 0.3), 0.5, 0.0).with_scalars(&[0.25, 0.75]);
        let mut cell = [0.0; NHYDRO + 2];
        prim.store(&mut cell);
        let back = Primitive::load(&cell, 2);
        assert_eq!(back, prim);
    }

    #[test]
    fn test_conserved_densitization() {
        let mut cons = Conserved::new(2.0, DVec3::new(1.0, 0.0, -1.0), 3.0);
        cons.nscalars = 1;
        cons.scalars[0] = 0.5;
        let mut cell = [0.0; NHYDRO + 1];
        cons.store(&mut cell, 2.0);
        assert_eq!(cell[IDN], 4.0);
        assert_eq!(cell[NHYDRO], 1.0);
        let back = Conserved::load(&cell, 1, 2.0);
        assert_eq!(back, cons);
    }

    #[test]
    fn test_nonfinite_detection() {
        let cons = Conserved::new(f64::NAN, DVec3::ZERO, 1.0);
        assert!(!cons.is_finite());
        let prim = Primitive::new(1.0, DVec3::new(f64::INFINITY, 0.0, 0.0), 1.0, 1.0);
        assert!(!prim.is_finite());
    }
}
