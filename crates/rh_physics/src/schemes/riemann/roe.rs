// relhydro\crates\rh_physics\src/schemes/riemann/roe.rs

//! Roe 型求解器（平直时空、绝热、无磁场）
//!
//! 在左右原始量的算术平均态上构造特征系统（Font et al. 1994 /
//! Donat et al. 1998 的右特征向量），波强度由 5×5 Gauss 消元得到：
//!
//! ```text
//! F* = ½ (F_L + F_R - Σ_p |λ_p| ω_p r_p),   Σ_p ω_p r_p = U_R - U_L
//! ```
//!
//! 小特征值使用 Harten 熵修正。线性系统奇异时退化为 LLF。

use glam::DVec3;
use rh_foundation::Direction;

use super::llf::LlfSolver;
use super::physics::{wave_speeds, FaceState};
use super::traits::{HydroVector, RiemannFlux, RiemannSolver};
use crate::eos::EquationOfState;
use crate::geometry::Metric;
use crate::types::{IDN, IEN, IM1, MAX_SCALARS};

/// 守恒量分量数 (D, S_1, S_2, S_3, τ)
const NWAVE: usize = 5;

/// 主元下限
const PIVOT_EPS: f64 = 1.0e-14;

/// 平均态上的特征系统
#[derive(Debug, Clone, Copy)]
pub struct RoeEigensystem {
    /// 特征值 (λ-, λ0, λ0, λ0, λ+)
    pub eigenvalues: [f64; NWAVE],
    /// 右特征向量，`vectors[p]` 按 (D, S_1, S_2, S_3, τ) 排列
    pub vectors: [[f64; NWAVE]; NWAVE],
}

impl RoeEigensystem {
    /// 在平直时空中由 (ρ, v^i, P, Y) 构造方向 `dir` 的特征系统
    pub fn new<E: EquationOfState>(eos: &E, rho: f64, v: DVec3, pressure: f64, ys: &[f64], dir: Direction) -> Self {
        let n = rho / eos.baryon_mass();
        let t = eos.temperature_from_pressure(n, pressure, ys);
        let h = eos.enthalpy(n, t, ys);
        let cs = eos.sound_speed(n, t, ys);
        let cs2 = cs * cs;
        let kappa = eos.dpde(n, t, ys);

        let vsq = v.length_squared();
        let w = 1.0 / (1.0 - vsq).sqrt();
        let (lm, lp) = wave_speeds(cs2, v, vsq, &Metric::minkowski(), dir);

        let (t1, t2) = dir.transverse();
        let (dn, d1, d2) = (dir.index(), t1.index(), t2.index());
        let (vn, vt1, vt2) = (v[dn], v[d1], v[d2]);
        let big_k = kappa / (kappa - cs2);
        let hw = h * w;
        let hw2 = h * w * w;

        let mut r = [[0.0; NWAVE]; NWAVE];
        let mut assign = |p: usize, d: f64, sn: f64, s1: f64, s2: f64, tau: f64| {
            r[p][IDN] = d;
            r[p][IM1 + dn] = sn;
            r[p][IM1 + d1] = s1;
            r[p][IM1 + d2] = s2;
            r[p][IEN] = tau;
        };

        let a_minus = (1.0 - vn * vn) / (1.0 - vn * lm);
        let a_plus = (1.0 - vn * vn) / (1.0 - vn * lp);
        assign(0, 1.0, hw * a_minus * lm, hw * vt1, hw * vt2, hw * a_minus - 1.0);
        assign(1, big_k / hw, vn, vt1, vt2, 1.0 - big_k / hw);
        assign(
            2,
            w * vt1,
            2.0 * hw2 * vn * vt1,
            h * (1.0 + 2.0 * w * w * vt1 * vt1),
            2.0 * hw2 * vt1 * vt2,
            2.0 * hw2 * vt1 - w * vt1,
        );
        assign(
            3,
            w * vt2,
            2.0 * hw2 * vn * vt2,
            2.0 * hw2 * vt1 * vt2,
            h * (1.0 + 2.0 * w * w * vt2 * vt2),
            2.0 * hw2 * vt2 - w * vt2,
        );
        assign(4, 1.0, hw * a_plus * lp, hw * vt1, hw * vt2, hw * a_plus - 1.0);

        Self { eigenvalues: [lm, vn, vn, vn, lp], vectors: r }
    }

    /// 波强度：解 Σ_p ω_p r_p = Δu；系统奇异时返回 `None`
    pub fn wave_strengths(&self, du: [f64; NWAVE]) -> Option<[f64; NWAVE]> {
        // 矩阵 m[row][col] = vectors[col][row]
        let mut m = [[0.0; NWAVE]; NWAVE];
        for (col, vector) in self.vectors.iter().enumerate() {
            for (row, value) in vector.iter().enumerate() {
                m[row][col] = *value;
            }
        }
        gauss_solve(m, du)
    }
}

/// 列主元 Gauss 消元
fn gauss_solve(mut m: [[f64; NWAVE]; NWAVE], mut b: [f64; NWAVE]) -> Option<[f64; NWAVE]> {
    let scale = m.iter().flatten().fold(0.0f64, |acc, x| acc.max(x.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }
    for col in 0..NWAVE {
        let pivot = (col..NWAVE).max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))?;
        if m[pivot][col].abs() < PIVOT_EPS * scale {
            return None;
        }
        m.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..NWAVE {
            let factor = m[row][col] / m[col][col];
            for k in col..NWAVE {
                m[row][k] -= factor * m[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = [0.0; NWAVE];
    for row in (0..NWAVE).rev() {
        let tail: f64 = (row + 1..NWAVE).map(|k| m[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / m[row][row];
    }
    x.iter().all(|v| v.is_finite()).then_some(x)
}

#[inline]
fn to_array(v: &HydroVector) -> [f64; NWAVE] {
    [v.mass, v.momentum.x, v.momentum.y, v.momentum.z, v.energy]
}

/// Roe 求解器
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoeSolver {
    /// Harten 熵修正阈值与最大特征值之比
    pub entropy_ratio: f64,
}

impl Default for RoeSolver {
    fn default() -> Self {
        Self { entropy_ratio: 0.1 }
    }
}

impl RoeSolver {
    /// Harten 熵修正后的 |λ|
    #[inline]
    fn entropy_fixed(&self, lambda: f64, delta: f64) -> f64 {
        let a = lambda.abs();
        if a < delta {
            (lambda * lambda + delta * delta) / (2.0 * delta)
        } else {
            a
        }
    }
}

impl RiemannSolver for RoeSolver {
    fn name(&self) -> &'static str {
        "roe"
    }

    fn solve<E: EquationOfState>(
        &self,
        eos: &E,
        left: &FaceState,
        right: &FaceState,
        metric: &Metric,
        dir: Direction,
    ) -> RiemannFlux {
        let rho = 0.5 * (left.prim.rho + right.prim.rho);
        let v = 0.5 * (left.v + right.v);
        let pressure = 0.5 * (left.prim.pressure + right.prim.pressure);
        let nscal = left.prim.nscalars;
        let mut ys = [0.0; MAX_SCALARS];
        for (y, (yl, yr)) in ys.iter_mut().zip(left.prim.scalars().iter().zip(right.prim.scalars())) {
            *y = 0.5 * (yl + yr);
        }

        let system = RoeEigensystem::new(eos, rho, v, pressure, &ys[..nscal], dir);
        let du = to_array(&(right.conserved_vector(metric) - left.conserved_vector(metric)));
        let Some(strengths) = system.wave_strengths(du) else {
            return LlfSolver.solve(eos, left, right, metric, dir);
        };

        let lambda_max = system.eigenvalues.iter().fold(0.0f64, |m, l| m.max(l.abs()));
        let delta = self.entropy_ratio * lambda_max;

        let mut dissipation = [0.0; NWAVE];
        for p in 0..NWAVE {
            let weight = self.entropy_fixed(system.eigenvalues[p], delta) * strengths[p];
            for (d, r) in dissipation.iter_mut().zip(system.vectors[p]) {
                *d += weight * r;
            }
        }

        let fl = left.flux(metric, dir);
        let fr = right.flux(metric, dir);
        let diss = HydroVector {
            mass: dissipation[IDN],
            momentum: DVec3::new(dissipation[IM1], dissipation[IM1 + 1], dissipation[IM1 + 2]),
            energy: dissipation[IEN],
            field: DVec3::ZERO,
        };
        let hydro = 0.5 * (fl + fr - diss);
        if !hydro.is_finite() {
            return LlfSolver.solve(eos, left, right, metric, dir);
        }

        let (lm_l, lp_l) = left.wave_speeds(metric, dir);
        let (lm_r, lp_r) = right.wave_speeds(metric, dir);
        let max_speed = lambda_max.max(lm_l.abs()).max(lp_l.abs()).max(lm_r.abs()).max(lp_r.abs());
        RiemannFlux::new(hydro, max_speed)
    }
}
