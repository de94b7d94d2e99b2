// relhydro\crates\rh_physics\src/schemes/riemann/hllc.rs

//! HLLC 求解器（Mignone & Bodo 2005）
//!
//! 仅适用于平直时空、绝热、无磁场。接触波速 λ* 是
//!
//! ```text
//! F^E_hll λ*² - (E_hll + F^m_hll) λ* + m_hll = 0
//! ```
//!
//! 的较小根（E = τ + D，m 为法向动量），`p* = -F^E_hll λ* + F^m_hll`。
//! 中间态：
//!
//! ```text
//! D*   = D (λ - v) / (λ - λ*)
//! S_t* = S_t (λ - v) / (λ - λ*)
//! S_n* = (S_n (λ - v) + p* - p) / (λ - λ*)
//! E*   = (E (λ - v) + p* λ* - p v) / (λ - λ*)
//! ```

use rh_foundation::Direction;

use super::physics::FaceState;
use super::traits::{HydroVector, RiemannFlux, RiemannSolver};
use crate::eos::EquationOfState;
use crate::geometry::Metric;

/// 波速区间宽度下限
const MIN_FAN_WIDTH: f64 = 1.0e-14;

/// HLLC 求解器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HllcSolver;

impl HllcSolver {
    /// 接触波速与中间压强
    #[inline]
    fn contact(u_hll: &HydroVector, f_hll: &HydroVector, d: usize) -> (f64, f64) {
        let e = u_hll.energy + u_hll.mass;
        let m = u_hll.momentum[d];
        let fe = f_hll.energy + f_hll.mass;
        let fm = f_hll.momentum[d];
        let b = e + fm;

        let lambda = if fe.abs() > 1.0e-12 * b.abs() {
            let disc = (b * b - 4.0 * fe * m).max(0.0);
            (b - disc.sqrt()) / (2.0 * fe)
        } else {
            m / b
        };
        (lambda, -fe * lambda + fm)
    }

    /// 一侧的中间态（已致密化）
    #[inline]
    fn star_state(face: &FaceState, metric: &Metric, d: usize, lambda: f64, lambda_star: f64, p_star: f64) -> HydroVector {
        let vn = face.v[d];
        let p = face.prim.pressure;
        let cons = &face.cons;
        let e = cons.tau + cons.d;
        let inv = 1.0 / (lambda - lambda_star);

        let mass = cons.d * (lambda - vn) * inv;
        let mut momentum = cons.s * ((lambda - vn) * inv);
        momentum[d] = (cons.s[d] * (lambda - vn) + p_star - p) * inv;
        let energy = (e * (lambda - vn) + p_star * lambda_star - p * vn) * inv;

        metric.sqrt_det * HydroVector { mass, momentum, energy: energy - mass, field: face.b }
    }
}

impl RiemannSolver for HllcSolver {
    fn name(&self) -> &'static str {
        "hllc"
    }

    fn solve<E: EquationOfState>(
        &self,
        _eos: &E,
        left: &FaceState,
        right: &FaceState,
        metric: &Metric,
        dir: Direction,
    ) -> RiemannFlux {
        let d = dir.index();
        let (lm_l, lp_l) = left.wave_speeds(metric, dir);
        let (lm_r, lp_r) = right.wave_speeds(metric, dir);
        let sl = lm_l.min(lm_r);
        let sr = lp_l.max(lp_r);
        let max_speed = sl.abs().max(sr.abs());

        let fl = left.flux(metric, dir);
        let fr = right.flux(metric, dir);
        if sl >= 0.0 {
            return RiemannFlux::new(fl, max_speed);
        }
        if sr <= 0.0 {
            return RiemannFlux::new(fr, max_speed);
        }

        let ul = left.conserved_vector(metric);
        let ur = right.conserved_vector(metric);
        let width = sr - sl;
        if width < MIN_FAN_WIDTH {
            return RiemannFlux::new(0.5 * (fl + fr), max_speed);
        }
        let inv = 1.0 / width;
        let u_hll = inv * (sr * ur - sl * ul - (fr - fl));
        let f_hll = inv * (sr * fl - sl * fr + (sl * sr) * (ur - ul));

        // 平直度规下 √γ = 1，中间态直接使用 HLL 平均
        let (lambda_star, p_star) = Self::contact(&u_hll, &f_hll, d);

        let hydro = if lambda_star >= 0.0 {
            let star = Self::star_state(left, metric, d, sl, lambda_star, p_star);
            fl + sl * (star - ul)
        } else {
            let star = Self::star_state(right, metric, d, sr, lambda_star, p_star);
            fr + sr * (star - ur)
        };
        RiemannFlux::new(hydro, max_speed)
    }
}
