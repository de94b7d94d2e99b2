// relhydro\crates\rh_physics\src/primitive/solver.rs

//! 守恒量与原始量之间的逐单元变换
//!
//! # 原始量→守恒量
//!
//! ```text
//! D   = ρ W
//! S_i = (ρ h W² + B²) v_i - (B·v) B_i
//! τ   = ρ h W² - P + B² - [(B·v)² + B²/W²] / 2 - D
//! ```
//!
//! # 守恒量→原始量
//!
//! Kastaun et al. (2021) 的一维主函数，未知量为 μ = 1/(hW)。记
//! `r_i = S_i/D`、`q = τ/D`、`b^i = B^i/√D`、`χ = 1/(1 + μ b²)`：
//!
//! ```text
//! r̄²  = r² χ² + μ χ (1 + χ) (r·b)²
//! q̄   = q - b²/2 - μ² χ² (b² r² - (r·b)²) / 2
//! v̂²  = min(μ² r̄², v_max²),  Ŵ = 1/√(1 - v̂²),  ρ̂ = D/Ŵ
//! ε̂   = Ŵ (q̄ - μ r̄²) + v̂² Ŵ² / (1 + Ŵ)         （截断到状态方程范围）
//! â   = P̂ / (ρ̂ (1 + ε̂))
//! ν̂   = max((1 + â)(1 + ε̂)/Ŵ, (1 + â)(1 + q̄ - μ r̄²))
//! f(μ) = μ - 1/(ν̂ + μ r̄²)
//! ```
//!
//! 根位于 `[0, 1/h_min]`；有磁场时用辅助函数 `μ √(h_min² + r̄²) - 1`
//! 的根收紧上界。根求解为有界 Brent。

use glam::DVec3;

use super::policy::{ErrorPolicy, FloorEvent, ResetFloor};
use super::result::{SolverError, SolverResult};
use super::root::{brent, RootError};
use crate::eos::EquationOfState;
use crate::geometry::Metric;
use crate::state::{Conserved, Primitive};
use crate::types::MAX_SCALARS;

/// 辅助上界相对放宽量
const AUX_BRACKET_SLACK: f64 = 1.0e-10;

/// 挖除区默认状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExcisionParams {
    /// 密度
    pub density: f64,
    /// 压强
    pub pressure: f64,
}

/// 变量求解器
///
/// 持有只读的状态方程与失败策略，可在所有并行通道间共享。
#[derive(Debug, Clone)]
pub struct PrimitiveSolver<E, P = ResetFloor> {
    eos: E,
    policy: P,
    tolerance: f64,
    max_iterations: usize,
}

/// 主函数在某个 μ 处的求值结果
#[derive(Debug, Clone, Copy)]
struct MasterEval {
    f: f64,
    rho: f64,
    eps: f64,
    w: f64,
    chi: f64,
    vsq_raw: f64,
    vsq: f64,
    eps_clamped: bool,
}

/// 主函数的固定参数
struct MasterFunction<'a, E> {
    eos: &'a E,
    d: f64,
    q: f64,
    rsq: f64,
    bsq: f64,
    rbsq: f64,
    vsq_max: f64,
    y: &'a [f64],
}

impl<E: EquationOfState> MasterFunction<'_, E> {
    #[inline]
    fn chi(&self, mu: f64) -> f64 {
        1.0 / (1.0 + mu * self.bsq)
    }

    #[inline]
    fn rbar_sq(&self, mu: f64, chi: f64) -> f64 {
        self.rsq * chi * chi + mu * chi * (1.0 + chi) * self.rbsq
    }

    /// 辅助函数，用于收紧磁化情形的上界
    #[inline]
    fn auxiliary(&self, mu: f64, h0: f64) -> f64 {
        let chi = self.chi(mu);
        mu * (h0 * h0 + self.rbar_sq(mu, chi)).sqrt() - 1.0
    }

    #[inline]
    fn evaluate(&self, mu: f64) -> MasterEval {
        let chi = self.chi(mu);
        let rbarsq = self.rbar_sq(mu, chi);
        let qbar = self.q - 0.5 * self.bsq - 0.5 * mu * mu * chi * chi * (self.bsq * self.rsq - self.rbsq);

        let vsq_raw = mu * mu * rbarsq;
        let vsq = vsq_raw.min(self.vsq_max);
        let w = 1.0 / (1.0 - vsq).sqrt();
        let rho = self.d / w;

        let mb = self.eos.baryon_mass();
        let n = rho / mb;
        let eps_raw = w * (qbar - mu * rbarsq) + vsq * w * w / (1.0 + w);
        let (eps_min, eps_max) = self.eos.specific_energy_limits(n, self.y);
        let eps = eps_raw.max(eps_min).min(eps_max);

        let t = self.eos.temperature_from_energy(n, rho * (1.0 + eps), self.y);
        let p = self.eos.pressure(n, t, self.y);
        let a = p / (rho * (1.0 + eps));

        let nu_a = (1.0 + a) * (1.0 + eps) / w;
        let nu_b = (1.0 + a) * (1.0 + qbar - mu * rbarsq);
        let nu = nu_a.max(nu_b);

        MasterEval {
            f: mu - 1.0 / (nu + mu * rbarsq),
            rho,
            eps,
            w,
            chi,
            vsq_raw,
            vsq,
            eps_clamped: eps != eps_raw,
        }
    }
}

/// 原始量→守恒量（未致密化），只依赖状态方程
///
/// 原始量的温度必须已与压强一致（见 [`PrimitiveSolver::complete`]）。
#[inline]
pub fn conserved_from_primitive<E: EquationOfState>(eos: &E, prim: &Primitive, b: DVec3, metric: &Metric) -> Conserved {
    let u_d = metric.lower(prim.vel);
    let usq = prim.vel.dot(u_d);
    let w = (1.0 + usq).sqrt();
    let v_d = u_d / w;

    let n = prim.rho / eos.baryon_mass();
    let ys = prim.scalars();
    let e = eos.energy(n, prim.temperature, ys);
    let eps = e / prim.rho - 1.0;
    let rho_h = e + prim.pressure;

    let b_d = metric.lower(b);
    let bsq = b.dot(b_d);
    let bv = b.dot(v_d);

    let d = prim.rho * w;
    let s = (rho_h * w * w + bsq) * v_d - bv * b_d;
    // τ = D (W - 1) + D W ε + P (W² - 1) + 磁能，避免 ρhW² - D 的相消
    let tau = d * (usq / (w + 1.0) + w * eps) + prim.pressure * usq + bsq * (1.0 - 0.5 / (w * w)) - 0.5 * bv * bv;

    let mut cons = Conserved::new(d, s, tau);
    cons.nscalars = prim.nscalars;
    for (dy, y) in cons.scalars.iter_mut().zip(ys) {
        *dy = d * y;
    }
    cons
}

impl<E: EquationOfState, P: ErrorPolicy> PrimitiveSolver<E, P> {
    /// 创建求解器
    pub fn new(eos: E, policy: P, tolerance: f64, max_iterations: usize) -> Self {
        Self { eos, policy, tolerance, max_iterations }
    }

    /// 状态方程
    #[inline]
    pub fn eos(&self) -> &E {
        &self.eos
    }

    /// 失败策略
    #[inline]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// 根求解容差
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// 最大迭代次数
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// 由压强补全温度
    #[inline]
    pub fn complete(&self, prim: &mut Primitive) {
        let n = prim.rho / self.eos.baryon_mass();
        prim.temperature = self.eos.temperature_from_pressure(n, prim.pressure, prim.scalars());
    }

    /// 大气状态（密度底值、静止、温度底值），标量取给定值
    pub fn atmosphere(&self, scalars: &[f64]) -> Primitive {
        let floors = self.eos.floors();
        let n = floors.density / self.eos.baryon_mass();
        let mut prim = Primitive::new(floors.density, DVec3::ZERO, 0.0, floors.temperature).with_scalars(scalars);
        prim.pressure = self.eos.pressure(n, floors.temperature, scalars);
        prim
    }

    /// 原始量→守恒量（未致密化）
    ///
    /// `b` 为未致密化的 B^i。输出非有限值时由调用方记录完整状态。
    #[inline]
    pub fn prim_to_con(&self, prim: &Primitive, b: DVec3, metric: &Metric) -> Conserved {
        conserved_from_primitive(&self.eos, prim, b, metric)
    }

    /// 守恒量→原始量（未致密化），按求解器自身的策略
    ///
    /// 底值或截断修正了守恒量时，`cons` 被原地改写并置位相应标志。
    #[inline]
    pub fn con_to_prim(&self, cons: &mut Conserved, b: DVec3, metric: &Metric) -> (Primitive, SolverResult) {
        self.invert(&self.policy, cons, b, metric)
    }

    /// 守恒量→原始量，显式指定策略（探测模式使用 `with_floor_failures` 副本）
    pub fn invert(&self, policy: &P, cons: &mut Conserved, b: DVec3, metric: &Metric) -> (Primitive, SolverResult) {
        let mut result = SolverResult::default();
        let mut ys = [0.0; MAX_SCALARS];

        if !cons.is_finite() || !b.is_finite() {
            return (self.atmosphere(&[]), SolverResult::failure(SolverError::NansInCons));
        }

        let b_d = metric.lower(b);
        let bsq_field = b.dot(b_d);

        let event = policy.conserved_floor(&self.eos, cons, bsq_field);
        if event.applied() {
            result.cons_floor = true;
            // 密度底值之后解出的就是大气原始量
            result.prim_floor = event == FloorEvent::Density;
            if policy.fail_on_floor() {
                result.error = event.as_error();
                return (self.atmosphere(&[]), result);
            }
        }

        let d = cons.d;
        let nscal = cons.nscalars;
        for (y, dy) in ys.iter_mut().zip(cons.scalars()) {
            *y = dy / d;
        }
        let ys = &ys[..nscal];

        let r_d = cons.s / d;
        let r_u = metric.raise(r_d);
        let rsq = r_d.dot(r_u);
        let b_u = b / d.sqrt();
        let bsq = bsq_field / d;
        let rb = r_d.dot(b_u);

        if bsq > policy.max_bsq() {
            return (self.atmosphere(ys), SolverResult { error: SolverError::MagTooBig, ..result });
        }

        let h0 = self.eos.min_enthalpy();
        let w_max = policy.max_lorentz();
        let z0sq = rsq / (h0 * h0);
        let vsq_max = (z0sq / (1.0 + z0sq)).min(1.0 - 1.0 / (w_max * w_max));

        let master = MasterFunction { eos: &self.eos, d, q: cons.tau / d, rsq, bsq, rbsq: rb * rb, vsq_max, y: ys };

        // 根区间
        let mut mu_hi = 1.0 / h0;
        if bsq > 0.0 {
            match brent(|mu| master.auxiliary(mu, h0), 0.0, mu_hi, self.tolerance, self.max_iterations) {
                Ok(root) => mu_hi = (root.x * (1.0 + AUX_BRACKET_SLACK)).min(mu_hi),
                Err(_) => {
                    return (self.atmosphere(ys), SolverResult { error: SolverError::BracketingFailed, ..result });
                }
            }
        }

        let root = match brent(|mu| master.evaluate(mu).f, 0.0, mu_hi, self.tolerance, self.max_iterations) {
            Ok(root) => root,
            Err(err) => {
                let error = match err {
                    RootError::NotBracketed => SolverError::BracketingFailed,
                    RootError::MaxIterations => SolverError::NoSolution,
                };
                return (self.atmosphere(ys), SolverResult { error, ..result });
            }
        };
        result.iterations = root.iterations;

        let mu = root.x;
        let eval = master.evaluate(mu);
        let mb = self.eos.baryon_mass();
        let n = eval.rho / mb;
        if n > self.eos.max_number_density() {
            return (self.atmosphere(ys), SolverResult { error: SolverError::RhoTooBig, ..result });
        }

        let t = self.eos.temperature_from_energy(n, eval.rho * (1.0 + eval.eps), ys);
        let pressure = self.eos.pressure(n, t, ys);

        // v^i = μ χ (r^i + μ (r·b) b^i)
        let mut v_u = mu * eval.chi * (r_u + mu * rb * b_u);
        let velocity_clamped = eval.vsq_raw > eval.vsq;
        if velocity_clamped && eval.vsq_raw > 0.0 {
            v_u *= (eval.vsq / eval.vsq_raw).sqrt();
        }

        let mut prim = Primitive::new(eval.rho, eval.w * v_u, pressure, t).with_scalars(ys);

        let floor = policy.primitive_floor(&self.eos, &mut prim);
        if floor.applied() {
            result.prim_floor = true;
            if policy.fail_on_floor() {
                result.error = floor.as_error();
                return (prim, result);
            }
        }

        if result.prim_floor || eval.eps_clamped || velocity_clamped {
            *cons = self.prim_to_con(&prim, b, metric);
            result.cons_adjusted = true;
        }

        (prim, result)
    }

    /// 挖除区：直接给定原始量并重写守恒量，不调用迭代求解
    pub fn excise(&self, cons: &mut Conserved, b: DVec3, metric: &Metric, params: &ExcisionParams) -> Primitive {
        let mut ys = [0.0; MAX_SCALARS];
        let nscal = cons.nscalars;
        if cons.d > 0.0 && cons.d.is_finite() {
            for (y, dy) in ys.iter_mut().zip(cons.scalars()) {
                *y = if dy.is_finite() { dy / cons.d } else { 0.0 };
            }
        }
        let mut prim = Primitive::new(params.density, DVec3::ZERO, params.pressure, 0.0).with_scalars(&ys[..nscal]);
        self.complete(&mut prim);
        let b = if b.is_finite() { b } else { DVec3::ZERO };
        *cons = self.prim_to_con(&prim, b, metric);
        prim
    }
}
