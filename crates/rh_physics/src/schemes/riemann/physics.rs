// relhydro\crates\rh_physics\src/schemes/riemann/physics.rs

//! 界面态的物理通量与特征速度
//!
//! 3+1 Valencia 形式，方向 `d` 的物理通量（乘以 √γ）：
//!
//! ```text
//! ṽ^d   = α v^d - β^d
//! F_D   = D ṽ^d
//! F_S_j = S_j ṽ^d + α P_tot δ^d_j - α (B_j/W² + (B·v) v_j) B^d
//! F_τ   = τ ṽ^d + α (P_tot v^d - (B·v) B^d)
//! F_B^j = B^j ṽ^d - B^d ṽ^j
//! ```
//!
//! 其中 `P_tot = P + b²/2`，`b² = B²/W² + (B·v)²`。

use glam::DVec3;
use rh_foundation::Direction;

use super::traits::HydroVector;
use crate::eos::EquationOfState;
use crate::geometry::Metric;
use crate::primitive::conserved_from_primitive;
use crate::state::{Conserved, Primitive};

/// 界面一侧的完整状态
#[derive(Debug, Clone, Copy)]
pub struct FaceState {
    /// 原始量（温度已补全）
    pub prim: Primitive,
    /// 未致密化守恒量
    pub cons: Conserved,
    /// 未致密化 B^i
    pub b: DVec3,
    /// 三速度 v^i
    pub v: DVec3,
    /// 协变三速度 v_i
    pub v_d: DVec3,
    /// v² = v^i v_i
    pub vsq: f64,
    /// Lorentz 因子
    pub w: f64,
    /// ρh = e + P
    pub rho_h: f64,
    /// 声速平方
    pub cs2: f64,
    /// 共动磁场强度 b²
    pub bsq: f64,
    /// B^i v_i
    pub bv: f64,
    /// B_i
    pub b_d: DVec3,
}

impl FaceState {
    /// 由重构得到的原始量构造；温度由压强补全
    #[inline]
    pub fn new<E: EquationOfState>(eos: &E, mut prim: Primitive, b: DVec3, metric: &Metric) -> Self {
        let n = prim.rho / eos.baryon_mass();
        prim.temperature = eos.temperature_from_pressure(n, prim.pressure, prim.scalars());

        let u_d = metric.lower(prim.vel);
        let usq = prim.vel.dot(u_d);
        let w = (1.0 + usq).sqrt();
        let v = prim.vel / w;
        let v_d = u_d / w;
        let vsq = usq / (w * w);

        let ys = prim.scalars();
        let rho_h = eos.energy(n, prim.temperature, ys) + prim.pressure;
        let cs = eos.sound_speed(n, prim.temperature, ys);

        let b_d = metric.lower(b);
        let bv = b.dot(v_d);
        let bsq = b.dot(b_d) / (w * w) + bv * bv;

        let cons = conserved_from_primitive(eos, &prim, b, metric);

        Self { prim, cons, b, v, v_d, vsq, w, rho_h, cs2: cs * cs, bsq, bv, b_d }
    }

    /// 总压 P + b²/2
    #[inline]
    pub fn total_pressure(&self) -> f64 {
        self.prim.pressure + 0.5 * self.bsq
    }

    /// 输运速度 ṽ^d = α v^d - β^d
    #[inline]
    pub fn transport_velocity(&self, metric: &Metric, dir: Direction) -> f64 {
        let d = dir.index();
        metric.alpha * self.v[d] - metric.beta[d]
    }

    /// 致密化守恒量向量
    #[inline]
    pub fn conserved_vector(&self, metric: &Metric) -> HydroVector {
        metric.sqrt_det
            * HydroVector { mass: self.cons.d, momentum: self.cons.s, energy: self.cons.tau, field: self.b }
    }

    /// 致密化物理通量
    #[inline]
    pub fn flux(&self, metric: &Metric, dir: Direction) -> HydroVector {
        let d = dir.index();
        let alpha = metric.alpha;
        let vt = alpha * self.v - metric.beta;
        let vtd = vt[d];
        let ptot = self.total_pressure();
        let bd = self.b[d];

        let mut momentum = self.cons.s * vtd - alpha * bd * (self.b_d / (self.w * self.w) + self.bv * self.v_d);
        momentum[d] += alpha * ptot;
        let energy = self.cons.tau * vtd + alpha * (ptot * self.v[d] - self.bv * bd);
        let mut field = self.b * vtd - bd * vt;
        field[d] = 0.0;

        metric.sqrt_det * HydroVector { mass: self.cons.d * vtd, momentum, energy, field }
    }

    /// 特征速度平方：纯流体为声速，带磁场为快磁声速
    #[inline]
    pub fn signal_speed_sq(&self) -> f64 {
        if self.bsq > 0.0 {
            let va2 = self.bsq / (self.bsq + self.rho_h);
            self.cs2 + va2 - self.cs2 * va2
        } else {
            self.cs2
        }
    }

    /// 方向 `d` 的左右特征速度 (λ-, λ+)
    #[inline]
    pub fn wave_speeds(&self, metric: &Metric, dir: Direction) -> (f64, f64) {
        wave_speeds(self.signal_speed_sq(), self.v, self.vsq, metric, dir)
    }
}

/// 3+1 特征速度
///
/// ```text
/// λ± = α [v^d (1 - c²) ± √(c² (1 - v²) (γ^dd (1 - v² c²) - (v^d)² (1 - c²)))] / (1 - v² c²) - β^d
/// ```
#[inline]
pub fn wave_speeds(c2: f64, v: DVec3, vsq: f64, metric: &Metric, dir: Direction) -> (f64, f64) {
    let d = dir.index();
    let vd = v[d];
    let guu = metric.g_uu.component(d, d);
    let denom = 1.0 - vsq * c2;
    let dis = (c2 * (1.0 - vsq) * (guu * denom - vd * vd * (1.0 - c2))).max(0.0);
    let root = dis.sqrt();
    let lm = metric.alpha * (vd * (1.0 - c2) - root) / denom - metric.beta[d];
    let lp = metric.alpha * (vd * (1.0 - c2) + root) / denom - metric.beta[d];
    (lm, lp)
}
