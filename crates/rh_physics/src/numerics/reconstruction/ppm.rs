// relhydro\crates\rh_physics\src/numerics/reconstruction/ppm.rs

//! 分段抛物重构
//!
//! 两个变体共享四阶界面插值
//! `q_{i-1/2} = 7/12 (q_{i-1} + q_i) - 1/12 (q_{i-2} + q_{i+1})`，
//! 区别在于极值处理：
//!
//! - [`Ppm4`]: CW84，界面值夹在相邻单元之间，单元极值处削平为常数
//! - [`Ppmx`]: Colella–Sekora，用二阶差分比值限制曲率，保留光滑极值

use super::Reconstructor;

/// 四阶界面插值（面 `i-1/2`）
#[inline]
fn interface(qm2: f64, qm1: f64, q0: f64, qp1: f64) -> f64 {
    (7.0 / 12.0) * (qm1 + q0) - (1.0 / 12.0) * (qm2 + qp1)
}

/// CW84 PPM
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ppm4;

impl Ppm4 {
    #[inline]
    fn cell(q: &[f64], i: usize) -> (f64, f64) {
        let qi = q[i];
        let mut qlv = interface(q[i - 2], q[i - 1], qi, q[i + 1]);
        let mut qrv = interface(q[i - 1], qi, q[i + 1], q[i + 2]);
        qlv = qlv.clamp(q[i - 1].min(qi), q[i - 1].max(qi));
        qrv = qrv.clamp(qi.min(q[i + 1]), qi.max(q[i + 1]));

        if (qrv - qi) * (qi - qlv) <= 0.0 {
            return (qi, qi);
        }
        let dq = qrv - qlv;
        let q6 = 6.0 * (qi - 0.5 * (qlv + qrv));
        if dq * q6 > dq * dq {
            qlv = 3.0 * qi - 2.0 * qrv;
        } else if -dq * dq > dq * q6 {
            qrv = 3.0 * qi - 2.0 * qlv;
        }
        (qlv, qrv)
    }
}

impl Reconstructor for Ppm4 {
    fn name(&self) -> &'static str {
        "ppm4"
    }

    fn ghost_width(&self) -> usize {
        3
    }

    #[inline]
    fn reconstruct_line(&self, q: &[f64], il: usize, iu: usize, ql: &mut [f64], qr: &mut [f64]) {
        for i in il..=iu {
            let (qlv, qrv) = Self::cell(q, i);
            qr[i] = qlv;
            ql[i + 1] = qrv;
        }
    }
}

/// Colella–Sekora 保极值 PPM
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ppmx {
    /// 曲率比系数 C
    pub curvature_ratio: f64,
}

impl Default for Ppmx {
    fn default() -> Self {
        Self { curvature_ratio: 1.25 }
    }
}

/// 同号时取模最小者乘以符号，否则为零
#[inline]
fn limit_curvature(reference: f64, others: &[f64]) -> f64 {
    if others.iter().all(|d| d * reference > 0.0) {
        let mag = others.iter().fold(reference.abs(), |m, d| m.min(d.abs()));
        mag.copysign(reference)
    } else {
        0.0
    }
}

impl Ppmx {
    /// 面 `i-1/2` 的界面值，越界时按曲率限制
    #[inline]
    fn face(&self, q: &[f64], i: usize) -> f64 {
        let c = self.curvature_ratio;
        let (qm2, qm1, q0, qp1) = (q[i - 2], q[i - 1], q[i], q[i + 1]);
        let qa = interface(qm2, qm1, q0, qp1);
        if (qa - qm1) * (q0 - qa) >= 0.0 {
            return qa;
        }
        let d2a = 3.0 * (qm1 - 2.0 * qa + q0);
        let d2l = qm2 - 2.0 * qm1 + q0;
        let d2r = qm1 - 2.0 * q0 + qp1;
        let d2lim = limit_curvature(d2a, &[c * d2l, c * d2r]);
        0.5 * (qm1 + q0) - d2lim / 6.0
    }

    #[inline]
    fn cell(&self, q: &[f64], i: usize) -> (f64, f64) {
        let c = self.curvature_ratio;
        let qi = q[i];
        let mut qlv = self.face(q, i);
        let mut qrv = self.face(q, i + 1);

        let dqf_minus = qi - qlv;
        let dqf_plus = qrv - qi;
        let local_extremum = dqf_minus * dqf_plus <= 0.0 || (qi - q[i - 1]) * (q[i + 1] - qi) <= 0.0;

        if local_extremum {
            let d2f = 6.0 * (qlv - 2.0 * qi + qrv);
            let d2c = q[i - 1] - 2.0 * qi + q[i + 1];
            let d2l = q[i - 2] - 2.0 * q[i - 1] + qi;
            let d2r = qi - 2.0 * q[i + 1] + q[i + 2];
            let d2lim = limit_curvature(d2f, &[c * d2l, c * d2r, c * d2c]);
            let ratio = if d2f.abs() > f64::MIN_POSITIVE { d2lim / d2f } else { 0.0 };
            qlv = qi - ratio * dqf_minus;
            qrv = qi + ratio * dqf_plus;
        } else if dqf_minus.abs() >= 2.0 * dqf_plus.abs() {
            qlv = qi - 2.0 * dqf_plus;
        } else if dqf_plus.abs() >= 2.0 * dqf_minus.abs() {
            qrv = qi + 2.0 * dqf_minus;
        }
        (qlv, qrv)
    }
}

impl Reconstructor for Ppmx {
    fn name(&self) -> &'static str {
        "ppmx"
    }

    fn ghost_width(&self) -> usize {
        3
    }

    #[inline]
    fn reconstruct_line(&self, q: &[f64], il: usize, iu: usize, ql: &mut [f64], qr: &mut [f64]) {
        for i in il..=iu {
            let (qlv, qrv) = self.cell(q, i);
            qr[i] = qlv;
            ql[i + 1] = qrv;
        }
    }
}
