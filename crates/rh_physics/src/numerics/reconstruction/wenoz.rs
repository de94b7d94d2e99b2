// relhydro\crates\rh_physics\src/numerics/reconstruction/wenoz.rs

//! 五阶 WENO-Z 重构（Borges et al. 2008）
//!
//! 三个三点子模板的凸组合，非线性权重
//! `α_k = d_k (1 + τ_5 / (β_k + ε))`，`τ_5 = |β_0 - β_2|`，
//! 理想权重 `d = (0.1, 0.6, 0.3)`。面 `i-1/2` 的值由镜像模板得到。

use super::Reconstructor;

/// WENO-Z 重构器
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WenoZ {
    /// 光滑指示子正则化量
    pub epsilon: f64,
}

impl Default for WenoZ {
    fn default() -> Self {
        Self { epsilon: 1.0e-40 }
    }
}

impl WenoZ {
    /// 由 `(q_{i-2}, …, q_{i+2})` 给出面 `i+1/2` 的左态
    #[inline]
    fn plus_face(&self, q: [f64; 5]) -> f64 {
        let [qm2, qm1, q0, qp1, qp2] = q;
        const C13_12: f64 = 13.0 / 12.0;

        let beta0 = C13_12 * (qm2 - 2.0 * qm1 + q0).powi(2) + 0.25 * (qm2 - 4.0 * qm1 + 3.0 * q0).powi(2);
        let beta1 = C13_12 * (qm1 - 2.0 * q0 + qp1).powi(2) + 0.25 * (qm1 - qp1).powi(2);
        let beta2 = C13_12 * (q0 - 2.0 * qp1 + qp2).powi(2) + 0.25 * (3.0 * q0 - 4.0 * qp1 + qp2).powi(2);
        let tau5 = (beta0 - beta2).abs();

        let a0 = 0.1 * (1.0 + tau5 / (beta0 + self.epsilon));
        let a1 = 0.6 * (1.0 + tau5 / (beta1 + self.epsilon));
        let a2 = 0.3 * (1.0 + tau5 / (beta2 + self.epsilon));
        let inv = 1.0 / (a0 + a1 + a2);

        let p0 = (2.0 * qm2 - 7.0 * qm1 + 11.0 * q0) / 6.0;
        let p1 = (-qm1 + 5.0 * q0 + 2.0 * qp1) / 6.0;
        let p2 = (2.0 * q0 + 5.0 * qp1 - qp2) / 6.0;

        (a0 * p0 + a1 * p1 + a2 * p2) * inv
    }
}

impl Reconstructor for WenoZ {
    fn name(&self) -> &'static str {
        "wenoz"
    }

    fn ghost_width(&self) -> usize {
        3
    }

    #[inline]
    fn reconstruct_line(&self, q: &[f64], il: usize, iu: usize, ql: &mut [f64], qr: &mut [f64]) {
        for i in il..=iu {
            let (qm2, qm1, q0, qp1, qp2) = (q[i - 2], q[i - 1], q[i], q[i + 1], q[i + 2]);
            ql[i + 1] = self.plus_face([qm2, qm1, q0, qp1, qp2]);
            qr[i] = self.plus_face([qp2, qp1, q0, qm1, qm2]);
        }
    }
}
