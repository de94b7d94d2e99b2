// relhydro\crates\rh_physics\src/numerics/reconstruction/plm.rs

//! 分段线性重构（MUSCL）
//!
//! 单元斜率由左右差分经限制器给出，界面值 `q_i ± Δ/2`。

use rh_config::SlopeLimiterKind;

use super::Reconstructor;

/// 受限斜率
///
/// `dl = q_i - q_{i-1}`，`dr = q_{i+1} - q_i`。左右差分异号时返回零。
#[inline]
pub fn limited_slope(limiter: SlopeLimiterKind, dl: f64, dr: f64) -> f64 {
    if dl * dr <= 0.0 {
        return 0.0;
    }
    match limiter {
        SlopeLimiterKind::Minmod => {
            if dl.abs() < dr.abs() {
                dl
            } else {
                dr
            }
        }
        SlopeLimiterKind::VanLeer => 2.0 * dl * dr / (dl + dr),
        SlopeLimiterKind::Mc => {
            let mag = (2.0 * dl.abs()).min(2.0 * dr.abs()).min(0.5 * (dl + dr).abs());
            mag.copysign(dl)
        }
    }
}

/// PLM 重构器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Plm {
    limiter: SlopeLimiterKind,
}

impl Plm {
    /// 指定限制器
    pub fn new(limiter: SlopeLimiterKind) -> Self {
        Self { limiter }
    }

    /// 限制器
    pub fn limiter(&self) -> SlopeLimiterKind {
        self.limiter
    }
}

impl Reconstructor for Plm {
    fn name(&self) -> &'static str {
        "plm"
    }

    fn ghost_width(&self) -> usize {
        2
    }

    #[inline]
    fn reconstruct_line(&self, q: &[f64], il: usize, iu: usize, ql: &mut [f64], qr: &mut [f64]) {
        for i in il..=iu {
            let slope = limited_slope(self.limiter, q[i] - q[i - 1], q[i + 1] - q[i]);
            ql[i + 1] = q[i] + 0.5 * slope;
            qr[i] = q[i] - 0.5 * slope;
        }
    }
}
