// relhydro\crates\rh_physics\src/eos/ideal_gas.rs

//! 理想气体状态方程
//!
//! `P = nT`，`e = n m_b + nT / (Γ - 1)`，声速 `c_s² = Γ P / (ρ h)`。

use super::{EosError, EosFloors, EquationOfState};

/// 理想气体
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealGas {
    gamma: f64,
    mb: f64,
    floors: EosFloors,
}

impl IdealGas {
    /// 创建理想气体状态方程
    pub fn new(gamma: f64, baryon_mass: f64, floors: EosFloors) -> Result<Self, EosError> {
        if !(gamma > 1.0) {
            return Err(EosError::InvalidParameter { name: "gamma", value: gamma, reason: "必须大于 1" });
        }
        if !(baryon_mass > 0.0) {
            return Err(EosError::InvalidParameter {
                name: "baryon_mass",
                value: baryon_mass,
                reason: "必须为正",
            });
        }
        floors.validate()?;
        Ok(Self { gamma, mb: baryon_mass, floors })
    }

    /// 绝热指数
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl EquationOfState for IdealGas {
    fn name(&self) -> &'static str {
        "ideal_gas"
    }

    #[inline]
    fn baryon_mass(&self) -> f64 {
        self.mb
    }

    #[inline]
    fn floors(&self) -> &EosFloors {
        &self.floors
    }

    #[inline]
    fn pressure(&self, n: f64, t: f64, _y: &[f64]) -> f64 {
        n * t
    }

    #[inline]
    fn energy(&self, n: f64, t: f64, _y: &[f64]) -> f64 {
        n * self.mb + n * t / (self.gamma - 1.0)
    }

    #[inline]
    fn temperature_from_pressure(&self, n: f64, p: f64, _y: &[f64]) -> f64 {
        p / n
    }

    #[inline]
    fn temperature_from_energy(&self, n: f64, e: f64, _y: &[f64]) -> f64 {
        (e - n * self.mb) * (self.gamma - 1.0) / n
    }

    #[inline]
    fn sound_speed(&self, n: f64, t: f64, y: &[f64]) -> f64 {
        let p = self.pressure(n, t, y);
        let e = self.energy(n, t, y);
        (self.gamma * p / (e + p)).max(0.0).sqrt()
    }

    #[inline]
    fn dpde(&self, _n: f64, _t: f64, _y: &[f64]) -> f64 {
        self.gamma - 1.0
    }

    #[inline]
    fn min_enthalpy(&self) -> f64 {
        1.0
    }

    #[inline]
    fn temperature_limits(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }
}
