// relhydro\crates\rh_physics\src/eos/isothermal.rs

//! 等温状态方程
//!
//! `P = ρ c²`，温度恒为 `T = m_b c²`，比内能恒为零。
//! 压强与能量无关，因此不是绝热状态方程，不能与 HLLC/Roe 组合。

use super::{EosError, EosFloors, EquationOfState};

/// 等温状态方程
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Isothermal {
    cs2: f64,
    mb: f64,
    floors: EosFloors,
}

impl Isothermal {
    /// 创建等温状态方程，`sound_speed` 以光速为单位
    pub fn new(sound_speed: f64, baryon_mass: f64, floors: EosFloors) -> Result<Self, EosError> {
        if !(sound_speed > 0.0 && sound_speed < 1.0) {
            return Err(EosError::InvalidParameter {
                name: "isothermal_sound_speed",
                value: sound_speed,
                reason: "必须在 (0, 1) 范围内",
            });
        }
        if !(baryon_mass > 0.0) {
            return Err(EosError::InvalidParameter {
                name: "baryon_mass",
                value: baryon_mass,
                reason: "必须为正",
            });
        }
        floors.validate()?;
        Ok(Self { cs2: sound_speed * sound_speed, mb: baryon_mass, floors })
    }

    /// 固定温度
    #[inline]
    pub fn temperature(&self) -> f64 {
        self.mb * self.cs2
    }
}

impl EquationOfState for Isothermal {
    fn name(&self) -> &'static str {
        "isothermal"
    }

    fn is_adiabatic(&self) -> bool {
        false
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
    fn pressure(&self, n: f64, _t: f64, _y: &[f64]) -> f64 {
        n * self.mb * self.cs2
    }

    #[inline]
    fn energy(&self, n: f64, _t: f64, _y: &[f64]) -> f64 {
        n * self.mb
    }

    #[inline]
    fn temperature_from_pressure(&self, _n: f64, _p: f64, _y: &[f64]) -> f64 {
        self.temperature()
    }

    #[inline]
    fn temperature_from_energy(&self, _n: f64, _e: f64, _y: &[f64]) -> f64 {
        self.temperature()
    }

    #[inline]
    fn sound_speed(&self, _n: f64, _t: f64, _y: &[f64]) -> f64 {
        (self.cs2 / (1.0 + self.cs2)).sqrt()
    }

    #[inline]
    fn dpde(&self, _n: f64, _t: f64, _y: &[f64]) -> f64 {
        0.0
    }

    #[inline]
    fn min_enthalpy(&self) -> f64 {
        1.0 + self.cs2
    }

    #[inline]
    fn temperature_limits(&self) -> (f64, f64) {
        let t = self.temperature();
        (t, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressure_independent_of_temperature() {
        let eos = Isothermal::new(0.1, 1.0, EosFloors::default()).unwrap();
        assert_eq!(eos.pressure(2.0, 0.0, &[]), eos.pressure(2.0, 100.0, &[]));
        assert!((eos.pressure(2.0, 0.0, &[]) - 0.02).abs() < 1e-16);
        assert!((eos.enthalpy(2.0, 0.0, &[]) - 1.01).abs() < 1e-14);
    }

    #[test]
    fn test_specific_energy_range_is_point() {
        let eos = Isothermal::new(0.2, 1.0, EosFloors::default()).unwrap();
        let (lo, hi) = eos.specific_energy_limits(1.0, &[]);
        assert_eq!(lo, 0.0);
        assert_eq!(hi, 0.0);
    }

    #[test]
    fn test_rejects_superluminal_sound_speed() {
        assert!(Isothermal::new(1.0, 1.0, EosFloors::default()).is_err());
    }
}
