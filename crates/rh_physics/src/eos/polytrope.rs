// relhydro\crates\rh_physics\src/eos/polytrope.rs

//! 分段多方状态方程（冷部分 + 理想气体热部分）
//!
//! 第 `i` 段适用于 `ρ_i <= ρ < ρ_{i+1}`，低于 `ρ_0` 沿用第 0 段：
//!
//! ```text
//! P_cold = K_i ρ^Γ_i
//! ε_cold = a_i + K_i ρ^(Γ_i - 1) / (Γ_i - 1)
//! P      = P_cold + nT
//! e      = ρ (1 + ε_cold) + nT / (Γ_th - 1)
//! ```
//!
//! `K_0` 由 `ρ_0` 处的参考压强 `P_0` 确定，其余 `K_i`、`a_i` 由压强与
//! 比内能在分段点处连续确定（`a_0 = 0`）。

use super::{EosError, EosFloors, EquationOfState};

/// 最大段数
pub const MAX_PIECES: usize = 7;

/// 分段多方
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiecewisePolytrope {
    npieces: usize,
    rho: [f64; MAX_PIECES],
    gamma: [f64; MAX_PIECES],
    k: [f64; MAX_PIECES],
    a: [f64; MAX_PIECES],
    gamma_th: f64,
    mb: f64,
    floors: EosFloors,
}

impl PiecewisePolytrope {
    /// 创建分段多方状态方程
    pub fn new(
        densities: &[f64],
        gammas: &[f64],
        p0: f64,
        gamma_thermal: f64,
        baryon_mass: f64,
        floors: EosFloors,
    ) -> Result<Self, EosError> {
        let npieces = densities.len();
        if npieces > MAX_PIECES {
            return Err(EosError::TooManyPieces { npieces, max: MAX_PIECES });
        }
        if npieces == 0 {
            return Err(EosError::Missing("density_pieces"));
        }
        if gammas.len() != npieces {
            return Err(EosError::InvalidParameter {
                name: "gamma_pieces",
                value: gammas.len() as f64,
                reason: "长度必须与 density_pieces 一致",
            });
        }
        if !(densities[0] > 0.0) {
            return Err(EosError::InvalidParameter {
                name: "density_pieces",
                value: densities[0],
                reason: "第一段密度必须为正",
            });
        }
        if let Some(w) = densities.windows(2).find(|w| !(w[1] > w[0])) {
            return Err(EosError::InvalidParameter {
                name: "density_pieces",
                value: w[1],
                reason: "必须严格递增",
            });
        }
        if let Some(&g) = gammas.iter().find(|&&g| !(g > 1.0)) {
            return Err(EosError::InvalidParameter { name: "gamma_pieces", value: g, reason: "必须大于 1" });
        }
        if !(p0 > 0.0) {
            return Err(EosError::InvalidParameter { name: "p0", value: p0, reason: "必须为正" });
        }
        if !(gamma_thermal > 1.0) {
            return Err(EosError::InvalidParameter {
                name: "gamma_thermal",
                value: gamma_thermal,
                reason: "必须大于 1",
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

        let mut eos = Self {
            npieces,
            rho: [0.0; MAX_PIECES],
            gamma: [0.0; MAX_PIECES],
            k: [0.0; MAX_PIECES],
            a: [0.0; MAX_PIECES],
            gamma_th: gamma_thermal,
            mb: baryon_mass,
            floors,
        };
        eos.rho[..npieces].copy_from_slice(densities);
        eos.gamma[..npieces].copy_from_slice(gammas);

        eos.k[0] = p0 / densities[0].powf(gammas[0]);
        for i in 1..npieces {
            let rho_i = densities[i];
            eos.k[i] = eos.k[i - 1] * rho_i.powf(gammas[i - 1] - gammas[i]);
            eos.a[i] = eos.a[i - 1]
                + eos.k[i - 1] * rho_i.powf(gammas[i - 1] - 1.0) / (gammas[i - 1] - 1.0)
                - eos.k[i] * rho_i.powf(gammas[i] - 1.0) / (gammas[i] - 1.0);
        }
        Ok(eos)
    }

    /// 段数
    pub fn npieces(&self) -> usize {
        self.npieces
    }

    /// 密度所在的段
    #[inline]
    pub fn piece(&self, rho: f64) -> usize {
        let mut p = 0;
        for i in 1..self.npieces {
            if rho >= self.rho[i] {
                p = i;
            }
        }
        p
    }

    /// 冷压强
    #[inline]
    pub fn cold_pressure(&self, rho: f64) -> f64 {
        let p = self.piece(rho);
        self.k[p] * rho.powf(self.gamma[p])
    }

    /// 冷比内能
    #[inline]
    pub fn cold_energy(&self, rho: f64) -> f64 {
        let p = self.piece(rho);
        self.a[p] + self.k[p] * rho.powf(self.gamma[p] - 1.0) / (self.gamma[p] - 1.0)
    }
}

impl EquationOfState for PiecewisePolytrope {
    fn name(&self) -> &'static str {
        "piecewise_polytrope"
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
        self.cold_pressure(n * self.mb) + n * t
    }

    #[inline]
    fn energy(&self, n: f64, t: f64, _y: &[f64]) -> f64 {
        let rho = n * self.mb;
        rho * (1.0 + self.cold_energy(rho)) + n * t / (self.gamma_th - 1.0)
    }

    #[inline]
    fn temperature_from_pressure(&self, n: f64, p: f64, _y: &[f64]) -> f64 {
        ((p - self.cold_pressure(n * self.mb)) / n).max(0.0)
    }

    #[inline]
    fn temperature_from_energy(&self, n: f64, e: f64, _y: &[f64]) -> f64 {
        let rho = n * self.mb;
        ((e - rho * (1.0 + self.cold_energy(rho))) * (self.gamma_th - 1.0) / n).max(0.0)
    }

    #[inline]
    fn sound_speed(&self, n: f64, t: f64, y: &[f64]) -> f64 {
        let rho = n * self.mb;
        let piece = self.piece(rho);
        let p_cold = self.k[piece] * rho.powf(self.gamma[piece]);
        let p_th = n * t;
        let e = self.energy(n, t, y);
        let cs2 = (self.gamma[piece] * p_cold + self.gamma_th * p_th) / (e + p_cold + p_th);
        cs2.clamp(0.0, 1.0).sqrt()
    }

    #[inline]
    fn dpde(&self, _n: f64, _t: f64, _y: &[f64]) -> f64 {
        self.gamma_th - 1.0
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
