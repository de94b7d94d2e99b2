// relhydro\crates\rh_physics\src/eos/mod.rs

//! 状态方程策略
//!
//! 所有状态方程以数密度 `n = ρ / m_b`、温度 `T` 与成分向量 `Y` 为自变量，
//! 能量密度 `e = n m_b (1 + ε)` 包含静质量。
//!
//! | 类型 | 冷部分 | 热部分 | 绝热 |
//! |------|--------|--------|------|
//! | [`IdealGas`] | 无 | `P = nT` | 是 |
//! | [`PiecewisePolytrope`] | `P = K_i ρ^Γ_i` | `P = nT` (Γ_th) | 是 |
//! | [`TabulatedEos`] | 表 | 表 | 是 |
//! | [`Isothermal`] | `P = ρ c²` | 无 | 否 |
//!
//! 状态方程对象在更新期间只读，被所有并行通道共享；
//! 方法不分配内存、不 panic。参数校验只在构造时进行。

mod ideal_gas;
mod isothermal;
mod polytrope;
mod tabulated;

pub use ideal_gas::IdealGas;
pub use isothermal::Isothermal;
pub use polytrope::{PiecewisePolytrope, MAX_PIECES};
pub use tabulated::{EosTable, TabulatedEos};

use rh_config::{EosKind, FloorConfig, HydroConfig};
use thiserror::Error;

/// 状态方程构造错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EosError {
    /// 参数无效
    #[error("状态方程参数无效 '{name}' = {value}: {reason}")]
    InvalidParameter {
        /// 参数名
        name: &'static str,
        /// 参数值
        value: f64,
        /// 原因
        reason: &'static str,
    },

    /// 分段数超限
    #[error("分段多方段数 {npieces} 超出上限 {max}")]
    TooManyPieces {
        /// 请求的段数
        npieces: usize,
        /// 上限
        max: usize,
    },

    /// 表格形状错误
    #[error("状态方程表无效: {0}")]
    Table(String),

    /// 缺少参数
    #[error("缺少状态方程参数: {0}")]
    Missing(&'static str),
}

/// 底值与上限
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EosFloors {
    /// 密度底值（静质量密度）
    pub density: f64,
    /// 温度底值
    pub temperature: f64,
    /// 大气阈值倍数
    pub threshold: f64,
    /// 静质量密度上限
    pub max_density: f64,
}

impl Default for EosFloors {
    fn default() -> Self {
        Self::from_config(&FloorConfig::default())
    }
}

impl EosFloors {
    /// 从底值配置构造
    pub fn from_config(cfg: &FloorConfig) -> Self {
        Self {
            density: cfg.density,
            temperature: cfg.temperature,
            threshold: cfg.threshold,
            max_density: cfg.max_density,
        }
    }

    /// 校验
    pub fn validate(&self) -> Result<(), EosError> {
        if !(self.density > 0.0) {
            return Err(EosError::InvalidParameter {
                name: "floors.density",
                value: self.density,
                reason: "必须为正",
            });
        }
        if !(self.temperature >= 0.0) {
            return Err(EosError::InvalidParameter {
                name: "floors.temperature",
                value: self.temperature,
                reason: "不能为负",
            });
        }
        if !(self.threshold >= 1.0) {
            return Err(EosError::InvalidParameter {
                name: "floors.threshold",
                value: self.threshold,
                reason: "必须 >= 1",
            });
        }
        Ok(())
    }
}

/// 状态方程 trait
///
/// 所有方法都是纯函数，可在并行内核中调用。
pub trait EquationOfState: Send + Sync {
    /// 名称
    fn name(&self) -> &'static str;

    /// 重子质量 m_b
    fn baryon_mass(&self) -> f64;

    /// 底值
    fn floors(&self) -> &EosFloors;

    /// 是否绝热（存在独立的能量方程）
    fn is_adiabatic(&self) -> bool {
        true
    }

    /// 压强 P(n, T, Y)
    fn pressure(&self, n: f64, t: f64, y: &[f64]) -> f64;

    /// 总能量密度 e(n, T, Y)
    fn energy(&self, n: f64, t: f64, y: &[f64]) -> f64;

    /// 由压强反求温度
    fn temperature_from_pressure(&self, n: f64, p: f64, y: &[f64]) -> f64;

    /// 由能量密度反求温度
    fn temperature_from_energy(&self, n: f64, e: f64, y: &[f64]) -> f64;

    /// 相对论声速 c_s
    fn sound_speed(&self, n: f64, t: f64, y: &[f64]) -> f64;

    /// 固定 n 时的 ∂P/∂e
    fn dpde(&self, n: f64, t: f64, y: &[f64]) -> f64;

    /// 比焓下界 h_min（用于根区间 [0, 1/h_min]）
    fn min_enthalpy(&self) -> f64;

    /// 温度有效范围
    fn temperature_limits(&self) -> (f64, f64);

    /// 比焓 h = (e + P) / (n m_b)
    #[inline]
    fn enthalpy(&self, n: f64, t: f64, y: &[f64]) -> f64 {
        (self.energy(n, t, y) + self.pressure(n, t, y)) / (n * self.baryon_mass())
    }

    /// 比内能 ε
    #[inline]
    fn specific_energy(&self, n: f64, t: f64, y: &[f64]) -> f64 {
        self.energy(n, t, y) / (n * self.baryon_mass()) - 1.0
    }

    /// 给定 n 时比内能的有效范围
    #[inline]
    fn specific_energy_limits(&self, n: f64, y: &[f64]) -> (f64, f64) {
        let (t_min, t_max) = self.temperature_limits();
        let lo = self.specific_energy(n, t_min, y);
        let hi = if t_max.is_finite() { self.specific_energy(n, t_max, y) } else { f64::INFINITY };
        (lo, hi)
    }

    /// 数密度上限
    #[inline]
    fn max_number_density(&self) -> f64 {
        self.floors().max_density / self.baryon_mass()
    }

    /// 底值状态（密度底值、温度底值）对应的压强
    #[inline]
    fn floor_pressure(&self, y: &[f64]) -> f64 {
        let f = self.floors();
        self.pressure(f.density / self.baryon_mass(), f.temperature, y)
    }
}

/// 状态方程封闭集合
///
/// 网格块持有 `AnyEos`，热循环中通过 `match` 分发而非虚调用。
#[derive(Debug, Clone)]
pub enum AnyEos {
    /// 理想气体
    IdealGas(IdealGas),
    /// 分段多方
    Polytrope(PiecewisePolytrope),
    /// 表格
    Tabulated(TabulatedEos),
    /// 等温
    Isothermal(Isothermal),
}

macro_rules! dispatch {
    ($self:ident, $eos:ident => $body:expr) => {
        match $self {
            AnyEos::IdealGas($eos) => $body,
            AnyEos::Polytrope($eos) => $body,
            AnyEos::Tabulated($eos) => $body,
            AnyEos::Isothermal($eos) => $body,
        }
    };
}

impl EquationOfState for AnyEos {
    fn name(&self) -> &'static str {
        dispatch!(self, e => e.name())
    }

    #[inline]
    fn baryon_mass(&self) -> f64 {
        dispatch!(self, e => e.baryon_mass())
    }

    #[inline]
    fn floors(&self) -> &EosFloors {
        dispatch!(self, e => e.floors())
    }

    fn is_adiabatic(&self) -> bool {
        dispatch!(self, e => e.is_adiabatic())
    }

    #[inline]
    fn pressure(&self, n: f64, t: f64, y: &[f64]) -> f64 {
        dispatch!(self, e => e.pressure(n, t, y))
    }

    #[inline]
    fn energy(&self, n: f64, t: f64, y: &[f64]) -> f64 {
        dispatch!(self, e => e.energy(n, t, y))
    }

    #[inline]
    fn temperature_from_pressure(&self, n: f64, p: f64, y: &[f64]) -> f64 {
        dispatch!(self, e => e.temperature_from_pressure(n, p, y))
    }

    #[inline]
    fn temperature_from_energy(&self, n: f64, en: f64, y: &[f64]) -> f64 {
        dispatch!(self, e => e.temperature_from_energy(n, en, y))
    }

    #[inline]
    fn sound_speed(&self, n: f64, t: f64, y: &[f64]) -> f64 {
        dispatch!(self, e => e.sound_speed(n, t, y))
    }

    #[inline]
    fn dpde(&self, n: f64, t: f64, y: &[f64]) -> f64 {
        dispatch!(self, e => e.dpde(n, t, y))
    }

    #[inline]
    fn min_enthalpy(&self) -> f64 {
        dispatch!(self, e => e.min_enthalpy())
    }

    #[inline]
    fn temperature_limits(&self) -> (f64, f64) {
        dispatch!(self, e => e.temperature_limits())
    }
}

impl AnyEos {
    /// 从配置构造；表格状态方程的数据由调用方提供
    pub fn from_config(config: &HydroConfig, table: Option<EosTable>) -> Result<Self, EosError> {
        let cfg = &config.eos;
        let floors = EosFloors::from_config(&config.floors);
        let eos = match cfg.kind {
            EosKind::IdealGas => AnyEos::IdealGas(IdealGas::new(cfg.gamma, cfg.baryon_mass, floors)?),
            EosKind::Isothermal => AnyEos::Isothermal(Isothermal::new(
                cfg.isothermal_sound_speed,
                cfg.baryon_mass,
                floors,
            )?),
            EosKind::PiecewisePolytrope => {
                let poly = cfg.polytrope.as_ref().ok_or(EosError::Missing("eos.polytrope"))?;
                AnyEos::Polytrope(PiecewisePolytrope::new(
                    &poly.density_pieces,
                    &poly.gamma_pieces,
                    poly.p0,
                    poly.gamma_thermal,
                    cfg.baryon_mass,
                    floors,
                )?)
            }
            EosKind::Tabulated => {
                let table = table.ok_or(EosError::Missing("eos.table"))?;
                AnyEos::Tabulated(TabulatedEos::new(table, cfg.baryon_mass, floors)?)
            }
        };
        log::debug!("状态方程: {}", eos.name());
        Ok(eos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rh_config::PolytropeConfig;

    #[test]
    fn test_from_config_ideal_gas() {
        let config = HydroConfig::default();
        let eos = AnyEos::from_config(&config, None).unwrap();
        assert_eq!(eos.name(), "ideal_gas");
        assert!(eos.is_adiabatic());
        let p = eos.pressure(2.0, 0.5, &[]);
        assert!((p - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_from_config_tabulated_requires_table() {
        let mut config = HydroConfig::default();
        config.eos.kind = EosKind::Tabulated;
        assert_eq!(AnyEos::from_config(&config, None).unwrap_err(), EosError::Missing("eos.table"));
    }

    #[test]
    fn test_from_config_polytrope_piece_limit() {
        let mut config = HydroConfig::default();
        config.eos.kind = EosKind::PiecewisePolytrope;
        config.eos.polytrope = Some(PolytropeConfig {
            density_pieces: (0..8).map(|i| 1.0 + i as f64).collect(),
            gamma_pieces: vec![2.0; 8],
            p0: 1.0,
            gamma_thermal: 1.5,
        });
        let err = AnyEos::from_config(&config, None).unwrap_err();
        assert_eq!(err, EosError::TooManyPieces { npieces: 8, max: MAX_PIECES });
    }

    #[test]
    fn test_isothermal_not_adiabatic() {
        let mut config = HydroConfig::default();
        config.eos.kind = EosKind::Isothermal;
        let eos = AnyEos::from_config(&config, None).unwrap();
        assert!(!eos.is_adiabatic());
    }

    #[test]
    fn test_floor_pressure() {
        let floors = EosFloors { density: 1e-6, temperature: 1e-4, threshold: 1.0, max_density: 1e10 };
        let eos = IdealGas::new(4.0 / 3.0, 1.0, floors).unwrap();
        assert!((eos.floor_pressure(&[]) - 1e-10).abs() < 1e-24);
    }
}
