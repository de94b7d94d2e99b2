// relhydro\crates\rh_physics\src/eos/tabulated.rs

//! 表格状态方程
//!
//! 表在 `(log10 n, log10 T)` 的均匀网格上给出 `log10 P`、比内能 `ε`
//! 与 `c_s²`，查询时双线性插值。由能量或压强反求温度使用有界二分，
//! 依赖 `ε`、`P` 随温度单调递增。成分向量被忽略。
//!
//! 表的生成不在本 crate 范围内，调用方构造 [`EosTable`] 后传入。

use super::{EosError, EosFloors, EquationOfState};

/// 二分迭代次数上限
const BISECTION_ITERATIONS: usize = 64;

/// 均匀间距判定容差
const SPACING_TOLERANCE: f64 = 1.0e-8;

/// 原始表数据，二维数组按 `[in * nt + it]` 存放
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EosTable {
    /// log10 数密度轴（均匀递增）
    pub log_n: Vec<f64>,
    /// log10 温度轴（均匀递增）
    pub log_t: Vec<f64>,
    /// log10 压强
    pub log_p: Vec<f64>,
    /// 比内能 ε
    pub eps: Vec<f64>,
    /// 声速平方
    pub cs2: Vec<f64>,
}

impl EosTable {
    /// 用函数 `f(n, T) -> (P, ε, c_s²)` 在均匀对数网格上采样
    pub fn sample<F>(log_n: (f64, f64, usize), log_t: (f64, f64, usize), mut f: F) -> Self
    where
        F: FnMut(f64, f64) -> (f64, f64, f64),
    {
        let axis = |(lo, hi, count): (f64, f64, usize)| -> Vec<f64> {
            let step = if count > 1 { (hi - lo) / (count - 1) as f64 } else { 0.0 };
            (0..count).map(|i| lo + step * i as f64).collect()
        };
        let ln = axis(log_n);
        let lt = axis(log_t);
        let mut table = Self { log_n: ln.clone(), log_t: lt.clone(), ..Self::default() };
        for &x in &ln {
            for &y in &lt {
                let (p, eps, cs2) = f(10f64.powf(x), 10f64.powf(y));
                table.log_p.push(p.log10());
                table.eps.push(eps);
                table.cs2.push(cs2);
            }
        }
        table
    }
}

/// 表格状态方程
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedEos {
    table: EosTable,
    nn: usize,
    nt: usize,
    dln: f64,
    dlt: f64,
    h_min: f64,
    mb: f64,
    floors: EosFloors,
}

impl TabulatedEos {
    /// 校验表格并构造
    pub fn new(table: EosTable, baryon_mass: f64, floors: EosFloors) -> Result<Self, EosError> {
        let nn = table.log_n.len();
        let nt = table.log_t.len();
        if nn < 2 || nt < 2 {
            return Err(EosError::Table(format!("每个轴至少需要 2 个点, 实际 {nn}×{nt}")));
        }
        for (name, data) in [("log_p", &table.log_p), ("eps", &table.eps), ("cs2", &table.cs2)] {
            if data.len() != nn * nt {
                return Err(EosError::Table(format!("{name} 长度 {} 与 {nn}×{nt} 不符", data.len())));
            }
            if data.iter().any(|x| !x.is_finite()) {
                return Err(EosError::Table(format!("{name} 含非有限值")));
            }
        }
        let dln = uniform_spacing(&table.log_n).ok_or_else(|| EosError::Table("log_n 轴非均匀".into()))?;
        let dlt = uniform_spacing(&table.log_t).ok_or_else(|| EosError::Table("log_t 轴非均匀".into()))?;
        if !(baryon_mass > 0.0) {
            return Err(EosError::InvalidParameter {
                name: "baryon_mass",
                value: baryon_mass,
                reason: "必须为正",
            });
        }
        floors.validate()?;

        let eps_min = table.eps.iter().copied().fold(f64::INFINITY, f64::min);
        let h_min = 1.0 + eps_min;
        if !(h_min > 0.0) {
            return Err(EosError::Table(format!("最小比焓下界 {h_min} 非正")));
        }

        Ok(Self { table, nn, nt, dln, dlt, h_min, mb: baryon_mass, floors })
    }

    /// 表格覆盖的数密度范围
    pub fn density_range(&self) -> (f64, f64) {
        (10f64.powf(self.table.log_n[0]), 10f64.powf(self.table.log_n[self.nn - 1]))
    }

    /// 插值权重 (in, it, wn, wt)
    #[inline]
    fn locate(&self, n: f64, t: f64) -> (usize, usize, f64, f64) {
        let (ln0, lt0) = (self.table.log_n[0], self.table.log_t[0]);
        let xn = ((n.max(f64::MIN_POSITIVE).log10() - ln0) / self.dln).clamp(0.0, (self.nn - 1) as f64);
        let xt = ((t.max(f64::MIN_POSITIVE).log10() - lt0) / self.dlt).clamp(0.0, (self.nt - 1) as f64);
        let i = (xn.floor() as usize).min(self.nn - 2);
        let j = (xt.floor() as usize).min(self.nt - 2);
        (i, j, xn - i as f64, xt - j as f64)
    }

    #[inline]
    fn interp(&self, data: &[f64], n: f64, t: f64) -> f64 {
        let (i, j, wn, wt) = self.locate(n, t);
        let at = |a: usize, b: usize| data[a * self.nt + b];
        (1.0 - wn) * ((1.0 - wt) * at(i, j) + wt * at(i, j + 1))
            + wn * ((1.0 - wt) * at(i + 1, j) + wt * at(i + 1, j + 1))
    }

    #[inline]
    fn eps(&self, n: f64, t: f64) -> f64 {
        self.interp(&self.table.eps, n, t)
    }

    /// 在 log T 上二分求解 `g(T) = target`，`g` 单调递增
    #[inline]
    fn invert_temperature<G: Fn(f64) -> f64>(&self, g: G, target: f64) -> f64 {
        let mut lo = self.table.log_t[0];
        let mut hi = self.table.log_t[self.nt - 1];
        if target <= g(10f64.powf(lo)) {
            return 10f64.powf(lo);
        }
        if target >= g(10f64.powf(hi)) {
            return 10f64.powf(hi);
        }
        for _ in 0..BISECTION_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            if g(10f64.powf(mid)) < target {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        10f64.powf(0.5 * (lo + hi))
    }
}

fn uniform_spacing(axis: &[f64]) -> Option<f64> {
    let step = axis[1] - axis[0];
    if !(step > 0.0) {
        return None;
    }
    let uniform = axis
        .windows(2)
        .all(|w| ((w[1] - w[0]) - step).abs() <= SPACING_TOLERANCE * step.abs().max(1.0));
    uniform.then_some(step)
}

impl EquationOfState for TabulatedEos {
    fn name(&self) -> &'static str {
        "tabulated"
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
        10f64.powf(self.interp(&self.table.log_p, n, t))
    }

    #[inline]
    fn energy(&self, n: f64, t: f64, _y: &[f64]) -> f64 {
        n * self.mb * (1.0 + self.eps(n, t))
    }

    fn temperature_from_pressure(&self, n: f64, p: f64, y: &[f64]) -> f64 {
        self.invert_temperature(|t| self.pressure(n, t, y), p)
    }

    fn temperature_from_energy(&self, n: f64, e: f64, _y: &[f64]) -> f64 {
        let target = e / (n * self.mb) - 1.0;
        self.invert_temperature(|t| self.eps(n, t), target)
    }

    #[inline]
    fn sound_speed(&self, n: f64, t: f64, _y: &[f64]) -> f64 {
        self.interp(&self.table.cs2, n, t).clamp(0.0, 1.0).sqrt()
    }

    fn dpde(&self, n: f64, t: f64, y: &[f64]) -> f64 {
        let (t_min, t_max) = self.temperature_limits();
        let factor = 10f64.powf(0.25 * self.dlt);
        let t_lo = (t / factor).max(t_min);
        let t_hi = (t * factor).min(t_max);
        let de = self.energy(n, t_hi, y) - self.energy(n, t_lo, y);
        if de.abs() <= f64::MIN_POSITIVE {
            return 0.0;
        }
        (self.pressure(n, t_hi, y) - self.pressure(n, t_lo, y)) / de
    }

    #[inline]
    fn min_enthalpy(&self) -> f64 {
        self.h_min
    }

    #[inline]
    fn temperature_limits(&self) -> (f64, f64) {
        (10f64.powf(self.table.log_t[0]), 10f64.powf(self.table.log_t[self.nt - 1]))
    }

    #[inline]
    fn max_number_density(&self) -> f64 {
        (self.floors.max_density / self.mb).min(self.density_range().1)
    }
}
