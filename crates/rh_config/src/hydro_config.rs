// relhydro\crates\rh_config\src/hydro_config.rs

//! HydroConfig - 流体更新配置
//!
//! 所有参数使用 serde 默认值，可以只写需要覆盖的字段。
//! `validate` 检查与状态方程实例、几何提供者无关的全部约束；
//! 依赖几何的约束（HLLC/Roe 要求平直时空）由物理层构建器检查。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::kinds::{
    BoundaryKind, EosKind, IntegratorKind, ReconstructionKind, RiemannSolverKind, SlopeLimiterKind,
};

/// 分段多方的最大段数
pub const MAX_POLYTROPE_PIECES: usize = 7;

/// 被动标量的最大个数
pub const MAX_SCALARS: usize = 8;

/// 流体更新配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydroConfig {
    /// 状态方程
    #[serde(default)]
    pub eos: EosConfig,

    /// 底值
    #[serde(default)]
    pub floors: FloorConfig,

    /// 守恒量→原始量求解器
    #[serde(default)]
    pub primitive_solver: PrimitiveSolverConfig,

    /// 重构
    #[serde(default)]
    pub reconstruction: ReconstructionConfig,

    /// Riemann 求解器
    #[serde(default)]
    pub riemann_solver: RiemannSolverKind,

    /// 时间积分器
    #[serde(default)]
    pub integrator: IntegratorKind,

    /// 一阶通量修正
    #[serde(default)]
    pub fofc: bool,

    /// 挖除区
    #[serde(default)]
    pub excision: ExcisionConfig,

    /// 网格块
    #[serde(default)]
    pub mesh: MeshConfig,

    /// CFL 数
    #[serde(default = "default_cfl")]
    pub cfl: f64,

    /// 被动标量个数
    #[serde(default)]
    pub nscalars: usize,

    /// 是否携带磁场
    #[serde(default)]
    pub magnetized: bool,
}

fn default_cfl() -> f64 { 0.4 }

impl Default for HydroConfig {
    fn default() -> Self {
        Self {
            eos: EosConfig::default(),
            floors: FloorConfig::default(),
            primitive_solver: PrimitiveSolverConfig::default(),
            reconstruction: ReconstructionConfig::default(),
            riemann_solver: RiemannSolverKind::default(),
            integrator: IntegratorKind::default(),
            fofc: false,
            excision: ExcisionConfig::default(),
            mesh: MeshConfig::default(),
            cfl: default_cfl(),
            nscalars: 0,
            magnetized: false,
        }
    }
}

/// 状态方程配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EosConfig {
    /// 类型
    #[serde(default)]
    pub kind: EosKind,

    /// 绝热指数（理想气体）
    #[serde(default = "default_gamma")]
    pub gamma: f64,

    /// 重子质量
    #[serde(default = "default_baryon_mass")]
    pub baryon_mass: f64,

    /// 等温声速 c_iso（以光速为单位）
    #[serde(default = "default_iso_sound_speed")]
    pub isothermal_sound_speed: f64,

    /// 分段多方参数
    #[serde(default)]
    pub polytrope: Option<PolytropeConfig>,
}

fn default_gamma() -> f64 { 5.0 / 3.0 }
fn default_baryon_mass() -> f64 { 1.0 }
fn default_iso_sound_speed() -> f64 { 0.1 }

impl Default for EosConfig {
    fn default() -> Self {
        Self {
            kind: EosKind::default(),
            gamma: default_gamma(),
            baryon_mass: default_baryon_mass(),
            isothermal_sound_speed: default_iso_sound_speed(),
            polytrope: None,
        }
    }
}

/// 分段多方参数
///
/// 第 `i` 段适用于 `density_pieces[i] <= ρ < density_pieces[i+1]`，
/// 低于 `density_pieces[0]` 的密度沿用第 0 段。
/// `p0` 为 `density_pieces[0]` 处的冷压强。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolytropeConfig {
    /// 各段下界密度（严格递增）
    pub density_pieces: Vec<f64>,
    /// 各段多方指数
    pub gamma_pieces: Vec<f64>,
    /// 参考压强
    pub p0: f64,
    /// 热部分绝热指数
    #[serde(default = "default_gamma_thermal")]
    pub gamma_thermal: f64,
}

fn default_gamma_thermal() -> f64 { 1.75 }

/// 底值配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorConfig {
    /// 密度底值（静质量密度）
    #[serde(default = "default_density_floor")]
    pub density: f64,

    /// 温度底值
    #[serde(default = "default_temperature_floor")]
    pub temperature: f64,

    /// 大气阈值倍数（>= 1），低于 `density * threshold` 的单元按大气处理
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// 最大 Lorentz 因子
    #[serde(default = "default_max_lorentz")]
    pub max_lorentz: f64,

    /// 允许的最大 B²/D
    #[serde(default = "default_max_bsq")]
    pub max_bsq: f64,

    /// 允许的最大静质量密度
    #[serde(default = "default_max_density")]
    pub max_density: f64,
}

fn default_density_floor() -> f64 { 1.0e-10 }
fn default_temperature_floor() -> f64 { 1.0e-12 }
fn default_threshold() -> f64 { 1.0 }
fn default_max_lorentz() -> f64 { 100.0 }
fn default_max_bsq() -> f64 { 1.0e8 }
fn default_max_density() -> f64 { 1.0e300 }

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            density: default_density_floor(),
            temperature: default_temperature_floor(),
            threshold: default_threshold(),
            max_lorentz: default_max_lorentz(),
            max_bsq: default_max_bsq(),
            max_density: default_max_density(),
        }
    }
}

/// 原始量求解器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveSolverConfig {
    /// 根求解绝对容差
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// 最大迭代次数
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_tolerance() -> f64 { 1.0e-15 }
fn default_max_iterations() -> usize { 60 }

impl Default for PrimitiveSolverConfig {
    fn default() -> Self {
        Self { tolerance: default_tolerance(), max_iterations: default_max_iterations() }
    }
}

/// 重构配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReconstructionConfig {
    /// 格式
    #[serde(default)]
    pub kind: ReconstructionKind,

    /// PLM 限制器
    #[serde(default)]
    pub limiter: SlopeLimiterKind,
}

/// 挖除区配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcisionConfig {
    /// 是否启用
    #[serde(default)]
    pub enabled: bool,

    /// 挖除区密度
    #[serde(default = "default_excision_density")]
    pub density: f64,

    /// 挖除区压强
    #[serde(default = "default_excision_pressure")]
    pub pressure: f64,
}

fn default_excision_density() -> f64 { 1.0e-8 }
fn default_excision_pressure() -> f64 { 1.0e-10 }

impl Default for ExcisionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            density: default_excision_density(),
            pressure: default_excision_pressure(),
        }
    }
}

/// 网格块配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    /// 各方向活动单元数 `[nx1, nx2, nx3]`
    #[serde(default = "default_nx")]
    pub nx: [usize; 3],

    /// 幽灵单元层数
    #[serde(default = "default_nghost")]
    pub nghost: usize,

    /// 下边界坐标
    #[serde(default = "default_x_min")]
    pub x_min: [f64; 3],

    /// 上边界坐标
    #[serde(default = "default_x_max")]
    pub x_max: [f64; 3],

    /// 各方向边界类型
    #[serde(default)]
    pub boundaries: [BoundaryKind; 3],
}

fn default_nx() -> [usize; 3] { [64, 1, 1] }
fn default_nghost() -> usize { 3 }
fn default_x_min() -> [f64; 3] { [-0.5, -0.5, -0.5] }
fn default_x_max() -> [f64; 3] { [0.5, 0.5, 0.5] }

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            nx: default_nx(),
            nghost: default_nghost(),
            x_min: default_x_min(),
            x_max: default_x_max(),
            boundaries: [BoundaryKind::default(); 3],
        }
    }
}

impl MeshConfig {
    /// 活动维数
    pub fn dimensionality(&self) -> usize {
        if self.nx[2] > 1 {
            3
        } else if self.nx[1] > 1 {
            2
        } else {
            1
        }
    }
}

impl HydroConfig {
    /// 从 JSON 字符串加载并校验
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: HydroConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// 保存到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path.as_ref(), content).map_err(ConfigError::Io)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cfl > 0.0 && self.cfl <= 1.0) {
            return Err(ConfigError::invalid("cfl", self.cfl, "CFL 必须在 (0, 1] 范围内"));
        }
        if self.nscalars > MAX_SCALARS {
            return Err(ConfigError::invalid(
                "nscalars",
                self.nscalars,
                &format!("被动标量个数不能超过 {MAX_SCALARS}"),
            ));
        }

        self.validate_eos()?;
        self.validate_floors()?;
        self.validate_mesh()?;

        if self.primitive_solver.max_iterations == 0 {
            return Err(ConfigError::invalid("primitive_solver.max_iterations", 0, "必须为正"));
        }
        if !(self.primitive_solver.tolerance > 0.0) {
            return Err(ConfigError::invalid(
                "primitive_solver.tolerance",
                self.primitive_solver.tolerance,
                "必须为正",
            ));
        }

        // 求解器与物理的组合约束
        let rsolver = self.riemann_solver;
        if rsolver.requires_adiabatic() && !self.eos.kind.is_adiabatic() {
            return Err(ConfigError::Incompatible(format!(
                "{} 求解器需要绝热状态方程, 当前为 {}",
                rsolver, self.eos.kind
            )));
        }
        if self.magnetized && !rsolver.supports_magnetic() {
            return Err(ConfigError::Incompatible(format!("{rsolver} 求解器不支持磁场")));
        }

        if self.excision.enabled && !(self.excision.density > 0.0 && self.excision.pressure > 0.0) {
            return Err(ConfigError::invalid(
                "excision",
                format!("({}, {})", self.excision.density, self.excision.pressure),
                "挖除区密度与压强必须为正",
            ));
        }

        Ok(())
    }

    fn validate_eos(&self) -> Result<(), ConfigError> {
        let eos = &self.eos;
        if !(eos.baryon_mass > 0.0) {
            return Err(ConfigError::invalid("eos.baryon_mass", eos.baryon_mass, "必须为正"));
        }
        match eos.kind {
            EosKind::IdealGas => {
                if !(eos.gamma > 1.0) {
                    return Err(ConfigError::invalid("eos.gamma", eos.gamma, "绝热指数必须大于 1"));
                }
            }
            EosKind::Isothermal => {
                let cs = eos.isothermal_sound_speed;
                if !(cs > 0.0 && cs < 1.0) {
                    return Err(ConfigError::invalid(
                        "eos.isothermal_sound_speed",
                        cs,
                        "等温声速必须在 (0, 1) 范围内",
                    ));
                }
            }
            EosKind::PiecewisePolytrope => {
                let poly = eos
                    .polytrope
                    .as_ref()
                    .ok_or_else(|| ConfigError::Missing("eos.polytrope".into()))?;
                poly.validate()?;
            }
            EosKind::Tabulated => {}
        }
        Ok(())
    }

    fn validate_floors(&self) -> Result<(), ConfigError> {
        let f = &self.floors;
        if !(f.density > 0.0) {
            return Err(ConfigError::invalid("floors.density", f.density, "必须为正"));
        }
        if !(f.temperature >= 0.0) {
            return Err(ConfigError::invalid("floors.temperature", f.temperature, "不能为负"));
        }
        if !(f.threshold >= 1.0) {
            return Err(ConfigError::invalid("floors.threshold", f.threshold, "阈值倍数必须 >= 1"));
        }
        if !(f.max_lorentz > 1.0) {
            return Err(ConfigError::invalid("floors.max_lorentz", f.max_lorentz, "必须大于 1"));
        }
        if !(f.max_bsq > 0.0) {
            return Err(ConfigError::invalid("floors.max_bsq", f.max_bsq, "必须为正"));
        }
        if !(f.max_density > f.density) {
            return Err(ConfigError::invalid("floors.max_density", f.max_density, "必须大于密度底值"));
        }
        Ok(())
    }

    fn validate_mesh(&self) -> Result<(), ConfigError> {
        let mesh = &self.mesh;
        if mesh.nx.iter().any(|&n| n == 0) {
            return Err(ConfigError::invalid("mesh.nx", format!("{:?}", mesh.nx), "单元数必须为正"));
        }
        if mesh.nx[1] == 1 && mesh.nx[2] > 1 {
            return Err(ConfigError::invalid(
                "mesh.nx",
                format!("{:?}", mesh.nx),
                "nx2 为 1 时 nx3 也必须为 1",
            ));
        }
        for d in 0..3 {
            if !(mesh.x_max[d] > mesh.x_min[d]) {
                return Err(ConfigError::invalid(
                    "mesh.x_max",
                    format!("{:?}", mesh.x_max),
                    "上边界必须大于下边界",
                ));
            }
        }
        let required = self.reconstruction.kind.required_ghosts();
        if mesh.nghost < required {
            return Err(ConfigError::invalid(
                "mesh.nghost",
                mesh.nghost,
                &format!("{} 重构至少需要 {} 层幽灵单元", self.reconstruction.kind, required),
            ));
        }
        // 周期边界从对侧活动区拷贝 nghost 层
        let dim = mesh.dimensionality();
        if let Some(d) = (0..dim).find(|&d| mesh.nx[d] < mesh.nghost) {
            return Err(ConfigError::invalid(
                "mesh.nx",
                format!("{:?}", mesh.nx),
                &format!("活动方向 x{} 的单元数不能少于幽灵层数 {}", d + 1, mesh.nghost),
            ));
        }
        Ok(())
    }
}

impl PolytropeConfig {
    /// 段数
    pub fn npieces(&self) -> usize {
        self.density_pieces.len()
    }

    /// 验证分段参数
    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.npieces();
        if n == 0 || n > MAX_POLYTROPE_PIECES {
            return Err(ConfigError::invalid(
                "eos.polytrope.density_pieces",
                n,
                &format!("段数必须在 1..={MAX_POLYTROPE_PIECES} 之间"),
            ));
        }
        if self.gamma_pieces.len() != n {
            return Err(ConfigError::invalid(
                "eos.polytrope.gamma_pieces",
                self.gamma_pieces.len(),
                &format!("长度必须与 density_pieces 一致 ({n})"),
            ));
        }
        if !(self.density_pieces[0] > 0.0) {
            return Err(ConfigError::invalid(
                "eos.polytrope.density_pieces",
                self.density_pieces[0],
                "第一段密度必须为正",
            ));
        }
        if self.density_pieces.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(ConfigError::invalid(
                "eos.polytrope.density_pieces",
                format!("{:?}", self.density_pieces),
                "密度分段必须严格递增",
            ));
        }
        if self.gamma_pieces.iter().any(|&g| !(g > 1.0)) {
            return Err(ConfigError::invalid(
                "eos.polytrope.gamma_pieces",
                format!("{:?}", self.gamma_pieces),
                "多方指数必须大于 1",
            ));
        }
        if !(self.p0 > 0.0) {
            return Err(ConfigError::invalid("eos.polytrope.p0", self.p0, "必须为正"));
        }
        if !(self.gamma_thermal > 1.0) {
            return Err(ConfigError::invalid("eos.polytrope.gamma_thermal", self.gamma_thermal, "必须大于 1"));
        }
        Ok(())
    }
}
