// relhydro\crates\rh_physics\src/engine/mod.rs

//! 数值引擎
//!
//! - [`flux_pipeline`]: 逐方向重构 + Riemann 求解得到面通量
//! - [`fofc`]: 一阶通量修正
//! - [`update`]: 通量散度与低存储 Runge–Kutta 更新
//! - [`time_integrator`]: SSP-RK 阶段权重
//! - [`timestep`]: CFL 时间步

pub mod flux_pipeline;
pub mod fofc;
pub mod time_integrator;
pub mod timestep;
pub mod update;

pub use flux_pipeline::{FluxPipeline, SweepStats};
pub use fofc::first_order_correction;
pub use time_integrator::{StageWeights, TimeIntegrator};
pub use timestep::new_timestep;
pub use update::{apply_update, compute_divergence, copy_conserved, trial_update};
