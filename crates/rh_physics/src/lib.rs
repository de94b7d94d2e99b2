// relhydro\crates\rh_physics\src/lib.rs

//! 广义相对论（磁）流体的单网格块有限体积更新
//!
//! 模块划分：
//! - 状态方程 (eos)：理想气体、分段多方、表格、等温
//! - 变量求解 (primitive)：守恒量 ↔ 原始量、底值与挖除
//! - 重构 (numerics::reconstruction) 与黎曼求解器 (schemes::riemann)
//! - 引擎 (engine)：通量管线、FOFC、散度与更新、时间步
//! - 任务图 (tasks) 与边界交换 (boundary)
//! - 构建器 (builder) 与多块驱动器 (driver)
//!
//! # 示例
//!
//! ```ignore
//! use rh_config::HydroConfig;
//! use glam::DVec3;
//! use rh_physics::{Driver, HydroBuilder, Minkowski, Primitive};
//!
//! let mut block = HydroBuilder::new(HydroConfig::default()).build_local(Minkowski)?;
//! block.set_primitives(|_| (Primitive::new(1.0, DVec3::ZERO, 1.0, 0.0), DVec3::ZERO));
//! let mut driver = Driver::new(vec![block])?;
//! driver.run(1.0, 100)?;
//! ```

#![warn(missing_docs)]

pub mod block;
pub mod boundary;
pub mod builder;
pub mod diagnostics;
pub mod driver;
pub mod engine;
pub mod eos;
pub mod error;
pub mod geometry;
pub mod numerics;
pub mod primitive;
pub mod schemes;
pub mod state;
pub mod tasks;
pub mod types;

pub use block::MeshBlock;
pub use boundary::{BoundaryExchange, ExchangeField, LocalBoundary};
pub use builder::HydroBuilder;
pub use diagnostics::CycleDiagnostics;
pub use driver::{Driver, DriverContext, DEFAULT_MAX_PASSES};
pub use engine::{FluxPipeline, SweepStats, StageWeights, TimeIntegrator};
pub use eos::{AnyEos, EosError, EosFloors, EosTable, EquationOfState};
pub use error::{DriverError, SetupError};
pub use geometry::{GeometryProvider, Metric, MetricField, Minkowski, SymTensor3};
pub use numerics::reconstruction::{AnyReconstructor, Reconstructor};
pub use primitive::{ConversionStats, ExcisionParams, PrimitiveSolver, ResetFloor, SolverError, SolverResult};
pub use schemes::{AnyRiemannSolver, RiemannFlux, RiemannSolver};
pub use state::{Conserved, Primitive};
pub use tasks::{HydroBlock, HydroTaskIds, TaskId, TaskList, TaskStatus};
