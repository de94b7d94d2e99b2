// relhydro\crates\rh_physics\src/primitive/mod.rs

//! 守恒量↔原始量变换
//!
//! - [`solver`]: 逐单元内核（无分配、无日志）
//! - [`policy`]: 底值与失败策略
//! - [`batch`]: 逐块并行驱动，负责日志与统计
//! - [`root`]: 有界 Brent 根求解

pub mod batch;
pub mod policy;
pub mod result;
pub mod root;
pub mod solver;

pub use batch::{conserved_to_primitive, primitive_to_conserved, probe_floors, ConversionStats};
pub use policy::{ErrorPolicy, FloorEvent, ResetFloor};
pub use result::{SolverError, SolverResult};
pub use solver::{conserved_from_primitive, ExcisionParams, PrimitiveSolver};
