// relhydro\crates\rh_physics\src/schemes/mod.rs

//! 数值格式模块
//!
//! 目前只包含 Riemann 求解器。

pub mod riemann;

pub use riemann::{AnyRiemannSolver, FaceState, HydroVector, RiemannFlux, RiemannSolver};
