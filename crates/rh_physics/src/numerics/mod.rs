// relhydro\crates\rh_physics\src/numerics/mod.rs

//! 数值方法

pub mod reconstruction;
