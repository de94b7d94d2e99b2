// relhydro\crates\rh_foundation\src/float.rs

//! 浮点辅助函数

/// 切片内所有值是否有限
#[inline]
pub fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|x| x.is_finite())
}

/// 相对 + 绝对容差比较
#[inline]
pub fn approx_eq(a: f64, b: f64, rel: f64, abs: f64) -> bool {
    let diff = (a - b).abs();
    diff <= abs || diff <= rel * a.abs().max(b.abs())
}
