// relhydro\crates\rh_physics\src/geometry.rs

//! 3+1 度规与几何提供者
//!
//! 每个单元的度规包 [`Metric`] 包含空间度规 γ_ij（6 个独立分量）、
//! 逆度规 γ^ij、行列式、lapse α 与 shift β^i。更新期间只读。
//!
//! [`GeometryProvider`] 是外部几何模块的接口；本 crate 提供平直时空
//! [`Minkowski`] 与逐单元存储的 [`MetricField`]。

use glam::DVec3;
use rh_foundation::float::all_finite;

/// 对称 3×3 张量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymTensor3 {
    /// xx 分量
    pub xx: f64,
    /// xy 分量
    pub xy: f64,
    /// xz 分量
    pub xz: f64,
    /// yy 分量
    pub yy: f64,
    /// yz 分量
    pub yz: f64,
    /// zz 分量
    pub zz: f64,
}

impl SymTensor3 {
    /// 单位张量
    pub const IDENTITY: Self = Self { xx: 1.0, xy: 0.0, xz: 0.0, yy: 1.0, yz: 0.0, zz: 1.0 };

    /// 对角张量
    pub const fn diagonal(xx: f64, yy: f64, zz: f64) -> Self {
        Self { xx, xy: 0.0, xz: 0.0, yy, yz: 0.0, zz }
    }

    /// 行列式
    #[inline]
    pub fn determinant(&self) -> f64 {
        self.xx * (self.yy * self.zz - self.yz * self.yz)
            - self.xy * (self.xy * self.zz - self.yz * self.xz)
            + self.xz * (self.xy * self.yz - self.yy * self.xz)
    }

    /// 逆张量（调用方提供行列式）
    #[inline]
    pub fn inverse(&self, det: f64) -> Self {
        let inv = 1.0 / det;
        Self {
            xx: (self.yy * self.zz - self.yz * self.yz) * inv,
            xy: (self.xz * self.yz - self.xy * self.zz) * inv,
            xz: (self.xy * self.yz - self.xz * self.yy) * inv,
            yy: (self.xx * self.zz - self.xz * self.xz) * inv,
            yz: (self.xy * self.xz - self.xx * self.yz) * inv,
            zz: (self.xx * self.yy - self.xy * self.xy) * inv,
        }
    }

    /// 张量乘向量 T_ab v^b
    #[inline]
    pub fn contract(&self, v: DVec3) -> DVec3 {
        DVec3::new(
            self.xx * v.x + self.xy * v.y + self.xz * v.z,
            self.xy * v.x + self.yy * v.y + self.yz * v.z,
            self.xz * v.x + self.yz * v.y + self.zz * v.z,
        )
    }

    /// 按下标读取分量
    #[inline]
    pub fn component(&self, a: usize, b: usize) -> f64 {
        match (a.min(b), a.max(b)) {
            (0, 0) => self.xx,
            (0, 1) => self.xy,
            (0, 2) => self.xz,
            (1, 1) => self.yy,
            (1, 2) => self.yz,
            _ => self.zz,
        }
    }

    /// 逐分量算术平均
    #[inline]
    pub fn midpoint(a: &Self, b: &Self) -> Self {
        Self {
            xx: 0.5 * (a.xx + b.xx),
            xy: 0.5 * (a.xy + b.xy),
            xz: 0.5 * (a.xz + b.xz),
            yy: 0.5 * (a.yy + b.yy),
            yz: 0.5 * (a.yz + b.yz),
            zz: 0.5 * (a.zz + b.zz),
        }
    }

    fn is_finite(&self) -> bool {
        all_finite(&[self.xx, self.xy, self.xz, self.yy, self.yz, self.zz])
    }
}

/// 单元度规包
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metric {
    /// 空间度规 γ_ij
    pub g_dd: SymTensor3,
    /// 逆空间度规 γ^ij
    pub g_uu: SymTensor3,
    /// det γ
    pub det: f64,
    /// √det γ（致密化因子）
    pub sqrt_det: f64,
    /// lapse α
    pub alpha: f64,
    /// shift β^i
    pub beta: DVec3,
}

impl Metric {
    /// 由 γ_ij、α、β^i 构造，计算逆度规与行列式
    pub fn new(g_dd: SymTensor3, alpha: f64, beta: DVec3) -> Self {
        let det = g_dd.determinant();
        Self { g_dd, g_uu: g_dd.inverse(det), det, sqrt_det: det.sqrt(), alpha, beta }
    }

    /// 平直时空
    pub fn minkowski() -> Self {
        Self {
            g_dd: SymTensor3::IDENTITY,
            g_uu: SymTensor3::IDENTITY,
            det: 1.0,
            sqrt_det: 1.0,
            alpha: 1.0,
            beta: DVec3::ZERO,
        }
    }

    /// 界面度规：相邻两单元度规的平均
    pub fn face_average(a: &Metric, b: &Metric) -> Self {
        Self::new(
            SymTensor3::midpoint(&a.g_dd, &b.g_dd),
            0.5 * (a.alpha + b.alpha),
            0.5 * (a.beta + b.beta),
        )
    }

    /// 是否为有效的类空度规
    pub fn is_valid(&self) -> bool {
        self.det > 0.0
            && self.alpha > 0.0
            && self.det.is_finite()
            && self.alpha.is_finite()
            && self.beta.is_finite()
            && self.g_dd.is_finite()
    }

    /// 是否与平直时空一致
    pub fn is_flat(&self) -> bool {
        self.g_dd == SymTensor3::IDENTITY && self.alpha == 1.0 && self.beta == DVec3::ZERO
    }

    /// 降指标 v_i = γ_ij v^j
    #[inline]
    pub fn lower(&self, v: DVec3) -> DVec3 {
        self.g_dd.contract(v)
    }

    /// 升指标 v^i = γ^ij v_j
    #[inline]
    pub fn raise(&self, v: DVec3) -> DVec3 {
        self.g_uu.contract(v)
    }
}

/// 几何提供者
///
/// 下标 `(k, j, i)` 为包含幽灵层的块内局部下标。
pub trait GeometryProvider: Send + Sync {
    /// 单元度规
    fn metric(&self, k: usize, j: usize, i: usize) -> Metric;

    /// 是否处处平直（HLLC/Roe 的前提）
    fn is_flat(&self) -> bool {
        false
    }

    /// 单元是否位于挖除区
    fn is_excised(&self, _k: usize, _j: usize, _i: usize) -> bool {
        false
    }

    /// 提供者覆盖的块尺寸 `(n3, n2, n1)`；解析提供者返回 `None`
    fn dims(&self) -> Option<[usize; 3]> {
        None
    }
}

/// 平直时空
#[derive(Debug, Clone, Copy, Default)]
pub struct Minkowski;

impl GeometryProvider for Minkowski {
    #[inline]
    fn metric(&self, _k: usize, _j: usize, _i: usize) -> Metric {
        Metric::minkowski()
    }

    fn is_flat(&self) -> bool {
        true
    }
}

/// 逐单元存储的度规场（含可选挖除掩码）
#[derive(Debug, Clone)]
pub struct MetricField {
    dims: [usize; 3],
    metrics: Vec<Metric>,
    excised: Vec<bool>,
    flat: bool,
}

impl MetricField {
    /// 由闭包 `f(k, j, i)` 生成，`dims = (n3, n2, n1)`
    pub fn from_fn<F>(dims: [usize; 3], mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> Metric,
    {
        let n = dims[0] * dims[1] * dims[2];
        let mut metrics = Vec::with_capacity(n);
        for k in 0..dims[0] {
            for j in 0..dims[1] {
                for i in 0..dims[2] {
                    metrics.push(f(k, j, i));
                }
            }
        }
        let flat = metrics.iter().all(Metric::is_flat);
        Self { dims, metrics, excised: vec![false; n], flat }
    }

    /// 设置挖除掩码
    pub fn with_excision<F>(mut self, mut mask: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> bool,
    {
        for k in 0..self.dims[0] {
            for j in 0..self.dims[1] {
                for i in 0..self.dims[2] {
                    let idx = self.index(k, j, i);
                    self.excised[idx] = mask(k, j, i);
                }
            }
        }
        self
    }

    /// 挖除单元个数
    pub fn excised_count(&self) -> usize {
        self.excised.iter().filter(|&&e| e).count()
    }

    #[inline]
    fn index(&self, k: usize, j: usize, i: usize) -> usize {
        (k * self.dims[1] + j) * self.dims[2] + i
    }
}

impl GeometryProvider for MetricField {
    #[inline]
    fn metric(&self, k: usize, j: usize, i: usize) -> Metric {
        self.metrics[self.index(k, j, i)]
    }

    fn is_flat(&self) -> bool {
        self.flat
    }

    #[inline]
    fn is_excised(&self, k: usize, j: usize, i: usize) -> bool {
        self.excised[self.index(k, j, i)]
    }

    fn dims(&self) -> Option<[usize; 3]> {
        Some(self.dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skewed() -> SymTensor3 {
        SymTensor3 { xx: 2.0, xy: 0.3, xz: -0.1, yy: 1.5, yz: 0.2, zz: 1.2 }
    }

    #[test]
    fn test_inverse_is_inverse() {
        let g = skewed();
        let det = g.determinant();
        let inv = g.inverse(det);
        for e in [DVec3::X, DVec3::Y, DVec3::Z] {
            let back = inv.contract(g.contract(e));
            assert!((back - e).length() < 1e-13);
        }
    }

    #[test]
    fn test_minkowski_consistent() {
        let m = Metric::new(SymTensor3::IDENTITY, 1.0, DVec3::ZERO);
        assert_eq!(m, Metric::minkowski());
        assert!(m.is_flat());
        assert!(m.is_valid());
    }

    #[test]
    fn test_face_average() {
        let a = Metric::new(SymTensor3::diagonal(1.0, 1.0, 1.0), 1.0, DVec3::ZERO);
        let b = Metric::new(SymTensor3::diagonal(4.0, 4.0, 4.0), 0.5, DVec3::new(0.2, 0.0, 0.0));
        let f = Metric::face_average(&a, &b);
        assert_eq!(f.g_dd.xx, 2.5);
        assert_eq!(f.alpha, 0.75);
        assert!((f.sqrt_det - 2.5f64.powf(1.5)).abs() < 1e-12);
    }

    #[test]
    fn test_metric_field_flat_detection() {
        let flat = MetricField::from_fn([1, 1, 4], |_, _, _| Metric::minkowski());
        assert!(flat.is_flat());

        let curved = MetricField::from_fn([1, 1, 4], |_, _, i| {
            Metric::new(SymTensor3::diagonal(1.0 + i as f64, 1.0, 1.0), 1.0, DVec3::ZERO)
        })
        .with_excision(|_, _, i| i == 0);
        assert!(!curved.is_flat());
        assert!(curved.is_excised(0, 0, 0));
        assert!(!curved.is_excised(0, 0, 1));
        assert_eq!(curved.excised_count(), 1);
        assert_eq!(curved.metric(0, 0, 2).g_dd.xx, 3.0);
    }
}
