// relhydro\crates\rh_physics\src/block.rs

//! 网格块
//!
//! 矩形活动区加上每个活动方向上固定宽度的幽灵层。块独占自己的
//! 守恒量、原始量、磁场与逐方向通量数组，生命周期为一次模拟。
//!
//! 下标约定（与数组的 `[n3, n2, n1]` 存储一致）：
//!
//! ```text
//! i ∈ [is, ie]   x1 方向活动单元
//! j ∈ [js, je]   x2
//! k ∈ [ks, ke]   x3
//! ```
//!
//! 面数组 `flux[d]` 在方向 `d` 上多一个单元，面 `(k, j, i)` 位于单元
//! `(k, j, i)` 的下侧。

use rh_config::MeshConfig;
use rh_foundation::{CellArray, CellRange, Direction, RhError, RhResult};

use crate::types::{NHYDRO, NMAG};

/// 单个网格块
#[derive(Debug, Clone)]
pub struct MeshBlock {
    /// 各方向活动单元数 `[nx1, nx2, nx3]`
    pub nx: [usize; 3],
    /// 幽灵层宽度
    pub ng: usize,
    /// x1 活动下界
    pub is: usize,
    /// x1 活动上界（含）
    pub ie: usize,
    /// x2 活动下界
    pub js: usize,
    /// x2 活动上界（含）
    pub je: usize,
    /// x3 活动下界
    pub ks: usize,
    /// x3 活动上界（含）
    pub ke: usize,
    /// 含幽灵层的 x1 单元数
    pub n1: usize,
    /// 含幽灵层的 x2 单元数
    pub n2: usize,
    /// 含幽灵层的 x3 单元数
    pub n3: usize,
    /// 活动维数
    pub dim: usize,
    /// 活动区下边界坐标
    pub x_min: [f64; 3],
    /// 网格间距
    pub dx: [f64; 3],
    /// 被动标量个数
    pub nscalars: usize,

    /// 守恒量（当前寄存器）
    pub u0: CellArray,
    /// 守恒量（步初拷贝）
    pub u1: CellArray,
    /// 原始量
    pub w0: CellArray,
    /// 致密化磁场
    pub b0: CellArray,
    /// 磁场步初拷贝
    pub b1: CellArray,
    /// FOFC 试探更新寄存器
    pub u_trial: CellArray,
    /// FOFC 试探磁场
    pub b_trial: CellArray,
    /// 逐方向面通量
    pub flux: [CellArray; 3],
    /// 逐方向感应方程面通量
    pub bflux: [CellArray; 3],
    /// 通量散度
    pub divf: CellArray,
    /// 感应方程通量散度
    pub divb: CellArray,
    /// FOFC 标记（按单元）
    pub fofc: Vec<bool>,
}

impl MeshBlock {
    /// 创建网格块
    ///
    /// 只在 `nx[d] > 1` 的方向上放置幽灵层；x1 始终活动。
    pub fn new(nx: [usize; 3], ng: usize, x_min: [f64; 3], x_max: [f64; 3], nscalars: usize) -> RhResult<Self> {
        if nx.iter().any(|&n| n == 0) {
            return Err(RhError::invalid_input(format!("活动单元数必须为正: {:?}", nx)));
        }
        if ng == 0 {
            return Err(RhError::invalid_input("幽灵层宽度必须为正"));
        }
        for d in 0..3 {
            if x_max[d] <= x_min[d] || x_min[d].is_nan() || x_max[d].is_nan() {
                return Err(RhError::invalid_input(format!("方向 {} 的坐标范围无效: [{}, {}]", d, x_min[d], x_max[d])));
            }
        }

        let active = [true, nx[1] > 1, nx[2] > 1];
        let ghosts = active.map(|a| if a { ng } else { 0 });
        let [n1, n2, n3] = [0, 1, 2].map(|d| nx[d] + 2 * ghosts[d]);
        let dim = if active[2] { 3 } else if active[1] { 2 } else { 1 };
        let dx = [0, 1, 2].map(|d| (x_max[d] - x_min[d]) / nx[d] as f64);

        let nvar = NHYDRO + nscalars;
        let cells = |nv: usize| CellArray::zeros(nv, n3, n2, n1);
        let flux = [
            CellArray::zeros(nvar, n3, n2, n1 + 1),
            CellArray::zeros(nvar, n3, n2 + 1, n1),
            CellArray::zeros(nvar, n3 + 1, n2, n1),
        ];
        let bflux = [
            CellArray::zeros(NMAG, n3, n2, n1 + 1),
            CellArray::zeros(NMAG, n3, n2 + 1, n1),
            CellArray::zeros(NMAG, n3 + 1, n2, n1),
        ];

        Ok(Self {
            nx,
            ng,
            is: ghosts[0],
            ie: ghosts[0] + nx[0] - 1,
            js: ghosts[1],
            je: ghosts[1] + nx[1] - 1,
            ks: ghosts[2],
            ke: ghosts[2] + nx[2] - 1,
            n1,
            n2,
            n3,
            dim,
            x_min,
            dx,
            nscalars,
            u0: cells(nvar),
            u1: cells(nvar),
            w0: cells(nvar),
            b0: cells(NMAG),
            b1: cells(NMAG),
            u_trial: cells(nvar),
            b_trial: cells(NMAG),
            flux,
            bflux,
            divf: cells(nvar),
            divb: cells(NMAG),
            fofc: vec![false; n1 * n2 * n3],
        })
    }

    /// 从网格配置创建
    pub fn from_config(mesh: &MeshConfig, nscalars: usize) -> RhResult<Self> {
        Self::new(mesh.nx, mesh.nghost, mesh.x_min, mesh.x_max, nscalars)
    }

    /// 每单元变量数（流体 + 标量）
    #[inline]
    pub fn nvar(&self) -> usize {
        NHYDRO + self.nscalars
    }

    /// 数组维度 `[n3, n2, n1]`
    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        [self.n3, self.n2, self.n1]
    }

    /// 方向是否活动
    #[inline]
    pub fn is_active(&self, dir: Direction) -> bool {
        match dir {
            Direction::X1 => true,
            Direction::X2 => self.nx[1] > 1,
            Direction::X3 => self.nx[2] > 1,
        }
    }

    /// 活动方向
    pub fn active_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(move |&d| self.is_active(d))
    }

    /// 活动单元范围
    #[inline]
    pub fn active_range(&self) -> CellRange {
        CellRange::new((self.ks, self.ke), (self.js, self.je), (self.is, self.ie))
    }

    /// 含幽灵层的全部单元范围
    #[inline]
    pub fn full_range(&self) -> CellRange {
        CellRange::new((0, self.n3 - 1), (0, self.n2 - 1), (0, self.n1 - 1))
    }

    /// 单元中心坐标 `(x1, x2, x3)`
    #[inline]
    pub fn cell_center(&self, k: usize, j: usize, i: usize) -> [f64; 3] {
        let idx = [i, j, k];
        let start = [self.is, self.js, self.ks];
        [0, 1, 2].map(|d| self.x_min[d] + (idx[d] as f64 - start[d] as f64 + 0.5) * self.dx[d])
    }

    /// 沿方向的相邻单元偏移
    #[inline]
    pub fn offset(dir: Direction) -> (usize, usize, usize) {
        match dir {
            Direction::X1 => (0, 0, 1),
            Direction::X2 => (0, 1, 0),
            Direction::X3 => (1, 0, 0),
        }
    }

    /// 单元线性编号（与 `fofc` 及各单元数组一致）
    #[inline]
    pub fn cell_index(&self, k: usize, j: usize, i: usize) -> usize {
        (k * self.n2 + j) * self.n1 + i
    }

    /// 清除 FOFC 标记
    pub fn clear_fofc(&mut self) {
        self.fofc.iter_mut().for_each(|f| *f = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_dimensional_layout() {
        let block = MeshBlock::new([16, 1, 1], 2, [0.0; 3], [1.0; 3], 1).unwrap();
        assert_eq!(block.dim, 1);
        assert_eq!((block.is, block.ie), (2, 17));
        assert_eq!((block.js, block.je, block.ks, block.ke), (0, 0, 0, 0));
        assert_eq!(block.dims(), [1, 1, 20]);
        assert_eq!(block.flux[0].dims(), [1, 1, 21]);
        assert_eq!(block.u0.nvar(), NHYDRO + 1);
        assert!(!block.is_active(Direction::X2));
    }

    #[test]
    fn test_cell_centers() {
        let block = MeshBlock::new([4, 2, 1], 1, [0.0, -1.0, 0.0], [1.0, 1.0, 1.0], 0).unwrap();
        assert_eq!(block.dim, 2);
        let c = block.cell_center(0, block.js, block.is);
        assert!((c[0] - 0.125).abs() < 1e-15);
        assert!((c[1] + 0.5).abs() < 1e-15);
        // 幽灵单元在活动区之外
        let g = block.cell_center(0, 0, 0);
        assert!(g[0] < 0.0 && g[1] < -1.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(MeshBlock::new([0, 1, 1], 2, [0.0; 3], [1.0; 3], 0).is_err());
        assert!(MeshBlock::new([4, 1, 1], 0, [0.0; 3], [1.0; 3], 0).is_err());
        assert!(MeshBlock::new([4, 1, 1], 2, [1.0; 3], [0.0; 3], 0).is_err());
    }
}
