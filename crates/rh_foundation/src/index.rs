// relhydro\crates\rh_foundation\src/index.rs

//! 方向与单元范围
//!
//! 网格块内的单元由 `(k, j, i)` 三元组定位，`i` 变化最快。
//! [`CellRange`] 使用闭区间，与扫描内核的循环边界一致。

use serde::{Deserialize, Serialize};

/// 空间方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// x1 方向（对应 i）
    X1,
    /// x2 方向（对应 j）
    X2,
    /// x3 方向（对应 k）
    X3,
}

impl Direction {
    /// 全部方向，按扫描顺序
    pub const ALL: [Direction; 3] = [Direction::X1, Direction::X2, Direction::X3];

    /// 分量下标（0, 1, 2）
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Direction::X1 => 0,
            Direction::X2 => 1,
            Direction::X3 => 2,
        }
    }

    /// 从分量下标构造
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Direction::X1),
            1 => Some(Direction::X2),
            2 => Some(Direction::X3),
            _ => None,
        }
    }

    /// 两个横向方向（按下标递增）
    pub const fn transverse(self) -> (Direction, Direction) {
        match self {
            Direction::X1 => (Direction::X2, Direction::X3),
            Direction::X2 => (Direction::X1, Direction::X3),
            Direction::X3 => (Direction::X1, Direction::X2),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::X1 => write!(f, "x1"),
            Direction::X2 => write!(f, "x2"),
            Direction::X3 => write!(f, "x3"),
        }
    }
}

/// 单元闭区间范围 `[kl, ku] × [jl, ju] × [il, iu]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    /// k 下界
    pub kl: usize,
    /// k 上界（含）
    pub ku: usize,
    /// j 下界
    pub jl: usize,
    /// j 上界（含）
    pub ju: usize,
    /// i 下界
    pub il: usize,
    /// i 上界（含）
    pub iu: usize,
}

impl CellRange {
    /// 从 `(kl, ku)`, `(jl, ju)`, `(il, iu)` 构造
    pub const fn new(k: (usize, usize), j: (usize, usize), i: (usize, usize)) -> Self {
        Self { kl: k.0, ku: k.1, jl: j.0, ju: j.1, il: i.0, iu: i.1 }
    }

    /// 是否包含单元
    #[inline]
    pub fn contains(&self, k: usize, j: usize, i: usize) -> bool {
        (self.kl..=self.ku).contains(&k)
            && (self.jl..=self.ju).contains(&j)
            && (self.il..=self.iu).contains(&i)
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.ku < self.kl || self.ju < self.jl || self.iu < self.il
    }

    /// 单元个数
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.ku - self.kl + 1) * (self.ju - self.jl + 1) * (self.iu - self.il + 1)
    }

    /// 按 k, j, i 顺序遍历（i 最快）
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, usize)> {
        let r = *self;
        (r.kl..=r.ku).flat_map(move |k| {
            (r.jl..=r.ju).flat_map(move |j| (r.il..=r.iu).map(move |i| (k, j, i)))
        })
    }
}
