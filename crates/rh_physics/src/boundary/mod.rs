// relhydro\crates\rh_physics\src/boundary/mod.rs

//! 边界交换
//!
//! 任务图通过 [`BoundaryExchange`] 与外部传输层交互。`send`/`receive`
//! 返回 [`TaskStatus`]：尚未到达的数据以 `Incomplete` 表示，由调度器重试，
//! 不视为错误。
//!
//! [`LocalBoundary`] 是单块实现，直接在本块内填充幽灵单元：
//!
//! | 类型 | 下侧幽灵 `s-1-g` 取自 | 上侧幽灵 `e+1+g` 取自 |
//! |------|------|------|
//! | periodic   | `e-g` | `s+g` |
//! | outflow    | `s`   | `e`   |
//! | reflecting | `s+g`（法向分量取反） | `e-g`（法向分量取反） |

use rh_config::BoundaryKind;
use rh_foundation::{CellArray, CellRange, Direction};

use crate::block::MeshBlock;
use crate::tasks::TaskStatus;
use crate::types::{IM1, NVAR_MAX};

/// 交换的场
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeField {
    /// 守恒量（流体 + 标量），法向分量为动量
    Hydro,
    /// 致密化磁场，法向分量为 B
    Magnetic,
}

impl ExchangeField {
    /// 流体块只交换守恒量
    pub const HYDRO_ONLY: &'static [ExchangeField] = &[ExchangeField::Hydro];
    /// 磁化块同时交换磁场
    pub const WITH_MAGNETIC: &'static [ExchangeField] = &[ExchangeField::Hydro, ExchangeField::Magnetic];

    pub(crate) fn slot(self) -> usize {
        match self {
            ExchangeField::Hydro => 0,
            ExchangeField::Magnetic => 1,
        }
    }

    /// 方向 `dir` 的法向分量在单元中的下标
    fn normal_index(self, dir: Direction) -> usize {
        match self {
            ExchangeField::Hydro => IM1 + dir.index(),
            ExchangeField::Magnetic => dir.index(),
        }
    }
}

/// 边界交换 trait
pub trait BoundaryExchange: Send {
    /// 发送活动区边缘数据（前 `nvars` 个变量）
    fn send(&mut self, field: ExchangeField, state: &CellArray, nvars: usize) -> TaskStatus;

    /// 接收数据写入幽灵单元
    fn receive(&mut self, field: ExchangeField, state: &mut CellArray, nvars: usize) -> TaskStatus;
}

/// 单块本地边界
#[derive(Debug, Clone)]
pub struct LocalBoundary {
    kinds: [BoundaryKind; 3],
    active: [bool; 3],
    start: [usize; 3],
    end: [usize; 3],
    ng: usize,
    dims: [usize; 3],
    sent: [bool; 2],
}

impl LocalBoundary {
    /// 按块布局与各方向边界类型创建
    pub fn new(block: &MeshBlock, kinds: [BoundaryKind; 3]) -> Self {
        Self {
            kinds,
            active: Direction::ALL.map(|d| block.is_active(d)),
            start: [block.is, block.js, block.ks],
            end: [block.ie, block.je, block.ke],
            ng: block.ng,
            dims: block.dims(),
            sent: [false; 2],
        }
    }

    /// 边界类型
    pub fn kinds(&self) -> [BoundaryKind; 3] {
        self.kinds
    }

    /// 直接填充全部幽灵单元
    pub fn fill(&self, field: ExchangeField, state: &mut CellArray, nvars: usize) {
        for dir in Direction::ALL {
            if self.active[dir.index()] {
                self.fill_direction(field, state, nvars, dir);
            }
        }
    }

    /// 方向 `dir` 的两侧幽灵层；横向范围覆盖全部单元以填满角区
    fn fill_direction(&self, field: ExchangeField, state: &mut CellArray, nvars: usize, dir: Direction) {
        let d = dir.index();
        let (s, e, ng) = (self.start[d], self.end[d], self.ng);
        let kind = self.kinds[d];
        let normal = field.normal_index(dir);
        let flip = kind == BoundaryKind::Reflecting;

        let [n3, n2, n1] = self.dims;
        let collapse = |axis: Direction, n: usize| if axis == dir { (0, 0) } else { (0, n - 1) };
        let bases = CellRange::new(collapse(Direction::X3, n3), collapse(Direction::X2, n2), collapse(Direction::X1, n1));

        let mut buf = [0.0; NVAR_MAX];
        for base in bases.iter() {
            for g in 0..ng {
                let pairs = [
                    (s - 1 - g, self.lower_source(kind, s, e, g)),
                    (e + 1 + g, self.upper_source(kind, s, e, g)),
                ];
                for (dst, src) in pairs {
                    let (ks, js, is) = at(dir, base, src);
                    buf[..nvars].copy_from_slice(&state.cell(ks, js, is)[..nvars]);
                    if flip && normal < nvars {
                        buf[normal] = -buf[normal];
                    }
                    let (kd, jd, id) = at(dir, base, dst);
                    state.cell_mut(kd, jd, id)[..nvars].copy_from_slice(&buf[..nvars]);
                }
            }
        }
    }

    #[inline]
    fn lower_source(&self, kind: BoundaryKind, s: usize, e: usize, g: usize) -> usize {
        match kind {
            BoundaryKind::Periodic => e - g,
            BoundaryKind::Outflow => s,
            BoundaryKind::Reflecting => s + g,
        }
    }

    #[inline]
    fn upper_source(&self, kind: BoundaryKind, s: usize, e: usize, g: usize) -> usize {
        match kind {
            BoundaryKind::Periodic => s + g,
            BoundaryKind::Outflow => e,
            BoundaryKind::Reflecting => e - g,
        }
    }
}

#[inline]
fn at(dir: Direction, base: (usize, usize, usize), t: usize) -> (usize, usize, usize) {
    let (k, j, i) = base;
    match dir {
        Direction::X1 => (k, j, t),
        Direction::X2 => (k, t, i),
        Direction::X3 => (t, j, i),
    }
}

impl BoundaryExchange for LocalBoundary {
    fn send(&mut self, field: ExchangeField, _state: &CellArray, _nvars: usize) -> TaskStatus {
        self.sent[field.slot()] = true;
        TaskStatus::Complete
    }

    fn receive(&mut self, field: ExchangeField, state: &mut CellArray, nvars: usize) -> TaskStatus {
        if !self.sent[field.slot()] {
            return TaskStatus::Incomplete;
        }
        self.fill(field, state, nvars);
        TaskStatus::Complete
    }
}
