// relhydro\crates\rh_physics\src/numerics/reconstruction/mod.rs

//! # 界面重构
//!
//! 沿一条笔束（pencil）对单个变量重构界面两侧的值。
//! 约定：单元 `i` 给出面 `i+1/2` 的左态 `ql[i+1]` 与面 `i-1/2` 的右态 `qr[i]`，
//! 因此面 `i` 的左右态分别为 `ql[i]`、`qr[i]`。
//!
//! | 方案 | 模板宽度 | 阶数 |
//! |------|----------|------|
//! | dc   | 1 | 1 |
//! | plm  | 2 | 2 |
//! | ppm4 | 3 | 3~4 |
//! | ppmx | 3 | 3~4，保极值 |
//! | wenoz| 3 | 5 |
//!
//! ## 参考文献
//!
//! - Colella & Woodward (1984), J. Comput. Phys. 54, 174
//! - Colella & Sekora (2008), J. Comput. Phys. 227, 7069
//! - Borges et al. (2008), J. Comput. Phys. 227, 3191

mod dc;
mod plm;
mod ppm;
mod wenoz;

pub use dc::DonorCell;
pub use plm::{limited_slope, Plm};
pub use ppm::{Ppm4, Ppmx};
pub use wenoz::WenoZ;

use rh_config::{ReconstructionConfig, ReconstructionKind};

/// 重构器 trait
pub trait Reconstructor: Send + Sync {
    /// 名称
    fn name(&self) -> &'static str;

    /// 所需 ghost 层数
    fn ghost_width(&self) -> usize;

    /// 对单元 `il..=iu` 重构，写入 `ql[i+1]` 与 `qr[i]`
    ///
    /// 单元 `i` 的模板为 `i ± (ghost_width - 1)`，调用方保证 `il + 1 >= ghost_width`
    /// 且 `iu + ghost_width <= q.len()`，`ql`、`qr` 长度至少为 `q.len() + 1`。
    fn reconstruct_line(&self, q: &[f64], il: usize, iu: usize, ql: &mut [f64], qr: &mut [f64]);
}

/// 重构方案封闭集合
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnyReconstructor {
    /// 一阶
    DonorCell(DonorCell),
    /// 分段线性
    Plm(Plm),
    /// CW84 PPM
    Ppm4(Ppm4),
    /// 保极值 PPM
    Ppmx(Ppmx),
    /// WENO-Z
    WenoZ(WenoZ),
}

macro_rules! dispatch {
    ($self:expr, $r:ident => $body:expr) => {
        match $self {
            AnyReconstructor::DonorCell($r) => $body,
            AnyReconstructor::Plm($r) => $body,
            AnyReconstructor::Ppm4($r) => $body,
            AnyReconstructor::Ppmx($r) => $body,
            AnyReconstructor::WenoZ($r) => $body,
        }
    };
}

impl AnyReconstructor {
    /// 从配置构造
    pub fn from_config(cfg: &ReconstructionConfig) -> Self {
        match cfg.kind {
            ReconstructionKind::Dc => Self::DonorCell(DonorCell),
            ReconstructionKind::Plm => Self::Plm(Plm::new(cfg.limiter)),
            ReconstructionKind::Ppm4 => Self::Ppm4(Ppm4),
            ReconstructionKind::Ppmx => Self::Ppmx(Ppmx::default()),
            ReconstructionKind::Wenoz => Self::WenoZ(WenoZ::default()),
        }
    }

    /// 界面密度与压强是否需要施加底值
    pub fn needs_floors(&self) -> bool {
        matches!(self, Self::Ppm4(_) | Self::Ppmx(_) | Self::WenoZ(_))
    }
}

impl Reconstructor for AnyReconstructor {
    fn name(&self) -> &'static str {
        dispatch!(self, r => r.name())
    }

    fn ghost_width(&self) -> usize {
        dispatch!(self, r => r.ghost_width())
    }

    #[inline]
    fn reconstruct_line(&self, q: &[f64], il: usize, iu: usize, ql: &mut [f64], qr: &mut [f64]) {
        dispatch!(self, r => r.reconstruct_line(q, il, iu, ql, qr))
    }
}
