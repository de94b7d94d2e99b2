// relhydro\crates\rh_foundation\src/lib.rs

//! RelHydro Foundation Layer
//!
//! 基础层，为上层的配置、物理内核和应用提供公共抽象。
//!
//! # 模块概览
//!
//! - [`array`]: 多变量网格块存储 `CellArray`（单元连续布局）
//! - [`index`]: 方向枚举与单元范围
//! - [`float`]: 浮点辅助函数
//! - [`error`]: 统一错误类型
//!
//! # 示例
//!
//! ```
//! use rh_foundation::{CellArray, CellRange};
//!
//! let mut u = CellArray::zeros(5, 1, 1, 8);
//! u.set(0, 0, 0, 3, 1.5);
//! assert_eq!(u.get(0, 0, 0, 3), 1.5);
//!
//! let range = CellRange::new((0, 0), (0, 0), (2, 5));
//! assert_eq!(range.len(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array;
pub mod error;
pub mod float;
pub mod index;

// 重导出常用类型
pub use array::CellArray;
pub use error::{RhError, RhResult};
pub use index::{CellRange, Direction};
