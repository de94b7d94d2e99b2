// relhydro\crates\rh_foundation\src/array.rs

//! 多变量网格块存储
//!
//! `CellArray` 保存 `nvar` 个变量在 `n3 × n2 × n1` 单元上的值。
//! 布局为单元连续（cell-major）：同一单元的全部变量相邻存放，
//! 因此逐单元内核可以直接用 `par_chunks_mut(nvar)` 安全地并行写入。
//!
//! 线性下标: `((k * n2 + j) * n1 + i) * nvar + v`

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::error::{RhError, RhResult};
use crate::float::all_finite;
use crate::index::CellRange;

/// 多变量网格块数组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellArray {
    nvar: usize,
    dims: [usize; 3],
    data: Vec<f64>,
}

impl CellArray {
    /// 创建全零数组，`dims = (n3, n2, n1)`
    pub fn zeros(nvar: usize, n3: usize, n2: usize, n1: usize) -> Self {
        Self { nvar, dims: [n3, n2, n1], data: vec![0.0; nvar * n3 * n2 * n1] }
    }

    /// 从已有数据构造
    pub fn from_vec(nvar: usize, dims: [usize; 3], data: Vec<f64>) -> RhResult<Self> {
        let expected = nvar * dims[0] * dims[1] * dims[2];
        if data.len() != expected {
            return Err(RhError::size_mismatch("CellArray", expected, data.len()));
        }
        Ok(Self { nvar, dims, data })
    }

    /// 变量个数
    #[inline]
    pub fn nvar(&self) -> usize {
        self.nvar
    }

    /// `(n3, n2, n1)`
    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// i 方向单元数
    #[inline]
    pub fn n1(&self) -> usize {
        self.dims[2]
    }

    /// j 方向单元数
    #[inline]
    pub fn n2(&self) -> usize {
        self.dims[1]
    }

    /// k 方向单元数
    #[inline]
    pub fn n3(&self) -> usize {
        self.dims[0]
    }

    /// 单元总数
    #[inline]
    pub fn ncells(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    /// 单元线性编号
    #[inline]
    pub fn cell_index(&self, k: usize, j: usize, i: usize) -> usize {
        (k * self.dims[1] + j) * self.dims[2] + i
    }

    /// 单元线性编号还原为 `(k, j, i)`
    #[inline]
    pub fn coords(&self, cell: usize) -> (usize, usize, usize) {
        Self::unravel(self.dims, cell)
    }

    /// 不借用数组的下标还原，供并行闭包使用
    #[inline]
    pub fn unravel(dims: [usize; 3], cell: usize) -> (usize, usize, usize) {
        let i = cell % dims[2];
        let rest = cell / dims[2];
        (rest / dims[1], rest % dims[1], i)
    }

    /// 读取变量值
    #[inline]
    pub fn get(&self, v: usize, k: usize, j: usize, i: usize) -> f64 {
        self.data[self.cell_index(k, j, i) * self.nvar + v]
    }

    /// 写入变量值
    #[inline]
    pub fn set(&mut self, v: usize, k: usize, j: usize, i: usize, value: f64) {
        let idx = self.cell_index(k, j, i) * self.nvar + v;
        self.data[idx] = value;
    }

    /// 单元的全部变量
    #[inline]
    pub fn cell(&self, k: usize, j: usize, i: usize) -> &[f64] {
        let start = self.cell_index(k, j, i) * self.nvar;
        &self.data[start..start + self.nvar]
    }

    /// 单元的全部变量（可变）
    #[inline]
    pub fn cell_mut(&mut self, k: usize, j: usize, i: usize) -> &mut [f64] {
        let start = self.cell_index(k, j, i) * self.nvar;
        &mut self.data[start..start + self.nvar]
    }

    /// 原始数据
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// 原始数据（可变）
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// 按单元并行迭代（可变）
    pub fn par_cells_mut(&mut self) -> rayon::slice::ChunksMut<'_, f64> {
        self.data.par_chunks_mut(self.nvar.max(1))
    }

    /// 按单元并行迭代
    pub fn par_cells(&self) -> rayon::slice::Chunks<'_, f64> {
        self.data.par_chunks(self.nvar.max(1))
    }

    /// 填充常数
    pub fn fill(&mut self, value: f64) {
        self.data.iter_mut().for_each(|x| *x = value);
    }

    /// 形状是否一致
    pub fn same_shape(&self, other: &CellArray) -> bool {
        self.nvar == other.nvar && self.dims == other.dims
    }

    /// 从同形状数组复制
    pub fn copy_from(&mut self, other: &CellArray) -> RhResult<()> {
        if !self.same_shape(other) {
            return Err(RhError::size_mismatch("CellArray::copy_from", self.data.len(), other.data.len()));
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// 在给定范围内复制前 `nvar` 个变量
    pub fn copy_range_from(&mut self, other: &CellArray, range: &CellRange, nvar: usize) -> RhResult<()> {
        if self.dims != other.dims || nvar > self.nvar || nvar > other.nvar {
            return Err(RhError::invalid_input("copy_range_from: 数组形状不兼容"));
        }
        for (k, j, i) in range.iter() {
            let src = other.cell(k, j, i);
            self.cell_mut(k, j, i)[..nvar].copy_from_slice(&src[..nvar]);
        }
        Ok(())
    }

    /// 全部值是否有限
    pub fn is_finite(&self) -> bool {
        all_finite(&self.data)
    }
}

impl Index<(usize, usize, usize, usize)> for CellArray {
    type Output = f64;

    #[inline]
    fn index(&self, (v, k, j, i): (usize, usize, usize, usize)) -> &f64 {
        &self.data[self.cell_index(k, j, i) * self.nvar + v]
    }
}

impl IndexMut<(usize, usize, usize, usize)> for CellArray {
    #[inline]
    fn index_mut(&mut self, (v, k, j, i): (usize, usize, usize, usize)) -> &mut f64 {
        let idx = self.cell_index(k, j, i) * self.nvar + v;
        &mut self.data[idx]
    }
}
