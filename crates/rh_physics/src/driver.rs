// relhydro\crates\rh_physics\src/driver.rs

//! 多块驱动器
//!
//! 每个子步：重置所有块的任务列表，然后反复执行调度轮，
//! 各块之间用 rayon 并行，直到全部任务完成。子步全部完成后推进时间，
//! 取各块新时间步的最小值并合并诊断。

use rayon::prelude::*;

use crate::boundary::BoundaryExchange;
use crate::diagnostics::CycleDiagnostics;
use crate::error::{DriverError, SetupError};
use crate::geometry::GeometryProvider;
use crate::tasks::{HydroBlock, TaskList};

/// 默认的调度轮数上限（每子步）
pub const DEFAULT_MAX_PASSES: usize = 1000;

/// 传给任务函数的只读驱动信息
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriverContext {
    /// 周期开始时刻
    pub time: f64,
    /// 本周期时间步
    pub dt: f64,
    /// 周期编号
    pub cycle: u64,
}

/// 驱动器
pub struct Driver<G, X> {
    blocks: Vec<HydroBlock<G, X>>,
    lists: Vec<TaskList<HydroBlock<G, X>>>,
    time: f64,
    cycle: u64,
    dt: f64,
    max_passes: usize,
}

impl<G, X> Driver<G, X>
where
    G: GeometryProvider,
    X: BoundaryExchange,
{
    /// 由已初始化的块创建
    pub fn new(blocks: Vec<HydroBlock<G, X>>) -> Result<Self, SetupError> {
        let lists = blocks
            .iter()
            .map(|_| HydroBlock::<G, X>::task_list().map(|(list, _)| list))
            .collect::<Result<Vec<_>, _>>()?;
        let dt = blocks.iter().map(HydroBlock::new_dt).fold(f64::INFINITY, f64::min);
        Ok(Self { blocks, lists, time: 0.0, cycle: 0, dt, max_passes: DEFAULT_MAX_PASSES })
    }

    /// 设置每子步调度轮数上限
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    /// 设置起始时刻
    pub fn with_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    /// 当前时刻
    pub fn time(&self) -> f64 {
        self.time
    }

    /// 已完成周期数
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// 下一周期的时间步
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// 全部块
    pub fn blocks(&self) -> &[HydroBlock<G, X>] {
        &self.blocks
    }

    /// 可变访问全部块
    pub fn blocks_mut(&mut self) -> &mut [HydroBlock<G, X>] {
        &mut self.blocks
    }

    /// 以当前时间步推进一个周期
    pub fn step(&mut self) -> Result<CycleDiagnostics, DriverError> {
        let dt = self.dt;
        self.step_with(dt)
    }

    /// 以给定时间步推进一个周期
    pub fn step_with(&mut self, dt: f64) -> Result<CycleDiagnostics, DriverError> {
        if self.blocks.is_empty() {
            return Err(DriverError::NoBlocks);
        }
        if !(dt.is_finite() && dt > 0.0) {
            return Err(DriverError::InvalidTimestep { dt });
        }

        let ctx = DriverContext { time: self.time, dt, cycle: self.cycle };
        let nstages = self.blocks[0].integrator().nstages();
        let mut total_passes = 0;

        for stage in 1..=nstages {
            self.lists.iter_mut().for_each(TaskList::reset);
            let mut passes = 0;
            loop {
                self.blocks
                    .par_iter_mut()
                    .zip(self.lists.par_iter_mut())
                    .for_each(|(block, list)| {
                        if !list.is_complete() {
                            list.execute_pass(block, &ctx, stage);
                        }
                    });
                passes += 1;
                if self.lists.iter().all(TaskList::is_complete) {
                    break;
                }
                if passes >= self.max_passes {
                    return Err(DriverError::Stalled { cycle: self.cycle, stage, passes });
                }
            }
            total_passes += passes;
        }

        self.time += dt;
        self.cycle += 1;
        self.dt = self.blocks.iter().map(HydroBlock::new_dt).fold(f64::INFINITY, f64::min);

        let mut diag = self
            .blocks
            .iter_mut()
            .map(HydroBlock::take_diagnostics)
            .fold(CycleDiagnostics::default(), |acc, d| acc.merge(&d));
        diag.cycle = self.cycle;
        diag.time = self.time;
        diag.dt = dt;
        diag.passes = total_passes;

        if diag.fofc_cells > 0 || diag.failures > 0 {
            log::info!("{}", diag);
        } else {
            log::debug!("{}", diag);
        }
        Ok(diag)
    }

    /// 推进到 `t_end` 或 `max_cycles` 个周期，返回逐周期诊断
    ///
    /// 最后一步截断到恰好落在 `t_end`。
    pub fn run(&mut self, t_end: f64, max_cycles: u64) -> Result<Vec<CycleDiagnostics>, DriverError> {
        let mut history = Vec::new();
        while self.time < t_end && (history.len() as u64) < max_cycles {
            let dt = self.dt.min(t_end - self.time);
            history.push(self.step_with(dt)?);
        }
        log::info!(
            "运行结束: cycle={} t={:.6e}, FOFC 单元 {} 个, 反演失败 {} 次",
            self.cycle,
            self.time,
            history.iter().map(|d| d.fofc_cells).sum::<usize>(),
            history.iter().map(|d| d.failures).sum::<usize>()
        );
        Ok(history)
    }
}

impl<G, X> std::fmt::Debug for Driver<G, X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("blocks", &self.blocks.len())
            .field("time", &self.time)
            .field("cycle", &self.cycle)
            .field("dt", &self.dt)
            .finish()
    }
}
