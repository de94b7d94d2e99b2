// relhydro\crates\rh_physics\src/tasks/hydro_tasks.rs

//! 单块流体更新任务链
//!
//! ```text
//! copy_cons → div_flux → update → send → new_dt → recv → con2prim
//! ```
//!
//! 边只表达真实的数据依赖：例如 `con2prim` 必须在接收数据覆盖幽灵单元之后执行。

use glam::DVec3;

use super::task_list::{TaskGraphError, TaskId, TaskList, TaskStatus};
use crate::block::MeshBlock;
use crate::boundary::{BoundaryExchange, ExchangeField};
use crate::diagnostics::CycleDiagnostics;
use crate::driver::DriverContext;
use crate::engine::{
    apply_update, compute_divergence, copy_conserved, first_order_correction, new_timestep, FluxPipeline,
    StageWeights, TimeIntegrator,
};
use crate::eos::AnyEos;
use crate::geometry::GeometryProvider;
use crate::primitive::{conserved_to_primitive, primitive_to_conserved, ExcisionParams, PrimitiveSolver, ResetFloor};
use crate::state::Primitive;
use crate::types::NMAG;

/// 任务链中各任务的句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydroTaskIds {
    /// 拷贝守恒量
    pub copy_cons: TaskId,
    /// 通量散度（含 FOFC）
    pub div_flux: TaskId,
    /// 守恒量更新
    pub update: TaskId,
    /// 发送边界
    pub send: TaskId,
    /// 新时间步
    pub new_dt: TaskId,
    /// 接收边界
    pub recv: TaskId,
    /// 守恒量→原始量
    pub con2prim: TaskId,
}

/// 子步内各场的交换进度，已完成的场在重试时跳过
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ExchangeProgress {
    sent: [bool; 2],
    received: [bool; 2],
}

/// 一个网格块及其求解组件
///
/// 配置、状态方程与底值全部由块实例持有，多个块（或多个模拟）互不影响。
pub struct HydroBlock<G, X> {
    mesh: MeshBlock,
    solver: PrimitiveSolver<AnyEos, ResetFloor>,
    pipeline: FluxPipeline,
    integrator: TimeIntegrator,
    geometry: G,
    boundary: X,
    excision: Option<ExcisionParams>,
    cfl: f64,
    new_dt: f64,
    exchange: ExchangeProgress,
    diagnostics: CycleDiagnostics,
}

impl<G, X> HydroBlock<G, X>
where
    G: GeometryProvider,
    X: BoundaryExchange,
{
    /// 由已校验的组件组装；一般经由构建器调用
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mesh: MeshBlock,
        solver: PrimitiveSolver<AnyEos, ResetFloor>,
        pipeline: FluxPipeline,
        integrator: TimeIntegrator,
        geometry: G,
        boundary: X,
        excision: Option<ExcisionParams>,
        cfl: f64,
    ) -> Self {
        Self {
            mesh,
            solver,
            pipeline,
            integrator,
            geometry,
            boundary,
            excision,
            cfl,
            new_dt: f64::INFINITY,
            exchange: ExchangeProgress::default(),
            diagnostics: CycleDiagnostics::default(),
        }
    }

    /// 网格块
    pub fn mesh(&self) -> &MeshBlock {
        &self.mesh
    }

    /// 可变网格块
    pub fn mesh_mut(&mut self) -> &mut MeshBlock {
        &mut self.mesh
    }

    /// 变量求解器
    pub fn solver(&self) -> &PrimitiveSolver<AnyEos, ResetFloor> {
        &self.solver
    }

    /// 状态方程
    pub fn eos(&self) -> &AnyEos {
        self.solver.eos()
    }

    /// 通量管线
    pub fn pipeline(&self) -> &FluxPipeline {
        &self.pipeline
    }

    /// 时间积分器
    pub fn integrator(&self) -> &TimeIntegrator {
        &self.integrator
    }

    /// 几何提供者
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// 边界交换
    pub fn boundary(&self) -> &X {
        &self.boundary
    }

    /// 挖除参数
    pub fn excision(&self) -> Option<&ExcisionParams> {
        self.excision.as_ref()
    }

    /// CFL 数
    pub fn cfl(&self) -> f64 {
        self.cfl
    }

    /// 最近一次计算的时间步
    pub fn new_dt(&self) -> f64 {
        self.new_dt
    }

    /// 当前周期的诊断
    pub fn diagnostics(&self) -> &CycleDiagnostics {
        &self.diagnostics
    }

    /// 取出并清零诊断
    pub fn take_diagnostics(&mut self) -> CycleDiagnostics {
        std::mem::take(&mut self.diagnostics)
    }

    /// 按单元中心坐标设置初值（含幽灵层）
    ///
    /// 闭包返回原始量与未致密化磁场。随后生成守恒量并计算首个时间步，
    /// 返回非有限守恒量的单元数。
    pub fn set_primitives<F>(&mut self, init: F) -> usize
    where
        F: Fn([f64; 3]) -> (Primitive, DVec3),
    {
        let nscalars = self.mesh.nscalars;
        let range = self.mesh.full_range();
        for (k, j, i) in range.iter() {
            let x = self.mesh.cell_center(k, j, i);
            let (mut prim, b) = init(x);
            prim.nscalars = nscalars;
            prim.store(self.mesh.w0.cell_mut(k, j, i));
            let sqrt_det = self.geometry.metric(k, j, i).sqrt_det;
            for (c, value) in b.to_array().into_iter().enumerate() {
                self.mesh.b0.set(c, k, j, i, value * sqrt_det);
            }
        }

        let bfield = self.pipeline.is_magnetized().then_some(&self.mesh.b0);
        let nonfinite = primitive_to_conserved(
            &self.solver,
            &self.geometry,
            &self.mesh.w0,
            bfield,
            &mut self.mesh.u0,
            &range,
            nscalars,
        );
        self.diagnostics.nonfinite += nonfinite;
        self.compute_new_dt();
        nonfinite
    }

    /// 构造标准任务链
    pub fn task_list() -> Result<(TaskList<Self>, HydroTaskIds), TaskGraphError> {
        let mut list = TaskList::new();
        let ids = Self::add_tasks(&mut list)?;
        Ok((list, ids))
    }

    /// 把任务链追加到已有列表
    pub fn add_tasks(list: &mut TaskList<Self>) -> Result<HydroTaskIds, TaskGraphError> {
        let copy_cons = list.add_task("copy_cons", Self::copy_cons, &[])?;
        let div_flux = list.add_task("div_flux", Self::div_flux, &[copy_cons])?;
        let update = list.add_task("update", Self::update, &[div_flux])?;
        let send = list.add_task("send", Self::send, &[update])?;
        let new_dt = list.add_task("new_dt", Self::new_dt_task, &[send])?;
        let recv = list.add_task("recv", Self::recv, &[new_dt])?;
        let con2prim = list.add_task("con2prim", Self::con2prim, &[recv])?;
        Ok(HydroTaskIds { copy_cons, div_flux, update, send, new_dt, recv, con2prim })
    }

    fn weights(&self, stage: usize) -> Option<StageWeights> {
        let weights = self.integrator.stage(stage);
        if weights.is_none() {
            log::error!("子步 {} 超出积分器 {} 的范围", stage, self.integrator.kind());
        }
        weights
    }

    fn exchange_fields(&self) -> &'static [ExchangeField] {
        if self.pipeline.is_magnetized() {
            ExchangeField::WITH_MAGNETIC
        } else {
            ExchangeField::HYDRO_ONLY
        }
    }

    fn copy_cons(&mut self, _ctx: &DriverContext, stage: usize) -> TaskStatus {
        self.exchange = ExchangeProgress::default();
        if stage == 1 {
            copy_conserved(&mut self.mesh, self.pipeline.is_magnetized());
        }
        TaskStatus::Complete
    }

    fn div_flux(&mut self, ctx: &DriverContext, stage: usize) -> TaskStatus {
        let sweep = self.pipeline.compute_fluxes(self.solver.eos(), &self.geometry, &mut self.mesh);
        self.diagnostics.record_sweep(&sweep);
        compute_divergence(&mut self.mesh);

        if self.pipeline.fofc_enabled() {
            if let Some(weights) = self.weights(stage) {
                let flagged = first_order_correction(
                    &self.pipeline,
                    &self.solver,
                    &self.geometry,
                    &mut self.mesh,
                    weights,
                    ctx.dt,
                );
                self.diagnostics.fofc_cells += flagged;
            }
        }
        TaskStatus::Complete
    }

    fn update(&mut self, ctx: &DriverContext, stage: usize) -> TaskStatus {
        if let Some(weights) = self.weights(stage) {
            apply_update(&mut self.mesh, weights, ctx.dt, self.pipeline.is_magnetized());
        }
        TaskStatus::Complete
    }

    fn send(&mut self, _ctx: &DriverContext, _stage: usize) -> TaskStatus {
        let nvar = self.mesh.nvar();
        let mut status = TaskStatus::Complete;
        for &field in self.exchange_fields() {
            let slot = field.slot();
            if self.exchange.sent[slot] {
                continue;
            }
            let (state, nvars) = match field {
                ExchangeField::Hydro => (&self.mesh.u0, nvar),
                ExchangeField::Magnetic => (&self.mesh.b0, NMAG),
            };
            let result = self.boundary.send(field, state, nvars);
            self.exchange.sent[slot] = result.is_complete();
            status = status.and(result);
        }
        status
    }

    fn new_dt_task(&mut self, _ctx: &DriverContext, stage: usize) -> TaskStatus {
        if stage == self.integrator.nstages() {
            self.compute_new_dt();
        }
        TaskStatus::Complete
    }

    fn recv(&mut self, _ctx: &DriverContext, _stage: usize) -> TaskStatus {
        let nvar = self.mesh.nvar();
        let mut status = TaskStatus::Complete;
        for &field in self.exchange_fields() {
            let slot = field.slot();
            if self.exchange.received[slot] {
                continue;
            }
            let (state, nvars) = match field {
                ExchangeField::Hydro => (&mut self.mesh.u0, nvar),
                ExchangeField::Magnetic => (&mut self.mesh.b0, NMAG),
            };
            let result = self.boundary.receive(field, state, nvars);
            self.exchange.received[slot] = result.is_complete();
            status = status.and(result);
        }
        status
    }

    fn con2prim(&mut self, _ctx: &DriverContext, _stage: usize) -> TaskStatus {
        // 幽灵单元一并转换，供下一子步的重构使用
        let range = self.mesh.full_range();
        let bfield = self.pipeline.is_magnetized().then_some(&self.mesh.b0);
        let stats = conserved_to_primitive(
            &self.solver,
            &self.geometry,
            &mut self.mesh.u0,
            bfield,
            &mut self.mesh.w0,
            &range,
            self.mesh.nscalars,
            self.excision.as_ref(),
        );
        self.diagnostics.record_conversion(&stats);
        TaskStatus::Complete
    }

    fn compute_new_dt(&mut self) {
        self.new_dt = new_timestep(
            self.solver.eos(),
            &self.geometry,
            &self.mesh,
            self.cfl,
            self.pipeline.is_magnetized(),
        );
        log::trace!("新时间步 {:.6e}", self.new_dt);
    }
}

impl<G, X> std::fmt::Debug for HydroBlock<G, X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HydroBlock")
            .field("nx", &self.mesh.nx)
            .field("pipeline", &self.pipeline)
            .field("integrator", &self.integrator.kind())
            .field("cfl", &self.cfl)
            .field("new_dt", &self.new_dt)
            .finish()
    }
}
