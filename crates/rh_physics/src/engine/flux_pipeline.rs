// relhydro\crates\rh_physics\src/engine/flux_pipeline.rs

//! 通量管线
//!
//! 对每个活动方向依次执行：
//!
//! 1. 沿该方向切出笔束，读取原始量与未致密化磁场
//! 2. 对笔束重构界面两侧状态（流体、标量与磁场使用同一方案）
//! 3. 在每个面上调用 Riemann 求解器，标量按质量通量迎风
//! 4. 收集结果后写入面通量数组
//!
//! 笔束之间完全独立，使用 rayon 并行；每个工作线程复用一份笔束暂存。
//! 方向之间顺序执行，暂存与通量数组在方向间不共享写入。
//!
//! 笔束的横向范围在活动的横向方向上向外扩展一层幽灵单元。

use glam::DVec3;
use rayon::prelude::*;
use rh_config::HydroConfig;
use rh_foundation::{CellRange, Direction};

use crate::block::MeshBlock;
use crate::eos::EquationOfState;
use crate::geometry::{GeometryProvider, Metric};
use crate::numerics::reconstruction::{AnyReconstructor, Reconstructor};
use crate::schemes::riemann::{AnyRiemannSolver, FaceState, LlfSolver, RiemannFlux};
use crate::state::{load_field, Primitive};
use crate::types::{NHYDRO, NMAG, NVAR_MAX};

/// 一次通量计算的统计
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SweepStats {
    /// 计算的面数
    pub faces: usize,
    /// 高阶通量无效、退回一阶的面数
    pub fallbacks: usize,
    /// 最大波速
    pub max_wave_speed: f64,
}

impl SweepStats {
    /// 合并
    pub fn merge(self, other: Self) -> Self {
        Self {
            faces: self.faces + other.faces,
            fallbacks: self.fallbacks + other.fallbacks,
            max_wave_speed: self.max_wave_speed.max(other.max_wave_speed),
        }
    }
}

/// 笔束暂存（按变量分块）
struct PencilScratch {
    q: Vec<f64>,
    ql: Vec<f64>,
    qr: Vec<f64>,
    metrics: Vec<Metric>,
}

impl PencilScratch {
    fn new(nrec: usize, len: usize) -> Self {
        Self {
            q: vec![0.0; nrec * len],
            ql: vec![0.0; nrec * (len + 1)],
            qr: vec![0.0; nrec * (len + 1)],
            metrics: vec![Metric::minkowski(); len],
        }
    }
}

/// 一个面的结果
type FaceFlux = ((usize, usize, usize), RiemannFlux);

/// 通量管线
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxPipeline {
    reconstructor: AnyReconstructor,
    riemann: AnyRiemannSolver,
    fofc: bool,
    magnetized: bool,
}

impl FluxPipeline {
    /// 创建
    pub fn new(reconstructor: AnyReconstructor, riemann: AnyRiemannSolver, fofc: bool, magnetized: bool) -> Self {
        Self { reconstructor, riemann, fofc, magnetized }
    }

    /// 从配置创建
    pub fn from_config(config: &HydroConfig) -> Self {
        Self::new(
            AnyReconstructor::from_config(&config.reconstruction),
            AnyRiemannSolver::from_kind(config.riemann_solver),
            config.fofc,
            config.magnetized,
        )
    }

    /// 重构器
    pub fn reconstructor(&self) -> &AnyReconstructor {
        &self.reconstructor
    }

    /// Riemann 求解器
    pub fn riemann(&self) -> &AnyRiemannSolver {
        &self.riemann
    }

    /// 是否启用一阶通量修正
    pub fn fofc_enabled(&self) -> bool {
        self.fofc
    }

    /// 是否携带磁场
    pub fn is_magnetized(&self) -> bool {
        self.magnetized
    }

    /// 计算全部活动方向的面通量
    pub fn compute_fluxes<E, G>(&self, eos: &E, geometry: &G, block: &mut MeshBlock) -> SweepStats
    where
        E: EquationOfState,
        G: GeometryProvider + ?Sized,
    {
        let mut stats = SweepStats::default();
        for dir in Direction::ALL {
            if block.is_active(dir) {
                stats = stats.merge(self.sweep(eos, geometry, block, dir));
            }
        }
        if stats.fallbacks > 0 {
            log::warn!("{} 个面的高阶通量无效，已退回一阶", stats.fallbacks);
        }
        stats
    }

    /// 单方向扫描
    fn sweep<E, G>(&self, eos: &E, geometry: &G, block: &mut MeshBlock, dir: Direction) -> SweepStats
    where
        E: EquationOfState,
        G: GeometryProvider + ?Sized,
    {
        let nrec = block.nvar() + if self.magnetized { NMAG } else { 0 };
        let len = line_length(block, dir);
        let pencils = pencil_bases(block, dir);

        let results: Vec<(Vec<FaceFlux>, usize)> = {
            let view: &MeshBlock = block;
            pencils
                .par_iter()
                .map_init(
                    || PencilScratch::new(nrec, len),
                    |scratch, &base| self.pencil(eos, geometry, view, dir, base, scratch),
                )
                .collect()
        };

        let mut stats = SweepStats::default();
        let flux = &mut block.flux[dir.index()];
        let bflux = &mut block.bflux[dir.index()];
        for (faces, fallbacks) in &results {
            stats.fallbacks += fallbacks;
            for ((k, j, i), f) in faces {
                f.store(flux.cell_mut(*k, *j, *i));
                if self.magnetized {
                    f.store_field(bflux.cell_mut(*k, *j, *i));
                }
                stats.faces += 1;
                stats.max_wave_speed = stats.max_wave_speed.max(f.max_wave_speed);
            }
        }
        stats
    }

    /// 处理一条笔束，返回其全部面的通量与退回一阶的面数
    fn pencil<E, G>(
        &self,
        eos: &E,
        geometry: &G,
        block: &MeshBlock,
        dir: Direction,
        base: (usize, usize, usize),
        scratch: &mut PencilScratch,
    ) -> (Vec<FaceFlux>, usize)
    where
        E: EquationOfState,
        G: GeometryProvider + ?Sized,
    {
        let nvar = block.nvar();
        let nscalars = block.nscalars;
        let len = line_length(block, dir);
        let stride = len + 1;
        let (s, e) = active_bounds(block, dir);

        // 读取
        for t in 0..len {
            let (k, j, i) = along(dir, base, t);
            let metric = geometry.metric(k, j, i);
            let w = block.w0.cell(k, j, i);
            for v in 0..nvar {
                scratch.q[v * len + t] = w[v];
            }
            if self.magnetized {
                let b = load_field(block.b0.cell(k, j, i), metric.sqrt_det);
                for (c, bc) in b.to_array().into_iter().enumerate() {
                    scratch.q[(nvar + c) * len + t] = bc;
                }
            }
            scratch.metrics[t] = metric;
        }

        // 重构
        for ((q, ql), qr) in scratch
            .q
            .chunks_exact(len)
            .zip(scratch.ql.chunks_exact_mut(stride))
            .zip(scratch.qr.chunks_exact_mut(stride))
        {
            self.reconstructor.reconstruct_line(q, s - 1, e + 1, ql, qr);
        }

        // Riemann 求解
        let mut out = Vec::with_capacity(e + 2 - s);
        let mut fallbacks = 0;
        for f in s..=e + 1 {
            let mut left = face_primitive(&scratch.ql, stride, f, nscalars);
            let mut right = face_primitive(&scratch.qr, stride, f, nscalars);
            if self.reconstructor.needs_floors() {
                apply_interface_floors(eos, &mut left);
                apply_interface_floors(eos, &mut right);
            }
            let (bl, br) = if self.magnetized {
                (face_field(&scratch.ql, stride, f, nvar), face_field(&scratch.qr, stride, f, nvar))
            } else {
                (DVec3::ZERO, DVec3::ZERO)
            };

            let metric = Metric::face_average(&scratch.metrics[f - 1], &scratch.metrics[f]);
            let sl = FaceState::new(eos, left, bl, &metric);
            let sr = FaceState::new(eos, right, br, &metric);
            let mut flux = self.riemann.solve_with_scalars(eos, &sl, &sr, &metric, dir);
            let (k, j, i) = along(dir, base, f);
            if !flux.is_valid() {
                flux = self.first_order_flux(eos, geometry, block, dir, k, j, i);
                fallbacks += 1;
            }
            out.push(((k, j, i), flux));
        }
        (out, fallbacks)
    }

    /// 单个面的一阶通量：左右单元直接取值，LLF 求解，标量迎风
    ///
    /// 面 `(k, j, i)` 位于单元 `(k, j, i)` 的下侧，调用方保证下侧单元存在。
    pub fn first_order_flux<E, G>(
        &self,
        eos: &E,
        geometry: &G,
        block: &MeshBlock,
        dir: Direction,
        k: usize,
        j: usize,
        i: usize,
    ) -> RiemannFlux
    where
        E: EquationOfState,
        G: GeometryProvider + ?Sized,
    {
        let (dk, dj, di) = MeshBlock::offset(dir);
        let (kl, jl, il) = (k - dk, j - dj, i - di);

        let ml = geometry.metric(kl, jl, il);
        let mr = geometry.metric(k, j, i);
        let (bl, br) = if self.magnetized {
            (
                load_field(block.b0.cell(kl, jl, il), ml.sqrt_det),
                load_field(block.b0.cell(k, j, i), mr.sqrt_det),
            )
        } else {
            (DVec3::ZERO, DVec3::ZERO)
        };
        let left = Primitive::load(block.w0.cell(kl, jl, il), block.nscalars);
        let right = Primitive::load(block.w0.cell(k, j, i), block.nscalars);

        let metric = Metric::face_average(&ml, &mr);
        let sl = FaceState::new(eos, left, bl, &metric);
        let sr = FaceState::new(eos, right, br, &metric);
        AnyRiemannSolver::Llf(LlfSolver).solve_with_scalars(eos, &sl, &sr, &metric, dir)
    }
}

/// 方向上含幽灵层的单元数
#[inline]
fn line_length(block: &MeshBlock, dir: Direction) -> usize {
    match dir {
        Direction::X1 => block.n1,
        Direction::X2 => block.n2,
        Direction::X3 => block.n3,
    }
}

/// 方向上的活动区 `[s, e]`
#[inline]
pub(crate) fn active_bounds(block: &MeshBlock, dir: Direction) -> (usize, usize) {
    match dir {
        Direction::X1 => (block.is, block.ie),
        Direction::X2 => (block.js, block.je),
        Direction::X3 => (block.ks, block.ke),
    }
}

/// 把笔束基点沿方向移动到位置 `t`
#[inline]
fn along(dir: Direction, base: (usize, usize, usize), t: usize) -> (usize, usize, usize) {
    let (k, j, i) = base;
    match dir {
        Direction::X1 => (k, j, t),
        Direction::X2 => (k, t, i),
        Direction::X3 => (t, j, i),
    }
}

/// 方向 `dir` 的全部笔束基点
fn pencil_bases(block: &MeshBlock, dir: Direction) -> Vec<(usize, usize, usize)> {
    let extend = |d: Direction, lo: usize, hi: usize| {
        if d == dir {
            (0, 0)
        } else if block.is_active(d) {
            (lo - 1, hi + 1)
        } else {
            (lo, hi)
        }
    };
    CellRange::new(
        extend(Direction::X3, block.ks, block.ke),
        extend(Direction::X2, block.js, block.je),
        extend(Direction::X1, block.is, block.ie),
    )
    .iter()
    .collect()
}

#[inline]
fn face_primitive(buf: &[f64], stride: usize, f: usize, nscalars: usize) -> Primitive {
    let mut cell = [0.0; NVAR_MAX];
    for (v, x) in cell.iter_mut().enumerate().take(NHYDRO + nscalars) {
        *x = buf[v * stride + f];
    }
    Primitive::load(&cell, nscalars)
}

#[inline]
fn face_field(buf: &[f64], stride: usize, f: usize, nvar: usize) -> DVec3 {
    DVec3::new(buf[nvar * stride + f], buf[(nvar + 1) * stride + f], buf[(nvar + 2) * stride + f])
}

/// 高阶重构的界面底值：`ρ >= ρ_floor`，`P >= P(n, T_floor, Y)`
#[inline]
fn apply_interface_floors<E: EquationOfState>(eos: &E, prim: &mut Primitive) {
    let floors = eos.floors();
    prim.rho = prim.rho.max(floors.density);
    let n = prim.rho / eos.baryon_mass();
    let p_min = eos.pressure(n, floors.temperature, prim.scalars());
    prim.pressure = prim.pressure.max(p_min);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eos::{EosFloors, IdealGas};
    use crate::geometry::Minkowski;
    use crate::schemes::riemann::RiemannSolver;
    use crate::types::{IDN, IM1, IPR, IVX};
    use rh_config::{ReconstructionConfig, ReconstructionKind, RiemannSolverKind};

    fn eos() -> IdealGas {
        IdealGas::new(5.0 / 3.0, 1.0, EosFloors::default()).unwrap()
    }

    fn pipeline(kind: ReconstructionKind, solver: RiemannSolverKind) -> FluxPipeline {
        let cfg = ReconstructionConfig { kind, ..Default::default() };
        FluxPipeline::new(AnyReconstructor::from_config(&cfg), AnyRiemannSolver::from_kind(solver), false, false)
    }

    fn uniform_block(nx: [usize; 3], rho: f64, vx: f64, p: f64) -> MeshBlock {
        let mut block = MeshBlock::new(nx, 3, [0.0; 3], [1.0; 3], 0).unwrap();
        let range = block.full_range();
        for (k, j, i) in range.iter() {
            let cell = block.w0.cell_mut(k, j, i);
            cell[IDN] = rho;
            cell[IVX] = vx;
            cell[IPR] = p;
        }
        block
    }

    #[test]
    fn test_pencil_bases_extend_transverse() {
        let block = MeshBlock::new([8, 4, 1], 2, [0.0; 3], [1.0; 3], 0).unwrap();
        let x1 = pencil_bases(&block, Direction::X1);
        // x2 活动：js-1..=je+1 共 6 条
        assert_eq!(x1.len(), 6);
        let x2 = pencil_bases(&block, Direction::X2);
        assert_eq!(x2.len(), 10);
    }

    #[test]
    fn test_uniform_state_gives_uniform_flux() {
        let eos = eos();
        let mut block = uniform_block([8, 1, 1], 1.0, 0.3, 0.5);
        for &kind in ReconstructionKind::ALL {
            let pipe = pipeline(kind, RiemannSolverKind::Hlle);
            let stats = pipe.compute_fluxes(&eos, &Minkowski, &mut block);
            assert_eq!(stats.faces, 9);
            assert_eq!(stats.fallbacks, 0);
            let f0 = block.flux[0].cell(0, 0, block.is).to_vec();
            for i in block.is..=block.ie + 1 {
                for (a, b) in block.flux[0].cell(0, 0, i).iter().zip(&f0) {
                    assert!((a - b).abs() < 1e-13, "{}", kind);
                }
            }
            assert!(f0[IDN] > 0.0);
        }
    }

    #[test]
    fn test_static_pressure_flux() {
        let eos = eos();
        let mut block = uniform_block([6, 6, 1], 1.0, 0.0, 0.5);
        let pipe = pipeline(ReconstructionKind::Plm, RiemannSolverKind::Llf);
        pipe.compute_fluxes(&eos, &Minkowski, &mut block);
        let f = block.flux[1].cell(0, block.js + 2, block.is + 1);
        assert!(f[IDN].abs() < 1e-15);
        assert!((f[IM1 + 1] - 0.5).abs() < 1e-13);
        assert!(f[IM1].abs() < 1e-15);
    }

    #[test]
    fn test_first_order_flux_matches_dc_llf() {
        let eos = eos();
        let mut block = uniform_block([8, 1, 1], 1.0, 0.0, 1.0);
        for i in block.is + 4..block.n1 {
            block.w0.set(IDN, 0, 0, i, 0.125);
            block.w0.set(IPR, 0, 0, i, 0.1);
        }
        let pipe = pipeline(ReconstructionKind::Dc, RiemannSolverKind::Llf);
        pipe.compute_fluxes(&eos, &Minkowski, &mut block);
        for i in block.is..=block.ie + 1 {
            let fo = pipe.first_order_flux(&eos, &Minkowski, &block, Direction::X1, 0, 0, i);
            let mut cell = [0.0; NHYDRO];
            fo.store(&mut cell);
            for (a, b) in block.flux[0].cell(0, 0, i).iter().zip(&cell) {
                assert!((a - b).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn test_magnetized_flux_has_no_normal_field_flux() {
        let eos = eos();
        let mut block = uniform_block([8, 1, 1], 1.0, 0.2, 1.0);
        let range = block.full_range();
        for (k, j, i) in range.iter() {
            block.b0.cell_mut(k, j, i).copy_from_slice(&[0.3, 0.4, 0.0]);
        }
        let cfg = ReconstructionConfig { kind: ReconstructionKind::Plm, ..Default::default() };
        let pipe = FluxPipeline::new(
            AnyReconstructor::from_config(&cfg),
            AnyRiemannSolver::from_kind(RiemannSolverKind::Hlle),
            false,
            true,
        );
        pipe.compute_fluxes(&eos, &Minkowski, &mut block);
        for i in block.is..=block.ie + 1 {
            let bf = block.bflux[0].cell(0, 0, i);
            assert_eq!(bf[0], 0.0);
            // 均匀态: F(B^y) = B^y v^x - B^x v^y
            let w = (1.0f64 + 0.04).sqrt();
            assert!((bf[1] - 0.4 * 0.2 / w).abs() < 1e-12);
        }
    }

    #[test]
    fn test_interface_floors() {
        let eos = eos();
        let mut prim = Primitive::new(-1.0, DVec3::ZERO, -1.0, 0.0);
        apply_interface_floors(&eos, &mut prim);
        assert_eq!(prim.rho, eos.floors().density);
        assert!(prim.pressure > 0.0);
    }

    #[test]
    fn test_pipeline_from_config() {
        let cfg = HydroConfig::default();
        let pipe = FluxPipeline::from_config(&cfg);
        assert_eq!(pipe.riemann().name(), cfg.riemann_solver.as_str());
        assert_eq!(pipe.reconstructor().ghost_width(), cfg.reconstruction.kind.required_ghosts());
        assert!(!pipe.is_magnetized());
        assert!(!pipe.fofc_enabled());
    }
}
