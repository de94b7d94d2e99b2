// relhydro\crates\rh_physics\src/builder.rs

//! 块构建器
//!
//! 把 [`HydroConfig`] 组装为可运行的 [`HydroBlock`]。所有不兼容组合
//! 都在这里以 [`SetupError`] 报告，不会拖到第一个时间步。
//!
//! ```ignore
//! let block = HydroBuilder::new(config).build_local(Minkowski)?;
//! ```

use rh_config::HydroConfig;

use crate::block::MeshBlock;
use crate::boundary::{BoundaryExchange, LocalBoundary};
use crate::engine::{FluxPipeline, TimeIntegrator};
use crate::eos::{AnyEos, EosTable};
use crate::error::SetupError;
use crate::geometry::GeometryProvider;
use crate::primitive::{ExcisionParams, PrimitiveSolver, ResetFloor};
use crate::tasks::HydroBlock;

/// 块构建器
#[derive(Debug, Clone)]
pub struct HydroBuilder {
    config: HydroConfig,
    table: Option<EosTable>,
}

impl HydroBuilder {
    /// 由配置创建
    pub fn new(config: HydroConfig) -> Self {
        Self { config, table: None }
    }

    /// 附加状态方程表（`eos.kind = tabulated` 时必需）
    pub fn with_table(mut self, table: EosTable) -> Self {
        self.table = Some(table);
        self
    }

    /// 配置
    pub fn config(&self) -> &HydroConfig {
        &self.config
    }

    /// 使用给定的边界交换构建
    pub fn build<G, X>(self, geometry: G, boundary: X) -> Result<HydroBlock<G, X>, SetupError>
    where
        G: GeometryProvider,
        X: BoundaryExchange,
    {
        self.build_with(geometry, |_| boundary)
    }

    /// 使用配置中的边界类型构建单块本地边界
    pub fn build_local<G>(self, geometry: G) -> Result<HydroBlock<G, LocalBoundary>, SetupError>
    where
        G: GeometryProvider,
    {
        let kinds = self.config.mesh.boundaries;
        self.build_with(geometry, |mesh| LocalBoundary::new(mesh, kinds))
    }

    /// 边界交换由网格块布局决定时使用
    pub fn build_with<G, X, F>(self, geometry: G, make_boundary: F) -> Result<HydroBlock<G, X>, SetupError>
    where
        G: GeometryProvider,
        X: BoundaryExchange,
        F: FnOnce(&MeshBlock) -> X,
    {
        let Self { config, table } = self;
        config.validate()?;

        let mesh = MeshBlock::from_config(&config.mesh, config.nscalars)?;
        if let Some(actual) = geometry.dims() {
            let expected = mesh.dims();
            if actual != expected {
                return Err(SetupError::GeometryMismatch { expected, actual });
            }
        }
        if config.riemann_solver.requires_flat() && !geometry.is_flat() {
            return Err(SetupError::RequiresFlatSpace { solver: config.riemann_solver.as_str() });
        }

        let eos = AnyEos::from_config(&config, table)?;
        let solver = PrimitiveSolver::new(
            eos,
            ResetFloor::from_config(&config.floors),
            config.primitive_solver.tolerance,
            config.primitive_solver.max_iterations,
        );
        let pipeline = FluxPipeline::from_config(&config);
        let integrator = TimeIntegrator::new(config.integrator);
        let excision = config
            .excision
            .enabled
            .then(|| ExcisionParams { density: config.excision.density, pressure: config.excision.pressure });

        log::info!(
            "构建块: nx={:?} ng={} eos={} recon={} riemann={} integrator={} fofc={} mhd={}",
            config.mesh.nx,
            config.mesh.nghost,
            config.eos.kind,
            config.reconstruction.kind,
            config.riemann_solver,
            config.integrator,
            config.fofc,
            config.magnetized
        );

        let boundary = make_boundary(&mesh);
        Ok(HydroBlock::new(mesh, solver, pipeline, integrator, geometry, boundary, excision, config.cfl))
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;
    use rh_config::{ConfigError, EosKind, ReconstructionKind, RiemannSolverKind};

    use super::*;
    use crate::geometry::{Metric, MetricField, Minkowski, SymTensor3};

    fn small() -> HydroConfig {
        let mut config = HydroConfig::default();
        config.mesh.nx = [8, 1, 1];
        config
    }

    fn curved(dims: [usize; 3]) -> MetricField {
        MetricField::from_fn(dims, |_, _, _| Metric::new(SymTensor3::diagonal(1.2, 1.2, 1.2), 0.9, DVec3::ZERO))
    }

    #[test]
    fn test_build_default() {
        let block = HydroBuilder::new(small()).build_local(Minkowski).unwrap();
        assert_eq!(block.mesh().nx, [8, 1, 1]);
        assert!(block.excision().is_none());
        assert!(!block.pipeline().is_magnetized());
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let mut config = small();
        config.cfl = 2.0;
        let err = HydroBuilder::new(config).build_local(Minkowski).unwrap_err();
        assert!(matches!(err, SetupError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_too_few_ghosts_is_reported() {
        let mut config = small();
        config.reconstruction.kind = ReconstructionKind::Wenoz;
        config.mesh.nghost = 2;
        assert!(matches!(HydroBuilder::new(config).build_local(Minkowski), Err(SetupError::Config(_))));
    }

    #[test]
    fn test_flat_only_solver_rejected_in_curved_space() {
        let mut config = small();
        config.riemann_solver = RiemannSolverKind::Hllc;
        let dims = MeshBlock::from_config(&config.mesh, 0).unwrap().dims();
        let err = HydroBuilder::new(config.clone()).build_local(curved(dims)).unwrap_err();
        assert!(matches!(err, SetupError::RequiresFlatSpace { solver: "hllc" }));

        config.riemann_solver = RiemannSolverKind::Hlle;
        assert!(HydroBuilder::new(config).build_local(curved(dims)).is_ok());
    }

    #[test]
    fn test_geometry_dims_must_match() {
        let err = HydroBuilder::new(small()).build_local(curved([1, 1, 5])).unwrap_err();
        match err {
            SetupError::GeometryMismatch { expected, actual } => {
                assert_eq!(expected, [1, 1, 14]);
                assert_eq!(actual, [1, 1, 5]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tabulated_without_table_fails() {
        let mut config = small();
        config.eos.kind = EosKind::Tabulated;
        assert!(matches!(HydroBuilder::new(config).build_local(Minkowski), Err(SetupError::Eos(_))));
    }

    #[test]
    fn test_excision_enabled() {
        let mut config = small();
        config.excision.enabled = true;
        let block = HydroBuilder::new(config.clone()).build_local(Minkowski).unwrap();
        let params = block.excision().unwrap();
        assert_eq!(params.density, config.excision.density);
        assert_eq!(params.pressure, config.excision.pressure);
    }
}
