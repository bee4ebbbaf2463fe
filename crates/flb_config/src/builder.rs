// crates/flb_config/src/builder.rs

//! DynSimulation - 运行时多态模拟接口与构建器
//!
//! 实现从无泛型配置到泛型引擎的桥梁：按 [`Precision`] 分发实例化
//! `FilmSolver<f32>` 或 `FilmSolver<f64>`，以 `Box<dyn DynSimulation>`
//! 交给应用层，应用层不接触任何泛型参数。

use flb_foundation::{FlbResult, LatticeScalar};
use flb_physics::backend::{Backend, ParallelBackend, SerialBackend};
use flb_physics::engine::{FilmSolver, MassTracker};
use flb_physics::forcing::{InclinationForce, SlippageForce, ThermalFluctuation};
use flb_physics::grid::PeriodicGrid;
use flb_physics::init;
use flb_physics::params::{SystemParams, WettingParams};
use flb_physics::state::FilmState;

use crate::error::ConfigError;
use crate::precision::Precision;
use crate::sim_config::{InitConfig, SimConfig};

/// 网格信息（运行时通用）
#[derive(Debug, Clone, Copy, Default)]
pub struct GridInfo {
    /// x 方向格点数
    pub nx: usize,
    /// y 方向格点数
    pub ny: usize,
    /// 总格点数
    pub sites: usize,
}

/// 一段运行结束后的观测快照（全 f64）
#[derive(Debug, Clone, Copy)]
pub struct BlockReport {
    /// 累计步数
    pub step: u64,
    /// 总质量 Σh
    pub total_mass: f64,
    /// 最小膜厚
    pub min_height: f64,
    /// 最大膜厚
    pub max_height: f64,
    /// 最大速度模
    pub max_speed: f64,
    /// 相对初始质量的漂移
    pub mass_drift: f64,
}

/// 运行时模拟接口（无泛型）
///
/// 两种精度的 `FilmSolver` 都通过本 trait 暴露给应用层，
/// 应用层以类型擦除的方式驱动运行循环。
///
/// # 示例
///
/// ```ignore
/// use flb_config::{build_simulation, SimConfig};
///
/// let config = SimConfig::default();
/// let mut sim = build_simulation(&config)?;
/// while sim.step_count() < config.run.steps {
///     let report = sim.advance(config.run.log_every)?;
///     println!("step {} mass {:.6}", report.step, report.total_mass);
/// }
/// ```
pub trait DynSimulation: Send {
    /// 推进若干步，结束时做有效性与质量守恒检查
    fn advance(&mut self, steps: u64) -> FlbResult<BlockReport>;

    /// 当前累计步数
    fn step_count(&self) -> u64;

    /// 计算精度
    fn precision(&self) -> Precision;

    /// 网格信息
    fn grid_info(&self) -> GridInfo;

    /// 当前观测快照（不推进）
    fn observables(&self) -> BlockReport;

    /// 导出膜厚场（行主序，f64）
    fn export_height(&self) -> Vec<f64>;

    /// 后端名称
    fn backend_name(&self) -> &'static str;
}

/// 按配置精度构建模拟
///
/// 验证配置、构造初始条件并完成分布初始化，返回可直接推进的
/// trait 对象。
pub fn build_simulation(config: &SimConfig) -> Result<Box<dyn DynSimulation>, ConfigError> {
    config.validate()?;
    match config.precision {
        Precision::F32 => build_typed::<f32>(config),
        Precision::F64 => build_typed::<f64>(config),
    }
}

/// 摩擦与热涨落共用的动力粘度，缺省时由 τ 导出
fn resolve_viscosity(config: &SimConfig) -> f64 {
    config
        .fluid
        .viscosity
        .unwrap_or((config.fluid.tau - 0.5) / 3.0)
}

fn build_err(e: impl std::fmt::Display) -> ConfigError {
    ConfigError::Build(e.to_string())
}

fn build_typed<S: LatticeScalar>(
    config: &SimConfig,
) -> Result<Box<dyn DynSimulation>, ConfigError> {
    let grid = PeriodicGrid::new(config.grid.nx, config.grid.ny).map_err(build_err)?;

    let params = SystemParams::<S> {
        tau: S::from_config(config.fluid.tau),
        gamma: S::from_config(config.fluid.gamma),
        wetting: WettingParams {
            theta: S::from_config(config.wetting.theta),
            n: config.wetting.n,
            m: config.wetting.m,
            h_min: S::from_config(config.wetting.h_min),
            h_crit: S::from_config(config.wetting.h_crit),
        },
        velocity_floor: S::VELOCITY_FLOOR,
    };

    let backend: Box<dyn Backend<S>> = if config.run.parallel {
        Box::new(ParallelBackend::new())
    } else {
        Box::new(SerialBackend)
    };

    let mut solver = FilmSolver::new(params, backend).map_err(build_err)?;

    if let Some(slip) = &config.forcing.slip {
        let mu = slip.viscosity.unwrap_or_else(|| resolve_viscosity(config));
        let force = SlippageForce::new(S::from_config(slip.delta), S::from_config(mu))
            .map_err(build_err)?;
        solver.add_force(Box::new(force));
    }
    if let Some(thermal) = &config.forcing.thermal {
        // 涨落耗散关系要求与摩擦项一致的 μ 和 δ
        let mu = resolve_viscosity(config);
        let delta = config.forcing.slip.as_ref().map_or(1.0, |s| s.delta);
        let force = ThermalFluctuation::new(
            S::from_config(thermal.kbt),
            S::from_config(mu),
            S::from_config(delta),
            thermal.seed,
        )
        .map_err(build_err)?;
        solver.add_force(Box::new(force));
    }
    if let Some([gx, gy]) = config.forcing.inclination {
        solver.add_force(Box::new(InclinationForce::new(
            S::from_config(gx),
            S::from_config(gy),
        )));
    }

    let height = initial_height::<S>(&grid, &config.init).map_err(build_err)?;
    let mut state = FilmState::new(grid);
    state.set_height(&height).map_err(build_err)?;
    solver.initialize(&mut state).map_err(build_err)?;

    let initial_mass = state.total_mass().to_f64_lossy();
    log::debug!(
        "构建模拟: {}x{} 网格, 精度 {}, 初始质量 {:.6}",
        config.grid.nx,
        config.grid.ny,
        config.precision,
        initial_mass
    );

    Ok(Box::new(Simulation {
        solver,
        state,
        tracker: MassTracker::new(initial_mass, config.run.mass_tolerance),
    }))
}

fn initial_height<S: LatticeScalar>(
    grid: &PeriodicGrid,
    init: &InitConfig,
) -> FlbResult<Vec<S>> {
    match init {
        InitConfig::Flat { h0 } => init::flat_film(grid, S::from_config(*h0)),
        InitConfig::Perturbed {
            h0,
            amplitude,
            waves_x,
            waves_y,
        } => init::perturbed_film(grid, S::from_config(*h0), *amplitude, *waves_x, *waves_y),
        InitConfig::Droplet {
            radius,
            theta,
            center,
            h_precursor,
        } => init::single_droplet(grid, *radius, *theta, (center[0], center[1]), *h_precursor),
        InitConfig::TwoDroplets {
            radius,
            theta,
            centers,
            h_precursor,
        } => init::two_droplets(
            grid,
            *radius,
            *theta,
            [
                (centers[0][0], centers[0][1]),
                (centers[1][0], centers[1][1]),
            ],
            *h_precursor,
        ),
        InitConfig::Rivulet {
            radius,
            theta,
            cx,
            h_precursor,
        } => init::rivulet(grid, *radius, *theta, *cx, *h_precursor),
    }
}

/// 具体精度的模拟实例
struct Simulation<S: LatticeScalar> {
    solver: FilmSolver<S>,
    state: FilmState<S>,
    tracker: MassTracker,
}

impl<S: LatticeScalar> Simulation<S> {
    fn snapshot(&self) -> BlockReport {
        let summary = self.state.summary();
        let mass = summary.total_mass.to_f64_lossy();
        BlockReport {
            step: self.solver.current_step(),
            total_mass: mass,
            min_height: summary.min_height.to_f64_lossy(),
            max_height: summary.max_height.to_f64_lossy(),
            max_speed: summary.max_speed.to_f64_lossy(),
            mass_drift: self.tracker.relative_drift(mass),
        }
    }
}

impl<S: LatticeScalar> DynSimulation for Simulation<S> {
    fn advance(&mut self, steps: u64) -> FlbResult<BlockReport> {
        self.solver.run_steps(&mut self.state, steps);
        self.state.validate()?;
        let report = self.snapshot();
        self.tracker.check(report.step, report.total_mass)?;
        Ok(report)
    }

    fn step_count(&self) -> u64 {
        self.solver.current_step()
    }

    fn precision(&self) -> Precision {
        if std::any::TypeId::of::<S>() == std::any::TypeId::of::<f32>() {
            Precision::F32
        } else {
            Precision::F64
        }
    }

    fn grid_info(&self) -> GridInfo {
        let grid = self.state.grid();
        GridInfo {
            nx: grid.nx(),
            ny: grid.ny(),
            sites: grid.len(),
        }
    }

    fn observables(&self) -> BlockReport {
        self.snapshot()
    }

    fn export_height(&self) -> Vec<f64> {
        self.state.height().iter().map(|x| x.to_f64_lossy()).collect()
    }

    fn backend_name(&self) -> &'static str {
        self.solver.backend_name()
    }
}
