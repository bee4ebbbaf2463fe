// crates/flb_physics/src/engine/solver.rs

//! 薄膜求解器
//!
//! 每个时间步按固定顺序执行六个阶段：
//!
//! ```text
//! 1. 压力        p = −γ∇²h + Π(h)
//! 2. 压力梯度    ∇p
//! 3. 合力        F = −h·∇p + Σ 外力项
//! 4. 平衡分布    f_eq(h, v)
//! 5. 碰撞迁移    f_tmp = 碰撞(f_pop, f_eq, F)，f_pop = 迁移(f_tmp)
//! 6. 矩          (h, v) = 矩(f_pop)
//! ```
//!
//! 参数在构造时校验一次，之后保持只读；全部可变状态都在
//! [`FilmState`] 里，同一个求解器可以推进多个状态实例。

use flb_foundation::{FlbResult, LatticeScalar};

use crate::backend::Backend;
use crate::engine::diagnostics::MassTracker;
use crate::forcing::{ForceContext, ForceTerm};
use crate::grid::PeriodicGrid;
use crate::params::SystemParams;
use crate::pressure::FilmPressure;
use crate::state::FilmState;

/// 单步报告
#[derive(Debug, Clone, Copy)]
pub struct StepReport<S> {
    /// 本步结束后的累计步数
    pub step: u64,
    /// 总质量 Σh
    pub total_mass: S,
    /// 最小膜厚
    pub min_height: S,
    /// 最大膜厚
    pub max_height: S,
    /// 最大速度模
    pub max_speed: S,
}

/// 监控运行的汇总
#[derive(Debug, Clone, Copy)]
pub struct RunSummary<S> {
    /// 本次运行推进的步数
    pub steps: u64,
    /// 运行前的总质量
    pub initial_mass: S,
    /// 相对质量漂移
    pub mass_drift: f64,
    /// 末步报告
    pub last: StepReport<S>,
}

/// 薄膜格子 Boltzmann 求解器
pub struct FilmSolver<S: LatticeScalar> {
    params: SystemParams<S>,
    pressure: FilmPressure<S>,
    backend: Box<dyn Backend<S>>,
    forces: Vec<Box<dyn ForceTerm<S>>>,
    step: u64,
}

impl<S: LatticeScalar> FilmSolver<S> {
    /// 创建求解器
    ///
    /// 参数在此处一次性校验，非法参数直接拒绝。
    pub fn new(params: SystemParams<S>, backend: Box<dyn Backend<S>>) -> FlbResult<Self> {
        params.validate()?;
        let pressure = FilmPressure::new(&params);
        log::debug!(
            "创建求解器: tau={}, gamma={}, 后端={}",
            params.tau.to_f64_lossy(),
            params.gamma.to_f64_lossy(),
            backend.name()
        );
        Ok(Self {
            params,
            pressure,
            backend,
            forces: Vec::new(),
            step: 0,
        })
    }

    /// 系统参数
    #[inline]
    pub fn params(&self) -> &SystemParams<S> {
        &self.params
    }

    /// 后端名称
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// 累计步数
    #[inline]
    pub fn current_step(&self) -> u64 {
        self.step
    }

    /// 设定逐格点接触角（图案化润湿性）
    pub fn set_contact_angle_field(
        &mut self,
        grid: &PeriodicGrid,
        theta: &[S],
    ) -> FlbResult<()> {
        self.pressure.set_contact_angle_field(grid, theta)?;
        log::debug!("启用图案化接触角（{} 格点）", theta.len());
        Ok(())
    }

    /// 注册一个外力项
    ///
    /// 累加顺序即注册顺序。被禁用的力项仍然保留，每步跳过。
    pub fn add_force(&mut self, force: Box<dyn ForceTerm<S>>) {
        log::debug!(
            "注册外力项: {} ({})",
            force.name(),
            if force.is_enabled() { "启用" } else { "禁用" }
        );
        self.forces.push(force);
    }

    /// 从当前膜厚初始化分布函数
    ///
    /// 速度、压力与力场清零，`f_pop` 置为静止平衡分布，步数归零。
    pub fn initialize(&mut self, state: &mut FilmState<S>) -> FlbResult<()> {
        state.validate()?;
        let grid = state.grid();

        state.vel_x.fill(S::ZERO);
        state.vel_y.fill(S::ZERO);
        state.pressure.fill(S::ZERO);
        state.grad_p_x.fill(S::ZERO);
        state.grad_p_y.fill(S::ZERO);
        state.force_x.fill(S::ZERO);
        state.force_y.fill(S::ZERO);
        state.f_tmp.fill(S::ZERO);

        self.backend.equilibrium(
            &grid,
            &state.height,
            &state.vel_x,
            &state.vel_y,
            &mut state.f_eq,
        );
        state.f_pop.copy_from(&state.f_eq);
        self.step = 0;
        log::debug!("初始化完成: {}x{} 格点", grid.nx(), grid.ny());
        Ok(())
    }

    /// 推进一个时间步
    pub fn step(&mut self, state: &mut FilmState<S>) -> StepReport<S> {
        let grid = state.grid();

        // 1. 薄膜压力
        self.pressure.compute_into(
            &grid,
            self.backend.as_ref(),
            &state.height,
            &mut state.pressure,
        );

        // 2. 压力梯度
        self.backend.gradient(
            &grid,
            &state.pressure,
            &mut state.grad_p_x,
            &mut state.grad_p_y,
            S::ONE,
        );

        // 3. 合力：压力梯度项打底，再累加外力项
        for i in 0..grid.len() {
            state.force_x[i] = -(state.height[i] * state.grad_p_x[i]);
            state.force_y[i] = -(state.height[i] * state.grad_p_y[i]);
        }
        let ctx = ForceContext { step: self.step };
        for term in self.forces.iter_mut() {
            if term.is_enabled() {
                term.accumulate(
                    &ctx,
                    &grid,
                    &state.height,
                    &state.vel_x,
                    &state.vel_y,
                    &mut state.force_x,
                    &mut state.force_y,
                );
            }
        }

        // 4. 平衡分布
        self.backend.equilibrium(
            &grid,
            &state.height,
            &state.vel_x,
            &state.vel_y,
            &mut state.f_eq,
        );

        // 5. 碰撞 + 迁移
        self.backend.collide_stream(
            &grid,
            self.params.tau,
            &state.f_eq,
            &mut state.f_pop,
            &mut state.f_tmp,
            &state.force_x,
            &state.force_y,
        );

        // 6. 宏观量
        self.backend.moments(
            &grid,
            &state.f_pop,
            &mut state.height,
            &mut state.vel_x,
            &mut state.vel_y,
            self.params.velocity_floor,
        );

        self.step += 1;
        self.report(state)
    }

    /// 连续推进 `steps` 步，返回末步报告
    pub fn run_steps(&mut self, state: &mut FilmState<S>, steps: u64) -> StepReport<S> {
        let mut last = self.report(state);
        for _ in 0..steps {
            last = self.step(state);
        }
        last
    }

    /// 带质量监控的运行
    ///
    /// 每 `check_every` 步校验一次场的数值健康与质量漂移，超出
    /// `mass_tolerance`（相对值）时返回错误。`check_every = 0`
    /// 表示只在结束时检查一次。
    pub fn run_monitored(
        &mut self,
        state: &mut FilmState<S>,
        steps: u64,
        check_every: u64,
        mass_tolerance: f64,
    ) -> FlbResult<RunSummary<S>> {
        let initial_mass = state.total_mass();
        let mut tracker = MassTracker::new(initial_mass.to_f64_lossy(), mass_tolerance);

        let mut last = self.report(state);
        for _ in 0..steps {
            last = self.step(state);
            if check_every > 0 && last.step % check_every == 0 {
                state.validate()?;
                tracker.check(last.step, last.total_mass.to_f64_lossy())?;
                log::debug!(
                    "步 {}: 质量 {:.6e}, 膜厚 [{:.3e}, {:.3e}], 最大速度 {:.3e}",
                    last.step,
                    last.total_mass.to_f64_lossy(),
                    last.min_height.to_f64_lossy(),
                    last.max_height.to_f64_lossy(),
                    last.max_speed.to_f64_lossy()
                );
            }
        }

        state.validate()?;
        tracker.check(last.step, last.total_mass.to_f64_lossy())?;

        Ok(RunSummary {
            steps,
            initial_mass,
            mass_drift: tracker.relative_drift(last.total_mass.to_f64_lossy()),
            last,
        })
    }

    fn report(&self, state: &FilmState<S>) -> StepReport<S> {
        let summary = state.summary();
        StepReport {
            step: self.step,
            total_mass: summary.total_mass,
            min_height: summary.min_height,
            max_height: summary.max_height,
            max_speed: summary.max_speed,
        }
    }
}
