//! Run execution service.

use std::time::Instant;

use bs_project::{DropDef, InitMode, IntegratorKind, SimConfig, SourceDef};
use bs_sim::{
    BoostPlant, DriverOptions, IntegratorType, Parasitics, PlantParams, PlantState,
    PropagateOptions, SimProgress, Trajectory, VinSource, operating_point, steady_state_ic,
    step_at,
};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::summary::TrajectorySummary;

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub initial_state: PlantState,
    pub trajectory: Trajectory,
    pub summary: TrajectorySummary,
    pub elapsed_wall_s: f64,
}

/// Input voltage profile described by the `source` section.
pub fn build_source(source: &SourceDef) -> VinSource {
    match &source.drop {
        None => VinSource::constant(source.vin_v),
        Some(DropDef {
            level_v,
            t_drop_s,
            t_recover_s,
        }) => {
            let profile = step_at(*t_drop_s, source.vin_v, *level_v);
            match t_recover_s {
                Some(t) => profile.with_recovery(*t).into(),
                None => profile.into(),
            }
        }
    }
}

pub fn build_params(config: &SimConfig) -> AppResult<PlantParams> {
    bs_project::validate_config(config)?;
    let plant = &config.plant;
    let par = &plant.parasitics;
    let parasitics = Parasitics::new(par.rl_ohm, par.rds_ohm, par.vf_v, par.rf_ohm)?;
    let params = PlantParams::new(
        plant.inductance_h,
        plant.capacitance_f,
        build_source(&config.source),
        plant.load_ohm,
    )?
    .with_duty_limits(plant.d_min, plant.d_max)?
    .with_parasitics(parasitics)
    .with_non_ideal(plant.non_ideal);
    Ok(params)
}

pub fn propagate_options(config: &SimConfig) -> PropagateOptions {
    PropagateOptions {
        integrator: match config.run.integrator {
            IntegratorKind::Rk4 => IntegratorType::RK4,
            IntegratorKind::Euler => IntegratorType::ForwardEuler,
        },
        substeps: config.run.substeps,
    }
}

/// Build the plant and place it in the configured initial state.
pub fn build_plant(config: &SimConfig) -> AppResult<BoostPlant> {
    let params = build_params(config)?;
    let x0 = initial_state(config.run.init, &params, config.run.duty)?;
    let mut plant = BoostPlant::with_options(params, propagate_options(config))?;
    plant.reset(x0)?;
    Ok(plant)
}

/// Initial `(iL, vo)` for a plant built from `params`.
///
/// `Equilibrium` uses the ideal operating point at the source's baseline
/// input and the commanded (unsaturated) duty, regardless of `non_ideal`.
/// A source without a baseline value cannot seed an equilibrium start.
pub fn initial_state(init: InitMode, params: &PlantParams, duty: f64) -> AppResult<PlantState> {
    match init {
        InitMode::Zero => Ok(PlantState::default()),
        InitMode::Equilibrium => {
            let vin = params.vin().baseline().ok_or_else(|| {
                AppError::InvalidInput(
                    "equilibrium start needs an input source with a baseline value".to_string(),
                )
            })?;
            Ok(steady_state_ic(vin, params.load_ohm(), duty).into())
        }
    }
}

/// Execute the open-loop run a config describes.
pub fn run(config: &SimConfig) -> AppResult<RunResponse> {
    run_with_progress(config, |_| {})
}

/// Same as [`run`], forwarding per-tick progress to `on_step`.
pub fn run_with_progress<F>(config: &SimConfig, mut on_step: F) -> AppResult<RunResponse>
where
    F: FnMut(&SimProgress),
{
    let started = Instant::now();
    let mut plant = build_plant(config)?;
    let initial_state = plant.state();
    let opts = DriverOptions::new(config.run.ts_s, config.run.duration_s)?;
    info!(
        duty = config.run.duty,
        init = ?config.run.init,
        non_ideal = config.plant.non_ideal,
        time_varying_input = plant.params().vin().is_time_varying(),
        n_steps = opts.n_steps(),
        "running open loop"
    );

    let report_every = (opts.n_steps() / 10).max(1);
    let trajectory = bs_sim::run_with_progress(
        &mut plant,
        bs_controls::ConstantDuty(config.run.duty),
        &opts,
        |p| {
            if p.step % report_every == 0 {
                debug!(
                    percent = 100.0 * p.fraction_complete(),
                    t = p.t,
                    "progress"
                );
            }
            on_step(p);
        },
    )?;

    let summary = TrajectorySummary::from_trajectory(&trajectory)
        .ok_or_else(|| AppError::InvalidInput("run produced no samples".to_string()))?;
    let elapsed_wall_s = started.elapsed().as_secs_f64();
    info!(
        final_vo = summary.final_vo,
        final_il = summary.final_il,
        elapsed_wall_s,
        "run finished"
    );

    Ok(RunResponse {
        initial_state,
        trajectory,
        summary,
        elapsed_wall_s,
    })
}

/// Operating points for a given input, load and duty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibriumReport {
    /// Duty after saturation, used for the loss-aware point
    pub duty_applied: f64,
    /// Lossless converter at the requested duty
    pub ideal: PlantState,
    /// Configured converter at the saturated duty; parasitics count only
    /// when `non_ideal` is set
    pub lossy: PlantState,
}

/// Compute operating points using the plant section of `config` for
/// everything except input, load and duty.
pub fn equilibrium(
    config: &SimConfig,
    vin: f64,
    load_ohm: f64,
    duty: f64,
) -> AppResult<EquilibriumReport> {
    if !vin.is_finite() {
        return Err(AppError::InvalidInput(format!(
            "vin must be finite, got {vin}"
        )));
    }
    if !(duty.is_finite() && load_ohm.is_finite() && load_ohm > 0.0) {
        return Err(AppError::InvalidInput(format!(
            "need finite duty and positive load, got duty={duty} R={load_ohm}"
        )));
    }

    let mut config = config.clone();
    config.source = SourceDef {
        vin_v: vin,
        drop: None,
    };
    config.plant.load_ohm = load_ohm;
    let params = build_params(&config)?;

    let duty_applied = params.duty_limits().clamp(duty);
    Ok(EquilibriumReport {
        duty_applied,
        ideal: steady_state_ic(vin, load_ohm, duty).into(),
        lossy: operating_point(&params, vin, duty_applied),
    })
}
