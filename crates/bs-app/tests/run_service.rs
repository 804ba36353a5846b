use std::path::PathBuf;

use bs_app::{
    AppError, TrajectorySummary, build_params, build_plant, build_source, equilibrium,
    initial_state, load_config, run, run_with_progress, validate_file,
};
use bs_project::{DropDef, InitMode, IntegratorKind, SimConfig, SourceDef};
use bs_sim::{PlantParams, PlantState, VinSource, operating_point};

fn config_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // crates
    path.pop(); // repo root
    path.push("configs");
    path.push(name);
    path
}

fn ideal_constant() -> SimConfig {
    let mut config = SimConfig::default();
    config.plant.non_ideal = false;
    config.source.drop = None;
    config
}

#[test]
fn reference_config_file_matches_defaults() {
    let config = load_config(&config_path("reference.yaml")).unwrap();
    assert_eq!(config, SimConfig::default());
    validate_file(&config_path("ideal_equilibrium.yaml")).unwrap();
}

#[test]
fn missing_file_reports_path() {
    let err = load_config(&config_path("does_not_exist.yaml")).unwrap_err();
    match err {
        AppError::ConfigFileRead { path, .. } => {
            assert!(path.ends_with("does_not_exist.yaml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn reference_run_recovers_to_lossy_operating_point() {
    let config = SimConfig::default();
    let response = run(&config).unwrap();

    assert_eq!(response.initial_state, PlantState::default());
    assert_eq!(response.trajectory.len(), 2000);
    let summary = &response.summary;
    assert_eq!(summary.sample_count, 2000);
    assert!((summary.t_end_s - 0.2).abs() < 1e-12);

    let plant = build_plant(&config).unwrap();
    let target = operating_point(plant.params(), 24.0, 0.55);
    assert!((summary.final_vo - target.vo).abs() < 1e-3 * target.vo);
    assert!((summary.final_il - target.il).abs() < 1e-3 * target.il);
    // Startup from rest overshoots the settled output.
    assert!(summary.vo_max > summary.final_vo);
}

#[test]
fn ideal_equilibrium_start_stays_put() {
    let mut config = ideal_constant();
    config.run.init = InitMode::Equilibrium;
    config.run.duration_s = 0.02;

    let response = run(&config).unwrap();
    let expected = 24.0 / 0.45;
    assert!((response.initial_state.vo - expected).abs() < 1e-9);
    for &vo in &response.trajectory.vo {
        assert!((vo - expected).abs() < 1e-9 * expected);
    }
}

#[test]
fn equilibrium_init_uses_baseline_input_and_raw_duty() {
    let mut config = SimConfig::default();
    config.run.init = InitMode::Equilibrium;
    config.run.duty = 0.995;

    let params = build_params(&config).unwrap();
    let x0 = initial_state(config.run.init, &params, config.run.duty).unwrap();
    assert!((x0.vo - 24.0 / 0.005).abs() < 1e-6);
    assert_eq!(build_plant(&config).unwrap().state(), x0);
}

#[test]
fn equilibrium_init_needs_a_baseline_input() {
    let params = PlantParams::new(100e-6, 1e-3, VinSource::function(|t| 24.0 + t), 4.5).unwrap();
    assert!(matches!(
        initial_state(InitMode::Equilibrium, &params, 0.55),
        Err(AppError::InvalidInput(_))
    ));
    assert_eq!(
        initial_state(InitMode::Zero, &params, 0.55).unwrap(),
        PlantState::default()
    );
}

#[test]
fn euler_and_rk4_agree_on_settled_output() {
    let mut rk4 = ideal_constant();
    rk4.run.duration_s = 0.1;
    let mut euler = rk4.clone();
    euler.run.integrator = IntegratorKind::Euler;
    euler.run.substeps = 200;

    let a = run(&rk4).unwrap().summary;
    let b = run(&euler).unwrap().summary;
    assert!((a.final_vo - b.final_vo).abs() < 1e-2 * a.final_vo);
}

#[test]
fn progress_reaches_completion() {
    let mut config = SimConfig::default();
    config.run.duration_s = 0.01;
    let mut calls = 0;
    let mut last_fraction = 0.0;
    run_with_progress(&config, |p| {
        calls += 1;
        last_fraction = p.fraction_complete();
    })
    .unwrap();
    assert_eq!(calls, 100);
    assert!((last_fraction - 1.0).abs() < 1e-12);
}

#[test]
fn invalid_config_is_rejected_before_running() {
    let mut config = SimConfig::default();
    config.plant.load_ohm = 0.0;
    assert!(matches!(run(&config), Err(AppError::Config(_))));
}

#[test]
fn source_section_maps_to_profiles() {
    let constant = build_source(&SourceDef {
        vin_v: 12.0,
        drop: None,
    });
    assert!(!constant.is_time_varying());
    assert_eq!(constant.evaluate(1.0).unwrap(), 12.0);

    let permanent = build_source(&SourceDef {
        vin_v: 12.0,
        drop: Some(DropDef {
            level_v: 5.0,
            t_drop_s: 0.01,
            t_recover_s: None,
        }),
    });
    assert_eq!(permanent.evaluate(0.0).unwrap(), 12.0);
    assert_eq!(permanent.evaluate(10.0).unwrap(), 5.0);

    let recovering = build_source(&SourceDef::default());
    assert_eq!(recovering.evaluate(0.075).unwrap(), 10.0);
    assert_eq!(recovering.evaluate(0.15).unwrap(), 24.0);
}

#[test]
fn equilibrium_report() {
    let config = SimConfig::default();
    let report = equilibrium(&config, 24.0, 4.5, 0.55).unwrap();
    assert_eq!(report.duty_applied, 0.55);
    assert!((report.ideal.vo - 24.0 / 0.45).abs() < 1e-9);
    // Winding resistance costs output voltage.
    assert!(report.lossy.vo < report.ideal.vo);
    let expected = 24.0 / (0.45 + 0.08 / (4.5 * 0.45));
    assert!((report.lossy.vo - expected).abs() < 1e-9);

    let saturated = equilibrium(&config, 24.0, 4.5, 0.999).unwrap();
    assert_eq!(saturated.duty_applied, 0.98);

    assert!(equilibrium(&config, 24.0, 0.0, 0.5).is_err());
    assert!(equilibrium(&config, f64::NAN, 4.5, 0.5).is_err());
}

#[test]
fn summary_matches_trajectory() {
    let mut config = ideal_constant();
    config.run.duration_s = 0.01;
    let response = run(&config).unwrap();
    assert_eq!(
        TrajectorySummary::from_trajectory(&response.trajectory),
        Some(response.summary)
    );
}
