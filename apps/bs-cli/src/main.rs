use bs_app::{AppResult, RunResponse, TrajectorySummary};
use bs_project::{DropDef, InitMode, IntegratorKind, SimConfig};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uom::si::electric_current::ampere;
use uom::si::electric_potential::volt;
use uom::si::time::millisecond;

#[derive(Parser)]
#[command(name = "boostsim")]
#[command(about = "Averaged DC-DC boost converter simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an open-loop simulation
    Run(RunArgs),
    /// Validate config file syntax and values
    Validate {
        /// Path to the config file (YAML or JSON)
        config_path: PathBuf,
    },
    /// Print the operating point for an input, load and duty
    Equilibrium(EquilibriumArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Config file to start from (defaults to the reference bench)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Inductance L (H)
    #[arg(long)]
    inductance: Option<f64>,
    /// Output capacitance C (F)
    #[arg(long)]
    capacitance: Option<f64>,
    /// Baseline input voltage (V)
    #[arg(long)]
    vin: Option<f64>,
    /// Input voltage during the drop (V)
    #[arg(long)]
    vin_drop: Option<f64>,
    /// Keep the input constant
    #[arg(long, conflicts_with_all = ["vin_drop", "t_drop", "t_recover", "no_recover"])]
    no_drop: bool,
    /// Time of the input drop (s)
    #[arg(long)]
    t_drop: Option<f64>,
    /// Time the input returns to baseline (s)
    #[arg(long)]
    t_recover: Option<f64>,
    /// Make the drop permanent
    #[arg(long, conflicts_with = "t_recover")]
    no_recover: bool,
    /// Load resistance R (ohm)
    #[arg(long)]
    load: Option<f64>,
    /// Commanded duty cycle
    #[arg(long)]
    duty: Option<f64>,
    /// Sample period Ts (s)
    #[arg(long)]
    ts: Option<f64>,
    /// Simulated duration (s)
    #[arg(long)]
    duration: Option<f64>,
    /// Initial state
    #[arg(long, value_enum)]
    init: Option<InitArg>,
    /// Enable parasitic losses
    #[arg(long, conflicts_with = "ideal")]
    non_ideal: bool,
    /// Disable parasitic losses
    #[arg(long)]
    ideal: bool,
    /// Inductor winding resistance (ohm)
    #[arg(long)]
    rl: Option<f64>,
    /// Switch on-resistance (ohm)
    #[arg(long)]
    rds: Option<f64>,
    /// Diode forward voltage (V)
    #[arg(long)]
    vf: Option<f64>,
    /// Diode resistance (ohm)
    #[arg(long)]
    rf: Option<f64>,
    /// Integration scheme
    #[arg(long, value_enum)]
    integrator: Option<IntegratorArg>,
    /// Integration sub-steps per sample period
    #[arg(long)]
    substeps: Option<usize>,
    /// Write `t,iL,vo` CSV to stdout instead of the summary
    #[arg(long)]
    csv: bool,
}

#[derive(Args, Debug)]
struct EquilibriumArgs {
    /// Config file supplying duty limits and parasitics
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Input voltage (V)
    #[arg(long)]
    vin: Option<f64>,
    /// Load resistance (ohm)
    #[arg(long = "r", alias = "load")]
    r: Option<f64>,
    /// Duty cycle
    #[arg(long)]
    duty: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum InitArg {
    Zero,
    #[value(alias = "equilibrium")]
    Equil,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum IntegratorArg {
    Rk4,
    Euler,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => cmd_run(&args),
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Equilibrium(args) => cmd_equilibrium(&args),
    }
}

fn base_config(path: Option<&Path>) -> AppResult<SimConfig> {
    match path {
        Some(path) => bs_app::load_config(path),
        None => Ok(SimConfig::default()),
    }
}

fn apply_overrides(config: &mut SimConfig, args: &RunArgs) {
    let plant = &mut config.plant;
    if let Some(v) = args.inductance {
        plant.inductance_h = v;
    }
    if let Some(v) = args.capacitance {
        plant.capacitance_f = v;
    }
    if let Some(v) = args.load {
        plant.load_ohm = v;
    }
    if args.non_ideal {
        plant.non_ideal = true;
    }
    if args.ideal {
        plant.non_ideal = false;
    }
    let par = &mut plant.parasitics;
    if let Some(v) = args.rl {
        par.rl_ohm = v;
    }
    if let Some(v) = args.rds {
        par.rds_ohm = v;
    }
    if let Some(v) = args.vf {
        par.vf_v = v;
    }
    if let Some(v) = args.rf {
        par.rf_ohm = v;
    }

    let source = &mut config.source;
    if let Some(v) = args.vin {
        source.vin_v = v;
    }
    if args.no_drop {
        source.drop = None;
    } else if args.vin_drop.is_some()
        || args.t_drop.is_some()
        || args.t_recover.is_some()
        || args.no_recover
    {
        let drop = source.drop.get_or_insert_with(DropDef::default);
        if let Some(v) = args.vin_drop {
            drop.level_v = v;
        }
        if let Some(v) = args.t_drop {
            drop.t_drop_s = v;
        }
        if let Some(v) = args.t_recover {
            drop.t_recover_s = Some(v);
        }
        if args.no_recover {
            drop.t_recover_s = None;
        }
    }

    let run = &mut config.run;
    if let Some(v) = args.duty {
        run.duty = v;
    }
    if let Some(v) = args.ts {
        run.ts_s = v;
    }
    if let Some(v) = args.duration {
        run.duration_s = v;
    }
    if let Some(init) = args.init {
        run.init = match init {
            InitArg::Zero => InitMode::Zero,
            InitArg::Equil => InitMode::Equilibrium,
        };
    }
    if let Some(integrator) = args.integrator {
        run.integrator = match integrator {
            IntegratorArg::Rk4 => IntegratorKind::Rk4,
            IntegratorArg::Euler => IntegratorKind::Euler,
        };
    }
    if let Some(v) = args.substeps {
        run.substeps = v;
    }
}

fn cmd_run(args: &RunArgs) -> AppResult<()> {
    let mut config = base_config(args.config.as_deref())?;
    apply_overrides(&mut config, args);
    debug!(?config, "effective config");

    let response = bs_app::run(&config)?;
    if args.csv {
        let stdout = io::stdout();
        bs_app::write_csv(&response.trajectory, BufWriter::new(stdout.lock()))?;
    } else {
        print_run_summary(&config, &response);
    }
    Ok(())
}

fn print_run_summary(config: &SimConfig, response: &RunResponse) {
    let summary: &TrajectorySummary = &response.summary;
    println!("✓ Simulation completed");
    println!(
        "  L = {:.3e} H, C = {:.3e} F, R = {:.3} ohm, duty = {:.3}",
        config.plant.inductance_h,
        config.plant.capacitance_f,
        config.plant.load_ohm,
        config.run.duty
    );
    println!(
        "  Initial state: iL = {:.4} A, vo = {:.4} V",
        response.initial_state.il, response.initial_state.vo
    );
    println!(
        "  Samples: {} (t_end = {:.3} ms)",
        summary.sample_count,
        summary.t_end().get::<millisecond>()
    );
    println!(
        "  Final:   iL = {:.4} A, vo = {:.4} V",
        summary.final_inductor_current().get::<ampere>(),
        summary.final_output_voltage().get::<volt>()
    );
    println!(
        "  vo range: [{:.4}, {:.4}] V (overshoot {:.4} V)",
        summary.vo_min,
        summary.vo_max,
        summary.overshoot_v()
    );
    println!("  iL range: [{:.4}, {:.4}] A", summary.il_min, summary.il_max);
    println!("  Wall time: {:.3}s", response.elapsed_wall_s);
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating config: {}", config_path.display());
    let config = bs_app::validate_file(config_path)?;
    println!("✓ Config is valid");
    println!(
        "  {} ticks of {:.3e} s, duty = {:.3}, init = {:?}",
        bs_core::whole_steps(config.run.duration_s, config.run.ts_s),
        config.run.ts_s,
        config.run.duty,
        config.run.init
    );
    Ok(())
}

fn cmd_equilibrium(args: &EquilibriumArgs) -> AppResult<()> {
    let config = base_config(args.config.as_deref())?;
    let vin = args.vin.unwrap_or(config.source.vin_v);
    let r = args.r.unwrap_or(config.plant.load_ohm);
    let duty = args.duty.unwrap_or(config.run.duty);

    let report = bs_app::equilibrium(&config, vin, r, duty)?;
    println!("Operating point for Vin = {vin} V, R = {r} ohm, duty = {duty}");
    println!(
        "  Ideal:    iL = {:.4} A, vo = {:.4} V",
        report.ideal.il, report.ideal.vo
    );
    println!(
        "  Modelled: iL = {:.4} A, vo = {:.4} V (duty applied {:.3})",
        report.lossy.il, report.lossy.vo, report.duty_applied
    );
    Ok(())
}
