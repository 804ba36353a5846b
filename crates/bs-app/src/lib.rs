//! Shared application service layer for boostsim.
//!
//! Turns a validated [`bs_project::SimConfig`] into a plant, runs it and
//! condenses the result for the CLI.

pub mod config_service;
pub mod error;
pub mod export;
pub mod run_service;
pub mod summary;

pub use config_service::{load_config, validate_file};
pub use error::{AppError, AppResult};
pub use export::write_csv;
pub use run_service::{
    EquilibriumReport, RunResponse, build_params, build_plant, build_source, equilibrium,
    initial_state, propagate_options, run, run_with_progress,
};
pub use summary::TrajectorySummary;
