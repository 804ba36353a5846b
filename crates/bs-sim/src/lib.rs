//! Averaged boost converter simulation.
//!
//! Provides:
//! - Parasitic and plant parameter descriptors with construction-time validation
//! - Constant, step-profile and arbitrary time-varying input voltage sources
//! - Two-state averaged boost plant propagated over zero-order-hold duty intervals
//! - Fixed-step RK4 and forward Euler integrators
//! - Ideal and loss-aware equilibrium initializers
//! - Fixed-period driver loop producing `(t, iL, vo)` trajectories

pub mod equilibrium;
pub mod error;
pub mod integrator;
pub mod model;
pub mod parasitics;
pub mod params;
pub mod plant;
pub mod sim;
pub mod source;

// Re-exports for public API
pub use equilibrium::{DENOMINATOR_FLOOR, operating_point, steady_state_ic};
pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator, IntegratorType, RK4};
pub use model::TransientModel;
pub use parasitics::Parasitics;
pub use params::{DutyLimits, PlantParams};
pub use plant::{BoostPlant, PlantOutput, PlantState, PropagateOptions};
pub use sim::{
    DriverOptions, SimProgress, Trajectory, TrajectorySample, run_open_loop, run_with_command,
    run_with_progress,
};
pub use source::{StepProfile, VinSource, step_at};
