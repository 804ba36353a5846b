//! Duty-cycle command primitives for boostsim.
//!
//! The plant never owns its control input: every propagation step receives
//! the duty cycle explicitly. This crate provides the producers of that
//! input.
//!
//! # Architecture
//!
//! - [`DutyCommand`] is asked for a duty cycle once per tick, given the
//!   latest plant measurement.
//! - [`ConstantDuty`] is the open-loop command.
//! - [`SampledCommand`] runs any command at its own, slower update rate and
//!   holds the result in between (zero-order hold).

pub mod command;
pub mod error;
pub mod sampled;

pub use command::{ConstantDuty, DutyCommand, Measurement, SampledCommand};
pub use error::{ControlError, ControlResult};
pub use sampled::{SampleClock, SampleConfig, ZeroOrderHold};
