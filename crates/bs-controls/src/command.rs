//! Duty-cycle commands.
//!
//! A command is consulted once per plant tick, before the plant is
//! propagated over that tick. The value it returns is held for the whole
//! tick. Commands may return values outside the plant's duty limits; the
//! plant saturates them.

use serde::{Deserialize, Serialize};

use crate::error::ControlResult;
use crate::sampled::{SampleClock, SampleConfig, ZeroOrderHold};

/// Plant measurement available to a command at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurement {
    /// Tick start time (s)
    pub t: f64,
    /// Inductor current (A)
    pub il: f64,
    /// Output voltage (V)
    pub vo: f64,
}

/// Produces the duty cycle to hold over the next tick.
pub trait DutyCommand {
    /// Duty cycle for the tick starting at `measurement.t`.
    fn duty(&mut self, measurement: &Measurement) -> f64;
}

impl<C: DutyCommand + ?Sized> DutyCommand for &mut C {
    fn duty(&mut self, measurement: &Measurement) -> f64 {
        (**self).duty(measurement)
    }
}

/// Open-loop command: the same duty on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantDuty(pub f64);

impl DutyCommand for ConstantDuty {
    fn duty(&mut self, _measurement: &Measurement) -> f64 {
        self.0
    }
}

/// Runs an inner command at its own sample rate, holding its output between
/// samples.
///
/// The inner command is only invoked when a sample is due, so any state it
/// keeps advances at the sample rate rather than the plant tick rate.
#[derive(Debug, Clone)]
pub struct SampledCommand<C> {
    inner: C,
    hold: ZeroOrderHold,
}

impl<C: DutyCommand> SampledCommand<C> {
    /// Wrap `inner`, sampling it first at `initial_time` and every
    /// `config.dt` after that.
    pub fn new(inner: C, config: SampleConfig, initial_time: f64) -> Self {
        Self {
            inner,
            hold: ZeroOrderHold::new(SampleClock::immediate(config, initial_time), 0.0),
        }
    }

    /// Convenience constructor from a sample period in seconds.
    pub fn with_period(inner: C, dt: f64, initial_time: f64) -> ControlResult<Self> {
        Ok(Self::new(inner, SampleConfig::new(dt)?, initial_time))
    }

    /// The value currently being held.
    pub fn held(&self) -> f64 {
        self.hold.get()
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: DutyCommand> DutyCommand for SampledCommand<C> {
    fn duty(&mut self, measurement: &Measurement) -> f64 {
        if self.hold.is_due(measurement.t) {
            let value = self.inner.duty(measurement);
            self.hold.update(measurement.t, value);
        }
        self.hold.get()
    }
}
