//! Sampled execution primitives for digital duty commands.
//!
//! A command may update at a configured rate that is slower than the plant
//! tick. Between samples its output is held constant (zero-order hold).

use bs_core::ensure_positive;
use serde::{Deserialize, Serialize};

use crate::error::ControlResult;

/// Slack applied when comparing a tick time against the next sample time.
///
/// Tick times are computed as `k * ts` while sample times accumulate
/// `+= dt`, so the two drift apart by a few ulps.
const SAMPLE_TIME_EPS: f64 = 1e-12;

/// Sample configuration for a command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Sample period in seconds.
    pub dt: f64,
}

impl SampleConfig {
    /// Create a new sample configuration.
    ///
    /// # Arguments
    ///
    /// * `dt` - Sample period in seconds (must be positive and finite)
    pub fn new(dt: f64) -> ControlResult<Self> {
        let dt = ensure_positive(dt, "sample period must be positive")?;
        Ok(Self { dt })
    }

    /// Create a sample configuration from frequency in Hz.
    pub fn from_frequency(freq_hz: f64) -> ControlResult<Self> {
        let freq_hz = ensure_positive(freq_hz, "sample frequency must be positive")?;
        Ok(Self { dt: 1.0 / freq_hz })
    }

    /// Get the sample frequency in Hz.
    pub fn frequency(&self) -> f64 {
        1.0 / self.dt
    }
}

/// Sample clock tracks when a command should execute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleClock {
    /// Sample configuration.
    pub config: SampleConfig,
    /// Time of next scheduled sample.
    pub next_sample_time: f64,
}

impl SampleClock {
    /// Create a clock whose first sample is one period after `initial_time`.
    pub fn new(config: SampleConfig, initial_time: f64) -> Self {
        Self {
            config,
            next_sample_time: initial_time + config.dt,
        }
    }

    /// Create a clock whose first sample is due at `initial_time` itself.
    pub fn immediate(config: SampleConfig, initial_time: f64) -> Self {
        Self {
            config,
            next_sample_time: initial_time,
        }
    }

    /// Returns `true` if `current_time` has reached the next sample time.
    pub fn should_sample(&self, current_time: f64) -> bool {
        current_time + SAMPLE_TIME_EPS >= self.next_sample_time
    }

    /// Advance to the next sample time.
    pub fn advance(&mut self) {
        self.next_sample_time += self.config.dt;
    }

    /// Reset the clock to a new time.
    pub fn reset(&mut self, current_time: f64) {
        self.next_sample_time = current_time + self.config.dt;
    }

    /// Get the time until the next sample.
    pub fn time_until_sample(&self, current_time: f64) -> f64 {
        (self.next_sample_time - current_time).max(0.0)
    }
}

/// Zero-order hold for a command output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroOrderHold {
    /// Held value.
    pub value: f64,
    /// Sample clock.
    pub clock: SampleClock,
}

impl ZeroOrderHold {
    /// Create a new zero-order hold.
    pub fn new(clock: SampleClock, initial_value: f64) -> Self {
        Self {
            value: initial_value,
            clock,
        }
    }

    /// Get the current held value.
    pub fn get(&self) -> f64 {
        self.value
    }

    /// Whether a new value would be accepted at `current_time`.
    pub fn is_due(&self, current_time: f64) -> bool {
        self.clock.should_sample(current_time)
    }

    /// Update the held value (if a sample should occur).
    ///
    /// Returns `true` if the value was updated.
    pub fn update(&mut self, current_time: f64, new_value: f64) -> bool {
        if self.clock.should_sample(current_time) {
            self.value = new_value;
            self.clock.advance();
            true
        } else {
            false
        }
    }
}
