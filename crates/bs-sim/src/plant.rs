//! Two-state averaged boost converter plant.
//!
//! State `x = (iL, vo)`. With duty `d` held over an interval:
//!
//! ```text
//! L diL/dt = Vin(t) - vo (1-d) - [iL rL + d iL rDS + (1-d)(VF + iL RF)]
//! C dvo/dt = iL (1-d) - vo / R
//! ```
//!
//! The bracketed loss term is present only when the parameters are
//! non-ideal.

use bs_core::units::{Current, Power, Voltage, ampere, volt, watt};
use tracing::{debug, trace};

use crate::error::{SimError, SimResult};
use crate::integrator::{Integrator, IntegratorType};
use crate::model::TransientModel;
use crate::parasitics::Parasitics;
use crate::params::PlantParams;

/// Converter state.
///
/// No sign constraint: the averaged model may swing negative under large
/// disturbances.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlantState {
    /// Inductor current (A)
    pub il: f64,
    /// Output voltage (V)
    pub vo: f64,
}

impl PlantState {
    pub fn new(il: f64, vo: f64) -> Self {
        Self { il, vo }
    }

    pub fn is_finite(&self) -> bool {
        self.il.is_finite() && self.vo.is_finite()
    }

    pub fn as_tuple(&self) -> (f64, f64) {
        (self.il, self.vo)
    }
}

impl From<(f64, f64)> for PlantState {
    fn from((il, vo): (f64, f64)) -> Self {
        Self { il, vo }
    }
}

/// Output of one propagation interval, taken at its end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlantOutput {
    /// Output voltage (V)
    pub vo: f64,
    /// Inductor current (A)
    pub il: f64,
    /// Input voltage at the end of the interval (V)
    pub vin: f64,
    /// Duty actually applied after saturation
    pub duty: f64,
    /// Whether the requested duty was outside the limits
    pub duty_saturated: bool,
    /// `Vin * iL` (W)
    pub input_power_w: f64,
    /// `vo^2 / R` (W)
    pub output_power_w: f64,
}

impl PlantOutput {
    pub fn output_voltage(&self) -> Voltage {
        volt(self.vo)
    }

    pub fn inductor_current(&self) -> Current {
        ampere(self.il)
    }

    pub fn input_power(&self) -> Power {
        watt(self.input_power_w)
    }

    pub fn output_power(&self) -> Power {
        watt(self.output_power_w)
    }

    /// `P_out / P_in`, when power is flowing in.
    pub fn efficiency(&self) -> Option<f64> {
        (self.input_power_w > 0.0).then(|| self.output_power_w / self.input_power_w)
    }
}

/// Numerical options for [`BoostPlant::propagate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropagateOptions {
    /// Integration scheme used for each sub-step
    pub integrator: IntegratorType,
    /// Equal sub-steps per propagation interval (>= 1)
    pub substeps: usize,
}

impl PropagateOptions {
    pub const DEFAULT_SUBSTEPS: usize = 20;
}

impl Default for PropagateOptions {
    fn default() -> Self {
        Self {
            integrator: IntegratorType::RK4,
            substeps: Self::DEFAULT_SUBSTEPS,
        }
    }
}

/// Averaged dynamics with a fixed, already-saturated duty.
struct BoostDynamics<'a> {
    params: &'a PlantParams,
    parasitics: Parasitics,
    duty: f64,
}

impl BoostDynamics<'_> {
    fn derivative(&self, vin: f64, x: &PlantState) -> PlantState {
        let off = 1.0 - self.duty;
        let loss = self.parasitics.voltage_drop(x.il, self.duty);
        PlantState {
            il: (vin - loss - x.vo * off) / self.params.inductance_h(),
            vo: (x.il * off - x.vo / self.params.load_ohm()) / self.params.capacitance_f(),
        }
    }
}

impl TransientModel for BoostDynamics<'_> {
    type State = PlantState;

    fn rhs(&self, t: f64, x: &PlantState) -> SimResult<PlantState> {
        let vin = self.params.vin().evaluate(t)?;
        Ok(self.derivative(vin, x))
    }

    fn add(&self, a: &PlantState, b: &PlantState) -> PlantState {
        PlantState {
            il: a.il + b.il,
            vo: a.vo + b.vo,
        }
    }

    fn scale(&self, a: &PlantState, scale: f64) -> PlantState {
        PlantState {
            il: a.il * scale,
            vo: a.vo * scale,
        }
    }
}

/// Averaged boost converter plant owning its state.
///
/// The duty cycle is always an argument of [`propagate`](Self::propagate),
/// never plant state, so any command source can drive it.
#[derive(Clone, Debug)]
pub struct BoostPlant {
    params: PlantParams,
    options: PropagateOptions,
    state: PlantState,
}

impl BoostPlant {
    /// Create a plant at zero state with default numerical options.
    pub fn new(params: PlantParams) -> Self {
        Self {
            params,
            options: PropagateOptions::default(),
            state: PlantState::default(),
        }
    }

    /// Create a plant with explicit numerical options.
    pub fn with_options(params: PlantParams, options: PropagateOptions) -> SimResult<Self> {
        if options.substeps == 0 {
            return Err(SimError::InvalidParameter {
                what: "substeps must be at least 1",
            });
        }
        Ok(Self {
            params,
            options,
            state: PlantState::default(),
        })
    }

    pub fn params(&self) -> &PlantParams {
        &self.params
    }

    pub fn options(&self) -> PropagateOptions {
        self.options
    }

    pub fn state(&self) -> PlantState {
        self.state
    }

    /// Overwrite the state.
    ///
    /// # Errors
    /// `InvalidArg` if either component is non-finite; the state is left
    /// unchanged.
    pub fn reset(&mut self, x0: impl Into<PlantState>) -> SimResult<()> {
        let x0 = x0.into();
        if !x0.is_finite() {
            return Err(SimError::InvalidArg {
                what: "reset state must be finite",
            });
        }
        self.state = x0;
        Ok(())
    }

    /// State derivative at `t` for a given state and duty (duty is saturated
    /// first).
    pub fn derivative(&self, t: f64, x: &PlantState, duty: f64) -> SimResult<PlantState> {
        self.dynamics(self.params.duty_limits().clamp(duty)).rhs(t, x)
    }

    /// Advance the state from `t0` to `t1` with `duty` held constant.
    ///
    /// `duty` is saturated into the plant's duty limits; an out-of-range
    /// value is not an error. The interval is split into
    /// `options.substeps` equal integration steps and the source is
    /// evaluated at every stage of every step.
    ///
    /// # Errors
    /// - `InvalidArg` if `t1 <= t0`, a bound is non-finite, or `duty` is NaN
    /// - `ModelEvaluation` if the source yields a non-finite value
    /// - `Diverged` if the integrated state is non-finite
    ///
    /// On error the state is not modified.
    pub fn propagate(
        &mut self,
        t0: f64,
        t1: f64,
        duty: f64,
    ) -> SimResult<(PlantState, PlantOutput)> {
        if !(t0.is_finite() && t1.is_finite()) || t1 <= t0 {
            return Err(SimError::InvalidArg {
                what: "propagate requires finite t0 < t1",
            });
        }
        if duty.is_nan() {
            return Err(SimError::InvalidArg {
                what: "duty must not be NaN",
            });
        }

        let applied = self.params.duty_limits().clamp(duty);
        let duty_saturated = applied != duty;
        if duty_saturated {
            debug!(requested = duty, applied, "duty saturated");
        }

        let dynamics = self.dynamics(applied);
        let n = self.options.substeps;
        let h = (t1 - t0) / n as f64;
        let mut x = self.state;
        for k in 0..n {
            let t = t0 + k as f64 * h;
            x = self.options.integrator.step(&dynamics, t, &x, h)?;
        }
        if !x.is_finite() {
            return Err(SimError::Diverged { t0, t1 });
        }

        let vin = self.params.vin().evaluate(t1)?;
        let output = PlantOutput {
            vo: x.vo,
            il: x.il,
            vin,
            duty: applied,
            duty_saturated,
            input_power_w: vin * x.il,
            output_power_w: x.vo * x.vo / self.params.load_ohm(),
        };

        trace!(t0, t1, il = x.il, vo = x.vo, "propagated");
        self.state = x;
        Ok((x, output))
    }

    fn dynamics(&self, duty: f64) -> BoostDynamics<'_> {
        BoostDynamics {
            params: &self.params,
            parasitics: self.params.active_parasitics(),
            duty,
        }
    }
}
