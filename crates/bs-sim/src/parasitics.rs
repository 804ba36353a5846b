//! Non-ideal loss elements of the boost power stage.

use bs_core::ensure_non_negative;
use bs_core::units::{Resistance, Voltage, ohm, volt};

use crate::error::SimResult;

/// Parasitic loss elements.
///
/// All values are non-negative. The all-zero descriptor is the lossless
/// converter.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Parasitics {
    rl_ohm: f64,
    rds_ohm: f64,
    vf_v: f64,
    rf_ohm: f64,
}

impl Parasitics {
    /// Create a parasitics descriptor.
    ///
    /// # Arguments
    /// * `rl_ohm` - Series inductor resistance (Ω)
    /// * `rds_ohm` - Switch on-resistance (Ω)
    /// * `vf_v` - Diode forward voltage (V)
    /// * `rf_ohm` - Diode series resistance (Ω)
    ///
    /// # Errors
    /// `InvalidParameter` if any value is negative or non-finite.
    pub fn new(rl_ohm: f64, rds_ohm: f64, vf_v: f64, rf_ohm: f64) -> SimResult<Self> {
        Ok(Self {
            rl_ohm: ensure_non_negative(rl_ohm, "rL must be finite and non-negative")?,
            rds_ohm: ensure_non_negative(rds_ohm, "rDS must be finite and non-negative")?,
            vf_v: ensure_non_negative(vf_v, "VF must be finite and non-negative")?,
            rf_ohm: ensure_non_negative(rf_ohm, "RF must be finite and non-negative")?,
        })
    }

    /// Lossless descriptor.
    pub fn ideal() -> Self {
        Self::default()
    }

    pub fn rl_ohm(&self) -> f64 {
        self.rl_ohm
    }

    pub fn rds_ohm(&self) -> f64 {
        self.rds_ohm
    }

    pub fn vf_v(&self) -> f64 {
        self.vf_v
    }

    pub fn rf_ohm(&self) -> f64 {
        self.rf_ohm
    }

    pub fn inductor_resistance(&self) -> Resistance {
        ohm(self.rl_ohm)
    }

    pub fn switch_resistance(&self) -> Resistance {
        ohm(self.rds_ohm)
    }

    pub fn diode_forward_voltage(&self) -> Voltage {
        volt(self.vf_v)
    }

    pub fn diode_resistance(&self) -> Resistance {
        ohm(self.rf_ohm)
    }

    /// True when every element is zero.
    pub fn is_lossless(&self) -> bool {
        self.rl_ohm == 0.0 && self.rds_ohm == 0.0 && self.vf_v == 0.0 && self.rf_ohm == 0.0
    }

    /// Duty-weighted series resistance seen by the inductor current:
    /// `rL + d*rDS + (1-d)*RF`.
    pub fn conduction_resistance(&self, duty: f64) -> f64 {
        self.rl_ohm + duty * self.rds_ohm + (1.0 - duty) * self.rf_ohm
    }

    /// Total averaged voltage drop opposing the inductor current.
    ///
    /// `iL*rL + d*iL*rDS + (1-d)*(VF + iL*RF)`
    pub fn voltage_drop(&self, il: f64, duty: f64) -> f64 {
        il * self.conduction_resistance(duty) + (1.0 - duty) * self.vf_v
    }
}
