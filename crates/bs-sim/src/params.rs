//! Static boost converter parameters.

use bs_core::ensure_positive;
use bs_core::units::{Capacitance, Inductance, Resistance, farad, henry, ohm};

use crate::error::{SimError, SimResult};
use crate::parasitics::Parasitics;
use crate::source::VinSource;

/// Duty-cycle saturation bounds, `0 < min < max < 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DutyLimits {
    min: f64,
    max: f64,
}

impl DutyLimits {
    pub const DEFAULT_MIN: f64 = 0.02;
    pub const DEFAULT_MAX: f64 = 0.98;

    pub fn new(min: f64, max: f64) -> SimResult<Self> {
        if !(min.is_finite() && max.is_finite()) {
            return Err(SimError::InvalidParameter {
                what: "duty limits must be finite",
            });
        }
        if !(0.0 < min && min < max && max < 1.0) {
            return Err(SimError::InvalidParameter {
                what: "duty limits must satisfy 0 < d_min < d_max < 1",
            });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Saturate `duty` into `[min, max]`.
    pub fn clamp(&self, duty: f64) -> f64 {
        duty.clamp(self.min, self.max)
    }
}

impl Default for DutyLimits {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

/// Boost converter parameters.
///
/// Read-only once built. Every constructor validates, so a `PlantParams`
/// value always has `L, C, R > 0` and well-formed duty limits.
#[derive(Clone, Debug)]
pub struct PlantParams {
    inductance_h: f64,
    capacitance_f: f64,
    load_ohm: f64,
    vin: VinSource,
    duty_limits: DutyLimits,
    non_ideal: bool,
    parasitics: Parasitics,
}

impl PlantParams {
    /// Create parameters for an ideal converter with default duty limits.
    ///
    /// # Arguments
    /// * `inductance_h` - Inductance L (H), must be positive
    /// * `capacitance_f` - Output capacitance C (F), must be positive
    /// * `vin` - Input voltage source (constant or time-varying)
    /// * `load_ohm` - Load resistance R (Ω), must be positive
    ///
    /// # Errors
    /// `InvalidParameter` if a value is out of its physical domain.
    pub fn new(
        inductance_h: f64,
        capacitance_f: f64,
        vin: impl Into<VinSource>,
        load_ohm: f64,
    ) -> SimResult<Self> {
        let vin = vin.into();
        vin.validate()?;
        Ok(Self {
            inductance_h: ensure_positive(inductance_h, "L must be positive")?,
            capacitance_f: ensure_positive(capacitance_f, "C must be positive")?,
            load_ohm: ensure_positive(load_ohm, "R must be positive")?,
            vin,
            duty_limits: DutyLimits::default(),
            non_ideal: false,
            parasitics: Parasitics::ideal(),
        })
    }

    /// Replace the duty-cycle saturation bounds.
    pub fn with_duty_limits(mut self, d_min: f64, d_max: f64) -> SimResult<Self> {
        self.duty_limits = DutyLimits::new(d_min, d_max)?;
        Ok(self)
    }

    /// Attach parasitic elements. They only act when `non_ideal` is on.
    pub fn with_parasitics(mut self, parasitics: Parasitics) -> Self {
        self.parasitics = parasitics;
        self
    }

    pub fn with_non_ideal(mut self, non_ideal: bool) -> Self {
        self.non_ideal = non_ideal;
        self
    }

    pub fn inductance_h(&self) -> f64 {
        self.inductance_h
    }

    pub fn capacitance_f(&self) -> f64 {
        self.capacitance_f
    }

    pub fn load_ohm(&self) -> f64 {
        self.load_ohm
    }

    pub fn inductance(&self) -> Inductance {
        henry(self.inductance_h)
    }

    pub fn capacitance(&self) -> Capacitance {
        farad(self.capacitance_f)
    }

    pub fn load(&self) -> Resistance {
        ohm(self.load_ohm)
    }

    pub fn vin(&self) -> &VinSource {
        &self.vin
    }

    pub fn duty_limits(&self) -> DutyLimits {
        self.duty_limits
    }

    pub fn non_ideal(&self) -> bool {
        self.non_ideal
    }

    pub fn parasitics(&self) -> &Parasitics {
        &self.parasitics
    }

    /// Parasitics that actually enter the dynamics: the configured set when
    /// `non_ideal` is on, the lossless set otherwise.
    pub fn active_parasitics(&self) -> Parasitics {
        if self.non_ideal {
            self.parasitics
        } else {
            Parasitics::ideal()
        }
    }
}
