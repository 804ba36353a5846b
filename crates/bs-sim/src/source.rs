//! Input voltage sources.
//!
//! The plant evaluates its source fresh at every integration stage, so a
//! source must be a pure function of time: no caching and no dependence on
//! call order.

use std::fmt;
use std::sync::Arc;

use bs_core::ensure_finite;
use tracing::warn;

use crate::error::{SimError, SimResult};

/// Step disturbance on a baseline value, with optional recovery.
///
/// ```text
///         v_base            t < t_drop
/// f(t) =  v_drop   t_drop <= t < t_recover
///         v_base   t_recover <= t
/// ```
///
/// Without `t_recover` the drop is permanent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepProfile {
    pub t_drop: f64,
    pub v_base: f64,
    pub v_drop: f64,
    pub t_recover: Option<f64>,
}

/// Permanent step from `v_base` to `v_drop` at `t_drop`.
pub fn step_at(t_drop: f64, v_base: f64, v_drop: f64) -> StepProfile {
    StepProfile {
        t_drop,
        v_base,
        v_drop,
        t_recover: None,
    }
}

impl StepProfile {
    /// Return to `v_base` at `t_recover`.
    pub fn with_recovery(mut self, t_recover: f64) -> Self {
        self.t_recover = Some(t_recover);
        self
    }

    /// Value at time `t`.
    pub fn evaluate(&self, t: f64) -> f64 {
        if t < self.t_drop {
            return self.v_base;
        }
        match self.t_recover {
            Some(t_recover) if t >= t_recover => self.v_base,
            _ => self.v_drop,
        }
    }

    /// Check that every field is finite and that recovery follows the drop.
    pub fn validate(&self) -> SimResult<()> {
        ensure_finite(self.t_drop, "step profile t_drop must be finite")?;
        ensure_finite(self.v_base, "step profile base value must be finite")?;
        ensure_finite(self.v_drop, "step profile drop value must be finite")?;
        if let Some(t_recover) = self.t_recover {
            ensure_finite(t_recover, "step profile t_recover must be finite")?;
            if t_recover <= self.t_drop {
                return Err(SimError::InvalidParameter {
                    what: "step profile t_recover must be later than t_drop",
                });
            }
        }
        Ok(())
    }
}

/// Input voltage: a constant or a pure function of time.
#[derive(Clone)]
pub enum VinSource {
    /// Fixed value (V).
    Constant(f64),
    /// Step disturbance profile.
    Step(StepProfile),
    /// Arbitrary pure function of time (V).
    Function(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl VinSource {
    pub fn constant(v: f64) -> Self {
        Self::Constant(v)
    }

    /// Wrap an arbitrary time function.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    /// Evaluate the source at `t`.
    ///
    /// # Errors
    /// `ModelEvaluation` if the value is NaN or infinite.
    pub fn evaluate(&self, t: f64) -> SimResult<f64> {
        let value = match self {
            Self::Constant(v) => *v,
            Self::Step(profile) => profile.evaluate(t),
            Self::Function(f) => f(t),
        };
        if value.is_finite() {
            Ok(value)
        } else {
            warn!(t, value, "input voltage source produced a non-finite value");
            Err(SimError::ModelEvaluation { t, value })
        }
    }

    /// Undisturbed value, when one is known without evaluating.
    pub fn baseline(&self) -> Option<f64> {
        match self {
            Self::Constant(v) => Some(*v),
            Self::Step(profile) => Some(profile.v_base),
            Self::Function(_) => None,
        }
    }

    pub fn is_time_varying(&self) -> bool {
        !matches!(self, Self::Constant(_))
    }

    /// Construction-time checks for the variants that can be checked.
    pub(crate) fn validate(&self) -> SimResult<()> {
        match self {
            Self::Constant(v) => {
                ensure_finite(*v, "constant input voltage must be finite")?;
                Ok(())
            }
            Self::Step(profile) => profile.validate(),
            Self::Function(_) => Ok(()),
        }
    }
}

impl fmt::Debug for VinSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Self::Step(profile) => f.debug_tuple("Step").field(profile).finish(),
            Self::Function(_) => f.write_str("Function(<fn>)"),
        }
    }
}

impl From<f64> for VinSource {
    fn from(v: f64) -> Self {
        Self::Constant(v)
    }
}

impl From<StepProfile> for VinSource {
    fn from(profile: StepProfile) -> Self {
        Self::Step(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_at_switches_at_drop_time() {
        let f = step_at(0.05, 24.0, 10.0);
        assert_eq!(f.evaluate(0.04), 24.0);
        assert_eq!(f.evaluate(0.05), 10.0);
        assert_eq!(f.evaluate(1.0), 10.0);
    }

    #[test]
    fn recovery_restores_baseline() {
        let f = step_at(0.05, 24.0, 10.0).with_recovery(0.1);
        assert_eq!(f.evaluate(0.0), 24.0);
        assert_eq!(f.evaluate(0.05), 10.0);
        assert_eq!(f.evaluate(0.0999), 10.0);
        assert_eq!(f.evaluate(0.1), 24.0);
        assert_eq!(f.evaluate(5.0), 24.0);
    }

    #[test]
    fn evaluation_order_does_not_matter() {
        let f = step_at(0.05, 24.0, 10.0).with_recovery(0.1);
        let forward: Vec<f64> = [0.0, 0.06, 0.2].iter().map(|&t| f.evaluate(t)).collect();
        let backward: Vec<f64> = [0.2, 0.06, 0.0].iter().map(|&t| f.evaluate(t)).collect();
        assert_eq!(forward, vec![24.0, 10.0, 24.0]);
        assert_eq!(backward, vec![24.0, 10.0, 24.0]);
    }

    #[test]
    fn recovery_before_drop_is_rejected() {
        let bad = step_at(0.1, 24.0, 10.0).with_recovery(0.05);
        assert!(matches!(
            bad.validate(),
            Err(SimError::InvalidParameter { .. })
        ));
        let same = step_at(0.1, 24.0, 10.0).with_recovery(0.1);
        assert!(same.validate().is_err());
        assert!(step_at(f64::NAN, 24.0, 10.0).validate().is_err());
    }

    #[test]
    fn source_variants_evaluate_uniformly() {
        let constant = VinSource::from(24.0);
        let step = VinSource::from(step_at(0.05, 24.0, 10.0));
        let ramp = VinSource::function(|t| 12.0 + 100.0 * t);

        assert_eq!(constant.evaluate(3.0).unwrap(), 24.0);
        assert_eq!(step.evaluate(0.06).unwrap(), 10.0);
        assert!((ramp.evaluate(0.1).unwrap() - 22.0).abs() < 1e-12);

        assert!(!constant.is_time_varying());
        assert!(step.is_time_varying());
        assert_eq!(step.baseline(), Some(24.0));
        assert_eq!(ramp.baseline(), None);
    }

    #[test]
    fn non_finite_value_is_a_model_evaluation_error() {
        let src = VinSource::function(|t| if t > 1.0 { f64::NAN } else { 24.0 });
        assert!(src.evaluate(0.5).is_ok());
        match src.evaluate(2.0) {
            Err(SimError::ModelEvaluation { t, value }) => {
                assert_eq!(t, 2.0);
                assert!(value.is_nan());
            }
            other => panic!("expected ModelEvaluation, got {other:?}"),
        }
        assert!(VinSource::constant(f64::INFINITY).evaluate(0.0).is_err());
    }

    #[test]
    fn debug_hides_closure() {
        let src = VinSource::function(|_| 1.0);
        assert_eq!(format!("{src:?}"), "Function(<fn>)");
        assert_eq!(format!("{:?}", VinSource::Constant(2.0)), "Constant(2.0)");
    }
}
