use crate::{CoreError, CoreResult};

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> CoreResult<Real> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::OutOfRange { what, value: v })
    }
}

/// Finite and greater than or equal to zero.
pub fn ensure_non_negative(v: Real, what: &'static str) -> CoreResult<Real> {
    let v = ensure_finite(v, what)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(CoreError::OutOfRange { what, value: v })
    }
}

/// Largest number of fixed-period ticks a single run may request.
///
/// Bounds the trajectory buffers (three `f64` per tick) to a few hundred MB.
pub const MAX_TICKS: usize = 10_000_000;

/// Number of whole intervals of length `step` that fit in `span`.
///
/// A relative guard of 1e-9 absorbs representation error so that e.g.
/// `0.2 / 1e-4` counts 2000 intervals rather than 1999. Saturates at
/// `usize::MAX` when the ratio does not fit.
pub fn whole_steps(span: Real, step: Real) -> usize {
    if !(span.is_finite() && step.is_finite()) || span <= 0.0 || step <= 0.0 {
        return 0;
    }
    (span / step + 1e-9).floor() as usize
}
