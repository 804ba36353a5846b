//! Fixed-step time integrators.

use crate::error::SimResult;
use crate::model::TransientModel;

/// Trait for time integrators.
pub trait Integrator {
    /// Advance state by one time step using the transient model.
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State>;
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let k1 = model.rhs(t, x)?;

        let x2 = model.add(x, &model.scale(&k1, 0.5 * dt));
        let k2 = model.rhs(t + 0.5 * dt, &x2)?;

        let x3 = model.add(x, &model.scale(&k2, 0.5 * dt));
        let k3 = model.rhs(t + 0.5 * dt, &x3)?;

        let x4 = model.add(x, &model.scale(&k3, dt));
        let k4 = model.rhs(t + dt, &x4)?;

        // Combine: x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        let k_sum = model.add(
            &model.add(&k1, &model.scale(&k2, 2.0)),
            &model.add(&model.scale(&k3, 2.0), &k4),
        );

        Ok(model.add(x, &model.scale(&k_sum, dt / 6.0)))
    }
}

/// Forward Euler (explicit, 1st order, fast for testing).
/// Calls rhs() once per step instead of 4 times (RK4).
#[derive(Clone, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let xdot = model.rhs(t, x)?;
        Ok(model.add(x, &model.scale(&xdot, dt)))
    }
}

/// Integrator selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, most accurate, 4 rhs calls per step).
    #[default]
    RK4,
    /// Forward Euler (1st-order, faster, 1 rhs call per step).
    ForwardEuler,
}

impl Integrator for IntegratorType {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        match self {
            IntegratorType::RK4 => RK4.step(model, t, x, dt),
            IntegratorType::ForwardEuler => ForwardEuler.step(model, t, x, dt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dx/dt = -x, exact solution x0 * exp(-t).
    struct Decay;

    impl TransientModel for Decay {
        type State = f64;

        fn rhs(&self, _t: f64, x: &f64) -> SimResult<f64> {
            Ok(-x)
        }

        fn add(&self, a: &f64, b: &f64) -> f64 {
            a + b
        }

        fn scale(&self, a: &f64, scale: f64) -> f64 {
            a * scale
        }
    }

    /// dx/dt = t, exact solution x0 + t^2 / 2. Checks time is threaded through stages.
    struct Ramp;

    impl TransientModel for Ramp {
        type State = f64;

        fn rhs(&self, t: f64, _x: &f64) -> SimResult<f64> {
            Ok(t)
        }

        fn add(&self, a: &f64, b: &f64) -> f64 {
            a + b
        }

        fn scale(&self, a: &f64, scale: f64) -> f64 {
            a * scale
        }
    }

    fn integrate<I: Integrator, M: TransientModel<State = f64>>(
        integrator: &I,
        model: &M,
        n: usize,
        t_end: f64,
    ) -> f64 {
        let dt = t_end / n as f64;
        let mut x = 1.0;
        for k in 0..n {
            x = integrator.step(model, k as f64 * dt, &x, dt).unwrap();
        }
        x
    }

    #[test]
    fn rk4_matches_exponential_decay() {
        let x = integrate(&RK4, &Decay, 100, 1.0);
        assert!((x - (-1.0f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn euler_is_first_order() {
        let exact = (-1.0f64).exp();
        let e1 = (integrate(&ForwardEuler, &Decay, 100, 1.0) - exact).abs();
        let e2 = (integrate(&ForwardEuler, &Decay, 200, 1.0) - exact).abs();
        let ratio = e1 / e2;
        assert!((ratio - 2.0).abs() < 0.1, "error ratio {ratio}");
    }

    #[test]
    fn rk4_integrates_time_dependent_rhs_exactly() {
        // RK4 is exact for polynomial-in-t right-hand sides up to degree 3.
        let x = integrate(&RK4, &Ramp, 7, 2.0);
        assert!((x - 3.0).abs() < 1e-12);
    }

    #[test]
    fn integrator_type_dispatches() {
        let a = IntegratorType::RK4.step(&Decay, 0.0, &1.0, 0.1).unwrap();
        let b = RK4.step(&Decay, 0.0, &1.0, 0.1).unwrap();
        assert_eq!(a, b);

        let c = IntegratorType::ForwardEuler.step(&Decay, 0.0, &1.0, 0.1).unwrap();
        assert!((c - 0.9).abs() < 1e-15);
        assert_eq!(IntegratorType::default(), IntegratorType::RK4);
    }
}
