//! Property tests for the averaged plant and its helpers.

use bs_core::{Tolerances, nearly_equal};
use bs_sim::{
    BoostPlant, DriverOptions, Parasitics, PlantParams, PlantState, PropagateOptions,
    operating_point, run_open_loop, steady_state_ic, step_at,
};
use proptest::prelude::*;

fn params_strategy() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (
        10e-6..1e-3_f64, // L
        100e-6..10e-3_f64, // C
        1.0..50.0_f64, // R
        5.0..100.0_f64, // Vin
    )
}

const FIXED_POINT: Tolerances = Tolerances {
    abs: 0.0,
    rel: 1e-8,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ideal_equilibrium_is_fixed_point(
        (l, c, r, vin) in params_strategy(),
        duty in 0.1..0.9_f64,
    ) {
        let params = PlantParams::new(l, c, vin, r).unwrap();
        let mut plant = BoostPlant::new(params);
        let (il_eq, vo_eq) = steady_state_ic(vin, r, duty);
        plant.reset((il_eq, vo_eq)).unwrap();

        let traj = run_open_loop(&mut plant, duty, &DriverOptions::new(1e-4, 5e-3).unwrap()).unwrap();
        prop_assert_eq!(traj.len(), 50);
        for s in traj.samples() {
            prop_assert!(nearly_equal(s.il, il_eq, FIXED_POINT), "iL {} vs {}", s.il, il_eq);
            prop_assert!(nearly_equal(s.vo, vo_eq, FIXED_POINT), "vo {} vs {}", s.vo, vo_eq);
        }
    }

    #[test]
    fn split_interval_matches_single_interval(
        (l, c, r, vin) in params_strategy(),
        duty in 0.05..0.95_f64,
        t0 in 0.0..1.0_f64,
        il0 in -10.0..50.0_f64,
        vo0 in 0.0..100.0_f64,
    ) {
        let ts = 1e-4;
        let params = PlantParams::new(l, c, vin, r).unwrap();

        let mut whole = BoostPlant::new(params.clone());
        whole.reset((il0, vo0)).unwrap();
        let (x_whole, _) = whole.propagate(t0, t0 + ts, duty).unwrap();

        let mut split = BoostPlant::new(params);
        split.reset((il0, vo0)).unwrap();
        split.propagate(t0, t0 + ts / 2.0, duty).unwrap();
        let (x_split, _) = split.propagate(t0 + ts / 2.0, t0 + ts, duty).unwrap();

        // RK4 error per sub-step grows as (|lambda| h)^5 times the distance
        // from the fixed point; `w` bounds |lambda| of the ideal plant.
        let w = (1.0 - duty) / (l * c).sqrt() + 1.0 / (r * c);
        let z = w * ts / PropagateOptions::DEFAULT_SUBSTEPS as f64;
        let (il_eq, vo_eq) = steady_state_ic(vin, r, duty);
        let scale = 1.0 + il0.abs() + vo0.abs() + il_eq.abs() + vo_eq.abs();
        let tol = Tolerances {
            abs: (1e-10 + 100.0 * z.powi(5)) * scale,
            rel: 0.0,
        };
        prop_assert!(nearly_equal(x_whole.il, x_split.il, tol), "{:?} vs {:?} (tol {})", x_whole, x_split, tol.abs);
        prop_assert!(nearly_equal(x_whole.vo, x_split.vo, tol), "{:?} vs {:?} (tol {})", x_whole, x_split, tol.abs);
    }

    #[test]
    fn duty_below_limit_behaves_as_d_min(
        (l, c, r, vin) in params_strategy(),
        low in -1.0..0.02_f64,
        high in 0.9800001..2.0_f64,
    ) {
        let params = PlantParams::new(l, c, vin, r).unwrap();
        let run = |duty: f64| -> PlantState {
            let mut plant = BoostPlant::new(params.clone());
            plant.reset((1.0, 10.0)).unwrap();
            plant.propagate(0.0, 1e-4, duty).unwrap().0
        };
        prop_assert_eq!(run(low), run(0.02));
        prop_assert_eq!(run(high), run(0.98));
    }

    #[test]
    fn step_profile_is_piecewise_constant(
        t_drop in 0.0..1.0_f64,
        v_base in 1.0..100.0_f64,
        v_drop in 0.0..100.0_f64,
        t in -1.0..2.0_f64,
    ) {
        let f = step_at(t_drop, v_base, v_drop);
        let expected = if t < t_drop { v_base } else { v_drop };
        prop_assert_eq!(f.evaluate(t), expected);
        // Re-evaluation is stable.
        prop_assert_eq!(f.evaluate(t), f.evaluate(t));
    }

    #[test]
    fn recovery_profile_has_three_regions(
        t_drop in 0.0..1.0_f64,
        width in 1e-3..1.0_f64,
        t in -1.0..3.0_f64,
    ) {
        let t_recover = t_drop + width;
        let f = step_at(t_drop, 24.0, 10.0).with_recovery(t_recover);
        let expected = if t >= t_drop && t < t_recover { 10.0 } else { 24.0 };
        prop_assert_eq!(f.evaluate(t), expected);
    }

    #[test]
    fn parasitics_reduce_settled_output(
        (l, c, r, vin) in params_strategy(),
        duty in 0.1..0.9_f64,
        rl in 0.0..0.5_f64,
        rds in 0.0..0.5_f64,
        vf in 0.0..1.0_f64,
        rf in 0.0..0.5_f64,
        which in 0usize..4,
    ) {
        // Make sure at least one element is strictly positive.
        let mut elems = [rl, rds, vf, rf];
        elems[which] += 1e-3;
        let par = Parasitics::new(elems[0], elems[1], elems[2], elems[3]).unwrap();

        let params = PlantParams::new(l, c, vin, r)
            .unwrap()
            .with_parasitics(par)
            .with_non_ideal(true);
        let lossy = operating_point(&params, vin, duty);
        let (_, vo_ideal) = steady_state_ic(vin, r, duty);
        prop_assert!(lossy.vo < vo_ideal, "{} !< {}", lossy.vo, vo_ideal);

        // The lossy operating point is where the simulated dynamics settle.
        let plant = BoostPlant::new(params);
        let dx = plant.derivative(0.0, &lossy, duty).unwrap();
        prop_assert!(dx.il.abs() * l <= 1e-9 * (1.0 + vin), "L diL/dt = {}", dx.il * l);
        prop_assert!(dx.vo.abs() * c <= 1e-9 * (1.0 + lossy.il.abs()), "C dvo/dt = {}", dx.vo * c);
    }
}
