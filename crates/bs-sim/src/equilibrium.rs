//! DC operating points for initial-condition seeding.

use crate::params::PlantParams;
use crate::plant::PlantState;

/// Floor applied to `1 - D` so that `D -> 1` stays finite.
pub const DENOMINATOR_FLOOR: f64 = 1e-12;

/// Ideal (lossless) boost operating point, returned as `(iL, vo)`.
///
/// ```text
/// vo = Vin / (1-D)
/// iL = Vin / (R (1-D)^2)
/// ```
///
/// Parasitics are ignored even if the plant that gets seeded is non-ideal;
/// the result is only a starting point for the dynamics.
pub fn steady_state_ic(vin: f64, r: f64, d: f64) -> (f64, f64) {
    let off = (1.0 - d).max(DENOMINATOR_FLOOR);
    let vo = vin / off;
    let il = vin / (r * off * off);
    (il, vo)
}

/// Operating point of `params` for a constant input `vin` and duty `duty`.
///
/// Honours the duty limits and, when `non_ideal` is set, the parasitic
/// losses. Setting both derivatives to zero gives
///
/// ```text
/// iL = vo / (R (1-d))
/// vo = (Vin - (1-d) VF) / ((1-d) + R_c / (R (1-d)))
/// ```
///
/// with `R_c = rL + d rDS + (1-d) RF`.
pub fn operating_point(params: &PlantParams, vin: f64, duty: f64) -> PlantState {
    let d = params.duty_limits().clamp(duty);
    let off = 1.0 - d;
    let r = params.load_ohm();
    let par = params.active_parasitics();

    let vo = (vin - off * par.vf_v()) / (off + par.conduction_resistance(d) / (r * off));
    let il = vo / (r * off);
    PlantState { il, vo }
}
