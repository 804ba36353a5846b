//! Condensed view of a trajectory.

use bs_core::units::{Current, Time, Voltage, ampere, s, volt};
use bs_sim::Trajectory;

#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySummary {
    pub sample_count: usize,
    pub t_end_s: f64,
    pub final_il: f64,
    pub final_vo: f64,
    pub vo_min: f64,
    pub vo_max: f64,
    pub il_min: f64,
    pub il_max: f64,
}

impl TrajectorySummary {
    /// `None` for an empty trajectory.
    pub fn from_trajectory(traj: &Trajectory) -> Option<Self> {
        let last = traj.last()?;
        let (vo_min, vo_max) = min_max(&traj.vo);
        let (il_min, il_max) = min_max(&traj.il);
        Some(Self {
            sample_count: traj.len(),
            t_end_s: last.t,
            final_il: last.il,
            final_vo: last.vo,
            vo_min,
            vo_max,
            il_min,
            il_max,
        })
    }

    pub fn t_end(&self) -> Time {
        s(self.t_end_s)
    }

    pub fn final_output_voltage(&self) -> Voltage {
        volt(self.final_vo)
    }

    pub fn final_inductor_current(&self) -> Current {
        ampere(self.final_il)
    }

    /// Peak output voltage above the final value.
    pub fn overshoot_v(&self) -> f64 {
        (self.vo_max - self.final_vo).max(0.0)
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traj() -> Trajectory {
        Trajectory {
            t: vec![0.1, 0.2, 0.3],
            il: vec![1.0, 3.0, 2.0],
            vo: vec![40.0, 55.0, 50.0],
        }
    }

    #[test]
    fn summarizes_extrema_and_final_values() {
        let summary = TrajectorySummary::from_trajectory(&traj()).unwrap();
        assert_eq!(summary.sample_count, 3);
        assert_eq!(summary.t_end_s, 0.3);
        assert_eq!(summary.final_il, 2.0);
        assert_eq!(summary.final_vo, 50.0);
        assert_eq!((summary.vo_min, summary.vo_max), (40.0, 55.0));
        assert_eq!((summary.il_min, summary.il_max), (1.0, 3.0));
        assert_eq!(summary.overshoot_v(), 5.0);
    }

    #[test]
    fn empty_trajectory_has_no_summary() {
        assert!(TrajectorySummary::from_trajectory(&Trajectory::default()).is_none());
    }
}
