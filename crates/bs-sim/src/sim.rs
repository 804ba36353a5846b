//! Fixed-period driver loop and trajectory recording.

use bs_controls::{ConstantDuty, DutyCommand, Measurement};
use bs_core::{MAX_TICKS, ensure_finite, whole_steps};
use tracing::{info, trace, warn};

use crate::error::{SimError, SimResult};
use crate::plant::BoostPlant;

/// Options for a driver run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriverOptions {
    /// Sample period Ts (seconds)
    pub ts: f64,
    /// Total duration T (seconds)
    pub duration: f64,
}

impl DriverOptions {
    /// # Errors
    /// `InvalidArg` if `ts` is not positive, `duration` is negative, or the
    /// run would exceed [`MAX_TICKS`] ticks.
    pub fn new(ts: f64, duration: f64) -> SimResult<Self> {
        let opts = Self { ts, duration };
        opts.validate()?;
        Ok(opts)
    }

    fn validate(&self) -> SimResult<()> {
        if !(self.ts.is_finite() && self.ts > 0.0) {
            return Err(SimError::InvalidArg {
                what: "sample period must be positive",
            });
        }
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "duration must be non-negative",
            });
        }
        if self.n_steps() > MAX_TICKS {
            return Err(SimError::InvalidArg {
                what: "duration / sample period exceeds the maximum tick count",
            });
        }
        Ok(())
    }

    /// `floor(duration / ts)`.
    pub fn n_steps(&self) -> usize {
        whole_steps(self.duration, self.ts)
    }
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            ts: 1e-4,
            duration: 0.2,
        }
    }
}

/// One recorded tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectorySample {
    /// End time of the tick (s)
    pub t: f64,
    /// Inductor current (A)
    pub il: f64,
    /// Output voltage (V)
    pub vo: f64,
}

/// Recorded run: three parallel sequences indexed by tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// Inductor current (A)
    pub il: Vec<f64>,
    /// Output voltage (V)
    pub vo: Vec<f64>,
}

impl Trajectory {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            t: Vec::with_capacity(n),
            il: Vec::with_capacity(n),
            vo: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, sample: TrajectorySample) {
        self.t.push(sample.t);
        self.il.push(sample.il);
        self.vo.push(sample.vo);
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn sample(&self, k: usize) -> Option<TrajectorySample> {
        Some(TrajectorySample {
            t: *self.t.get(k)?,
            il: *self.il.get(k)?,
            vo: *self.vo.get(k)?,
        })
    }

    pub fn last(&self) -> Option<TrajectorySample> {
        self.len().checked_sub(1).and_then(|k| self.sample(k))
    }

    pub fn samples(&self) -> impl Iterator<Item = TrajectorySample> + '_ {
        self.t
            .iter()
            .zip(&self.il)
            .zip(&self.vo)
            .map(|((&t, &il), &vo)| TrajectorySample { t, il, vo })
    }
}

/// Progress report emitted after each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimProgress {
    /// Ticks completed so far
    pub step: usize,
    /// Total ticks in the run
    pub n_steps: usize,
    /// Simulation time reached (s)
    pub t: f64,
}

impl SimProgress {
    pub fn fraction_complete(&self) -> f64 {
        if self.n_steps == 0 {
            1.0
        } else {
            self.step as f64 / self.n_steps as f64
        }
    }
}

/// Run with a single constant duty for every tick.
pub fn run_open_loop(
    plant: &mut BoostPlant,
    duty: f64,
    opts: &DriverOptions,
) -> SimResult<Trajectory> {
    run_with_command(plant, ConstantDuty(duty), opts)
}

/// Run with a duty command consulted once per tick.
pub fn run_with_command<C: DutyCommand>(
    plant: &mut BoostPlant,
    command: C,
    opts: &DriverOptions,
) -> SimResult<Trajectory> {
    run_with_progress(plant, command, opts, |_| {})
}

/// Driver loop.
///
/// Tick `k` propagates the plant over `[k*Ts, (k+1)*Ts]` with the duty the
/// command returns for the state at `k*Ts`, then records `((k+1)*Ts, iL,
/// vo)`. The run has exactly `floor(duration/Ts)` ticks. The first failing
/// tick aborts the run and its error is returned; no partial trajectory is
/// produced.
pub fn run_with_progress<C, F>(
    plant: &mut BoostPlant,
    mut command: C,
    opts: &DriverOptions,
    mut on_step: F,
) -> SimResult<Trajectory>
where
    C: DutyCommand,
    F: FnMut(&SimProgress),
{
    opts.validate()?;
    let n = opts.n_steps();
    info!(n_steps = n, ts = opts.ts, duration = opts.duration, "starting run");

    let mut record = Trajectory::with_capacity(n);
    for k in 0..n {
        let t0 = k as f64 * opts.ts;
        let t1 = (k + 1) as f64 * opts.ts;
        let x = plant.state();
        let duty = command.duty(&Measurement {
            t: t0,
            il: x.il,
            vo: x.vo,
        });
        ensure_finite(duty, "duty command").map_err(|_| SimError::InvalidArg {
            what: "duty command returned a non-finite value",
        })?;

        let (x, _) = plant.propagate(t0, t1, duty).inspect_err(|e| {
            warn!(step = k, t0, error = %e, "aborting run");
        })?;

        trace!(step = k, t = t1, il = x.il, vo = x.vo, duty, "tick");
        record.push(TrajectorySample {
            t: t1,
            il: x.il,
            vo: x.vo,
        });
        on_step(&SimProgress {
            step: k + 1,
            n_steps: n,
            t: t1,
        });
    }

    if let Some(last) = record.last() {
        info!(t = last.t, il = last.il, vo = last.vo, "run complete");
    }
    Ok(record)
}
