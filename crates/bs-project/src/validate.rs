//! Config validation logic.

use bs_core::{MAX_TICKS, whole_steps};

use crate::schema::{LATEST_VERSION, ParasiticsDef, PlantDef, RunDef, SimConfig, SourceDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be positive"))
    }
}

fn non_negative(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be non-negative"))
    }
}

fn finite(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, v, "must be finite"))
    }
}

pub fn validate_config(config: &SimConfig) -> Result<(), ValidationError> {
    if config.version == 0 || config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    validate_plant(&config.plant)?;
    validate_source(&config.source)?;
    validate_run(&config.run)?;
    Ok(())
}

fn validate_plant(plant: &PlantDef) -> Result<(), ValidationError> {
    positive("plant.inductance_h", plant.inductance_h)?;
    positive("plant.capacitance_f", plant.capacitance_f)?;
    positive("plant.load_ohm", plant.load_ohm)?;

    finite("plant.d_min", plant.d_min)?;
    finite("plant.d_max", plant.d_max)?;
    if !(0.0 < plant.d_min && plant.d_min < plant.d_max && plant.d_max < 1.0) {
        return Err(invalid(
            "plant.d_min/d_max",
            format!("{}/{}", plant.d_min, plant.d_max),
            "must satisfy 0 < d_min < d_max < 1",
        ));
    }

    validate_parasitics(&plant.parasitics)
}

fn validate_parasitics(par: &ParasiticsDef) -> Result<(), ValidationError> {
    non_negative("plant.parasitics.rl_ohm", par.rl_ohm)?;
    non_negative("plant.parasitics.rds_ohm", par.rds_ohm)?;
    non_negative("plant.parasitics.vf_v", par.vf_v)?;
    non_negative("plant.parasitics.rf_ohm", par.rf_ohm)?;
    Ok(())
}

fn validate_source(source: &SourceDef) -> Result<(), ValidationError> {
    finite("source.vin_v", source.vin_v)?;
    if let Some(drop) = &source.drop {
        finite("source.drop.level_v", drop.level_v)?;
        finite("source.drop.t_drop_s", drop.t_drop_s)?;
        if let Some(t_recover) = drop.t_recover_s {
            finite("source.drop.t_recover_s", t_recover)?;
            if t_recover <= drop.t_drop_s {
                return Err(invalid(
                    "source.drop.t_recover_s",
                    t_recover,
                    "must be later than t_drop_s",
                ));
            }
        }
    }
    Ok(())
}

fn validate_run(run: &RunDef) -> Result<(), ValidationError> {
    // Out-of-range duty is legal: the plant saturates it.
    finite("run.duty", run.duty)?;
    positive("run.ts_s", run.ts_s)?;
    non_negative("run.duration_s", run.duration_s)?;
    if run.duration_s < run.ts_s {
        return Err(invalid(
            "run.duration_s",
            run.duration_s,
            "must cover at least one sample period",
        ));
    }
    if whole_steps(run.duration_s, run.ts_s) > MAX_TICKS {
        return Err(invalid(
            "run.ts_s",
            run.ts_s,
            "duration_s / ts_s exceeds the maximum tick count",
        ));
    }
    if run.substeps == 0 {
        return Err(invalid("run.substeps", run.substeps, "must be at least 1"));
    }
    Ok(())
}
