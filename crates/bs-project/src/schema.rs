//! Simulation configuration schema.
//!
//! Every section and field has a default, so a partial file only needs to
//! name what differs from the reference bench setup.

use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub version: u32,
    pub plant: PlantDef,
    pub source: SourceDef,
    pub run: RunDef,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            version: LATEST_VERSION,
            plant: PlantDef::default(),
            source: SourceDef::default(),
            run: RunDef::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlantDef {
    pub inductance_h: f64,
    pub capacitance_f: f64,
    pub load_ohm: f64,
    pub d_min: f64,
    pub d_max: f64,
    pub non_ideal: bool,
    pub parasitics: ParasiticsDef,
}

impl Default for PlantDef {
    fn default() -> Self {
        Self {
            inductance_h: 100e-6,
            capacitance_f: 1e-3,
            load_ohm: 4.5,
            d_min: 0.02,
            d_max: 0.98,
            non_ideal: true,
            parasitics: ParasiticsDef::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParasiticsDef {
    pub rl_ohm: f64,
    pub rds_ohm: f64,
    pub vf_v: f64,
    pub rf_ohm: f64,
}

impl Default for ParasiticsDef {
    fn default() -> Self {
        Self {
            rl_ohm: 0.08,
            rds_ohm: 0.0,
            vf_v: 0.0,
            rf_ohm: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceDef {
    pub vin_v: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop: Option<DropDef>,
}

impl Default for SourceDef {
    fn default() -> Self {
        Self {
            vin_v: 24.0,
            drop: Some(DropDef::default()),
        }
    }
}

/// Step disturbance on the input voltage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DropDef {
    pub level_v: f64,
    pub t_drop_s: f64,
    /// Omitted: the drop is permanent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_recover_s: Option<f64>,
}

impl Default for DropDef {
    fn default() -> Self {
        Self {
            level_v: 10.0,
            t_drop_s: 0.05,
            t_recover_s: Some(0.1),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InitMode {
    /// iL = vo = 0
    #[default]
    Zero,
    /// Ideal operating point for the baseline input and the commanded duty
    #[serde(rename = "equil", alias = "equilibrium")]
    Equilibrium,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    #[default]
    Rk4,
    Euler,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunDef {
    pub duty: f64,
    pub ts_s: f64,
    pub duration_s: f64,
    pub init: InitMode,
    pub integrator: IntegratorKind,
    pub substeps: usize,
}

impl Default for RunDef {
    fn default() -> Self {
        Self {
            duty: 0.55,
            ts_s: 1e-4,
            duration_s: 0.2,
            init: InitMode::Zero,
            integrator: IntegratorKind::Rk4,
            substeps: 20,
        }
    }
}
