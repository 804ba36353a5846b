//! Config file loading.

use std::path::Path;

use bs_project::{ProjectError, SimConfig};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Load and validate a YAML or JSON config file.
pub fn load_config(path: &Path) -> AppResult<SimConfig> {
    debug!(path = %path.display(), "loading config");
    bs_project::load(path).map_err(|err| match err {
        ProjectError::Io(source) => AppError::ConfigFileRead {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })
}

/// Load a config file and build the plant it describes without running it.
pub fn validate_file(path: &Path) -> AppResult<SimConfig> {
    let config = load_config(path)?;
    crate::run_service::build_plant(&config)?;
    Ok(config)
}
