//! Loading `SimConfig` from a JSON file.
//!
//! Every field is optional; missing fields take the defaults
//! (seed 42, the rooftop arena, the basic pistol).

use std::path::Path;

use marksman_sim::SimConfig;

use crate::error::AppError;

pub fn load_config(path: &Path) -> Result<SimConfig, AppError> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&text).map_err(|source| AppError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("loaded config from {}", path.display());
    Ok(config)
}

pub fn parse_config(text: &str) -> Result<SimConfig, serde_json::Error> {
    serde_json::from_str(text)
}
