//! TOML loading for `ArbiterCfg`.
//!
//! ```toml
//! launch_boost_ms = 5000
//! encode_boost_ms = 2000
//! audio_streaming_max_ms = 2000
//! interactive_governors = ["interactive"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use hint_arbiter_core::ArbiterCfg;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read arbiter config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse arbiter config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub fn cfg_from_str(data: &str) -> Result<ArbiterCfg, ConfigError> {
    Ok(toml::from_str(data)?)
}

pub fn load_cfg(path: &Path) -> Result<ArbiterCfg, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    cfg_from_str(&data)
}
