//! Config file loading and data-directory resolution.
//!
//! The service keeps everything under one data directory: `config.toml`,
//! downloaded models, and the vector store. A missing or malformed config
//! file never aborts startup; it logs and falls back to defaults.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use dmvoice_types::config::ServiceConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "DMVOICE_DATA_DIR";

const CONFIG_FILE: &str = "config.toml";

/// Resolve the data directory: `$DMVOICE_DATA_DIR` if set, otherwise
/// `~/.dmvoice`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".dmvoice")
}

/// Load `config.toml` from the data directory, defaulting on any failure.
pub async fn load_config(data_dir: &Path) -> ServiceConfig {
    let path = data_dir.join(CONFIG_FILE);

    let contents = match tokio::fs::read_to_string(&path).await {
        Ok(contents) => contents,
        Err(_) => {
            debug!(path = %path.display(), "no config file, using defaults");
            return ServiceConfig::default();
        }
    };

    match toml::from_str(&contents) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
            ServiceConfig::default()
        }
    }
}
