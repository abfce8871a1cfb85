//! Configuration loader using Figment for layered config management.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML config file
//! 3. Environment variables (XID_* prefix)

use crate::foundation::{Result, XidError};
use crate::infrastructure::config::types::AppConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use log::info;
use std::net::SocketAddr;
use std::path::Path;

/// Config file name looked up inside the data directory.
const CONFIG_FILE_NAME: &str = "xid-config.toml";

/// Environment variable prefix for config overrides.
///
/// Example: `XID_RPC__LISTEN` -> `rpc.listen`
const ENV_PREFIX: &str = "XID_";

/// Load configuration from the default file in `data_dir` (`xid-config.toml`).
pub fn load_config(data_dir: &Path) -> Result<AppConfig> {
    let config_path = data_dir.join(CONFIG_FILE_NAME);
    load_config_from_file(&config_path, data_dir)
}

/// Load configuration from a specific file path.  The file may be absent,
/// in which case defaults plus environment overrides apply.
pub fn load_config_from_file(path: &Path, data_dir: &Path) -> Result<AppConfig> {
    info!("loading configuration path={} data_dir={}", path.display(), data_dir.display());
    let figment = Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));
    let mut config: AppConfig = figment.extract().map_err(|e| XidError::Config(format!("config extraction failed: {e}")))?;
    if config.service.data_dir.trim().is_empty() {
        config.service.data_dir = data_dir.display().to_string();
    }
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<()> {
    config
        .rpc
        .listen
        .parse::<SocketAddr>()
        .map_err(|_| XidError::Config(format!("invalid rpc.listen address: {}", config.rpc.listen)))?;
    if config.rest.enabled {
        config
            .rest
            .listen
            .parse::<SocketAddr>()
            .map_err(|_| XidError::Config(format!("invalid rest.listen address: {}", config.rest.listen)))?;
    }
    Ok(())
}
