//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use profstat_core::error::{ProfstatError, Result};

pub use schema::{
    CounterBackend, CounterSection, FallbackSection, GatewayConfig, ProfileSection,
    WeatherSection,
};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "PROFSTAT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "profstat.yaml";

pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ProfstatError::Config(format!("read {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| ProfstatError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Read a credential from the environment, treating blank values as unset.
pub fn env_credential(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
