mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    tracing::debug!("Loaded config from {:?}", path);
    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./stashnfo.toml",
        "~/.config/stashnfo/config.toml",
        "/etc/stashnfo/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    let stash = &config.stash;

    if !matches!(stash.scheme.as_str(), "http" | "https") {
        anyhow::bail!("Stash scheme must be http or https, got '{}'", stash.scheme);
    }

    if stash.host.trim().is_empty() {
        anyhow::bail!("Stash host cannot be empty");
    }

    if stash.port == 0 {
        anyhow::bail!("Stash port cannot be 0");
    }

    if stash.timeout_secs == 0 {
        anyhow::bail!("Stash timeout cannot be 0");
    }

    if stash.search_limit == 0 {
        anyhow::bail!("Stash search limit cannot be 0");
    }

    if stash.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
        tracing::warn!("Stash api_key is set but empty, requests will be unauthenticated");
    }

    Ok(())
}
