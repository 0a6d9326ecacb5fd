//! Tries to create an `AppConfig` from config files.
//! Layers `config/base.toml` with the `APP_ENVIRONMENT`-specific file, then
//! applies environment-variable overrides so deployments can supply the
//! upstream API coordinates and the origin allow-list without editing files.
//! Gets initialized with `OnceLock` so it only needs to get initialized once.

mod error;
mod types;

use std::sync::OnceLock;
use tracing::info;

// Re-export config structs
pub use error::{ConfigError, ConfigResult};
pub use types::{AppConfig, CorsConfig, Environment, NetConfig, UpstreamConfig};

/// Allocates a static `OnceLock` containing `AppConfig`.
/// This ensures configuration only gets initialized the first time we call this function.
/// Every other caller gets a &'static ref to AppConfig.
/// Panics if anything goes wrong.
pub fn get_or_init_config() -> &'static AppConfig {
    static CONFIG_INIT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG_INIT.get_or_init(|| {
        info!(
            "{:<12} - Initializing the configuration",
            "get_or_init_config"
        );
        let base_path = std::env::current_dir().expect("Failed to determine the current DIR.");
        let config_dir = base_path.join("config");

        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .expect("Failed to parse APP_ENVIRONMENT.");
        let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

        let mut config = build_from_files(&[
            config_dir.join("base.toml"),
            config_dir.join(environment_filename),
        ])
        .unwrap_or_else(|er| panic!("Fatal Error: Building config: {er}"));

        apply_env_overrides(&mut config)
            .unwrap_or_else(|er| panic!("Fatal Error: Applying config env overrides: {er:?}"));

        // The 403 fallback header needs a first origin to point at.
        if config.cors_config.allowed_origins.is_empty() {
            panic!("Fatal Error: {}", ConfigError::NoAllowedOrigins);
        }

        config
    })
}

/// Reads and deserializes each file in order, later files overriding the
/// top-level tables of earlier ones.
fn build_from_files(paths: &[std::path::PathBuf]) -> ConfigResult<AppConfig> {
    let mut merged = toml::Table::new();

    for path in paths {
        let content = std::fs::read_to_string(path)?;
        let table: toml::Table = toml::from_str(&content)?;
        for (key, value) in table {
            merged.insert(key, value);
        }
    }

    let config = merged.try_into()?;
    Ok(config)
}

/// Environment variables take precedence over anything the files supplied.
fn apply_env_overrides(config: &mut AppConfig) -> ConfigResult<()> {
    if let Ok(url) = std::env::var("UPSTREAM_API_URL") {
        config.upstream_config.url = url;
    }
    if let Ok(path) = std::env::var("UPSTREAM_SUBSCRIBE_PATH") {
        config.upstream_config.subscribe_path = path;
    }
    if let Ok(publication_id) = std::env::var("UPSTREAM_PUBLICATION_ID") {
        config.upstream_config.publication_id = publication_id;
    }
    if let Ok(origins) = std::env::var("APP_ALLOWED_ORIGINS") {
        config.cors_config = CorsConfig::try_from(origins.as_str())?;
    }

    Ok(())
}
