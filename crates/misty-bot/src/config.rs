//! Application configuration.
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. TOML file (missing file means defaults)
//! 3. `MISTY__<SECTION>__<KEY>` environment variables
//! 4. Bare `PRIVATE_KEY`, `RPC_ENDPOINT`, `TOKEN_ADDRESS` and `PORT`

use std::path::Path;

use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use misty_core::Secret;
use misty_dashboard::DashboardConfig;
use misty_lifecycle::{LifecycleOptions, RequiredSettings};
use misty_telemetry::{MonitorConfig, TelemetryConfig};
use misty_wallet::WalletConfig;

use crate::error::AppResult;

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "MISTY_CONFIG";

/// Standby trading engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Heartbeat log interval (seconds). 0 disables the heartbeat.
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,
}

fn default_heartbeat_interval_secs() -> u64 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Settings checked before the bot may start.
    pub bot: RequiredSettings,
    pub wallet: WalletConfig,
    pub lifecycle: LifecycleOptions,
    pub engine: EngineConfig,
    pub monitor: MonitorConfig,
    pub dashboard: DashboardConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Resolve the config path: explicit argument > `MISTY_CONFIG` > default.
    pub fn resolve_path(explicit: Option<String>) -> String {
        explicit
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Load from all sources using the process environment.
    pub fn load(path: &str) -> AppResult<Self> {
        if !Path::new(path).exists() {
            tracing::warn!(path = %path, "Config file not found, using defaults");
        }

        let mut config: Self = Config::builder()
            .add_source(File::new(path, FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix("MISTY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply the bare variables used by existing deployments.
    ///
    /// Blank values are ignored. An unparsable `PORT` is logged and ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = var("PRIVATE_KEY") {
            self.bot.private_key = Some(Secret::new(key));
        }
        if let Some(endpoint) = var("RPC_ENDPOINT") {
            self.bot.rpc_endpoint = Some(endpoint);
        }
        if let Some(address) = var("TOKEN_ADDRESS") {
            self.bot.token_address = Some(address);
        }
        if let Some(port) = var("PORT") {
            match port.trim().parse() {
                Ok(port) => self.dashboard.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid PORT"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.dashboard.port, 5000);
        assert_eq!(config.wallet.currency, "USD");
        assert_eq!(config.engine.heartbeat_interval_secs, 30);
        assert!(!config.lifecycle.rollback_on_failure);
        assert_eq!(
            config.bot.missing_fields(),
            vec!["private_key", "rpc_endpoint", "token_address"]
        );
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [bot]
            rpc_endpoint = "https://rpc.example"

            [lifecycle]
            rollback_on_failure = true

            [dashboard]
            port = 8080
            "#,
        )
        .unwrap();

        assert_eq!(config.bot.rpc_endpoint.as_deref(), Some("https://rpc.example"));
        assert!(config.lifecycle.rollback_on_failure);
        assert_eq!(config.dashboard.port, 8080);
        assert_eq!(config.dashboard.max_connections, 10);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let path = std::env::temp_dir().join(format!("misty-invalid-{}.toml", std::process::id()));
        std::fs::write(&path, "[dashboard]\nport = \"high\"\n").unwrap();

        let result = AppConfig::load(path.to_str().unwrap());
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_load_reads_file() {
        let path = std::env::temp_dir().join(format!("misty-valid-{}.toml", std::process::id()));
        std::fs::write(&path, "[engine]\nheartbeat_interval_secs = 5\n").unwrap();

        let config = AppConfig::load(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.engine.heartbeat_interval_secs, 5);
        assert_eq!(config.dashboard.max_connections, 10);
    }

    #[test]
    fn test_bare_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[
            ("PRIVATE_KEY", "k"),
            ("RPC_ENDPOINT", "https://rpc.example"),
            ("TOKEN_ADDRESS", "Tok111"),
            ("PORT", "7000"),
        ]));

        assert!(config.bot.missing_fields().is_empty());
        assert_eq!(config.bot.private_key.as_ref().unwrap().expose(), "k");
        assert_eq!(config.dashboard.port, 7000);
    }

    #[test]
    fn test_blank_and_invalid_env_ignored() {
        let mut config = AppConfig::default();
        config.bot.token_address = Some("from-file".to_string());
        config.apply_env_overrides(env(&[("TOKEN_ADDRESS", "  "), ("PORT", "not-a-port")]));

        assert_eq!(config.bot.token_address.as_deref(), Some("from-file"));
        assert_eq!(config.dashboard.port, 5000);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::load("/nonexistent/misty.toml").unwrap();
        assert_eq!(config.wallet.currency, "USD");
    }

    #[test]
    fn test_shipped_default_config_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/default.toml");
        let config: AppConfig = toml::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert!(config.lifecycle.rollback_on_failure);
        assert_eq!(config.dashboard.port, 5000);
    }
}
