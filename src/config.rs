use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_USER_ID: &str = "current-user";
const DEFAULT_TREND_WINDOW_DAYS: u32 = 7;
const DEFAULT_REPORT_RANGE_DAYS: u32 = 30;
const DEFAULT_RECENT_MOVEMENTS_LIMIT: usize = 5;

/// Where the entity containers are persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    /// One JSON file per container under `data_dir`.
    File,
    /// Process-local map; nothing survives exit.
    InMemory,
}

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Persistence backend for the entity containers
    #[serde(default = "default_storage_backend")]
    pub storage_backend: StorageBackend,

    /// Directory holding the container files when `storage_backend = "file"`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// User id stamped on movements when the caller does not name one
    #[serde(default = "default_user_id")]
    #[validate(length(min = 1, max = 128))]
    pub default_user_id: String,

    /// Number of calendar days in the daily movement trend
    #[serde(default = "default_trend_window_days")]
    #[validate(range(min = 1, max = 366))]
    pub trend_window_days: u32,

    /// Default look-back for date-ranged movement reports
    #[serde(default = "default_report_range_days")]
    #[validate(range(min = 1, max = 3660))]
    pub report_range_days: u32,

    /// How many movements the dashboard lists as recent
    #[serde(default = "default_recent_movements_limit")]
    #[validate(range(min = 1, max = 1000))]
    pub recent_movements_limit: usize,

    /// Reject movements whose product does not exist instead of recording
    /// them without a stock effect
    #[serde(default)]
    pub strict_references: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENV.to_string(),
            log_level: default_log_level(),
            log_json: false,
            storage_backend: default_storage_backend(),
            data_dir: default_data_dir(),
            default_user_id: default_user_id(),
            trend_window_days: default_trend_window_days(),
            report_range_days: default_report_range_days(),
            recent_movements_limit: default_recent_movements_limit(),
            strict_references: false,
        }
    }
}

impl AppConfig {
    /// Configuration for tests and embedding: in-memory storage, defaults elsewhere.
    pub fn in_memory() -> Self {
        Self {
            storage_backend: StorageBackend::InMemory,
            ..Self::default()
        }
    }

    /// Checks if running in production environment
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Checks if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Gets log level reference
    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Default value functions
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_storage_backend() -> StorageBackend {
    StorageBackend::File
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

fn default_trend_window_days() -> u32 {
    DEFAULT_TREND_WINDOW_DAYS
}

fn default_report_range_days() -> u32 {
    DEFAULT_REPORT_RANGE_DAYS
}

fn default_recent_movements_limit() -> usize {
    DEFAULT_RECENT_MOVEMENTS_LIMIT
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    match level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => {
            let mut err = ValidationError::new("log_level");
            err.message = Some("log_level must be one of trace, debug, info, warn, error".into());
            Err(err)
        }
    }
}

/// Initializes tracing using the provided log level as the default filter.
///
/// Output goes to stderr so command output on stdout stays machine-readable.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("inventory_ledger={},inventory={}", level, level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let builder = fmt()
        .with_env_filter(EnvFilter::new(filter_directive))
        .with_writer(std::io::stderr);
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}

/// Loads application configuration from the `config/` directory.
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    load_config_from(Path::new(CONFIG_DIR))
}

/// Same as [`load_config`] with an explicit configuration directory.
pub fn load_config_from(config_dir: &Path) -> Result<AppConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !config_dir.exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            config_dir.display()
        );
    }

    let default_file = config_dir.join("default");
    let env_file = config_dir.join(&run_env);
    let default_file = default_file.to_string_lossy();
    let env_file = env_file.to_string_lossy();

    let config = Config::builder()
        .set_default("environment", run_env.as_str())?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&default_file).required(false))
        .add_source(File::with_name(&env_file).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(format!("{}.toml", name)), content).unwrap();
    }

    #[test]
    fn defaults_apply_without_config_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("missing")).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.storage_backend, StorageBackend::File);
        assert_eq!(config.trend_window_days, 7);
        assert_eq!(config.recent_movements_limit, 5);
        assert_eq!(config.default_user_id, "current-user");
        assert!(!config.strict_references);
    }

    #[test]
    fn default_file_overrides_builtins() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "default",
            r#"
                storage_backend = "in-memory"
                data_dir = "/tmp/inventory"
                trend_window_days = 14
                strict_references = true
            "#,
        );

        let config = load_config_from(dir.path()).unwrap();
        assert_eq!(config.storage_backend, StorageBackend::InMemory);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/inventory"));
        assert_eq!(config.trend_window_days, 14);
        assert!(config.strict_references);
    }

    #[test]
    fn out_of_range_window_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "default", "trend_window_days = 0\nlog_level = \"loud\"");

        let result = load_config_from(dir.path());
        match result {
            Err(AppConfigError::Validation(errors)) => {
                let fields = errors.field_errors();
                assert!(fields.contains_key("trend_window_days"));
                assert!(fields.contains_key("log_level"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "default", "jwt_secret = \"nope\"");
        assert!(matches!(
            load_config_from(dir.path()),
            Err(AppConfigError::Load(_))
        ));
    }

    #[test]
    fn in_memory_preset_validates() {
        let config = AppConfig::in_memory();
        assert!(config.validate().is_ok());
        assert!(config.is_development());
        assert!(!config.is_production());
    }
}
