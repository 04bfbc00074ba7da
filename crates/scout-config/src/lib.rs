//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, DataConfig, IndicatorConfig, LiquidityConfig, LoggingConfig, NotifyConfig,
    OptimizerConfig, PullbackConfig, RegimeMultipliers, RiskConfig, ScanConfig, ScoringWeights,
    StoreConfig, StrategyConfig, ThresholdConfig, TrackerConfig,
};

use config::{Config, Environment, File};
use std::path::Path;
use thiserror::Error;

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load configuration from layered sources: `config/default.toml` when
/// present, then an explicit file, then the environment.
///
/// Environment variables use the `SCOUT` prefix with `__` separating
/// nesting levels, e.g. `SCOUT__SCAN__BATCH_SIZE=10`. With no file,
/// defaults plus environment overrides apply.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder =
        Config::builder().add_source(File::with_name("config/default").required(false));
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }
    let config = builder
        .add_source(
            Environment::with_prefix("SCOUT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    app.validate()?;
    Ok(app)
}

/// Render the default configuration as a TOML document.
pub fn default_toml() -> String {
    toml::to_string_pretty(&AppConfig::default()).unwrap_or_default()
}
