//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, EngineSettings, LiveApiConfig, LoggingConfig,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from an optional file plus the environment.
///
/// Layering, lowest to highest: serde defaults, the config file when given,
/// then `SCANNER__`-prefixed environment variables
/// (e.g. `SCANNER__ENGINE__INITIAL_CAPITAL=250000`).
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix("SCANNER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
