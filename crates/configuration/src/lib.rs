//! # Tangguh Configuration Crate
//!
//! Loads the layered application settings and installs the tracing subscriber.
//!
//! ## Layering
//!
//! Later sources win:
//! 1. built-in defaults,
//! 2. the TOML file (`config.toml` when present, or an explicit path that must exist),
//! 3. environment variables such as `TANGGUH__SERVER__PORT=8080`,
//! 4. `DATABASE_URL`, read from the environment or a `.env` file.

use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use std::path::Path;

pub mod error;
pub mod logging;
pub mod settings;

pub use error::ConfigError;
pub use logging::init_tracing;
pub use settings::{ClientSettings, DatabaseSettings, LogFormat, LoggingSettings, ServerSettings, Settings};

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "TANGGUH";
const ENV_SEPARATOR: &str = "__";

/// Loads and validates the application settings.
///
/// With `path == None` the default `config.toml` is read if it exists.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    dotenvy::dotenv().ok();

    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
    };
    let database_url = std::env::var("DATABASE_URL").ok();

    build_settings(file, environment(), database_url)
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("database.url", "")?
        .set_default("database.max_connections", 10)?
        .set_default("database.acquire_timeout_secs", 5)?
        .set_default("database.run_migrations", true)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "pretty")?
        .set_default("client.base_url", "http://127.0.0.1:3000")?;
    Ok(builder)
}

fn build_settings<F>(file: F, environment: Environment, database_url: Option<String>) -> Result<Settings, ConfigError>
where
    F: config::Source + Send + Sync + 'static,
{
    let mut builder = defaults()?.add_source(file).add_source(environment);
    if let Some(url) = database_url.filter(|url| !url.trim().is_empty()) {
        builder = builder.set_override("database.url", url)?;
    }

    let settings = builder.build()?.try_deserialize::<Settings>()?;
    settings.validate()?;
    tracing::debug!(address = %settings.server.address(), "Configuration loaded.");
    Ok(settings)
}
