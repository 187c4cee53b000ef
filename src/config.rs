use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub recommender: RecommenderSettings,
    #[serde(default)]
    pub chat: ChatSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

/// Redis is optional; without `redis_url` the service runs uncached
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Comes from `SECRET_KEY`; no usable default is shipped
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_token_expire_minutes")]
    pub access_token_expire_minutes: i64,
}

fn default_algorithm() -> String { "HS256".to_string() }
fn default_token_expire_minutes() -> i64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct RecommenderSettings {
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    /// TOML keyword dictionary replacing the built-in one
    pub dictionary_path: Option<String>,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
            dictionary_path: None,
        }
    }
}

fn default_result_limit() -> usize { crate::core::DEFAULT_RESULT_LIMIT }

#[derive(Debug, Clone, Deserialize)]
pub struct ChatSettings {
    /// Maximum number of messages returned for a session
    #[serde(default = "default_max_history")]
    pub max_history: i64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self { max_history: default_max_history() }
    }
}

fn default_max_history() -> i64 { 50 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

/// Output format of the log subscriber; unknown values fail config loading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CAR_ADVISOR__)
    /// 5. DATABASE_URL, SECRET_KEY and REDIS_URL
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CAR_ADVISOR__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("CAR_ADVISOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("CAR_ADVISOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Conventional unprefixed variables win over everything else
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(secret_key) = env::var("SECRET_KEY") {
        builder = builder.set_override("auth.secret_key", secret_key)?;
    }
    if let Ok(redis_url) = env::var("REDIS_URL") {
        builder = builder.set_override("cache.redis_url", redis_url)?;
    }

    builder.build()
}
