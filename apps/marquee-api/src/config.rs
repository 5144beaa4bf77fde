//! Runtime configuration read from the environment

use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error("MARQUEE_LOG_FORMAT must be 'pretty' or 'json', got '{0}'")]
    InvalidLogFormat(String),
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidLogFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Page size used when a list request does not give one
    pub default_page_size: u32,
    pub max_connections: u32,
    pub log_format: LogFormat,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup, falling back to defaults
    /// for absent keys
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            database_url: text("DATABASE_URL", "sqlite://marquee.db"),
            host: text("MARQUEE_HOST", "0.0.0.0"),
            port: positive("MARQUEE_PORT", lookup("MARQUEE_PORT"), 3000)?,
            default_page_size: positive(
                "MARQUEE_DEFAULT_PAGE_SIZE",
                lookup("MARQUEE_DEFAULT_PAGE_SIZE"),
                10,
            )?,
            max_connections: positive(
                "MARQUEE_MAX_CONNECTIONS",
                lookup("MARQUEE_MAX_CONNECTIONS"),
                5,
            )?,
            log_format: match lookup("MARQUEE_LOG_FORMAT") {
                Some(raw) => raw.parse()?,
                None => LogFormat::default(),
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn positive<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(ConfigError::InvalidNumber { key, value: raw }),
    }
}
