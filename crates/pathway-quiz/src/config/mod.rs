use crate::quiz::{LowSignalPolicy, QuizSettings, DEFAULT_QUIZ_ID, READ_ALL_URL};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub quiz: QuizSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let analytics_level = env::var("QUIZ_ANALYTICS_LOG_LEVEL").ok();

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                analytics_level,
            },
            quiz: load_quiz_settings()?,
        })
    }
}

fn load_quiz_settings() -> Result<QuizSettings, ConfigError> {
    let default_quiz_id = env::var("QUIZ_DEFAULT_ID")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_QUIZ_ID.to_string());

    let read_all_url = env::var("QUIZ_READ_ALL_URL").unwrap_or_else(|_| READ_ALL_URL.to_string());

    let low_signal = match env::var("QUIZ_LOW_SIGNAL_MIN_ANSWERS") {
        Ok(raw) => {
            let minimum = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidMinimumAnswers(raw.clone()))?;
            LowSignalPolicy::from_minimum(minimum)
        }
        Err(_) => LowSignalPolicy::default(),
    };

    let allow_skip = match env::var("QUIZ_ALLOW_SKIP") {
        Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
            name: "QUIZ_ALLOW_SKIP",
            value: raw,
        })?,
        Err(_) => true,
    };

    Ok(QuizSettings {
        default_quiz_id,
        read_all_url,
        low_signal,
        allow_skip,
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Log filter controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// Optional level for the analytics event mirror; `None` leaves it to `log_level`.
    pub analytics_level: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMinimumAnswers(String),
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMinimumAnswers(value) => write!(
                f,
                "QUIZ_LOW_SIGNAL_MIN_ANSWERS must be a non-negative integer, got '{}'",
                value
            ),
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{} must be true or false, got '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidMinimumAnswers(_)
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}
