use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::forms::broker::DEFAULT_TOP_N;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_QUESTIONNAIRE_PORT: u16 = 3001;
const DEFAULT_EVENT_PORT: u16 = 3002;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Deployment stage, reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => AppEnvironment::Production,
            "test" | "ci" => AppEnvironment::Test,
            _ => AppEnvironment::Development,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Test => "test",
            AppEnvironment::Production => "production",
        }
    }
}

/// Settings for both form APIs and the offline commands, read from `.env` and the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    /// Broker questionnaire API binding.
    pub server: ServerConfig,
    /// Event registration API binding. Shares the host with `server`.
    pub event_server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub ranking: RankingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = env::var("APP_ENV")
            .map(|label| AppEnvironment::from_label(&label))
            .unwrap_or(AppEnvironment::Development);
        let host = env_or("APP_HOST", DEFAULT_HOST);

        let server = ServerConfig {
            host: host.clone(),
            port: port_from_env("APP_PORT", DEFAULT_QUESTIONNAIRE_PORT)?,
        };
        let event_server = ServerConfig {
            host,
            port: port_from_env("EVENT_PORT", DEFAULT_EVENT_PORT)?,
        };

        Ok(Self {
            environment,
            server,
            event_server,
            telemetry: TelemetryConfig {
                log_level: env_or("APP_LOG_LEVEL", DEFAULT_LOG_LEVEL),
            },
            ranking: RankingConfig {
                top_n: top_n_from_env()?,
            },
        })
    }
}

fn env_or(variable: &str, default: &str) -> String {
    env::var(variable).unwrap_or_else(|_| default.to_string())
}

fn port_from_env(variable: &'static str, default: u16) -> Result<u16, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort { variable }),
        Err(_) => Ok(default),
    }
}

fn top_n_from_env() -> Result<usize, ConfigError> {
    let Ok(raw) = env::var("RANKING_TOP_N") else {
        return Ok(DEFAULT_TOP_N);
    };
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|top_n| *top_n > 0)
        .ok_or(ConfigError::InvalidTopN)
}

/// Host and port one form API listens on.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `localhost` is accepted as an alias for the IPv4 loopback.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = match self.host.trim() {
            host if host.eq_ignore_ascii_case("localhost") => IpAddr::V4(Ipv4Addr::LOCALHOST),
            host => host
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost { source })?,
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

#[derive(Debug, Clone, Copy)]
pub struct RankingConfig {
    /// Entries in the ranking's top summary.
    pub top_n: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort { variable: &'static str },
    InvalidHost { source: std::net::AddrParseError },
    InvalidTopN,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { variable } => {
                write!(f, "{variable} must be a port number between 0 and 65535")
            }
            ConfigError::InvalidHost { source } => {
                write!(f, "APP_HOST is not an IP address or localhost ({source})")
            }
            ConfigError::InvalidTopN => write!(f, "RANKING_TOP_N must be a positive integer"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let ConfigError::InvalidHost { source } = self {
            return Some(source);
        }
        None
    }
}
