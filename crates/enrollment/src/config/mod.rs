use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::intake::IntakePolicy;

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
    pub storage: StorageConfig,
    pub intake: IntakeConfig,
    pub admin: AdminConfig,
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

        let upload_dir =
            PathBuf::from(env::var("APP_UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()));

        let policy = match env::var("APP_INTAKE_POLICY") {
            Ok(raw) => parse_policy(&raw)?,
            Err(_) => IntakePolicy::Strict,
        };

        let admin_user = env::var("APP_ADMIN_USER").unwrap_or_else(|_| "admin".to_string());
        let admin_password = env::var("APP_ADMIN_PASSWORD").ok().filter(|p| !p.is_empty());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig { upload_dir },
            intake: IntakeConfig { policy },
            admin: AdminConfig {
                username: admin_user,
                password: admin_password,
            },
        })
    }
}

fn parse_policy(raw: &str) -> Result<IntakePolicy, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => Ok(IntakePolicy::Strict),
        "relaxed" => Ok(IntakePolicy::Relaxed),
        _ => Err(ConfigError::UnknownIntakePolicy(raw.to_string())),
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Root directory for the filesystem content store.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
}

/// Operating policy for the intake pipeline.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub policy: IntakePolicy,
}

/// Credentials backing the administrative session surface. Login is refused
/// outright when no password is configured.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    UnknownIntakePolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::UnknownIntakePolicy(raw) => {
                write!(f, "APP_INTAKE_POLICY must be 'strict' or 'relaxed', got '{raw}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::UnknownIntakePolicy(_) => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_UPLOAD_DIR");
        env::remove_var("APP_INTAKE_POLICY");
        env::remove_var("APP_ADMIN_USER");
        env::remove_var("APP_ADMIN_PASSWORD");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.storage.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.intake.policy, IntakePolicy::Strict);
        assert_eq!(config.admin.username, "admin");
        assert!(config.admin.password.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn parses_relaxed_intake_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_INTAKE_POLICY", "Relaxed");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.intake.policy, IntakePolicy::Relaxed);
    }

    #[test]
    fn rejects_unknown_intake_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_INTAKE_POLICY", "lenient");
        match AppConfig::load() {
            Err(ConfigError::UnknownIntakePolicy(raw)) => assert_eq!(raw, "lenient"),
            other => panic!("expected policy error, got {other:?}"),
        }
    }
}
