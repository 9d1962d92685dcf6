//! Configuration schema definitions.
//!
//! The full configuration is read once at process start into an immutable
//! snapshot shared by reference with every subsystem. All types derive Serde
//! traits so a partial TOML file (or none at all) deserializes against the
//! defaults below.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration snapshot for the server process.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Application-level settings.
    pub app: AppSection,

    /// HTTP listener settings (bind address, timeouts, TLS).
    pub http: HttpConfig,

    /// Storage settings.
    pub database: DatabaseConfig,

    /// Background task runner settings.
    pub tasks: TasksConfig,
}

/// Application-level settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppSection {
    /// Deployment environment; selects logging defaults.
    pub environment: Environment,
}

/// The deployment environment the process runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" => Ok(Environment::Production),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Hostname or IP to bind (e.g. "0.0.0.0").
    pub hostname: String,

    /// Port to bind.
    pub port: u16,

    /// Per-request read timeout in seconds.
    pub read_timeout_secs: u64,

    /// Per-request write timeout in seconds.
    pub write_timeout_secs: u64,

    /// Keep-alive idle timeout in seconds.
    pub idle_timeout_secs: u64,

    /// Drain deadline for graceful shutdown in seconds.
    pub shutdown_timeout_secs: u64,

    /// TLS settings.
    pub tls: TlsConfig,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            hostname: "0.0.0.0".to_string(),
            port: 8080,
            read_timeout_secs: 5,
            write_timeout_secs: 10,
            idle_timeout_secs: 120,
            shutdown_timeout_secs: 10,
            tls: TlsConfig::default(),
        }
    }
}

impl HttpConfig {
    /// Bind address in `host:port` form.
    pub fn address(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }

    pub fn drain_deadline(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TlsConfig {
    /// Serve TLS instead of plain HTTP.
    pub enabled: bool,

    /// Path to the certificate file (PEM).
    pub certificate: String,

    /// Path to the private key file (PEM).
    pub key: String,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,

    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://belvedere.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

/// Background task runner configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TasksConfig {
    /// Whether the task runner subsystem is constructed at all.
    ///
    /// Off by default; flip on once the workload needs background jobs.
    pub enabled: bool,

    /// Bounded capacity of the in-process job queue.
    pub queue_capacity: usize,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            queue_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_all_interfaces() {
        let config = AppConfig::default();
        assert_eq!(config.http.address(), "0.0.0.0:8080");
        assert_eq!(config.app.environment, Environment::Development);
        assert!(!config.http.tls.enabled);
        assert!(!config.tasks.enabled);
    }

    #[test]
    fn partial_toml_merges_with_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [app]
            environment = "production"

            [http]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(config.app.environment, Environment::Production);
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.hostname, "0.0.0.0");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn environment_parses_from_str() {
        assert_eq!("test".parse::<Environment>().unwrap(), Environment::Test);
        assert!("staging".parse::<Environment>().is_err());
    }
}
