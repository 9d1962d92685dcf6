//! Configuration loading.
//!
//! The snapshot is assembled in three steps: defaults, an optional TOML file,
//! then `BELVEDERE_*` environment variable overrides. The result is validated
//! before it is accepted into the system.

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::config::schema::{AppConfig, Environment};
use crate::config::validation::{self, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value in {var}: {message}")]
    Env { var: String, message: String },

    #[error("config validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate the configuration snapshot.
///
/// `path` is optional; with no file everything comes from defaults and the
/// environment.
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config)?;

    validation::validate(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Read the environment name directly from the process environment.
///
/// Used before the full snapshot exists so startup logging can be wired
/// first; `load` applies the same override, so the two always agree.
pub fn environment_from_env() -> Environment {
    env::var("BELVEDERE_APP_ENVIRONMENT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

fn apply_env_overrides(config: &mut AppConfig) -> Result<(), ConfigError> {
    override_var("BELVEDERE_APP_ENVIRONMENT", &mut config.app.environment)?;
    override_var("BELVEDERE_HTTP_HOSTNAME", &mut config.http.hostname)?;
    override_var("BELVEDERE_HTTP_PORT", &mut config.http.port)?;
    override_var("BELVEDERE_HTTP_TLS_ENABLED", &mut config.http.tls.enabled)?;
    override_var("BELVEDERE_DATABASE_URL", &mut config.database.url)?;
    override_var("BELVEDERE_TASKS_ENABLED", &mut config.tasks.enabled)?;
    Ok(())
}

fn override_var<T>(var: &str, slot: &mut T) -> Result<(), ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(raw) = env::var(var) {
        *slot = raw.parse().map_err(|e: T::Err| ConfigError::Env {
            var: var.to_string(),
            message: e.to_string(),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Serializes tests that read or write process environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn load_without_file_uses_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        let config = load(None).unwrap();
        assert_eq!(config.http.port, 8080);
    }

    #[test]
    fn load_reads_toml_file() {
        let _guard = ENV_LOCK.lock().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [http]
            hostname = "127.0.0.1"
            port = 9090

            [database]
            url = "sqlite::memory:"
            "#
        )
        .unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.http.address(), "127.0.0.1:9090");
        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn env_override_beats_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("BELVEDERE_HTTP_PORT", "7171");
        let config = load(None).unwrap();
        env::remove_var("BELVEDERE_HTTP_PORT");
        assert_eq!(config.http.port, 7171);
    }

    #[test]
    fn invalid_env_value_is_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("BELVEDERE_TASKS_ENABLED", "maybe");
        let err = load(None).unwrap_err();
        env::remove_var("BELVEDERE_TASKS_ENABLED");
        assert!(matches!(err, ConfigError::Env { .. }));
    }

    #[test]
    fn tls_without_paths_fails_validation() {
        let _guard = ENV_LOCK.lock().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [http.tls]
            enabled = true
            "#
        )
        .unwrap();

        let err = load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
