//! Configuration validation.
//!
//! Serde covers syntax; this module covers semantics. Validation collects
//! every problem it finds rather than stopping at the first, so a bad config
//! can be fixed in one pass.

use crate::config::schema::AppConfig;

/// A single semantic problem found in a configuration snapshot.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Validate a configuration snapshot, returning all errors found.
pub fn validate(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.http.hostname.is_empty() {
        errors.push(ValidationError::new("http.hostname", "must not be empty"));
    }

    if config.http.read_timeout_secs == 0 {
        errors.push(ValidationError::new("http.read_timeout_secs", "must be greater than zero"));
    }
    if config.http.write_timeout_secs == 0 {
        errors.push(ValidationError::new("http.write_timeout_secs", "must be greater than zero"));
    }
    if config.http.idle_timeout_secs == 0 {
        errors.push(ValidationError::new("http.idle_timeout_secs", "must be greater than zero"));
    }
    if config.http.shutdown_timeout_secs == 0 {
        errors.push(ValidationError::new("http.shutdown_timeout_secs", "must be greater than zero"));
    }

    if config.http.tls.enabled {
        if config.http.tls.certificate.is_empty() {
            errors.push(ValidationError::new(
                "http.tls.certificate",
                "required when TLS is enabled",
            ));
        }
        if config.http.tls.key.is_empty() {
            errors.push(ValidationError::new("http.tls.key", "required when TLS is enabled"));
        }
    }

    if config.database.url.is_empty() {
        errors.push(ValidationError::new("database.url", "must not be empty"));
    }
    if config.database.max_connections == 0 {
        errors.push(ValidationError::new(
            "database.max_connections",
            "must be greater than zero",
        ));
    }

    if config.tasks.enabled && config.tasks.queue_capacity == 0 {
        errors.push(ValidationError::new(
            "tasks.queue_capacity",
            "must be greater than zero when tasks are enabled",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn tls_enabled_requires_material_paths() {
        let mut config = AppConfig::default();
        config.http.tls.enabled = true;

        let errors = validate(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"http.tls.certificate"));
        assert!(fields.contains(&"http.tls.key"));
    }

    #[test]
    fn collects_every_error() {
        let mut config = AppConfig::default();
        config.http.hostname.clear();
        config.http.read_timeout_secs = 0;
        config.database.url.clear();

        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
