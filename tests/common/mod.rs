//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use belvedere::config::{AppConfig, Environment};

/// A hermetic configuration: loopback bind on an ephemeral port, in-memory
/// storage, task runner on so every subsystem is exercised.
pub fn test_config() -> Arc<AppConfig> {
    let mut config = AppConfig::default();
    config.app.environment = Environment::Test;
    config.http.hostname = "127.0.0.1".to_string();
    config.http.port = 0;
    config.database.url = "sqlite::memory:".to_string();
    config.tasks.enabled = true;
    Arc::new(config)
}
