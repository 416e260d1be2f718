//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the client configuration
//! from the configuration file (~/.config/eximchat/config.toml).

use crate::paths::EximPaths;
use eximchat_core::config::ClientConfig;
use eximchat_core::error::{ChatError, Result};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Environment variable overriding `base_url` from the file.
pub const BASE_URL_ENV: &str = "EXIMCHAT_BASE_URL";

/// Configuration service that loads and caches the client configuration.
///
/// A missing file yields `ClientConfig::default()`; a malformed file is an
/// error from [`ConfigService::load`].
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Explicit file location; `None` resolves through `EximPaths`.
    path: Option<PathBuf>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Creates a ConfigService reading the default config file.
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a ConfigService reading the given file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Loads the configuration, using the cache when populated.
    pub fn load(&self) -> Result<ClientConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_from_file()?;

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn config_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => EximPaths::default().config_file(),
        }
    }

    fn load_from_file(&self) -> Result<ClientConfig> {
        let path = self.config_path()?;

        let config = if path.exists() {
            tracing::debug!("[ConfigService] Loading config from {}", path.display());
            let raw = std::fs::read_to_string(&path)?;
            toml::from_str::<ClientConfig>(&raw).map_err(|e| {
                ChatError::config(format!("Invalid config file {}: {}", path.display(), e))
            })?
        } else {
            tracing::debug!(
                "[ConfigService] No config at {}, using defaults",
                path.display()
            );
            ClientConfig::default()
        };

        Ok(apply_env_overrides(config))
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_env_overrides(config: ClientConfig) -> ClientConfig {
    match std::env::var(BASE_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => config.with_base_url(url.trim()),
        _ => config,
    }
}
