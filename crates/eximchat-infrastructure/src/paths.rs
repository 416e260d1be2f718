//! Unified path management for eximchat files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/eximchat/          # Config directory (dirs::config_dir)
//! ├── config.toml              # Client configuration
//! └── auth.json                # Stored login (token, username)
//! ```

use eximchat_core::error::{ChatError, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "eximchat";

/// Resolves eximchat file locations.
///
/// With a base path every file lives directly under it, which is what tests
/// and `--config-dir` style overrides use.
#[derive(Debug, Clone, Default)]
pub struct EximPaths {
    base: Option<PathBuf>,
}

impl EximPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the eximchat configuration directory.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Config` when no platform config directory exists
    /// (e.g. `HOME` is unset) and no base path was given.
    pub fn config_dir(&self) -> Result<PathBuf> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| ChatError::config("Cannot find config directory"))
    }

    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Path of the stored login.
    ///
    /// The file holds a bearer token; [`crate::FileAuthStore`] writes it with
    /// mode 600 on Unix.
    pub fn auth_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("auth.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_under_base() {
        let base = tempfile::tempdir().unwrap();
        let paths = EximPaths::new(Some(base.path()));

        assert_eq!(paths.config_dir().unwrap(), base.path());
        let config_file = paths.config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        assert!(config_file.starts_with(base.path()));
        assert!(paths.auth_file().unwrap().ends_with("auth.json"));
    }

    #[test]
    fn test_default_dir_name() {
        // Platform dir may be missing in sandboxes; only check when present.
        if let Ok(dir) = EximPaths::default().config_dir() {
            assert!(dir.ends_with("eximchat"));
        }
    }
}
