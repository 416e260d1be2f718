//! File-backed auth store.
//!
//! Persists the login as JSON (`~/.config/eximchat/auth.json`).

use crate::paths::EximPaths;
use async_trait::async_trait;
use eximchat_core::auth::{AuthSession, AuthStore};
use eximchat_core::error::Result;
use std::path::{Path, PathBuf};

/// `AuthStore` writing a single JSON document.
#[derive(Debug, Clone)]
pub struct FileAuthStore {
    path: PathBuf,
}

impl FileAuthStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location resolved by `EximPaths`.
    pub fn from_paths(paths: &EximPaths) -> Result<Self> {
        Ok(Self::new(paths.auth_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuthStore for FileAuthStore {
    async fn load(&self) -> Result<AuthSession> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(AuthSession::anonymous()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "[FileAuthStore] No auth file at {}, not logged in",
                    self.path.display()
                );
                Ok(AuthSession::anonymous())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, session: &AuthSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(session)?;
        tokio::fs::write(&self.path, json).await?;

        // The file holds a bearer token: user read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&self.path, permissions).await?;
        }

        tracing::info!("[FileAuthStore] Saved login to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::info!("[FileAuthStore] Removed {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
