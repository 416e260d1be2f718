use anyhow::{Context, Result};
use eximchat_application::ChatController;
use eximchat_core::auth::AuthStore;
use eximchat_core::config::ClientConfig;
use eximchat_infrastructure::{ConfigService, EximPaths, FileAuthStore, HttpChatGateway};
use std::path::PathBuf;
use std::sync::Arc;

/// Global command-line options shared by every subcommand.
pub struct Options {
    pub config_path: Option<PathBuf>,
    pub base_url: Option<String>,
}

pub fn load_config(options: &Options) -> Result<ClientConfig> {
    let service = match &options.config_path {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };
    let config = service.load().context("Failed to load configuration")?;

    Ok(match &options.base_url {
        Some(url) => config.with_base_url(url),
        None => config,
    })
}

pub fn auth_store() -> Result<FileAuthStore> {
    FileAuthStore::from_paths(&EximPaths::default()).context("Failed to locate auth file")
}

/// Builds a controller wired to the HTTP gateway with the stored login.
pub async fn controller(options: &Options) -> Result<ChatController> {
    let config = load_config(options)?;
    let auth = auth_store()?
        .load()
        .await
        .context("Failed to read stored login")?;
    if !auth.is_authenticated() {
        tracing::info!("[Bootstrap] No stored login, requests are sent anonymously");
    }

    let gateway = HttpChatGateway::new(&config, auth)?;
    tracing::debug!("[Bootstrap] Using API at {}", gateway.base_url());
    Ok(ChatController::new(Arc::new(gateway)))
}
