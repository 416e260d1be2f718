use super::render;
use crate::bootstrap::{self, Options};
use anyhow::{Result, bail};
use eximchat_core::session::SessionId;

pub async fn list(options: &Options) -> Result<()> {
    let controller = bootstrap::controller(options).await?;
    controller.refresh_sessions().await;
    render::sessions(&controller.state());
    Ok(())
}

pub async fn suggestions(options: &Options) -> Result<()> {
    let controller = bootstrap::controller(options).await?;
    controller.initialize().await;
    render::suggestions(&controller.state().suggestions);
    Ok(())
}

pub async fn delete(options: &Options, id: &str) -> Result<()> {
    let controller = bootstrap::controller(options).await?;
    controller.delete_session(&SessionId::from(id)).await;

    if let Some(error) = controller.state().last_error {
        bail!(error);
    }
    println!("Deleted conversation {id}");
    Ok(())
}
