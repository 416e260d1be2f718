use crate::bootstrap;
use anyhow::{Result, bail};
use eximchat_core::auth::{AuthSession, AuthStore};

pub async fn login(token: String, username: Option<String>) -> Result<()> {
    let session = AuthSession::new(token, username);
    if !session.is_authenticated() {
        bail!("Token must not be empty");
    }

    let store = bootstrap::auth_store()?;
    store.save(&session).await?;
    match &session.username {
        Some(name) => println!("Logged in as {name}"),
        None => println!("Token stored at {}", store.path().display()),
    }
    Ok(())
}

pub async fn logout() -> Result<()> {
    bootstrap::auth_store()?.clear().await?;
    println!("Logged out");
    Ok(())
}
