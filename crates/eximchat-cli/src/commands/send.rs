use super::render;
use crate::bootstrap::{self, Options};
use anyhow::{Result, bail};
use eximchat_application::SendOutcome;
use eximchat_core::session::SessionId;

pub async fn run(options: &Options, text: &str, session: Option<String>) -> Result<()> {
    let controller = bootstrap::controller(options).await?;

    if let Some(id) = session {
        controller.select_session(&SessionId::from(id)).await;
        if let Some(error) = controller.state().last_error {
            bail!(error);
        }
    }

    match controller.send_message(text).await {
        SendOutcome::Ignored => bail!("Nothing to send"),
        SendOutcome::Failed(error) => bail!(error),
        SendOutcome::Delivered => {
            let state = controller.state();
            if let Some(reply) = state.transcript.last() {
                render::message(reply);
            }
            if let Some(current) = &state.current_session {
                println!("session: {}", current.id);
            }
            controller.wait_background().await;
            Ok(())
        }
    }
}
