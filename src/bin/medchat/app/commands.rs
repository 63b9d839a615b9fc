use std::io::{self, IsTerminal};

use tokio::sync::mpsc;

use medchat::controller::ConversationController;
use medchat::HttpChatClient;

use crate::config::AppConfig;
use crate::ui::{Palette, Renderer};

use super::drive::drive;

pub(super) async fn print_history(client: HttpChatClient, config: &AppConfig) -> anyhow::Result<()> {
    let mut renderer = renderer(config);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let controller = ConversationController::new(client).with_events(tx);
    let controller = drive(controller.start(), &mut rx, &mut renderer).await?;
    if controller.state().error.is_some() {
        anyhow::bail!("history unavailable");
    }
    if controller.state().messages.is_empty() {
        renderer.notice("No messages yet.")?;
    }
    Ok(())
}

pub(super) async fn clear(client: HttpChatClient, config: &AppConfig) -> anyhow::Result<()> {
    let mut renderer = renderer(config);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut controller = ConversationController::new(client).with_events(tx);
    drive(controller.clear_messages(), &mut rx, &mut renderer)
        .await?
        .map_err(|_| anyhow::anyhow!("conversation not cleared"))
}

fn renderer(config: &AppConfig) -> Renderer<io::Stdout> {
    let styled = io::stdout().is_terminal();
    Renderer::new(io::stdout(), Palette::for_mode(config.ui.theme), styled)
        .show_timestamps(config.ui.show_timestamps)
}
