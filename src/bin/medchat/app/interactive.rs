use std::io::{self, IsTerminal};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use medchat::controller::ConversationController;
use medchat::HttpChatClient;

use crate::config::{save_config, AppConfig, ConfigPaths, ThemeMode};
use crate::ui::{Palette, Renderer};

use super::drive::drive;
use super::slash::{self, Command};

pub(super) struct Session {
    /// Effective settings, flags included.
    pub config: AppConfig,
    /// What is on disk; only the theme is written back.
    pub file_config: AppConfig,
    pub paths: ConfigPaths,
}

pub(super) async fn run_interactive(client: HttpChatClient, mut session: Session) -> anyhow::Result<()> {
    let styled = io::stdout().is_terminal();
    let mut renderer = Renderer::new(
        io::stdout(),
        Palette::for_mode(session.config.ui.theme),
        styled,
    )
    .show_timestamps(session.config.ui.show_timestamps);
    renderer.banner(client.base_url())?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let controller = ConversationController::new(client).with_events(tx);
    let mut controller = drive(controller.start(), &mut rx, &mut renderer).await?;
    if controller.state().messages.is_empty() {
        renderer.quick_prompts()?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        renderer.prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match slash::parse(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => renderer.help()?,
            Command::Prompts => renderer.quick_prompts()?,
            Command::History => renderer.history(&controller.state().messages)?,
            Command::Clear => {
                let cleared = drive(controller.clear_messages(), &mut rx, &mut renderer).await?;
                if cleared.is_ok() {
                    renderer.quick_prompts()?;
                }
            }
            Command::Theme(mode) => {
                let mode = mode.unwrap_or_else(|| session.config.ui.theme.toggled());
                switch_theme(&mut session, mode);
                renderer.set_palette(Palette::for_mode(mode));
                renderer.notice(&format!("Theme set to {}.", mode.as_str()))?;
            }
            Command::Unknown(name) => {
                renderer.error(&format!("Unknown command {name}. Type /help for commands."))?
            }
            Command::Ask { text, picked } => {
                if !controller.state().can_send() {
                    renderer.notice("Still waiting for the previous reply.")?;
                    continue;
                }
                if picked {
                    renderer.echo_question(&text)?;
                }
                // failures are rendered from the event stream
                let _ = drive(controller.send_message(&text), &mut rx, &mut renderer).await?;
            }
        }
    }
    Ok(())
}

fn switch_theme(session: &mut Session, mode: ThemeMode) {
    session.config.ui.theme = mode;
    session.file_config.ui.theme = mode;
    if let Err(err) = save_config(&session.file_config, &session.paths) {
        log::warn!("could not persist theme: {err}");
    }
}
