use clap::Parser;
use std::path::PathBuf;

use crate::config::{AppConfig, ThemeMode};

#[derive(Parser, Debug)]
#[command(
    name = "medchat",
    about = "Ask a document-grounded medical assistant questions from the terminal"
)]
pub struct CliArgs {
    /// Question to ask; starts a one-shot exchange instead of the REPL
    #[arg(index = 1)]
    pub question: Option<String>,
    #[arg(long, short = 'p')]
    pub prompt: Option<String>,
    /// Backend base URL
    #[arg(long, env = "MEDCHAT_API_URL")]
    pub base_url: Option<String>,
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
    /// Opaque session cookie, e.g. `session=...`
    #[arg(long, env = "MEDCHAT_SESSION_COOKIE")]
    pub cookie: Option<String>,
    #[arg(long)]
    pub timeout: Option<u64>,
    #[arg(long, value_parser = parse_theme)]
    pub theme: Option<ThemeMode>,
    /// Use the non-streaming endpoint for one-shot questions
    #[arg(long)]
    pub no_stream: bool,
    /// Clear the conversation on the backend and exit
    #[arg(long)]
    pub clear: bool,
    /// Print the conversation history and exit
    #[arg(long)]
    pub history: bool,
}

fn parse_theme(raw: &str) -> Result<ThemeMode, String> {
    ThemeMode::parse(raw).ok_or_else(|| format!("unknown theme `{raw}`, expected light or dark"))
}

impl CliArgs {
    pub fn one_shot_question(&self) -> Option<String> {
        self.prompt.clone().or(self.question.clone())
    }

    /// Applies flag overrides on top of the file configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.base_url {
            config.server.base_url = url.clone();
        }
        if let Some(cookie) = &self.cookie {
            config.server.session_cookie = Some(cookie.clone());
        }
        if let Some(timeout) = self.timeout {
            config.server.timeout_seconds = Some(timeout);
        }
        if let Some(theme) = self.theme {
            config.ui.theme = theme;
        }
    }
}
