use medchat::prompts::quick_prompt;

use crate::config::ThemeMode;

/// One line of REPL input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Command {
    Empty,
    Quit,
    Help,
    Prompts,
    History,
    Clear,
    /// `None` toggles the current theme.
    Theme(Option<ThemeMode>),
    Unknown(String),
    /// A question to send; quick prompts resolve to their text.
    Ask { text: String, picked: bool },
}

pub(super) fn parse(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    if let Some(rest) = trimmed.strip_prefix('/') {
        return parse_slash(rest);
    }
    if let Some(text) = trimmed.parse::<usize>().ok().and_then(quick_prompt) {
        return Command::Ask {
            text: text.to_string(),
            picked: true,
        };
    }
    Command::Ask {
        text: line.trim_end_matches(['\r', '\n']).to_string(),
        picked: false,
    }
}

fn parse_slash(rest: &str) -> Command {
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next();
    match name.as_str() {
        "quit" | "exit" | "q" => Command::Quit,
        "help" | "?" => Command::Help,
        "prompts" => Command::Prompts,
        "history" => Command::History,
        "clear" | "new" => Command::Clear,
        "theme" => match arg {
            None => Command::Theme(None),
            Some(raw) => match ThemeMode::parse(raw) {
                Some(mode) => Command::Theme(Some(mode)),
                None => Command::Unknown(format!("/theme {raw}")),
            },
        },
        _ => Command::Unknown(format!("/{name}")),
    }
}
