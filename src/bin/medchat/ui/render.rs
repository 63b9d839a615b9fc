use std::io::{self, Write};

use chrono::{DateTime, Local, Utc};
use crossterm::style::{Color, Stylize};
use crossterm::{cursor, queue, terminal};

use medchat::chat::{Message, Role};
use medchat::controller::ConversationEvent;
use medchat::prompts::QUICK_PROMPTS;

use super::theme::{indicators, Palette};
use super::EventSink;

const HELP: &[(&str, &str)] = &[
    ("/help", "show this help"),
    ("/clear", "start a new chat"),
    ("/history", "reprint the conversation"),
    ("/prompts", "list quick prompts"),
    ("/theme [light|dark]", "switch color theme"),
    ("/quit", "leave"),
    ("1-6", "ask the matching quick prompt"),
];

/// Draws the conversation for the interactive session.
pub struct Renderer<W: Write> {
    out: W,
    palette: Palette,
    styled: bool,
    show_timestamps: bool,
    typing: bool,
    streaming: bool,
}

impl<W: Write> Renderer<W> {
    /// `styled` enables colors and the typing indicator; disable it when the
    /// output is not a terminal.
    pub fn new(out: W, palette: Palette, styled: bool) -> Self {
        Self {
            out,
            palette,
            styled,
            show_timestamps: true,
            typing: false,
            streaming: false,
        }
    }

    pub fn show_timestamps(mut self, show: bool) -> Self {
        self.show_timestamps = show;
        self
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn banner(&mut self, base_url: &str) -> io::Result<()> {
        let title = self.paint("Clinical Chat", self.palette.accent);
        let subtitle = self.paint(&format!("Medical RAG at {base_url}"), self.palette.muted);
        writeln!(self.out, "{title}  {subtitle}")?;
        let hint = self.paint("Type a question, or /help for commands.", self.palette.muted);
        writeln!(self.out, "{hint}")?;
        writeln!(self.out)?;
        self.out.flush()
    }

    pub fn help(&mut self) -> io::Result<()> {
        for (command, description) in HELP {
            let command = self.paint(&format!("{command:<22}"), self.palette.accent);
            writeln!(self.out, "  {command}{description}")?;
        }
        self.out.flush()
    }

    pub fn quick_prompts(&mut self) -> io::Result<()> {
        let heading = self.paint("Quick prompts", self.palette.muted);
        writeln!(self.out, "{heading}")?;
        for (index, prompt) in QUICK_PROMPTS.iter().enumerate() {
            let number = self.paint(&format!("{:>3}.", index + 1), self.palette.accent);
            writeln!(self.out, "{number} {prompt}")?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }

    pub fn history(&mut self, messages: &[Message]) -> io::Result<()> {
        for message in messages {
            self.header(message)?;
            writeln!(self.out, "{}", message.content)?;
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    pub fn prompt(&mut self) -> io::Result<()> {
        let marker = self.paint(indicators::PROMPT, self.palette.user);
        write!(self.out, "{marker} ")?;
        self.out.flush()
    }

    /// Shows a question the user picked rather than typed.
    pub fn echo_question(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        let text = self.paint(text, self.palette.muted);
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn error(&mut self, text: &str) -> io::Result<()> {
        let line = self.paint(&format!("{} {text}", indicators::CROSS), self.palette.error);
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    fn header(&mut self, message: &Message) -> io::Result<()> {
        let color = match message.role {
            Role::User => self.palette.user,
            Role::Assistant => self.palette.assistant,
        };
        let label = self.paint(
            &format!("{} {}", indicators::BULLET, role_label(message.role)),
            color,
        );
        if self.show_timestamps {
            let time = self.paint(&format_time(message.timestamp), self.palette.muted);
            writeln!(self.out, "{label} {time}")
        } else {
            writeln!(self.out, "{label}")
        }
    }

    fn reply_started(&mut self, message: &Message) -> io::Result<()> {
        self.header(message)?;
        self.streaming = true;
        if message.is_empty() && self.styled {
            let typing = self.paint(indicators::TYPING, self.palette.muted);
            write!(self.out, "{typing}")?;
            self.typing = true;
        } else {
            write!(self.out, "{}", message.content)?;
        }
        self.out.flush()
    }

    fn fragment(&mut self, fragment: &str) -> io::Result<()> {
        self.clear_typing()?;
        write!(self.out, "{fragment}")?;
        self.out.flush()
    }

    fn reply_removed(&mut self) -> io::Result<()> {
        self.clear_typing()?;
        if self.streaming {
            writeln!(self.out)?;
            self.streaming = false;
        }
        self.notice("(reply discarded)")
    }

    fn reply_finished(&mut self) -> io::Result<()> {
        self.clear_typing()?;
        if self.streaming {
            writeln!(self.out)?;
            writeln!(self.out)?;
            self.streaming = false;
        }
        self.out.flush()
    }

    fn clear_typing(&mut self) -> io::Result<()> {
        if self.typing {
            queue!(
                self.out,
                cursor::MoveToColumn(0),
                terminal::Clear(terminal::ClearType::CurrentLine)
            )?;
            self.typing = false;
        }
        Ok(())
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.styled {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }
}

impl<W: Write> EventSink for Renderer<W> {
    fn apply(&mut self, event: &ConversationEvent) -> io::Result<()> {
        match event {
            ConversationEvent::HistoryLoaded(messages) => self.history(messages),
            // typed questions are already on screen
            ConversationEvent::MessageAdded(message) if message.role == Role::User => Ok(()),
            ConversationEvent::MessageAdded(message) => self.reply_started(message),
            ConversationEvent::ChunkAppended { fragment, .. } => self.fragment(fragment),
            ConversationEvent::MessageRemoved(_) => self.reply_removed(),
            ConversationEvent::LoadingChanged(true) => Ok(()),
            ConversationEvent::LoadingChanged(false) => self.reply_finished(),
            ConversationEvent::Cleared => self.notice("Started a new conversation."),
            ConversationEvent::Failed(message) => self.error(message),
        }
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "Assistant",
    }
}

fn format_time(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}
