use crossterm::style::Color;

use crate::config::ThemeMode;

pub mod indicators {
    pub const PROMPT: &str = "❯";
    pub const BULLET: &str = "●";
    pub const CROSS: &str = "✗";
    pub const TYPING: &str = "Assistant is typing…";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub user: Color,
    pub assistant: Color,
    pub accent: Color,
    pub muted: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self {
                user: Color::Cyan,
                assistant: Color::Green,
                accent: Color::Rgb {
                    r: 110,
                    g: 231,
                    b: 183,
                },
                muted: Color::DarkGrey,
                error: Color::Red,
            },
            ThemeMode::Light => Self {
                user: Color::DarkBlue,
                assistant: Color::DarkGreen,
                accent: Color::Rgb {
                    r: 4,
                    g: 120,
                    b: 87,
                },
                muted: Color::Grey,
                error: Color::DarkRed,
            },
        }
    }
}
