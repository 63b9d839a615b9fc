mod plain;
mod render;
mod theme;

use std::io;

use medchat::controller::ConversationEvent;

pub use plain::PlainSink;
pub use render::Renderer;
pub use theme::Palette;

/// Consumer of controller events.
pub trait EventSink {
    fn apply(&mut self, event: &ConversationEvent) -> io::Result<()>;
}
