use std::io::{self, Write};

use medchat::controller::ConversationEvent;

use super::EventSink;

/// Writes reply fragments verbatim and nothing else, for piping.
pub struct PlainSink<W: Write> {
    out: W,
    wrote_reply: bool,
}

impl<W: Write> PlainSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            wrote_reply: false,
        }
    }

    /// Terminates the reply with a newline if anything was written.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.wrote_reply {
            writeln!(self.out)?;
            self.wrote_reply = false;
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventSink for PlainSink<W> {
    fn apply(&mut self, event: &ConversationEvent) -> io::Result<()> {
        if let ConversationEvent::ChunkAppended { fragment, .. } = event {
            self.out.write_all(fragment.as_bytes())?;
            self.out.flush()?;
            self.wrote_reply = true;
        }
        Ok(())
    }
}
