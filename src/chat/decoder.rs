use std::pin::Pin;

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::error::ChatError;

/// Boxed stream of decoded text fragments.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, ChatError>> + Send>>;

/// Incremental UTF-8 decoder.
///
/// Bytes of a character split across reads are held back until the rest
/// arrives. Invalid sequences decode to U+FFFD. Call [`finish`] once the
/// input is exhausted to flush whatever is still pending.
///
/// [`finish`]: Utf8StreamDecoder::finish
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes as much of `pending + bytes` as forms complete characters.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    return out;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match err.error_len() {
                        Some(invalid) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + invalid);
                        }
                        None => {
                            self.pending.drain(..valid);
                            return out;
                        }
                    }
                }
            }
        }
    }

    /// Flushes a trailing incomplete sequence as replacement text.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        rest
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

struct DecodeState<S> {
    inner: Pin<Box<S>>,
    decoder: Utf8StreamDecoder,
    done: bool,
}

/// Turns a byte stream into non-empty text fragments in arrival order.
///
/// The first transport error is yielded and ends the stream.
pub fn decode_text_stream<S, E>(bytes: S) -> TextStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<ChatError> + Send + 'static,
{
    let state = DecodeState {
        inner: Box::pin(bytes),
        decoder: Utf8StreamDecoder::new(),
        done: false,
    };
    Box::pin(stream::unfold(state, |mut state| async move {
        if state.done {
            return None;
        }
        loop {
            match state.inner.next().await {
                Some(Ok(chunk)) => {
                    let text = state.decoder.decode(&chunk);
                    if !text.is_empty() {
                        return Some((Ok(text), state));
                    }
                }
                Some(Err(err)) => {
                    state.done = true;
                    return Some((Err(err.into()), state));
                }
                None => {
                    state.done = true;
                    let rest = state.decoder.finish();
                    if rest.is_empty() {
                        return None;
                    }
                    return Some((Ok(rest), state));
                }
            }
        }
    }))
}

/// Single-fragment stream for bodies read in one piece.
pub fn buffered_text_stream(text: String) -> TextStream {
    let items = if text.is_empty() {
        Vec::new()
    } else {
        vec![Ok(text)]
    };
    Box::pin(stream::iter(items))
}

#[cfg(test)]
#[path = "decoder_tests.rs"]
mod tests;
