//! Conversion of raw backend records into [`Message`] values.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::id::MessageId;
use super::message::{Message, Role};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Message record as the backend stores it.
///
/// Every field is optional on the wire and may be `null`; numbers are read as
/// their decimal text. `normalize` fills the gaps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerMessage {
    #[serde(default, deserialize_with = "lenient_opt")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub timestamp: Option<String>,
}

fn lenient_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        other => {
            log::warn!("ignoring non-scalar message field {other}");
            None
        }
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt(deserializer)?.unwrap_or_default())
}

/// Body of the history and non-streaming chat endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct MessagesEnvelope {
    #[serde(default)]
    pub messages: Vec<ServerMessage>,
}

impl ServerMessage {
    /// Returns `None` when the role is not one the client can render.
    pub fn normalize(self) -> Option<Message> {
        let Some(role) = Role::parse(&self.role) else {
            log::warn!("skipping message with unknown role {:?}", self.role);
            return None;
        };
        let id = match self.id {
            Some(id) if !id.is_empty() => MessageId::from(id),
            _ => MessageId::new(),
        };
        let timestamp = self
            .timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now);
        Some(Message {
            id,
            role,
            content: self.content,
            timestamp,
        })
    }
}

pub fn normalize_messages(records: Vec<ServerMessage>) -> Vec<Message> {
    records
        .into_iter()
        .filter_map(ServerMessage::normalize)
        .collect()
}

/// Parses a backend timestamp. Offset-less values are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
