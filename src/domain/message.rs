//! Thread messages as returned by the upstream message listing.

use serde::{Deserialize, Serialize};

/// Author of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    /// Any role label the proxy does not distinguish.
    #[serde(other)]
    Other,
}

/// A message in a thread, reduced to what the proxy needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMessage {
    pub id: String,
    pub role: MessageRole,
    /// Text parts of the message joined with newlines.
    pub text: String,
}

impl ThreadMessage {
    /// Build a message from one entry of the upstream listing.
    ///
    /// Content may be a plain string or a list of typed parts, of which only
    /// `text` parts are kept. Returns `None` when the entry has no role.
    pub fn from_payload(entry: &serde_json::Value) -> Option<Self> {
        let role = serde_json::from_value(entry.get("role")?.clone()).ok()?;
        let id = entry
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let text = match entry.get("content") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Array(parts)) => parts
                .iter()
                .filter(|part| part.get("type").and_then(|t| t.as_str()) == Some("text"))
                .filter_map(|part| part.pointer("/text/value").and_then(|v| v.as_str()))
                .collect::<Vec<_>>()
                .join("\n"),
            _ => String::new(),
        };
        Some(Self { id, role, text })
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }
}

/// Most recent assistant-authored message in a chronologically ordered list.
pub fn latest_assistant_message(messages: &[ThreadMessage]) -> Option<&ThreadMessage> {
    messages.iter().rev().find(|m| m.is_assistant())
}
