//! # Conversation
//!
//! The message list shown in the panel. It lives only in memory for the
//! lifetime of the process and only ever grows: there is no API to remove or
//! reorder messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shown in place of a reply whenever the backend cannot be reached.
pub const FALLBACK_REPLY: &str = "Sorry, I am having trouble connecting. Please try again.";

pub const DEFAULT_GREETING: &str =
    "Marhaba! I am your Everest View assistant. Are you looking to buy a property in Dubai today?";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_base64: Option<String>,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            audio_base64: None,
            sent_at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>, audio_base64: Option<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            // An empty payload carries nothing to play
            audio_base64: audio_base64.filter(|a| !a.is_empty()),
            sent_at: Utc::now(),
        }
    }

    pub fn has_audio(&self) -> bool {
        self.audio_base64.is_some()
    }
}

/// Ordered, append-only message list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// A conversation opened by the assistant's greeting.
    pub fn with_greeting(greeting: &str) -> Self {
        let mut conversation = Self::new();
        if !greeting.trim().is_empty() {
            conversation.push(Message::assistant(greeting, None));
        }
        conversation
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Most recent assistant message that carries playable audio.
    pub fn latest_audio(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant && m.has_audio())
    }

    pub fn count_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_is_first_assistant_message() {
        let conversation = Conversation::with_greeting(DEFAULT_GREETING);
        assert_eq!(conversation.len(), 1);
        let first = &conversation.messages()[0];
        assert_eq!(first.role, Role::Assistant);
        assert_eq!(first.content, DEFAULT_GREETING);
        assert!(!first.has_audio());
    }

    #[test]
    fn test_blank_greeting_starts_empty() {
        assert!(Conversation::with_greeting("  ").is_empty());
    }

    #[test]
    fn test_push_preserves_order() {
        let mut conversation = Conversation::new();
        conversation.push(Message::user("one"));
        conversation.push(Message::assistant("two", None));
        conversation.push(Message::user("three"));
        let contents: Vec<&str> = conversation
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_empty_audio_payload_is_dropped() {
        let msg = Message::assistant("hi", Some(String::new()));
        assert!(!msg.has_audio());
    }

    #[test]
    fn test_latest_audio_skips_messages_without_audio() {
        let mut conversation = Conversation::new();
        conversation.push(Message::assistant("old", Some("AAAA".to_string())));
        conversation.push(Message::assistant("new", Some("BBBB".to_string())));
        conversation.push(Message::assistant("silent", None));
        conversation.push(Message::user("question"));

        let latest = conversation.latest_audio().unwrap();
        assert_eq!(latest.content, "new");
    }

    #[test]
    fn test_message_serializes_audio_as_camel_case() {
        let msg = Message::assistant("hi", Some("UklGRg==".to_string()));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["audioBase64"], "UklGRg==");
    }
}
