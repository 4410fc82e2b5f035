//! Dialog record model shared by the codec, store, and query engine.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::PathBuf;

/// Identifier of a dialog record; also the stem of its file name.
pub type DialogId = String;

/// Format used when writing `timestamp` (ISO-8601, local time, microseconds).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Role recorded for messages that did not carry one.
pub const UNKNOWN_ROLE: &str = "unknown";

/// One message of a structured conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogMessage {
    /// Speaker role (`user`, `assistant`, ...).
    #[serde(default = "unknown_role")]
    pub role: String,
    /// Message text.
    #[serde(default)]
    pub content: String,
}

impl DialogMessage {
    /// Create a message from a role and content.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

fn unknown_role() -> String {
    UNKNOWN_ROLE.to_string()
}

/// Free-text payload with counts derived at save time.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBody {
    /// Raw dialog text.
    pub content: String,
    /// Caller supplied metadata.
    pub metadata: Map<String, Value>,
    /// Whitespace separated word count of `content`.
    pub word_count: usize,
    /// Character count of `content`.
    pub char_count: usize,
}

/// Structured conversation payload with derived fields computed at save time.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationBody {
    /// Ordered messages.
    pub messages: Vec<DialogMessage>,
    /// `[ROLE]: content` blocks separated by blank lines.
    pub formatted_content: String,
    /// Number of messages.
    pub message_count: usize,
    /// Sum of per-message word counts.
    pub total_words: usize,
}

/// The two record shapes, discriminated by `content` vs `messages`.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogBody {
    Text(TextBody),
    Conversation(ConversationBody),
}

/// Record shape reported in summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogKind {
    Text,
    Conversation,
}

/// Persisted dialog record.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogRecord {
    /// Record identifier.
    pub id: DialogId,
    /// Display title.
    pub title: String,
    /// Creation time (local wall clock).
    pub timestamp: NaiveDateTime,
    /// Tags in display order.
    pub tags: Vec<String>,
    /// Free-text or conversation payload.
    pub body: DialogBody,
    /// Fields found on disk that this model does not know about.
    pub extra: Map<String, Value>,
}

impl DialogRecord {
    /// Build a free-text record, deriving its counts from `content`.
    pub fn text(
        id: impl Into<DialogId>,
        title: impl Into<String>,
        timestamp: NaiveDateTime,
        content: impl Into<String>,
        tags: Vec<String>,
        metadata: Map<String, Value>,
    ) -> Self {
        let content = content.into();
        let body = TextBody {
            word_count: count_words(&content),
            char_count: content.chars().count(),
            content,
            metadata,
        };
        Self {
            id: id.into(),
            title: title.into(),
            timestamp,
            tags: normalize_tags(tags),
            body: DialogBody::Text(body),
            extra: Map::new(),
        }
    }

    /// Build a conversation record, deriving the formatted content and counts.
    pub fn conversation(
        id: impl Into<DialogId>,
        title: impl Into<String>,
        timestamp: NaiveDateTime,
        messages: Vec<DialogMessage>,
        tags: Vec<String>,
    ) -> Self {
        let body = ConversationBody {
            formatted_content: format_conversation(&messages),
            message_count: messages.len(),
            total_words: messages
                .iter()
                .map(|message| count_words(&message.content))
                .sum(),
            messages,
        };
        Self {
            id: id.into(),
            title: title.into(),
            timestamp,
            tags: normalize_tags(tags),
            body: DialogBody::Conversation(body),
            extra: Map::new(),
        }
    }

    /// Shape of the record.
    pub fn kind(&self) -> DialogKind {
        match &self.body {
            DialogBody::Text(_) => DialogKind::Text,
            DialogBody::Conversation(_) => DialogKind::Conversation,
        }
    }

    /// Readable body: `content` or `formatted_content`.
    pub fn body_text(&self) -> &str {
        match &self.body {
            DialogBody::Text(body) => &body.content,
            DialogBody::Conversation(body) => &body.formatted_content,
        }
    }

    /// Stored word count (`word_count` or `total_words`).
    pub fn word_count(&self) -> usize {
        match &self.body {
            DialogBody::Text(body) => body.word_count,
            DialogBody::Conversation(body) => body.total_words,
        }
    }

    /// Timestamp rendered the way it is written to disk.
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// True when the record carries every tag in `tags`.
    pub fn has_all_tags(&self, tags: &[String]) -> bool {
        let own: HashSet<&str> = self.tags.iter().map(String::as_str).collect();
        tags.iter().all(|tag| own.contains(tag.as_str()))
    }

    /// Case-insensitive substring match against title and body.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.body_text().to_lowercase().contains(&needle)
    }

    /// Listing view of the record.
    pub fn summary(&self, file_path: PathBuf) -> DialogSummary {
        DialogSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            timestamp: self.timestamp_string(),
            tags: self.tags.clone(),
            kind: self.kind(),
            word_count: self.word_count(),
            file_path,
        }
    }
}

/// Listing view returned by list-style queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogSummary {
    pub id: DialogId,
    pub title: String,
    pub timestamp: String,
    pub tags: Vec<String>,
    pub kind: DialogKind,
    pub word_count: usize,
    pub file_path: PathBuf,
}

/// Count whitespace separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Render messages as `[ROLE]: content` blocks separated by blank lines.
pub fn format_conversation(messages: &[DialogMessage]) -> String {
    messages
        .iter()
        .map(|message| format!("[{}]: {}", message.role.to_uppercase(), message.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Trim tags, drop empty ones, and remove duplicates keeping first occurrence.
pub fn normalize_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || !seen.insert(tag.to_string()) {
            continue;
        }
        normalized.push(tag.to_string());
    }
    normalized
}
