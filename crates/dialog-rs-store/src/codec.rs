//! JSON encoding of dialog records and the on-disk schema.
//!
//! Free-text records carry `content`, `metadata`, `word_count`, `char_count`;
//! conversation records carry `messages`, `formatted_content`, `message_count`,
//! `total_words`. Both share `id`, `title`, `timestamp`, `tags`. Keys the model
//! does not know are kept in `DialogRecord::extra` and written back unchanged.

use crate::model::{
    ConversationBody, DialogBody, DialogMessage, DialogRecord, TIMESTAMP_FORMAT, TextBody,
};
use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value, json};

/// Reasons a document cannot be decoded into a record.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The document is not valid JSON.
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// The document is valid JSON but not an object.
    #[error("record is not a json object")]
    NotAnObject,
    /// The mandatory `id` field is missing or not a string.
    #[error("missing id")]
    MissingId,
    /// A known field holds a value of the wrong shape.
    #[error("invalid field `{field}`: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
}

fn invalid(field: &'static str, message: impl Into<String>) -> CodecError {
    CodecError::InvalidField {
        field,
        message: message.into(),
    }
}

/// Encode a record as a pretty-printed JSON document.
pub fn encode(record: &DialogRecord) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(&encode_value(record))
}

/// Encode a record as a JSON object.
pub fn encode_value(record: &DialogRecord) -> Value {
    Value::Object(encode_document(record))
}

/// Encode a record as the key/value map written to disk.
pub fn encode_document(record: &DialogRecord) -> Map<String, Value> {
    let mut map = record.extra.clone();
    map.insert("id".to_string(), json!(record.id));
    map.insert("title".to_string(), json!(record.title));
    map.insert("timestamp".to_string(), json!(record.timestamp_string()));
    map.insert("tags".to_string(), json!(record.tags));
    match &record.body {
        DialogBody::Text(body) => {
            map.insert("content".to_string(), json!(body.content));
            map.insert(
                "metadata".to_string(),
                Value::Object(body.metadata.clone()),
            );
            map.insert("word_count".to_string(), json!(body.word_count));
            map.insert("char_count".to_string(), json!(body.char_count));
        }
        DialogBody::Conversation(body) => {
            let messages = body
                .messages
                .iter()
                .map(|message| json!({ "role": message.role, "content": message.content }))
                .collect();
            map.insert("messages".to_string(), Value::Array(messages));
            map.insert(
                "formatted_content".to_string(),
                json!(body.formatted_content),
            );
            map.insert("message_count".to_string(), json!(body.message_count));
            map.insert("total_words".to_string(), json!(body.total_words));
        }
    }
    map
}

/// Decode a record from raw JSON bytes.
pub fn decode(bytes: &[u8]) -> Result<DialogRecord, CodecError> {
    let value: Value = serde_json::from_slice(bytes)?;
    decode_value(value)
}

/// Decode a record and keep the untouched JSON object it came from.
///
/// Partial updates patch the returned map so fields the model normalizes
/// (message keys, timestamp precision, absent counts) stay as written.
pub fn decode_document(bytes: &[u8]) -> Result<(Map<String, Value>, DialogRecord), CodecError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Object(document) = value else {
        return Err(CodecError::NotAnObject);
    };
    let record = decode_value(Value::Object(document.clone()))?;
    Ok((document, record))
}

/// Decode a record from a parsed JSON value.
pub fn decode_value(value: Value) -> Result<DialogRecord, CodecError> {
    let Value::Object(mut map) = value else {
        return Err(CodecError::NotAnObject);
    };

    let id = match map.remove("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => id,
        _ => return Err(CodecError::MissingId),
    };
    let title = match map.remove("title") {
        Some(Value::String(title)) => title,
        None | Some(Value::Null) => format!("Dialog {id}"),
        Some(other) => return Err(invalid("title", format!("expected string, got {other}"))),
    };
    let timestamp = match map.remove("timestamp") {
        Some(Value::String(raw)) => parse_timestamp(&raw)?,
        _ => return Err(invalid("timestamp", "expected an ISO-8601 string")),
    };
    let tags = match map.remove("tags") {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => serde_json::from_value::<Vec<String>>(value)
            .map_err(|err| invalid("tags", err.to_string()))?,
    };

    let body = if map.contains_key("messages") {
        DialogBody::Conversation(take_conversation(&mut map)?)
    } else if map.contains_key("content") {
        DialogBody::Text(take_text(&mut map)?)
    } else {
        return Err(invalid("content", "record has neither content nor messages"));
    };

    Ok(DialogRecord {
        id,
        title,
        timestamp,
        tags,
        body,
        extra: map,
    })
}

/// Parse `timestamp`, accepting naive ISO-8601 or RFC 3339 with an offset.
fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, CodecError> {
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        return Ok(timestamp);
    }
    if let Ok(timestamp) = raw.parse::<NaiveDateTime>() {
        return Ok(timestamp);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.naive_local())
        .map_err(|err| invalid("timestamp", format!("`{raw}`: {err}")))
}

fn take_text(map: &mut Map<String, Value>) -> Result<TextBody, CodecError> {
    let content = match map.remove("content") {
        Some(Value::String(content)) => content,
        _ => return Err(invalid("content", "expected string")),
    };
    let metadata = match map.remove("metadata") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(metadata)) => metadata,
        Some(_) => return Err(invalid("metadata", "expected object")),
    };
    Ok(TextBody {
        word_count: take_count(map, "word_count")?,
        char_count: take_count(map, "char_count")?,
        content,
        metadata,
    })
}

fn take_conversation(map: &mut Map<String, Value>) -> Result<ConversationBody, CodecError> {
    let messages = match map.remove("messages") {
        Some(value) => serde_json::from_value::<Vec<DialogMessage>>(value)
            .map_err(|err| invalid("messages", err.to_string()))?,
        None => Vec::new(),
    };
    let formatted_content = match map.remove("formatted_content") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(formatted)) => formatted,
        Some(_) => return Err(invalid("formatted_content", "expected string")),
    };
    Ok(ConversationBody {
        message_count: take_count(map, "message_count")?,
        total_words: take_count(map, "total_words")?,
        formatted_content,
        messages,
    })
}

/// Remove a stored count; absent counts read as zero and are never recomputed.
fn take_count(map: &mut Map<String, Value>, field: &'static str) -> Result<usize, CodecError> {
    match map.remove(field) {
        None | Some(Value::Null) => Ok(0),
        Some(value) => value
            .as_u64()
            .and_then(|count| usize::try_from(count).ok())
            .ok_or_else(|| invalid(field, format!("expected non-negative integer, got {value}"))),
    }
}
