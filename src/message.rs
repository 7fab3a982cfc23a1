//! Chat message data model.
//!
//! Messages arrive from an external store already sorted ascending by
//! timestamp; the engine never reorders them. Store records are loosely
//! shaped, so ingestion goes through `RawMessage`, which tolerates missing
//! fields and substitutes documented fallbacks instead of rejecting the
//! record. A single corrupt record must never break the rest of the
//! timeline.

use serde::{Deserialize, Serialize};

/// Author substituted when a record carries no usable author id.
pub const FALLBACK_AUTHOR: &str = "unknown";

/// Timestamp substituted when a record carries no usable timestamp.
pub const FALLBACK_TIMESTAMP: i64 = 0;

/// One atomic unit of message content.
///
/// A bare JSON string deserializes as `Text`; an object with a `math` key
/// deserializes as `Math`. Math sources are opaque to this crate and are
/// handed to the external typesetting collaborator during rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentChunk {
    Math { math: String },
    Text(String),
}

/// A chat message as consumed by the grouping engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub author_id: String,
    pub contents: Vec<ContentChunk>,
    pub timestamp_millis: i64,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        author_id: impl Into<String>,
        contents: Vec<ContentChunk>,
        timestamp_millis: i64,
    ) -> Self {
        Self {
            id: id.into(),
            author_id: author_id.into(),
            contents,
            timestamp_millis,
        }
    }

    /// Normalize a raw store record, substituting fallbacks for missing or
    /// blank fields.
    pub fn from_raw(raw: RawMessage) -> Self {
        let author_id = match raw.author_id {
            Some(author) if !author.trim().is_empty() => author,
            _ => {
                log::warn!("message record without a usable author id, substituting fallback");
                FALLBACK_AUTHOR.to_string()
            }
        };
        let timestamp_millis = match raw.timestamp_millis {
            Some(ts) => ts,
            None => {
                log::warn!("message record without a timestamp, substituting fallback");
                FALLBACK_TIMESTAMP
            }
        };
        Self {
            id: raw.id.unwrap_or_default(),
            author_id,
            contents: raw.contents,
            timestamp_millis,
        }
    }
}

/// Loosely-shaped message record as delivered by the external store.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub contents: Vec<ContentChunk>,
    #[serde(default)]
    pub timestamp_millis: Option<i64>,
}
