use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::palette;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        use web_time::{SystemTime, UNIX_EPOCH};
    } else {
        use std::time::{SystemTime, UNIX_EPOCH};
    }
}

pub const DEFAULT_TITLE: &str = "New Note";

/// Opaque note identifier. New notes get a v4 uuid; any non-empty string
/// read back from storage is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub color: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Encoded image attached from the drawing canvas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawing: Option<String>,
}

impl Note {
    pub fn new() -> Self {
        Self {
            id: NoteId::generate(),
            title: DEFAULT_TITLE.to_string(),
            content: String::new(),
            color: palette::random_note_color().to_string(),
            created_at: now_millis(),
            drawing: None,
        }
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::new()
    }
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
