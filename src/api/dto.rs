//! Wire types for the generation backend

use serde::{Deserialize, Serialize};

/// Body for endpoints that take a single text payload
#[derive(Debug, Clone, Serialize)]
pub struct TextRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScriptRequest<'a> {
    pub outline: &'a str,
    pub questions: &'a str,
}

/// Partial write of edited fields back to the backend's news cache.
/// Absent fields are left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<String>,
}

impl CacheUpdate {
    pub fn outline(value: impl Into<String>) -> Self {
        Self {
            outline: Some(value.into()),
            questions: None,
        }
    }

    pub fn questions(value: impl Into<String>) -> Self {
        Self {
            outline: None,
            questions: Some(value.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outline.is_none() && self.questions.is_none()
    }

    /// Fold a newer update into this one; newer values win per field
    pub fn merge(&mut self, newer: CacheUpdate) {
        if newer.outline.is_some() {
            self.outline = newer.outline;
        }
        if newer.questions.is_some() {
            self.questions = newer.questions;
        }
    }
}

/// Acknowledgement from the cache endpoint. The backend only sends a message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheAck {
    #[serde(default)]
    pub message: Option<String>,
}

/// One entry of the daily news list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
}

impl NewsItem {
    /// Render as `"{title}\n{summary}\n\n"`
    pub fn to_text(&self) -> String {
        format!("{}\n{}\n\n", self.title, self.summary)
    }
}

/// Concatenate news items into the editable content block, in order
pub fn news_to_text(items: &[NewsItem]) -> String {
    items.iter().map(NewsItem::to_text).collect()
}
