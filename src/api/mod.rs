//! Client side of the podcast generation backend
//!
//! This module provides:
//! - The `PodcastBackend` trait, one method per backend endpoint
//! - `HttpBackend`, the reqwest implementation
//! - Error handling that folds the backend's error shapes into `ApiError`

pub mod dto;
pub mod error;
pub mod http;

pub use dto::{CacheAck, CacheUpdate, NewsItem};
pub use error::ApiError;
pub use http::HttpBackend;

use async_trait::async_trait;

pub const OP_DAILY_NEWS: &str = "daily-news";
pub const OP_GENERATE_OUTLINE: &str = "generate-outline";
pub const OP_GENERATE_QUESTIONS: &str = "generate-questions";
pub const OP_GENERATE_SCRIPT: &str = "generate-script";
pub const OP_GENERATE_AUDIO: &str = "generate-audio";
pub const OP_UPDATE_CACHE: &str = "update-news-cache";

/// The remote service that fetches news and generates outline, questions,
/// script and audio. Every call is exactly one round trip with no retry.
#[async_trait]
pub trait PodcastBackend: Send + Sync {
    /// Base address used to resolve audio identifiers into URLs
    fn base_url(&self) -> &str;

    /// Fetch today's news as `"{title}\n{summary}\n\n"` blocks
    async fn fetch_daily_news(&self) -> Result<String, ApiError>;

    async fn generate_outline(&self, content: &str) -> Result<String, ApiError>;

    async fn generate_questions(&self, content: &str) -> Result<String, ApiError>;

    async fn generate_script(&self, outline: &str, questions: &str) -> Result<String, ApiError>;

    /// Synthesize the script; returns the audio file identifier, never empty
    async fn generate_audio(&self, script: &str) -> Result<String, ApiError>;

    /// Best-effort write-through of edited outline/questions
    async fn persist_cache_fields(&self, update: &CacheUpdate) -> Result<CacheAck, ApiError>;
}

/// Join an audio identifier onto the backend's `/audio/` route
pub fn resolve_audio_url(base_url: &str, identifier: &str) -> String {
    format!("{}/audio/{}", base_url.trim_end_matches('/'), identifier)
}
