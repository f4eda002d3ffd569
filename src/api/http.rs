//! reqwest implementation of `PodcastBackend`

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::dto::{news_to_text, CacheAck, CacheUpdate, NewsItem, ScriptRequest, TextRequest};
use super::error::ApiError;
use super::{
    PodcastBackend, OP_DAILY_NEWS, OP_GENERATE_AUDIO, OP_GENERATE_OUTLINE, OP_GENERATE_QUESTIONS,
    OP_GENERATE_SCRIPT, OP_UPDATE_CACHE,
};
use crate::config::ApiConfig;

/// HTTP client for the generation backend
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend client from configuration
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ApiError::remote("client", e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client pointed at an arbitrary base address
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let config = ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        };
        Self::new(&config)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return its 2xx body text. Transport failures and
    /// non-2xx statuses become `ApiError`.
    async fn send_raw(&self, operation: &'static str, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::remote(operation, format!("request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::remote(operation, format!("failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| reason_phrase(status));
            warn!(operation, status = status.as_u16(), %message, "backend returned error status");
            return Err(ApiError::http(operation, status.as_u16(), message));
        }

        Ok(text)
    }

    /// Send a request and decode a 2xx JSON body, treating a set `error`
    /// field as a failure
    async fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<Value, ApiError> {
        let text = self.send_raw(operation, request).await?;
        let body: Value = serde_json::from_str(&text)
            .map_err(|_| ApiError::invalid_shape(operation, "body is not JSON"))?;

        if let Some(message) = body_error(&body) {
            warn!(operation, %message, "backend reported an error");
            return Err(ApiError::remote(operation, message));
        }

        Ok(body)
    }

    /// POST a JSON body and return its `result` string
    async fn post_for_result<T: serde::Serialize + Sync>(
        &self,
        operation: &'static str,
        path: &str,
        payload: &T,
    ) -> Result<String, ApiError> {
        let body = self
            .send(operation, self.client.post(self.url(path)).json(payload))
            .await?;

        match body.get("result") {
            Some(Value::String(result)) => Ok(result.clone()),
            Some(Value::Null) | None => Err(ApiError::invalid_shape(operation, "`result` is missing")),
            Some(_) => Err(ApiError::invalid_shape(operation, "`result` is not a string")),
        }
    }
}

#[async_trait]
impl PodcastBackend for HttpBackend {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self))]
    async fn fetch_daily_news(&self) -> Result<String, ApiError> {
        let body = self
            .send(OP_DAILY_NEWS, self.client.get(self.url("/api/daily-news")))
            .await?;

        let items = match body.get("news") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => {
                return Err(ApiError::invalid_shape(OP_DAILY_NEWS, "`news` is missing"))
            }
            Some(_) => {
                return Err(ApiError::invalid_shape(OP_DAILY_NEWS, "`news` is not a list"))
            }
        };

        let items: Vec<NewsItem> = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item.clone()).map_err(|e| {
                    ApiError::invalid_shape(OP_DAILY_NEWS, format!("news item {index}: {e}"))
                })
            })
            .collect::<Result<_, _>>()?;

        debug!(count = items.len(), "fetched daily news");
        Ok(news_to_text(&items))
    }

    #[instrument(skip(self, content), fields(len = content.len()))]
    async fn generate_outline(&self, content: &str) -> Result<String, ApiError> {
        self.post_for_result(
            OP_GENERATE_OUTLINE,
            "/api/generate-outline",
            &TextRequest { text: content },
        )
        .await
    }

    #[instrument(skip(self, content), fields(len = content.len()))]
    async fn generate_questions(&self, content: &str) -> Result<String, ApiError> {
        self.post_for_result(
            OP_GENERATE_QUESTIONS,
            "/api/generate-questions",
            &TextRequest { text: content },
        )
        .await
    }

    #[instrument(skip_all)]
    async fn generate_script(&self, outline: &str, questions: &str) -> Result<String, ApiError> {
        self.post_for_result(
            OP_GENERATE_SCRIPT,
            "/api/generate-script",
            &ScriptRequest { outline, questions },
        )
        .await
    }

    #[instrument(skip(self, script), fields(len = script.len()))]
    async fn generate_audio(&self, script: &str) -> Result<String, ApiError> {
        let body = self
            .send(
                OP_GENERATE_AUDIO,
                self.client
                    .post(self.url("/api/generate-audio"))
                    .json(&TextRequest { text: script }),
            )
            .await?;

        match body.get("audio_file") {
            Some(Value::String(id)) if !id.is_empty() => {
                debug!(audio_file = %id, "audio generated");
                Ok(id.clone())
            }
            _ => Err(ApiError::missing_artifact(OP_GENERATE_AUDIO)),
        }
    }

    #[instrument(skip_all, fields(outline = update.outline.is_some(), questions = update.questions.is_some()))]
    async fn persist_cache_fields(&self, update: &CacheUpdate) -> Result<CacheAck, ApiError> {
        // Only the status matters here; any 2xx body is an acknowledgement
        let text = self
            .send_raw(
                OP_UPDATE_CACHE,
                self.client
                    .post(self.url("/api/update-news-cache"))
                    .json(update),
            )
            .await?;

        Ok(serde_json::from_str(&text).unwrap_or_default())
    }
}

/// The `error` field of a body, if present and set. Null, `false` and the
/// empty string all mean "no error".
fn body_error(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(message) if message.is_empty() => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

/// Best message for a non-2xx body: `error`, then FastAPI's string `detail`
fn error_message(body: &Value) -> Option<String> {
    body_error(body).or_else(|| {
        body.get("detail")
            .and_then(Value::as_str)
            .map(str::to_string)
    })
}

fn reason_phrase(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
