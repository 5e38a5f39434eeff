use crate::config::SummarizerConfig;
use crate::summarize::{build_payload_text, Summarizer, SummarizeError, Summary, SummaryRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

/// Body POSTed to the summarization endpoint
#[derive(Debug, Serialize)]
struct SummarizePayload<'a> {
    business_name: &'a str,
    website: &'a str,
    content: String,
}

/// Summarizer backed by an HTTP endpoint
///
/// The endpoint receives the business name, website and bounded corpus text
/// as JSON and must answer with a JSON object.
#[derive(Debug, Clone)]
pub struct HttpSummarizer {
    client: Client,
    config: SummarizerConfig,
    api_key: String,
}

impl HttpSummarizer {
    /// Creates a summarizer with an explicit API key
    pub fn new(config: SummarizerConfig, api_key: String) -> Result<Self, SummarizeError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Creates a summarizer reading its key from the configured environment variable
    pub fn from_config(config: &SummarizerConfig) -> Result<Self, SummarizeError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SummarizeError::MissingApiKey(config.api_key_env.clone()))?;

        Self::new(config.clone(), api_key)
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    async fn summarize(&self, request: SummaryRequest<'_>) -> Result<Summary, SummarizeError> {
        if request.pages.is_empty() {
            return Err(SummarizeError::NoPages);
        }

        let payload = SummarizePayload {
            business_name: request.business_name,
            website: request.website,
            content: build_payload_text(
                request.pages,
                self.config.max_pages,
                self.config.max_payload_chars,
            ),
        };

        tracing::debug!(
            "Requesting summary for {} ({} payload characters)",
            request.website,
            payload.content.chars().count()
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummarizeError::Status(status.as_u16()));
        }

        let raw = response.text().await.map_err(map_reqwest_error)?;
        Summary::from_raw(&raw)
    }
}

fn map_reqwest_error(error: reqwest::Error) -> SummarizeError {
    if error.is_timeout() {
        SummarizeError::Timeout
    } else {
        SummarizeError::Http(error)
    }
}
