/// Gemini client — the single point of entry for all Generative Language API calls.
///
/// No other module talks to the remote service directly. The analyzer depends on
/// the `GenerativeApi` trait so the transport can be replaced in tests.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod models;

pub use models::ModelRecord;

/// Transport-level request timeout. The analyzer itself sets none.
const REQUEST_TIMEOUT_SECS: u64 = 120;
const LIST_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The two upstream capabilities the analyzer relies on.
#[async_trait]
pub trait GenerativeApi: Send + Sync {
    /// Lists models visible to the credential, normalized to `ModelRecord`s.
    async fn list_models(&self) -> Result<Vec<ModelRecord>, GeminiError>;

    /// Runs a single content-generation request. No retries.
    async fn generate_content(&self, model: &str, prompt: &str)
        -> Result<Generation, GeminiError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Result of one generation call: the text (if the response carried any) and
/// the raw JSON it came from.
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: Option<String>,
    pub raw: Value,
}

impl Generation {
    /// Concatenates the text parts of the first candidate. `text` is `None`
    /// only when that candidate has no text part at all; an empty part is kept.
    pub fn from_raw(raw: Value) -> Self {
        let parsed: GenerateContentResponse =
            serde_json::from_value(raw.clone()).unwrap_or_default();
        let texts: Vec<String> = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        let text = if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        };
        Self { text, raw }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// REST client for the Gemini API. The credential is passed in explicitly.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Result<Self, GeminiError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn model_url(&self, model: &str) -> String {
        let path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };
        format!("{}/{}:generateContent", self.base_url, path)
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, GeminiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: parse_error_message(&body),
            });
        }
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl GenerativeApi for GeminiClient {
    async fn list_models(&self) -> Result<Vec<ModelRecord>, GeminiError> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .query(&[("pageSize", LIST_PAGE_SIZE)])
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        let body = Self::read_json(response).await?;
        let listing: ListModelsResponse = serde_json::from_value(body)?;
        let records: Vec<ModelRecord> = listing
            .models
            .iter()
            .filter_map(ModelRecord::from_value)
            .collect();

        debug!("Model listing returned {} entries", records.len());
        Ok(records)
    }

    async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<Generation, GeminiError> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!("Calling {model}:generateContent ({} prompt chars)", prompt.len());

        let response = self
            .client
            .post(self.model_url(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let raw = Self::read_json(response).await?;
        Ok(Generation::from_raw(raw))
    }
}

/// Pulls the human-readable message out of a Google error body, keeping the
/// status keyword (e.g. `RESOURCE_EXHAUSTED`) since classification is textual.
fn parse_error_message(body: &str) -> String {
    match serde_json::from_str::<GoogleError>(body) {
        Ok(e) => match e.error.status {
            Some(status) => format!("{} [{}]", e.error.message, status),
            None => e.error.message,
        },
        Err(_) => body.to_string(),
    }
}
