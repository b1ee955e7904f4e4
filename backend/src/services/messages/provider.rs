//! Generative text provider.
//!
//! The client is built once at startup from `ProviderConfig` and handed to
//! every orchestrator as an `Arc<dyn TextGenerator>`.

use crate::config::ProviderConfig;
use common::model::error::ErrorKind;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("provider credential is not set")]
    MissingCredential,
    #[error("provider credential is malformed")]
    InvalidCredential,
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider response unusable: {0}")]
    Malformed(String),
    #[error("provider call timed out")]
    Timeout,
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::MissingCredential | ProviderError::InvalidCredential => ErrorKind::Config,
            _ => ErrorKind::Generation,
        }
    }
}

pub trait TextGenerator: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, ProviderError>>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    /// Validates the credential and builds the HTTP client.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = check_api_key(config.api_key.as_deref())?;
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    async fn call(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };
        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let parsed: GenerateResponse = resp.json().await.map_err(map_transport)?;
        extract_text(parsed)
    }
}

impl TextGenerator for GeminiClient {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, ProviderError>> {
        self.call(prompt).boxed()
    }
}

fn map_transport(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else if e.is_decode() {
        ProviderError::Malformed(e.to_string())
    } else {
        ProviderError::Transport(e)
    }
}

/// Empty and the literal `"undefined"` count as missing.
fn check_api_key(raw: Option<&str>) -> Result<String, ProviderError> {
    let key = raw.map(str::trim).unwrap_or_default();
    if key.is_empty() || key == "undefined" {
        return Err(ProviderError::MissingCredential);
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ProviderError::InvalidCredential);
    }
    Ok(key.to_string())
}

fn extract_text(resp: GenerateResponse) -> Result<String, ProviderError> {
    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ProviderError::Malformed("no text in first candidate".to_string()));
    }
    Ok(text)
}
