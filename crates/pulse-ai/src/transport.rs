//! Retrying transport for the generative-AI endpoint
//!
//! One HTTP POST per attempt, classified into success, transient failure, or
//! terminal quota exhaustion. Transient failures back off linearly
//! (`attempt * backoff_unit`) up to `max_retries` attempts; quota exhaustion
//! stops retrying immediately. Nothing on the rate-limit/quota paths is an
//! `Err` — callers receive a [`CallOutcome`] value.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Generation parameters sent alongside the prompt.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerationParams {
    pub fn per_post() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 2000,
        }
    }

    pub fn aggregate() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 1500,
        }
    }
}

/// Raw HTTP reply from one endpoint call. Network failure is the only `Err`
/// an [`AiEndpoint`] may produce; every HTTP status comes back as a reply.
#[derive(Debug, Clone)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

/// Seam for the single-POST endpoint call, so tests can script replies.
#[async_trait::async_trait]
pub trait AiEndpoint: Send + Sync {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<ApiReply>;
}

/// Sleep seam so retry/backoff tests run without real delays.
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Terminal classification of one logical request (all retries included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// The model's text payload.
    Success(String),
    /// A daily/per-minute cap was hit; retrying now cannot help.
    QuotaExhausted,
    /// Transient failures exhausted the attempt budget.
    Failed,
}

// ── Gemini wire format ──────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    violations: Vec<QuotaViolation>,
}

#[derive(Debug, Deserialize)]
struct QuotaViolation {
    #[serde(rename = "quotaId")]
    quota_id: Option<String>,
}

/// The Gemini `generateContent` endpoint.
pub struct GeminiEndpoint {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiEndpoint {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }
}

#[async_trait::async_trait]
impl AiEndpoint for GeminiEndpoint {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<ApiReply> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("failed to send request to the Gemini API")?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("failed to read the Gemini response body")?;

        Ok(ApiReply { status, body })
    }
}

/// The sole place that recognizes terminal quota exhaustion in a 429 body.
/// The upstream error schema is undocumented; if it drifts, this is the fix
/// point (see the `details[].violations[].quotaId` substring check).
fn quota_exhausted(body: &str) -> bool {
    let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) else {
        return false;
    };
    envelope.error.is_some_and(|error| {
        error.details.iter().any(|detail| {
            detail.violations.iter().any(|violation| {
                violation
                    .quota_id
                    .as_deref()
                    .is_some_and(|id| id.contains("PerDay") || id.contains("PerMinute"))
            })
        })
    })
}

/// Pull the model's text payload out of a success body; missing pieces of
/// the nested shape degrade to an empty string rather than an error.
fn extract_text(body: &str) -> Result<String> {
    let response: GenerateResponse =
        serde_json::from_str(body).context("success body is not valid JSON")?;
    Ok(response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .unwrap_or_default())
}

/// Bounded-retry wrapper around an [`AiEndpoint`].
pub struct RetryingTransport {
    endpoint: Arc<dyn AiEndpoint>,
    sleeper: Arc<dyn Sleeper>,
    max_retries: u32,
    backoff_unit: Duration,
}

impl RetryingTransport {
    pub fn new(
        endpoint: Arc<dyn AiEndpoint>,
        sleeper: Arc<dyn Sleeper>,
        max_retries: u32,
        backoff_unit: Duration,
    ) -> Self {
        Self {
            endpoint,
            sleeper,
            max_retries,
            backoff_unit,
        }
    }

    /// Issue one logical request, retrying transient failures.
    pub async fn request(&self, prompt: &str, params: &GenerationParams) -> CallOutcome {
        for attempt in 1..=self.max_retries {
            match self.endpoint.generate(prompt, params).await {
                Ok(reply) if (200..300).contains(&reply.status) => {
                    match extract_text(&reply.body) {
                        Ok(text) => return CallOutcome::Success(text),
                        Err(e) => tracing::warn!(
                            "malformed response envelope (attempt {}/{}): {}",
                            attempt,
                            self.max_retries,
                            e
                        ),
                    }
                }
                Ok(reply) if reply.status == 429 => {
                    if quota_exhausted(&reply.body) {
                        tracing::error!("API quota exhausted; giving up without further retries");
                        return CallOutcome::QuotaExhausted;
                    }
                    tracing::warn!(
                        "rate limit reached (attempt {}/{})",
                        attempt,
                        self.max_retries
                    );
                }
                Ok(reply) => tracing::warn!(
                    "API returned status {} (attempt {}/{})",
                    reply.status,
                    attempt,
                    self.max_retries
                ),
                Err(e) => tracing::warn!(
                    "request failed (attempt {}/{}): {}",
                    attempt,
                    self.max_retries,
                    e
                ),
            }
            if attempt < self.max_retries {
                self.sleeper.sleep(self.backoff_unit * attempt).await;
            }
        }
        tracing::error!("request failed after {} attempts", self.max_retries);
        CallOutcome::Failed
    }
}
