//! Generation client: the only place that talks to the external generation service.
//!
//! The service is opaque: it takes a vacancy and a resume and answers with
//! `{adaptedResume, recommendations, chances}` or an `{error}` descriptor.
//! Handlers depend on the `GenerationService` trait so the HTTP backend can be
//! replaced in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::generation::models::{GenerationInput, GenerationOutput};

const MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a failure status or an error descriptor.
    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Generation service unavailable after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(
        &self,
        input: &GenerationInput,
    ) -> Result<GenerationOutput, GenerationError>;
}

/// Wire shape of a generation reply. Every field may be missing or `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationReply {
    adapted_resume: Option<String>,
    recommendations: Option<String>,
    chances: Option<String>,
    error: Option<String>,
}

impl GenerationReply {
    fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|message| !message.is_empty())
    }
}

impl From<GenerationReply> for GenerationOutput {
    fn from(reply: GenerationReply) -> Self {
        Self {
            adapted_resume: reply.adapted_resume.unwrap_or_default(),
            recommendations: reply.recommendations.unwrap_or_default(),
            chances: reply.chances.unwrap_or_default(),
        }
    }
}

/// JSON-over-HTTP generation backend.
/// Retries on 429, 5xx and transport errors with exponential backoff.
#[derive(Clone)]
pub struct HttpGenerationService {
    client: Client,
    endpoint: String,
    retry_delay: Duration,
}

impl HttpGenerationService {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, GenerationError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into(),
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    /// Base delay before the first retry; doubles on each further attempt.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn generate(
        &self,
        input: &GenerationInput,
    ) -> Result<GenerationOutput, GenerationError> {
        let mut last_error: Option<GenerationError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = self.retry_delay * (1 << (attempt - 1));
                warn!(
                    "Generation attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&self.endpoint).json(input).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(GenerationError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            let body = response.text().await?;

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                warn!("Generation service returned {}", status);
                last_error = Some(failure(status, &body));
                continue;
            }

            if !status.is_success() {
                return Err(failure(status, &body));
            }

            let reply: GenerationReply = serde_json::from_str(&body)?;
            if let Some(message) = reply.error_message() {
                return Err(GenerationError::Service {
                    status: status.as_u16(),
                    message: message.to_string(),
                });
            }

            let output = GenerationOutput::from(reply);
            debug!(
                "Generation succeeded: adapted_resume={} chars, recommendations={} chars",
                output.adapted_resume.chars().count(),
                output.recommendations.chars().count()
            );
            return Ok(output);
        }

        Err(last_error.unwrap_or(GenerationError::Exhausted {
            attempts: MAX_ATTEMPTS,
        }))
    }
}

/// Builds the failure for a non-success reply: the service's own `error` text
/// when it sent one, otherwise `Error: <reason phrase>`.
fn failure(status: StatusCode, body: &str) -> GenerationError {
    let message = serde_json::from_str::<GenerationReply>(body)
        .ok()
        .and_then(|reply| reply.error_message().map(str::to_string))
        .unwrap_or_else(|| {
            format!(
                "Error: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )
        });

    GenerationError::Service {
        status: status.as_u16(),
        message,
    }
}
