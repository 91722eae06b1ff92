//! Generative model clients.
//!
//! The synthesizer talks to a [`GenerativeModel`] trait object so tests can
//! substitute stubs and so the live model can be swapped at runtime. The
//! swap goes through [`ModelHandle`]: a `{model_id, client}` slot that is
//! republished atomically under a lock; existing clients are never mutated
//! in place.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::GenerationError;
use crate::models::GenerationConfig;

/// Gemini model ids the backend will accept for a runtime swap.
pub const AVAILABLE_MODELS: &[&str] = &[
    "gemini-1.5-flash",
    "gemini-1.5-pro",
    "gemini-2.0-flash",
];

/// A text-in, text-out generative model.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Identifier of the underlying model.
    fn model_id(&self) -> &str;

    /// Generate a completion for the prompt. Fails with a
    /// [`GenerationError`] on transport, quota, or response-shape problems;
    /// no retry or fallback happens at this layer.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    client: Client,
    model_id: String,
    api_key: String,
}

impl GeminiClient {
    /// Build a client for `model_id`, reading the API key from the
    /// environment variable named in the config.
    pub fn new(model_id: &str, config: &GenerationConfig) -> Result<Self, GenerationError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| GenerationError::MissingApiKey(config.api_key_env.clone()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(GenerationError::RequestError)?;

        Ok(Self {
            client,
            model_id: model_id.to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!(
            "{GEMINI_API_BASE}/models/{}:generateContent?key={}",
            self.model_id, self.api_key
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else {
                    GenerationError::RequestError(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::ApiError { status, message });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| GenerationError::InvalidResponse("no candidates in response".to_string()))
    }
}

/// Indirection the synthesizer reads the live model through. Swapping
/// constructs the new client first, then republishes the slot; readers see
/// either the old client or the new one, never a half-swapped state.
pub struct ModelHandle {
    current: RwLock<Arc<dyn GenerativeModel>>,
}

impl ModelHandle {
    pub fn new(client: Arc<dyn GenerativeModel>) -> Self {
        Self {
            current: RwLock::new(client),
        }
    }

    /// The currently published client.
    pub async fn current(&self) -> Arc<dyn GenerativeModel> {
        self.current.read().await.clone()
    }

    pub async fn current_model_id(&self) -> String {
        self.current.read().await.model_id().to_string()
    }

    /// Atomically replace the published client.
    pub async fn publish(&self, client: Arc<dyn GenerativeModel>) {
        let model_id = client.model_id().to_string();
        *self.current.write().await = client;
        info!(model = %model_id, "published generative model");
    }
}

/// Validate a model id against the supported set.
pub fn validate_model_id(model_id: &str) -> Result<(), GenerationError> {
    if AVAILABLE_MODELS.contains(&model_id) {
        Ok(())
    } else {
        Err(GenerationError::UnknownModel(model_id.to_string()))
    }
}
