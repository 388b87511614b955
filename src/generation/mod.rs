/// Generation capability
///
/// - `Generator` trait: prompt in, completion out
/// - `OllamaGenerator` talking to a local Ollama server over HTTP
use crate::config::LlmConfig;
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generator initialization failed: {0}")]
    InitializationError(String),

    #[error("Request to {endpoint} failed: {message}")]
    RequestFailed { endpoint: String, message: String },

    #[error("Generator returned status {status}: {message}")]
    BadStatus { status: u16, message: String },

    #[error("Malformed generator response: {0}")]
    MalformedResponse(String),

    #[error("Generation is disabled in configuration")]
    Disabled,
}

/// Trait for language-model backends
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    fn model_name(&self) -> &str;
}

/// Non-streaming client for Ollama's `/api/generate`
pub struct OllamaGenerator {
    client: HttpClient,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl OllamaGenerator {
    pub fn new(
        endpoint: &str,
        model: &str,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::InitializationError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, GenerationError> {
        if !config.enabled {
            return Err(GenerationError::Disabled);
        }
        if config.provider != "ollama" {
            return Err(GenerationError::InitializationError(format!(
                "unsupported provider '{}'",
                config.provider
            )));
        }
        Self::new(
            &config.endpoint,
            &config.model,
            config.temperature,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn url(&self) -> String {
        format!("{}/api/generate", self.endpoint)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

impl Generator for OllamaGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = self.url();
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        tracing::debug!("POST {} (model {})", url, self.model);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| GenerationError::RequestFailed {
                endpoint: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .map(|body| body.error)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(GenerationError::BadStatus {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response
            .json()
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
        Ok(body.response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
