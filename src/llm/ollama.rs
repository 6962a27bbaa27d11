//! Ollama client implementation
//!
//! Async HTTP client for Ollama's raw completion endpoint. The transcript is
//! sent verbatim as the prompt so the backend continues it token by token.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{Config, ReagentError, Result};
use crate::llm::traits::{GenerationClient, GenerationRequest, StreamCallback};

/// Ollama API client
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    temperature: Option<f32>,
    num_predict: Option<u32>,
    stream: bool,
    on_token: Option<StreamCallback>,
}

/// Ollama generate request
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    raw: bool,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions<'a>>,
}

/// Ollama generation options
#[derive(Debug, Serialize)]
struct OllamaOptions<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
}

/// Ollama generate response; streaming chunks share the same shape
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    eval_count: Option<u32>,
}

/// Ollama models list response
#[derive(Debug, Deserialize)]
struct ModelsResponse {
    models: Vec<ModelInfo>,
}

/// Model information
#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

impl OllamaClient {
    /// Create a new Ollama client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.ollama.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.ollama_url(),
            model: config.model.name.clone(),
            temperature: config.model.temperature,
            num_predict: config.model.num_predict,
            stream: config.streaming.enabled,
            on_token: None,
        })
    }

    /// Create a client with custom base URL and model
    pub fn with_base_url(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(120)).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            temperature: None,
            num_predict: None,
            stream: false,
            on_token: None,
        })
    }

    /// Stream tokens to `on_token` as they arrive
    pub fn with_token_callback(mut self, on_token: StreamCallback) -> Self {
        self.stream = true;
        self.on_token = Some(on_token);
        self
    }

    /// Model this client generates with
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request<'a>(&'a self, request: &'a GenerationRequest, stream: bool) -> GenerateRequest<'a> {
        let options = if self.temperature.is_none()
            && self.num_predict.is_none()
            && request.stop.is_none()
        {
            None
        } else {
            Some(OllamaOptions {
                temperature: self.temperature,
                num_predict: self.num_predict,
                stop: request.stop.as_deref(),
            })
        };

        GenerateRequest {
            model: &self.model,
            prompt: &request.context,
            raw: true,
            stream,
            options,
        }
    }

    async fn post_generate(&self, body: &GenerateRequest<'_>) -> Result<reqwest::Response> {
        tracing::trace!(
            "Ollama request: {}",
            serde_json::to_string(body).unwrap_or_default()
        );

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 404 && error_text.contains("not found") {
                return Err(ReagentError::ModelNotFound(self.model.clone()));
            }

            return Err(ReagentError::ollama(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        Ok(response)
    }

    fn map_send_error(&self, e: reqwest::Error) -> ReagentError {
        if e.is_connect() {
            ReagentError::ollama(format!(
                "Cannot connect to Ollama at {}. Is it running?",
                self.base_url
            ))
        } else {
            ReagentError::from(e)
        }
    }

    async fn generate_once(&self, request: &GenerationRequest) -> Result<String> {
        let body = self.build_request(request, false);
        let response = self.post_generate(&body).await?;

        let response_text = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&response_text)
            .map_err(|e| ReagentError::ollama(format!("Failed to parse response: {}", e)))?;

        tracing::debug!(tokens = ?parsed.eval_count, "Ollama generation complete");
        Ok(parsed.response)
    }

    async fn generate_streaming(&self, request: &GenerationRequest) -> Result<String> {
        let body = self.build_request(request, true);
        let response = self.post_generate(&body).await?;

        let mut full = String::new();
        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk_result) = stream.next().await {
            let chunk =
                chunk_result.map_err(|e| ReagentError::ollama(format!("Stream error: {}", e)))?;
            self.consume_chunk(&mut buffer, &chunk, &mut full);
        }

        self.consume_line(&buffer, &mut full);

        Ok(full)
    }

    /// Append raw bytes and consume every complete line. A chunk may end
    /// in the middle of a character, so decoding waits for the newline.
    fn consume_chunk(&self, buffer: &mut Vec<u8>, chunk: &[u8], full: &mut String) {
        buffer.extend_from_slice(chunk);
        while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=newline_pos).collect();
            self.consume_line(&line, full);
        }
    }

    fn consume_line(&self, line: &[u8], full: &mut String) {
        if line.trim_ascii().is_empty() {
            return;
        }

        match serde_json::from_slice::<GenerateResponse>(line) {
            Ok(chunk) => {
                if !chunk.response.is_empty() {
                    full.push_str(&chunk.response);
                    if let Some(ref callback) = self.on_token {
                        callback(&chunk.response);
                    }
                }
                if chunk.done {
                    tracing::debug!(tokens = ?chunk.eval_count, "Ollama stream complete");
                }
            }
            Err(e) => tracing::warn!(
                "Skipping malformed stream line: {}: {}",
                e,
                String::from_utf8_lossy(line)
            ),
        }
    }

    /// List available models
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(ReagentError::ollama("Failed to list models"));
        }

        let models_response: ModelsResponse = response.json().await?;
        Ok(models_response.models.into_iter().map(|m| m.name).collect())
    }

    /// Check if the configured model is available
    pub async fn is_model_available(&self) -> Result<bool> {
        let models = self.list_models().await?;
        Ok(models.iter().any(|m| {
            m == &self.model || m.split(':').next() == self.model.split(':').next()
        }))
    }
}

#[async_trait]
impl GenerationClient for OllamaClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        if self.stream {
            self.generate_streaming(request).await
        } else {
            self.generate_once(request).await
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
