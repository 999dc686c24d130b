use anyhow::{Result, anyhow, Context};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Ollama client for interacting with Ollama API
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Optional rate limit in requests per minute
    rate_limit: Option<u32>,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    /// How long to keep the model loaded in memory
    #[serde(skip_serializing_if = "Option::is_none")]
    keep_alive: Option<String>,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    pub model: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
    /// Duration of loading the model in nanoseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_duration: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl GenerationRequest {
    /// Create a new generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: Some(false),
            keep_alive: None,
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        match &mut self.options {
            Some(options) => options.temperature = Some(temperature),
            None => {
                self.options = Some(GenerationOptions {
                    temperature: Some(temperature),
                    num_predict: None,
                });
            }
        }
        self
    }

    /// Set the keep-alive duration
    pub fn keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.keep_alive = Some(keep_alive.into());
        self
    }
}

impl Ollama {
    /// Create a new Ollama client from a complete base URL
    ///
    /// Uses connection pooling for better performance with concurrent sessions.
    pub fn new_with_config(
        base_url: impl Into<String>,
        max_retries: u32,
        backoff_base_ms: u64,
        rate_limit: Option<u32>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            base_url,
            client: Client::builder()
                .timeout(Duration::from_secs(300))
                // Force HTTP/1.1 - Ollama uses HTTP/1.1
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .pool_max_idle_per_host(20)
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
            rate_limit,
        }
    }

    /// Create a new Ollama client with default retry settings
    pub fn from_url(url: impl Into<String>) -> Self {
        Self::new_with_config(url, 3, 1000, None)
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate text from the Ollama API with retry logic
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let url = format!("{}/api/generate", self.base_url);

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            if let Some(rate_limit) = self.rate_limit.filter(|r| *r > 0) {
                let delay_ms = 60_000 / rate_limit as u64;
                if attempt > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }

            match self.client.post(&url).json(request).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let response_text = response.text().await
                            .map_err(|e| anyhow!("Failed to get response text from Ollama API: {}", e))?;
                        return parse_generation_response(&response_text);
                    } else if status.is_server_error() {
                        // Server error - can retry
                        let error_text = response.text().await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!("Ollama API error ({}): {} - attempt {}/{}", status, error_text, attempt + 1, self.max_retries + 1);
                        last_error = Some(anyhow!("Ollama API error ({}): {}", status, error_text));
                    } else {
                        // Client error - don't retry
                        let error_text = response.text().await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!("Ollama API error ({}): {}", status, error_text);
                        return Err(anyhow!("Ollama API error ({}): {}", status, error_text));
                    }
                }
                Err(e) => {
                    // Network error - can retry
                    error!("Ollama API network error: {} - attempt {}/{}", e, attempt + 1, self.max_retries + 1);
                    last_error = Some(anyhow!("Failed to send request to Ollama API: {}", e));
                }
            }

            attempt += 1;

            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("Ollama API request failed after {} attempts", self.max_retries + 1)))
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String> {
        let url = format!("{}/api/version", self.base_url);
        let response: serde_json::Value = self.client.get(&url)
            .send()
            .await
            .context("Failed to connect to Ollama")?
            .json()
            .await
            .context("Failed to parse Ollama version response")?;

        let version = response["version"].as_str()
            .ok_or_else(|| anyhow!("Invalid version format in response"))?
            .to_string();

        Ok(version)
    }
}

/// Parse a generate response, accepting a streamed (JSONL) body as well
fn parse_generation_response(response_text: &str) -> Result<GenerationResponse> {
    match serde_json::from_str::<GenerationResponse>(response_text) {
        Ok(generated) => Ok(generated),
        Err(e) => {
            debug!("Ollama response is not a single object ({}), trying JSONL", e);

            let mut full_response = String::new();
            let mut model = None;
            let mut done = false;
            for line in response_text.lines().filter(|l| !l.trim().is_empty()) {
                let value: serde_json::Value = serde_json::from_str(line)
                    .map_err(|_| anyhow!("Failed to parse Ollama API response: {}. Response contains invalid JSON.", e))?;
                if let Some(part) = value.get("response").and_then(|v| v.as_str()) {
                    full_response.push_str(part);
                }
                if model.is_none() {
                    model = value.get("model").and_then(|v| v.as_str()).map(str::to_string);
                }
                done |= value.get("done").and_then(|v| v.as_bool()).unwrap_or(false);
            }

            if model.is_none() && full_response.is_empty() {
                return Err(anyhow!("Failed to parse Ollama API response: {}", e));
            }

            Ok(GenerationResponse {
                model: model.unwrap_or_else(|| "unknown".to_string()),
                created_at: String::new(),
                response: full_response,
                done,
                load_duration: None,
                eval_count: None,
            })
        }
    }
}

#[async_trait]
impl Provider for Ollama {
    type Request = GenerationRequest;
    type Response = GenerationResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.generate(&request)
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.version()
            .await
            .map(|_| ())
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))
    }

    fn extract_text(response: &Self::Response) -> String {
        response.response.clone()
    }
}
