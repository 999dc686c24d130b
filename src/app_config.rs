/*!
 * Application configuration module.
 *
 * This module handles the service configuration including loading,
 * validating and creating the default configuration file.
 */

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use url::Url;

use crate::errors::AppError;
use crate::language_utils::{LanguageId, SupportedTargets, TargetLanguage};

/// Represents the service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// WebSocket server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Language identifier of the incoming captions
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Supported translation targets, in display order
    #[serde(default = "default_targets")]
    pub targets: Vec<TargetConfig>,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// WebSocket server settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted inbound WebSocket message
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,

    /// Finalized chunks a session queues behind the one being translated
    #[serde(default = "default_max_pending_chunks")]
    pub max_pending_chunks: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_message_bytes: default_max_message_bytes(),
            max_pending_chunks: default_max_pending_chunks(),
        }
    }
}

/// One supported target language
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TargetConfig {
    /// Translator-facing identifier, e.g. `spa_Latn`
    pub id: String,

    /// Client-facing code; derived from `id` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Ollama
    #[default]
    Ollama,
    // @provider: In-process mock, for running without a model
    Mock,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ollama => "Ollama",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Ollama => "ollama".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Max concurrent translation calls across all sessions
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    // @field: Timeout seconds for one translation call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Rate limit (requests per minute)
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                endpoint: default_ollama_endpoint(),
                concurrent_requests: default_concurrent_requests(),
                timeout_secs: default_timeout_secs(),
                rate_limit: None,
            },
            TranslationProvider::Mock => Self {
                provider_type: "mock".to_string(),
                model: "mock".to_string(),
                endpoint: String::new(),
                concurrent_requests: default_concurrent_requests(),
                timeout_secs: default_timeout_secs(),
                rate_limit: None,
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for translation
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_message_bytes() -> usize {
    64 * 1024
}

fn default_max_pending_chunks() -> usize {
    crate::session::coordinator::DEFAULT_MAX_PENDING_CHUNKS
}

fn default_source_language() -> String {
    "eng_Latn".to_string()
}

fn default_targets() -> Vec<TargetConfig> {
    vec![
        TargetConfig { id: "spa_Latn".to_string(), code: Some("es".to_string()) },
        TargetConfig { id: "hin_Deva".to_string(), code: Some("hi".to_string()) },
    ]
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    // Generous enough to cover a cold model load
    120
}

fn default_retry_count() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500 // doubled on each retry
}

fn default_temperature() -> f32 {
    0.1
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_system_prompt() -> String {
    "You are a live caption translator. Translate the following text from {source_language} to {target_language}. Reply with the translation only.".to_string()
}

impl Config {
    /// Load a configuration file, writing the defaults first when it does not exist
    pub fn load_or_create(path: &Path) -> Result<(Self, bool)> {
        if path.exists() {
            let file = File::open(path)
                .context(format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .context(format!("Failed to parse config file: {}", path.display()))?;
            return Ok((config, false));
        }

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .context(format!("Failed to write default config to file: {}", path.display()))?;

        Ok((config, true))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        self.source_language_id()?;
        self.supported_targets()?;

        if self.server.port == 0 {
            return Err(AppError::Config("Server port must not be 0".to_string()));
        }
        if self.server.max_message_bytes == 0 {
            return Err(AppError::Config("max_message_bytes must be positive".to_string()));
        }
        if self.server.max_pending_chunks == 0 {
            return Err(AppError::Config("max_pending_chunks must be at least 1".to_string()));
        }

        if self.translation.optimal_concurrent_requests() == 0 {
            return Err(AppError::Config("concurrent_requests must be at least 1".to_string()));
        }

        if self.translation.provider == TranslationProvider::Ollama {
            let endpoint = self.translation.get_endpoint();
            Url::parse(&endpoint)
                .map_err(|e| AppError::Config(format!("Invalid endpoint '{}': {}", endpoint, e)))?;
        }

        Ok(())
    }

    /// Parsed source language identifier
    pub fn source_language_id(&self) -> Result<LanguageId, AppError> {
        self.source_language
            .parse()
            .map_err(|e: anyhow::Error| AppError::Config(e.to_string()))
    }

    /// Build the supported target registry from the `targets` list
    pub fn supported_targets(&self) -> Result<SupportedTargets, AppError> {
        let mut targets = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            let id: LanguageId = target
                .id
                .parse()
                .map_err(|e: anyhow::Error| AppError::Config(e.to_string()))?;
            let code = target
                .code
                .clone()
                .unwrap_or_else(|| id.default_display_code());
            targets.push(TargetLanguage { id, code });
        }

        SupportedTargets::new(targets).map_err(|e| AppError::Config(e.to_string()))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            source_language: default_source_language(),
            targets: default_targets(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    pub fn optimal_concurrent_requests(&self) -> usize {
        if let Some(provider_config) = self.get_active_provider_config() {
            return provider_config.concurrent_requests;
        }

        crate::translation::concurrency::ProviderProfile::for_provider(self.provider)
            .max_concurrent_requests
    }

    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get a mutable provider configuration by type
    pub fn get_provider_config_mut(&mut self, provider_type: &TranslationProvider) -> Option<&mut ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter_mut()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.provider {
            TranslationProvider::Ollama => default_ollama_model(),
            TranslationProvider::Mock => "mock".to_string(),
        }
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::Ollama => default_ollama_endpoint(),
            TranslationProvider::Mock => String::new(),
        }
    }

    /// Get the per-call timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or_else(default_timeout_secs)
    }

    /// Get the rate limit for the active provider
    pub fn get_rate_limit(&self) -> Option<u32> {
        self.get_active_provider_config()
            .and_then(|p| p.rate_limit)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Ollama),
                ProviderConfig::new(TranslationProvider::Mock),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
