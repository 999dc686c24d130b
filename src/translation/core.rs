/*!
 * Core translation service implementation.
 *
 * This module contains the `Translator` capability consumed by caption
 * sessions, and `TranslationService`, its implementation over a configured
 * backend provider.
 */

use async_trait::async_trait;
use log::{debug, info};
use std::collections::HashMap;
use std::fmt::Debug;
use std::time::Instant;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils::LanguageId;
use crate::providers::Provider;
use crate::providers::mock::{MockProvider, MockRequest};
use crate::providers::ollama::{GenerationRequest, Ollama};

/// Translated strings keyed by the targets the translator could resolve
pub type TranslationResult = HashMap<LanguageId, String>;

/// Translation capability shared by every session.
///
/// Implementations may be slow and must tolerate concurrent calls. Targets the
/// implementation cannot resolve are left out of the result rather than
/// reported as errors.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    async fn translate(
        &self,
        text: &str,
        targets: &[LanguageId],
    ) -> Result<TranslationResult, TranslationError>;
}

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },

    /// In-process mock backend
    Mock {
        /// Client instance
        client: MockProvider,
    },
}

/// Main translation service for caption chunks
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Language of the incoming captions
    source_language: LanguageId,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig, source_language: LanguageId) -> Self {
        let provider = match config.provider {
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::new_with_config(
                    config.get_endpoint(),
                    config.common.retry_count,
                    config.common.retry_backoff_ms,
                    config.get_rate_limit(),
                ),
            },
            ConfigTranslationProvider::Mock => TranslationProviderImpl::Mock {
                client: MockProvider::working(),
            },
        };

        Self { provider, config, source_language }
    }

    /// Create a service backed by a specific mock provider
    pub fn with_mock(config: TranslationConfig, source_language: LanguageId, client: MockProvider) -> Self {
        Self {
            provider: TranslationProviderImpl::Mock { client },
            config,
            source_language,
        }
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        match &self.provider {
            TranslationProviderImpl::Ollama { client } => client.test_connection().await,
            TranslationProviderImpl::Mock { client } => client.test_connection().await,
        }
    }

    /// System prompt for one target language
    fn system_prompt(&self, source_name: &str, target_name: &str) -> String {
        self.config
            .common
            .system_prompt
            .replace("{source_language}", source_name)
            .replace("{target_language}", target_name)
    }

    /// Translate into a single target, returning the trimmed backend output
    async fn translate_one(
        &self,
        text: &str,
        source_name: &str,
        target: &LanguageId,
    ) -> Result<String, TranslationError> {
        let target_name = target
            .language_name()
            .map_err(|_| TranslationError::UnsupportedLanguage(target.to_string()))?;

        let translated = match &self.provider {
            TranslationProviderImpl::Ollama { client } => {
                let request = GenerationRequest::new(self.config.get_model(), text)
                    .system(self.system_prompt(source_name, &target_name))
                    .temperature(self.config.common.temperature)
                    .keep_alive("30m");
                let response = client.complete(request).await?;
                Ollama::extract_text(&response)
            }
            TranslationProviderImpl::Mock { client } => {
                let request = MockRequest {
                    text: text.to_string(),
                    source_language: source_name.to_string(),
                    target_language: target_name,
                };
                let response = client.complete(request).await?;
                MockProvider::extract_text(&response)
            }
        };

        Ok(translated.trim().to_string())
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(
        &self,
        text: &str,
        targets: &[LanguageId],
    ) -> Result<TranslationResult, TranslationError> {
        let start_time = Instant::now();
        let mut results = TranslationResult::new();

        if text.trim().is_empty() {
            return Ok(results);
        }

        let source_name = self
            .source_language
            .language_name()
            .map_err(|_| TranslationError::UnsupportedLanguage(self.source_language.to_string()))?;

        for target in targets {
            let translated = self.translate_one(text, &source_name, target).await?;
            if translated.is_empty() {
                debug!("Empty translation for {}, leaving it out", target);
                continue;
            }
            results.insert(target.clone(), translated);
        }

        info!(
            "Translated {} chars into {}/{} targets in {:?}",
            text.chars().count(),
            results.len(),
            targets.len(),
            start_time.elapsed()
        );

        Ok(results)
    }
}
