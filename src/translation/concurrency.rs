/*!
 * Shared translation pool.
 *
 * Every session hands its finalized chunks to the same `TranslationPool`,
 * which bounds how many translator calls run at once across the whole
 * process and applies the per-call timeout. Callers run it from their own
 * task, so a slow translation never holds up another session's receive loop.
 */

use log::debug;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::TranslationError;
use crate::language_utils::LanguageId;

use super::core::{TranslationResult, Translator};

/// Provider-specific concurrency profile with tuned defaults
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    /// Maximum concurrent requests
    pub max_concurrent_requests: usize,
    /// Whether the first call may include a model load
    pub cold_start: bool,
}

impl ProviderProfile {
    /// Get the optimal profile for a given provider
    pub fn for_provider(provider: TranslationProvider) -> Self {
        match provider {
            TranslationProvider::Ollama => Self {
                // Local model server, a few parallel generations at most
                max_concurrent_requests: 4,
                cold_start: true,
            },
            TranslationProvider::Mock => Self {
                max_concurrent_requests: 16,
                cold_start: false,
            },
        }
    }

    /// Get effective concurrent requests, respecting any user override
    pub fn effective_concurrent_requests(&self, user_override: Option<usize>) -> usize {
        user_override.unwrap_or(self.max_concurrent_requests)
    }
}

/// Cloneable handle bounding translator calls across all sessions
#[derive(Debug, Clone)]
pub struct TranslationPool {
    translator: Arc<dyn Translator>,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl TranslationPool {
    /// Create a pool allowing `max_concurrent` calls, each limited to `timeout`
    pub fn new(translator: Arc<dyn Translator>, max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            translator,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            timeout,
        }
    }

    /// Create a pool sized from the translation configuration
    pub fn from_config(translator: Arc<dyn Translator>, config: &TranslationConfig) -> Self {
        let profile = ProviderProfile::for_provider(config.provider);
        let max_concurrent = profile.effective_concurrent_requests(
            config.get_active_provider_config().map(|p| p.concurrent_requests),
        );
        Self::new(
            translator,
            max_concurrent,
            Duration::from_secs(config.get_timeout_secs()),
        )
    }

    /// Number of calls that could start right now
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Stop accepting new work; waiting and future calls fail with `PoolClosed`
    pub fn close(&self) {
        self.permits.close();
    }

    /// Translate `text` into `targets`, waiting for a free slot first.
    ///
    /// The timeout covers the translator call only, not the wait for a slot.
    pub async fn translate(
        &self,
        text: &str,
        targets: &[LanguageId],
    ) -> Result<TranslationResult, TranslationError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| TranslationError::PoolClosed)?;

        let start_time = Instant::now();
        let result = tokio::time::timeout(self.timeout, self.translator.translate(text, targets))
            .await
            .map_err(|_| TranslationError::Timeout(self.timeout))?;

        debug!("Translator call finished in {:?}", start_time.elapsed());
        result
    }
}
