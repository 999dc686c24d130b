/*!
 * # LinguaLink - live caption translation service
 *
 * A Rust service that turns a live stream of speech-caption updates into
 * stable, sentence-like chunks and relays their translations back to the
 * client, one WebSocket session per caption source.
 *
 * ## Features
 *
 * - Reconcile overlapping, repeated and rewound partial captions into
 *   finalized chunks, each emitted exactly once
 * - Translate chunks through a shared, bounded translation pool without
 *   blocking any session's receive loop
 * - Per-session result ordering regardless of translation latency
 * - Client-selectable target languages, filtered against the configured set
 * - Ollama (local LLM) or in-process mock translation backends
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `chunker`: Caption snapshot reconciliation
 * - `session`: Wire models and the per-connection `SessionCoordinator`
 * - `translation`: The `Translator` capability and the `TranslationPool`
 * - `providers`: Backend clients used by `TranslationService`:
 *   - `providers::ollama`: Ollama API client
 *   - `providers::mock`: Deterministic in-process backend
 * - `language_utils`: Language identifiers and the supported target registry
 * - `app_config`: Configuration management
 * - `server`: axum WebSocket and health endpoints
 * - `probe`: WebSocket client for exercising a running server
 * - `errors`: Custom error types for the service
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod chunker;
pub mod errors;
pub mod language_utils;
pub mod probe;
pub mod providers;
pub mod server;
pub mod session;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use chunker::CaptionChunker;
pub use errors::{AppError, ProviderError, SessionError, TranslationError};
pub use language_utils::{LanguageId, SupportedTargets};
pub use session::{OutboundMessage, SessionCoordinator};
pub use translation::{TranslationPool, TranslationService, Translator};
