/*!
 * Translation capability for finalized caption chunks.
 *
 * - `core`: the `Translator` trait and the provider-backed `TranslationService`
 * - `concurrency`: the shared `TranslationPool` bounding calls across sessions
 */

// Re-export main types for easier usage
pub use self::concurrency::{ProviderProfile, TranslationPool};
pub use self::core::{TranslationResult, TranslationService, Translator};

// Submodules
pub mod concurrency;
pub mod core;
