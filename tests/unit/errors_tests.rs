/*!
 * Tests for error types
 */

use std::time::Duration;

use lingualink::errors::{AppError, ProviderError, SessionError, TranslationError};

/// Test provider error messages
#[test]
fn test_providerError_display_shouldIncludeDetails() {
    let error = ProviderError::ApiError {
        status_code: 503,
        message: "model loading".to_string(),
    };
    assert_eq!(error.to_string(), "API responded with error: 503 - model loading");

    let error = ProviderError::ConnectionError("refused".to_string());
    assert_eq!(error.to_string(), "Connection error: refused");
}

/// Test that provider errors convert into translation errors
#[test]
fn test_translationError_fromProviderError_shouldWrap() {
    let error: TranslationError = ProviderError::RequestFailed("boom".to_string()).into();

    assert!(matches!(error, TranslationError::Provider(ProviderError::RequestFailed(_))));
    assert_eq!(error.to_string(), "Provider error: API request failed: boom");
}

/// Test timeout message
#[test]
fn test_translationError_timeout_shouldShowDuration() {
    let error = TranslationError::Timeout(Duration::from_secs(2));
    assert_eq!(error.to_string(), "Translation timed out after 2s");
}

/// Test conversions into the application error
#[test]
fn test_appError_conversions_shouldPickMatchingVariant() {
    let error: AppError = SessionError::Transport("reset".to_string()).into();
    assert!(matches!(error, AppError::Session(_)));

    let error: AppError = TranslationError::PoolClosed.into();
    assert!(matches!(error, AppError::Translation(TranslationError::PoolClosed)));

    let error: AppError = std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use").into();
    assert!(matches!(error, AppError::Io(ref msg) if msg == "in use"));

    let error: AppError = anyhow::anyhow!("something odd").into();
    assert_eq!(error.to_string(), "Unknown error: something odd");
}
