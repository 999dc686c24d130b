/*!
 * Tests for application configuration functionality
 */

use lingualink::app_config::{Config, LogLevel, TargetConfig, TranslationProvider};
use lingualink::errors::AppError;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.max_pending_chunks, 8);
    assert_eq!(config.source_language, "eng_Latn");
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.log_level, LogLevel::Info);

    let ollama_config = config.translation.get_provider_config(&TranslationProvider::Ollama)
        .expect("Ollama provider config should exist");
    assert_eq!(ollama_config.concurrent_requests, 4);
    assert_eq!(ollama_config.timeout_secs, 120);

    assert!(config.validate().is_ok());
}

/// Test that the default targets map to the reference display codes
#[test]
fn test_supportedTargets_withDefaults_shouldUseReferenceCodes() {
    let targets = Config::default().supported_targets().unwrap();

    let codes: Vec<String> = targets
        .ids()
        .iter()
        .filter_map(|id| targets.display_code(id).map(str::to_string))
        .collect();
    assert_eq!(codes, vec!["es", "hi"]);
}

/// Test that a target without an explicit code gets a derived one
#[test]
fn test_supportedTargets_withoutCode_shouldDeriveIt() {
    let mut config = Config::default();
    config.targets.push(TargetConfig { id: "fra_Latn".to_string(), code: None });

    let targets = config.supported_targets().unwrap();
    let french = "fra_Latn".parse().unwrap();
    assert_eq!(targets.display_code(&french), Some("fr"));
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    config.source_language = "english".to_string();
    assert!(matches!(config.validate(), Err(AppError::Config(_))));

    let mut config = Config::default();
    config.targets.clear();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.targets.push(TargetConfig { id: "spa_Latn".to_string(), code: Some("sp".to_string()) });
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.server.port = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.server.max_pending_chunks = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    if let Some(provider) = config.translation.get_provider_config_mut(&TranslationProvider::Ollama) {
        provider.endpoint = "not a url".to_string();
    }
    assert!(config.validate().is_err());
}

/// Test that a missing config file is created with defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("conf.json");

    let (config, created) = Config::load_or_create(&path).unwrap();
    assert!(created);
    assert!(path.exists());
    assert_eq!(config.server.port, 8000);

    let (reloaded, created_again) = Config::load_or_create(&path).unwrap();
    assert!(!created_again);
    assert_eq!(reloaded.targets, config.targets);
}

/// Test that a partial config file falls back to defaults for missing fields
#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() {
    common::init_test_logging();
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(
        &path,
        r#"{
            "server": { "port": 9100 },
            "targets": [ { "id": "fra_Latn", "code": "fr" } ],
            "translation": { "provider": "mock" }
        }"#,
    )
    .unwrap();

    let (config, created) = Config::load_or_create(&path).unwrap();
    assert!(!created);
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.source_language, "eng_Latn");
    assert_eq!(config.translation.provider, TranslationProvider::Mock);
    assert_eq!(config.supported_targets().unwrap().len(), 1);
    assert!(config.validate().is_ok());
}

/// Test that an unparseable config file is reported
#[test]
fn test_loadOrCreate_withBrokenFile_shouldFail() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(Config::load_or_create(&path).is_err());
}

/// Test provider parsing and display
#[test]
fn test_translationProvider_fromStr_shouldRoundTripNames() {
    assert_eq!("Ollama".parse::<TranslationProvider>().unwrap(), TranslationProvider::Ollama);
    assert_eq!("mock".parse::<TranslationProvider>().unwrap(), TranslationProvider::Mock);
    assert!("openai".parse::<TranslationProvider>().is_err());
    assert_eq!(TranslationProvider::Mock.to_string(), "mock");
    assert_eq!(TranslationProvider::Ollama.display_name(), "Ollama");
}
