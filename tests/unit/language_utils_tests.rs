/*!
 * Tests for language identifiers and the supported target registry
 */

use std::collections::HashMap;

use lingualink::language_utils::{LanguageId, SupportedTargets, TargetLanguage};

fn target(id: &str, code: &str) -> TargetLanguage {
    TargetLanguage { id: id.parse().unwrap(), code: code.to_string() }
}

/// Test identifier serialization through serde
#[test]
fn test_languageId_serde_shouldUsePlainString() {
    let id: LanguageId = serde_json::from_str("\"hin_Deva\"").unwrap();
    assert_eq!(id.as_str(), "hin_Deva");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"hin_Deva\"");

    assert!(serde_json::from_str::<LanguageId>("\"xx_Unknown\"").is_err());
}

/// Test identifiers with a well-formed shape but an unknown language
#[test]
fn test_languageId_withUnknownLanguage_shouldFail() {
    assert!("qqq_Latn".parse::<LanguageId>().is_err());
}

/// Test display code fallback for languages without a two-letter code
#[test]
fn test_defaultDisplayCode_withoutPart1_shouldUsePart3() {
    let id: LanguageId = "yue_Hant".parse().unwrap();
    assert_eq!(id.default_display_code(), "yue");
}

/// Test the target filtering example end to end through the registry
#[test]
fn test_resolve_withMixedTargets_shouldKeepOnlyResolvable() {
    let targets = SupportedTargets::new(vec![target("spa_Latn", "es"), target("hin_Deva", "hi")]).unwrap();
    let requested = vec!["spa_Latn".to_string(), "xx_Unknown".to_string()];

    let resolved = targets.resolve(Some(&requested));
    let translations: HashMap<LanguageId, String> = resolved
        .iter()
        .map(|id| (id.clone(), "Hola".to_string()))
        .collect();
    let map = targets.to_display_map(&translations);

    assert_eq!(map.len(), 1);
    assert_eq!(map.get("es").map(String::as_str), Some("Hola"));
}

/// Test that requested order is kept when resolving
#[test]
fn test_resolve_withReversedRequest_shouldKeepRequestOrder() {
    let targets = SupportedTargets::new(vec![target("spa_Latn", "es"), target("hin_Deva", "hi")]).unwrap();
    let requested = vec!["hin_Deva".to_string(), "spa_Latn".to_string()];

    let ids: Vec<String> = targets.resolve(Some(&requested)).iter().map(|id| id.to_string()).collect();
    assert_eq!(ids, vec!["hin_Deva", "spa_Latn"]);
}

/// Test registry validation
#[test]
fn test_new_withInvalidEntries_shouldFail() {
    assert!(SupportedTargets::new(vec![target("spa_Latn", " ")]).is_err());
    assert!(SupportedTargets::new(vec![target("spa_Latn", "es"), target("spa_Latn", "sp")]).is_err());
}
