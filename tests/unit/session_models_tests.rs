/*!
 * Tests for caption session wire models
 */

use std::collections::BTreeMap;

use lingualink::session::{CaptionUpdate, OutboundMessage, SessionState};

/// Test field coercion for loosely typed clients
#[test]
fn test_captionUpdate_withLooseTypes_shouldCoerce() {
    let update = CaptionUpdate::from_json(r#"{"text": 42, "is_final": 1, "targets": "spa_Latn"}"#).unwrap();

    assert_eq!(update.text, "42");
    assert!(update.is_final);
    assert_eq!(update.targets, None);
}

/// Test defaults and unknown fields
#[test]
fn test_captionUpdate_withMissingFields_shouldDefault() {
    let update = CaptionUpdate::from_json(r#"{"speaker": "A"}"#).unwrap();
    assert_eq!(update, CaptionUpdate::default());

    let update = CaptionUpdate::from_json(r#"{"text": "  padded  ", "is_final": null}"#).unwrap();
    assert_eq!(update.text, "padded");
    assert!(!update.is_final);
}

/// Test that only string entries of a targets list are kept
#[test]
fn test_captionUpdate_withMixedTargetEntries_shouldKeepStrings() {
    let update = CaptionUpdate::from_json(r#"{"text":"Hi","targets":["spa_Latn", 3, null]}"#).unwrap();
    assert_eq!(update.targets, Some(vec!["spa_Latn".to_string()]));
}

/// Test that malformed JSON is the only parse error
#[test]
fn test_captionUpdate_withMalformedJson_shouldFail() {
    assert!(CaptionUpdate::from_json("{\"text\": ").is_err());
    assert!(CaptionUpdate::from_json("not json").is_err());
    assert_eq!(CaptionUpdate::from_json("[1, 2]").unwrap(), CaptionUpdate::default());
}

/// Test outbound message serialization
#[test]
fn test_outboundMessage_toJson_shouldMatchWireFormat() {
    assert_eq!(OutboundMessage::invalid_json().to_json(), r#"{"error":"invalid_json"}"#);

    let mut translations = BTreeMap::new();
    translations.insert("es".to_string(), "Hola.".to_string());
    translations.insert("hi".to_string(), "नमस्ते।".to_string());
    let message = OutboundMessage::Result { source: "Hello.".to_string(), translations };

    let value: serde_json::Value = serde_json::from_str(&message.to_json()).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "source": "Hello.", "translations": { "es": "Hola.", "hi": "नमस्ते।" } })
    );
}

/// Test state names used in logs
#[test]
fn test_sessionState_display_shouldBeUppercase() {
    assert_eq!(SessionState::Open.to_string(), "OPEN");
    assert_eq!(SessionState::Closing.to_string(), "CLOSING");
    assert_eq!(SessionState::Closed.to_string(), "CLOSED");
}
