/*!
 * Tests for caption chunking over realistic caption streams
 */

use lingualink::chunker::{CaptionChunker, ends_sentence};

/// Feed a sequence of `(text, is_final)` snapshots, collecting emitted chunks
fn feed(chunker: &mut CaptionChunker, snapshots: &[(&str, bool)]) -> Vec<String> {
    snapshots
        .iter()
        .filter_map(|(text, is_final)| chunker.append(text, *is_final))
        .collect()
}

/// Test a typical recognizer stream with growth, repeats and a rewind
#[test]
fn test_append_withRecognizerStream_shouldEmitEachSentenceOnce() {
    let mut chunker = CaptionChunker::new();

    let chunks = feed(&mut chunker, &[
        ("Good", false),
        ("Good morning", false),
        ("Good morning", false),
        ("Good", false),
        ("Good morning everyone.", false),
        ("Today we", false),
        ("Today we will", false),
        ("Today we will start", true),
    ]);

    assert_eq!(chunks, vec!["Good morning everyone.", "Today we will start"]);
    assert_eq!(chunker.pending(), "");
}

/// Test that fragments without a prefix relation are joined into one chunk
#[test]
fn test_append_withUnrelatedFragments_shouldJoinUntilBoundary() {
    let mut chunker = CaptionChunker::new();

    let chunks = feed(&mut chunker, &[
        ("So", false),
        ("anyway", false),
        ("let's begin!", false),
    ]);

    assert_eq!(chunks, vec!["So anyway let's begin!"]);
}

/// Test each terminator finalizes the buffer
#[test]
fn test_append_withEachTerminator_shouldFinalize() {
    for text in ["Stop.", "Stop!", "Stop?", "Stop\u{2026}"] {
        let mut chunker = CaptionChunker::new();
        assert_eq!(chunker.append(text, false).as_deref(), Some(text));
    }
}

/// Test a terminator in the middle of the buffer does not finalize
#[test]
fn test_append_withInnerTerminator_shouldKeepAccumulating() {
    let mut chunker = CaptionChunker::new();

    assert_eq!(chunker.append("Version 2.0 is", false), None);
    assert_eq!(chunker.pending(), "Version 2.0 is");
}

/// Test repeat suppression survives an emitted chunk
#[test]
fn test_append_withRepeatAfterEmission_shouldStaySuppressed() {
    let mut chunker = CaptionChunker::new();

    assert_eq!(chunker.append("All done.", false).as_deref(), Some("All done."));
    assert_eq!(chunker.append("All done.", false), None);
    assert_eq!(chunker.append("All done.", true), None);
    assert_eq!(chunker.pending(), "");
}

/// Test that prefix checks are literal, not word aware
#[test]
fn test_append_withMidWordExtension_shouldReplaceBuffer() {
    let mut chunker = CaptionChunker::new();

    chunker.append("cat", false);
    chunker.append("cats", false);

    assert_eq!(chunker.pending(), "cats");
}

/// Test sentence end detection helper
#[test]
fn test_endsSentence_withVariousEndings_shouldDetectTerminators() {
    assert!(ends_sentence("Really?"));
    assert!(ends_sentence("Well\u{2026}"));
    assert!(!ends_sentence("Hello, world"));
    assert!(!ends_sentence("No terminator"));
    assert!(!ends_sentence(""));
}
