/*!
 * Caption chunker.
 *
 * Live caption sources re-send the whole utterance they are currently
 * recognising on every update, sometimes shorter than before, sometimes
 * repeated verbatim, and eventually followed by an unrelated new fragment.
 * `CaptionChunker` folds that stream of snapshots into discrete, finalized
 * chunks of text, one per sentence-like boundary.
 *
 * The chunker performs no I/O and must be driven sequentially by a single
 * owner (one instance per session).
 */

/// Characters that close a sentence and finalize the pending buffer
pub const SENTENCE_TERMINATORS: [char; 4] = ['.', '!', '?', '\u{2026}'];

/// Stateful reconciler turning caption snapshots into finalized chunks
#[derive(Debug, Default, Clone)]
pub struct CaptionChunker {
    /// Accumulated, not yet finalized text
    buffer: String,
    /// Most recent raw text observed
    last_seen: String,
}

impl CaptionChunker {
    /// Create an empty chunker
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one caption snapshot.
    ///
    /// `text` is the full current candidate for the utterance in progress, not
    /// a delta. Returns the finalized chunk when a boundary is reached, `None`
    /// while text is still accumulating.
    pub fn append(&mut self, text: &str, is_final: bool) -> Option<String> {
        if text.is_empty() {
            return None;
        }

        if text == self.last_seen {
            return None;
        }
        self.last_seen.clear();
        self.last_seen.push_str(text);

        if self.buffer.is_empty() || text.starts_with(self.buffer.as_str()) {
            // First fragment, or the source extended its own output
            self.buffer.clear();
            self.buffer.push_str(text);
        } else if self.buffer.starts_with(text) {
            // Rewind to a shorter candidate: keep the longer buffer
            return None;
        } else {
            self.buffer.push(' ');
            self.buffer.push_str(text);
        }

        if is_final || ends_sentence(&self.buffer) {
            let chunk = self.buffer.trim().to_string();
            self.buffer.clear();
            // Chunks are never empty
            return (!chunk.is_empty()).then_some(chunk);
        }

        None
    }

    /// Text accumulated since the last emitted chunk
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Most recent raw text observed
    pub fn last_seen(&self) -> &str {
        &self.last_seen
    }
}

/// Whether `text` ends with one of the sentence terminators
pub fn ends_sentence(text: &str) -> bool {
    text.ends_with(SENTENCE_TERMINATORS)
}
