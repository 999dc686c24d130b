/*!
 * Per-connection caption session.
 *
 * A `SessionCoordinator` owns the chunker for one connection and processes
 * that connection's inbound messages strictly in order. Finalized chunks go
 * to a dispatcher task owned by the session, which translates them one at a
 * time through the shared pool. The receive loop never waits on a
 * translation, and results leave the session in the order their chunks were
 * produced.
 */

use futures::{Stream, StreamExt};
use log::{debug, info, warn};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, Receiver, Sender, UnboundedSender};
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::chunker::CaptionChunker;
use crate::errors::SessionError;
use crate::language_utils::SupportedTargets;
use crate::translation::TranslationPool;

use super::models::{CaptionUpdate, OutboundMessage, PendingChunk, SessionState};

/// Finalized chunks a session may hold while one is being translated
pub const DEFAULT_MAX_PENDING_CHUNKS: usize = 8;

/// What one inbound message asks the session to do
#[derive(Debug, Clone, PartialEq)]
pub enum MessageOutcome {
    /// Send this message back immediately
    Reply(OutboundMessage),
    /// Translate this chunk and send the result
    Dispatch(PendingChunk),
    /// Nothing to send
    Ignored,
}

/// Drives one connection: parsing, chunking and translation dispatch
pub struct SessionCoordinator {
    id: Uuid,
    label: String,
    chunker: CaptionChunker,
    targets: Arc<SupportedTargets>,
    pool: TranslationPool,
    state: SessionState,
    next_sequence: u64,
    max_pending_chunks: usize,
}

impl SessionCoordinator {
    /// Open a new session
    pub fn new(targets: Arc<SupportedTargets>, pool: TranslationPool) -> Self {
        let id = Uuid::new_v4();
        let label = id.to_string()[..8].to_string();
        info!("Session {} {}", label, SessionState::Open);

        Self {
            id,
            label,
            chunker: CaptionChunker::new(),
            targets,
            pool,
            state: SessionState::Open,
            next_sequence: 0,
            max_pending_chunks: DEFAULT_MAX_PENDING_CHUNKS,
        }
    }

    /// Limit the chunks queued behind the one being translated; extra chunks are dropped
    pub fn with_max_pending_chunks(mut self, max_pending_chunks: usize) -> Self {
        self.max_pending_chunks = max_pending_chunks.max(1);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The session's chunker, for inspecting pending text
    pub fn chunker(&self) -> &CaptionChunker {
        &self.chunker
    }

    /// Process one raw inbound message.
    ///
    /// This is the sequential part of the session: parse, feed the chunker,
    /// resolve targets. It performs no I/O.
    pub fn handle_message(&mut self, raw: &str) -> MessageOutcome {
        let update = match CaptionUpdate::from_json(raw) {
            Ok(update) => update,
            Err(e) => {
                debug!("Session {}: unparseable message ({})", self.label, e);
                return MessageOutcome::Reply(OutboundMessage::invalid_json());
            }
        };

        let Some(source) = self.chunker.append(&update.text, update.is_final) else {
            return MessageOutcome::Ignored;
        };

        let targets = self.targets.resolve(update.targets.as_deref());
        if targets.is_empty() {
            debug!("Session {}: no supported target requested, dropping chunk", self.label);
            return MessageOutcome::Ignored;
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        debug!(
            "Session {}: chunk #{} finalized ({} chars, {} targets)",
            self.label,
            sequence,
            source.chars().count(),
            targets.len()
        );

        MessageOutcome::Dispatch(PendingChunk { sequence, source, targets })
    }

    /// Run the session until the inbound stream ends or fails.
    ///
    /// The end of `inbound` is a clean disconnect; an `Err` item is a fatal
    /// transport error. Either way the dispatcher is stopped, any translation
    /// still in flight is abandoned and the session ends `Closed`.
    pub async fn run<S, E>(
        &mut self,
        mut inbound: S,
        outbound: UnboundedSender<OutboundMessage>,
    ) -> Result<(), SessionError>
    where
        S: Stream<Item = Result<String, E>> + Unpin,
        E: Display,
    {
        let (queue, dispatcher) = self.spawn_dispatcher(outbound.clone());

        let outcome = loop {
            let raw = match inbound.next().await {
                None => break Ok(()),
                Some(Err(e)) => break Err(SessionError::Transport(e.to_string())),
                Some(Ok(raw)) => raw,
            };

            match self.handle_message(&raw) {
                MessageOutcome::Reply(message) => {
                    if outbound.send(message).is_err() {
                        break Ok(());
                    }
                }
                MessageOutcome::Dispatch(chunk) => match queue.try_send(chunk) {
                    Ok(()) => {}
                    Err(TrySendError::Full(chunk)) => {
                        warn!(
                            "Session {}: {} chunks already waiting, dropping chunk #{}",
                            self.label, self.max_pending_chunks, chunk.sequence
                        );
                    }
                    // Dispatcher stops once nobody listens for results
                    Err(TrySendError::Closed(_)) => break Ok(()),
                },
                MessageOutcome::Ignored => {}
            }
        };

        if let Err(e) = &outcome {
            warn!("Session {}: {}", self.label, e);
        }

        self.transition(SessionState::Closing);
        drop(queue);
        dispatcher.abort();
        self.transition(SessionState::Closed);

        outcome
    }

    fn transition(&mut self, next: SessionState) {
        info!("Session {} {} -> {}", self.label, self.state, next);
        self.state = next;
    }

    fn spawn_dispatcher(
        &self,
        outbound: UnboundedSender<OutboundMessage>,
    ) -> (Sender<PendingChunk>, JoinHandle<()>) {
        let (queue, pending) = mpsc::channel(self.max_pending_chunks);
        let handle = tokio::spawn(dispatch_chunks(
            self.label.clone(),
            self.pool.clone(),
            Arc::clone(&self.targets),
            pending,
            outbound,
        ));
        (queue, handle)
    }
}

/// Translate queued chunks one at a time, emitting results in queue order
async fn dispatch_chunks(
    label: String,
    pool: TranslationPool,
    targets: Arc<SupportedTargets>,
    mut pending: Receiver<PendingChunk>,
    outbound: UnboundedSender<OutboundMessage>,
) {
    while let Some(chunk) = pending.recv().await {
        let start_time = Instant::now();
        match pool.translate(&chunk.source, &chunk.targets).await {
            Ok(translations) => {
                debug!(
                    "Session {}: chunk #{} translated in {:?}",
                    label,
                    chunk.sequence,
                    start_time.elapsed()
                );
                let message = OutboundMessage::Result {
                    source: chunk.source,
                    translations: targets.to_display_map(&translations),
                };
                if outbound.send(message).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!(
                    "Session {}: translation failed for chunk #{}, skipping: {}",
                    label, chunk.sequence, e
                );
            }
        }
    }
}
