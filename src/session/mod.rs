/*!
 * Caption session module.
 *
 * This module provides:
 * - Wire models for inbound caption updates and outbound results
 * - The per-connection `SessionCoordinator` and its ordered translation dispatch
 */

pub mod coordinator;
pub mod models;

// Re-export main types
pub use coordinator::{MessageOutcome, SessionCoordinator};
pub use models::{CaptionUpdate, OutboundMessage, PendingChunk, SessionState};
