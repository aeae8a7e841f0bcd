//! Raw caregiver-entered events from the log collaborator.

use serde::{Deserialize, Serialize};

use crate::activity::ActivityKind;
use crate::types::EventId;

/// A single timestamped entry in the event log.
///
/// Events are immutable: editing or deleting one is the log collaborator's
/// business and surfaces here as a different collection to re-derive from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier for this event.
    pub id: EventId,
    /// What happened.
    pub kind: ActivityKind,
    /// When it happened, in milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
}

impl Event {
    /// Convenience constructor.
    pub fn new(id: EventId, kind: ActivityKind, timestamp_ms: i64) -> Self {
        Self {
            id,
            kind,
            timestamp_ms,
        }
    }
}

/// Sorts events chronologically.
///
/// The log hands events over in arbitrary order; every derivation below
/// assumes ascending timestamps. The sort is stable, so events sharing a
/// timestamp keep their insertion order and derivation stays deterministic.
#[must_use]
pub fn normalize(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by_key(|e| e.timestamp_ms);
    events
}
