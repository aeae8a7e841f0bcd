//! Current-state projection from the raw event log.

use serde::Serialize;

use crate::activity::{ActivityKind, Side};
use crate::event::Event;

/// The baby's current logical state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BabyState {
    /// Awake and not feeding (also the state of an empty log).
    Idle,
    Asleep,
    FeedingLeft,
    FeedingRight,
}

impl BabyState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Asleep => "asleep",
            Self::FeedingLeft => "feeding_left",
            Self::FeedingRight => "feeding_right",
        }
    }
}

impl std::fmt::Display for BabyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current state plus the event that established it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub state: BabyState,
    /// Timestamp of the state-determining event; `None` when no sleep, wake
    /// or feeding event exists in the log.
    pub since_ms: Option<i64>,
}

/// Projects the current state from sorted events.
///
/// Feeding takes priority over sleep: an unmatched `FeedStart` that is at
/// least as recent as the last `Sleep`/`Wake` means the baby is at the
/// breast, whatever the sleep log says. Diaper and cry events are momentary
/// and never establish a state.
#[must_use]
pub fn current_state(events: &[Event]) -> StateSnapshot {
    // (asleep?, timestamp) of the most recent sleep/wake event.
    let mut sleep_wake: Option<(bool, i64)> = None;
    // Most recent unmatched feed start per side.
    let mut open_feed: [Option<i64>; 2] = [None, None];

    for event in events {
        let ts = event.timestamp_ms;
        match event.kind {
            ActivityKind::Sleep => sleep_wake = Some((true, ts)),
            ActivityKind::Wake => sleep_wake = Some((false, ts)),
            ActivityKind::FeedStart(side) => open_feed[slot(side)] = Some(ts),
            ActivityKind::FeedStop(side) => open_feed[slot(side)] = None,
            ActivityKind::Pee | ActivityKind::Poop | ActivityKind::Cry => {}
        }
    }

    // Later start wins between the two sides; exact ties keep left.
    let feeding = match (open_feed[0], open_feed[1]) {
        (Some(l), Some(r)) if r > l => Some((Side::Right, r)),
        (Some(l), _) => Some((Side::Left, l)),
        (None, Some(r)) => Some((Side::Right, r)),
        (None, None) => None,
    };

    if let Some((side, feed_ts)) = feeding {
        let feeding_wins = sleep_wake.is_none_or(|(_, sw_ts)| feed_ts >= sw_ts);
        if feeding_wins {
            let state = match side {
                Side::Left => BabyState::FeedingLeft,
                Side::Right => BabyState::FeedingRight,
            };
            return StateSnapshot {
                state,
                since_ms: Some(feed_ts),
            };
        }
    }

    match sleep_wake {
        Some((true, ts)) => StateSnapshot {
            state: BabyState::Asleep,
            since_ms: Some(ts),
        },
        Some((false, ts)) => StateSnapshot {
            state: BabyState::Idle,
            since_ms: Some(ts),
        },
        None => StateSnapshot {
            state: BabyState::Idle,
            since_ms: None,
        },
    }
}

const fn slot(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}
