//! Session reconstruction from the raw event log.
//!
//! A single forward pass over chronologically sorted events folds start/stop
//! pairs into intervals: sleep bouts between `Sleep` and `Wake`, feeding
//! bouts between `FeedStart` and `FeedStop` per side. Everything downstream
//! (current state, period statistics, the day timeline) consumes the output
//! of this pass.

use serde::Serialize;

use crate::activity::{ActivityKind, Side};
use crate::event::Event;

/// Kind of a reconstructed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Sleep,
    FeedLeft,
    FeedRight,
}

impl SessionKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::FeedLeft => "feed_left",
            Self::FeedRight => "feed_right",
        }
    }

    const fn feed(side: Side) -> Self {
        match side {
            Side::Left => Self::FeedLeft,
            Side::Right => Self::FeedRight,
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reconstructed interval. `end_ms: None` means the session is still open:
/// no matching closing event has been observed in the supplied log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Session {
    pub kind: SessionKind,
    pub start_ms: i64,
    pub end_ms: Option<i64>,
}

impl Session {
    /// Whether the session has no closing event yet.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.end_ms.is_none()
    }

    /// Duration, resolving an open end against `now_ms`.
    #[must_use]
    pub fn duration_ms(&self, now_ms: i64) -> i64 {
        self.end_ms.unwrap_or(now_ms).saturating_sub(self.start_ms)
    }
}

/// Kind of a momentary event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    Pee,
    Poop,
    Cry,
}

/// A momentary event: contributes to counts, never to durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointEvent {
    pub kind: PointKind,
    pub timestamp_ms: i64,
}

/// Everything derived from one pass over the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Derived {
    /// Closed and open sessions, in order of their start event.
    pub sessions: Vec<Session>,
    /// Momentary events, in log order.
    pub points: Vec<PointEvent>,
}

/// Which events close an open sleep bout.
///
/// Historical client revisions disagreed: some treated any activity (a feed,
/// a diaper change) as proof the baby was awake, others required an explicit
/// `Wake`. The choice is encoded here rather than scattered through the
/// fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptionPolicy {
    /// Only `Wake` (or a restarted `Sleep`) closes sleep.
    WakeOnly,
    /// Feeding starts and diaper/cry events also close sleep.
    AnyActivity,
}

/// The policy in effect for all derivations.
pub const INTERRUPTION_POLICY: InterruptionPolicy = InterruptionPolicy::WakeOnly;

/// Folds sorted events into sessions and point events.
///
/// Events must be sorted ascending by timestamp (see
/// [`normalize`](crate::event::normalize)). The fold is total: unmatched
/// stops and wakes are dropped, never errors. A start arriving while the
/// same cursor is already open closes the previous session at the new
/// start's timestamp, so a double `Sleep` or double `FeedStart` reads as two
/// back-to-back sessions rather than being rejected.
#[must_use]
pub fn reconstruct(events: &[Event]) -> Derived {
    reconstruct_with_policy(events, INTERRUPTION_POLICY)
}

/// [`reconstruct`] with an explicit interruption policy.
#[must_use]
pub fn reconstruct_with_policy(events: &[Event], policy: InterruptionPolicy) -> Derived {
    let mut out = Derived::default();
    // Indices into out.sessions so closing mutates in place and output
    // stays ordered by session start.
    let mut open_sleep: Option<usize> = None;
    let mut open_feed: [Option<usize>; 2] = [None, None];

    let feed_slot = |side: Side| match side {
        Side::Left => 0,
        Side::Right => 1,
    };

    for event in events {
        let ts = event.timestamp_ms;
        match event.kind {
            ActivityKind::Sleep => {
                close(&mut out.sessions, &mut open_sleep, ts);
                open_sleep = Some(push_open(&mut out.sessions, SessionKind::Sleep, ts));
            }
            ActivityKind::Wake => {
                if open_sleep.is_none() {
                    tracing::debug!(timestamp_ms = ts, "ignoring wake with no open sleep");
                }
                close(&mut out.sessions, &mut open_sleep, ts);
            }
            ActivityKind::FeedStart(side) => {
                if policy == InterruptionPolicy::AnyActivity {
                    close(&mut out.sessions, &mut open_sleep, ts);
                }
                let slot = feed_slot(side);
                close(&mut out.sessions, &mut open_feed[slot], ts);
                open_feed[slot] = Some(push_open(&mut out.sessions, SessionKind::feed(side), ts));
            }
            ActivityKind::FeedStop(side) => {
                let slot = feed_slot(side);
                if open_feed[slot].is_none() {
                    tracing::debug!(
                        timestamp_ms = ts,
                        side = %side,
                        "ignoring feed stop with no open feed"
                    );
                }
                close(&mut out.sessions, &mut open_feed[slot], ts);
            }
            ActivityKind::Pee | ActivityKind::Poop | ActivityKind::Cry => {
                if policy == InterruptionPolicy::AnyActivity {
                    close(&mut out.sessions, &mut open_sleep, ts);
                }
                let kind = match event.kind {
                    ActivityKind::Pee => PointKind::Pee,
                    ActivityKind::Poop => PointKind::Poop,
                    _ => PointKind::Cry,
                };
                out.points.push(PointEvent {
                    kind,
                    timestamp_ms: ts,
                });
            }
        }
    }

    out
}

/// Closes the session behind `cursor` (if any) at `end_ms`.
fn close(sessions: &mut [Session], cursor: &mut Option<usize>, end_ms: i64) {
    if let Some(idx) = cursor.take() {
        sessions[idx].end_ms = Some(end_ms);
    }
}

fn push_open(sessions: &mut Vec<Session>, kind: SessionKind, start_ms: i64) -> usize {
    sessions.push(Session {
        kind,
        start_ms,
        end_ms: None,
    });
    sessions.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::normalize;
    use crate::types::EventId;

    const MIN: i64 = 60_000;

    fn events(entries: &[(ActivityKind, i64)]) -> Vec<Event> {
        entries.iter()
            .enumerate()
            .map(|(i, &(kind, ts))| Event::new(EventId::new(format!("e{i}")).unwrap(), kind, ts))
            .collect()
    }

    #[test]
    fn sleep_wake_produces_closed_session() {
        // Sleep at 00:00, wake 90 minutes later.
        let derived = reconstruct(&events(&[
            (ActivityKind::Sleep, 0),
            (ActivityKind::Wake, 90 * MIN),
        ]));
        assert_eq!(
            derived.sessions,
            vec![Session {
                kind: SessionKind::Sleep,
                start_ms: 0,
                end_ms: Some(90 * MIN),
            }]
        );
        assert!(derived.points.is_empty());
    }

    #[test]
    fn double_feed_start_closes_then_reopens() {
        let derived = reconstruct(&events(&[
            (ActivityKind::FeedStart(Side::Left), 0),
            (ActivityKind::FeedStart(Side::Left), 5 * MIN),
        ]));
        assert_eq!(derived.sessions.len(), 2);
        assert_eq!(derived.sessions[0].end_ms, Some(5 * MIN));
        assert_eq!(derived.sessions[1].start_ms, 5 * MIN);
        assert!(derived.sessions[1].is_open());
    }

    #[test]
    fn double_sleep_yields_back_to_back_sessions() {
        let derived = reconstruct(&events(&[
            (ActivityKind::Sleep, 0),
            (ActivityKind::Sleep, 10 * MIN),
            (ActivityKind::Wake, 40 * MIN),
        ]));
        assert_eq!(derived.sessions.len(), 2);
        assert_eq!(derived.sessions[0].end_ms, Some(10 * MIN));
        assert_eq!(derived.sessions[1].end_ms, Some(40 * MIN));
    }

    #[test]
    fn orphan_stop_is_dropped() {
        let derived = reconstruct(&events(&[(ActivityKind::FeedStop(Side::Left), 0)]));
        assert!(derived.sessions.is_empty());
        assert!(derived.points.is_empty());
    }

    #[test]
    fn orphan_wake_is_dropped() {
        let derived = reconstruct(&events(&[(ActivityKind::Wake, 0)]));
        assert!(derived.sessions.is_empty());
    }

    #[test]
    fn sides_are_independent() {
        let derived = reconstruct(&events(&[
            (ActivityKind::FeedStart(Side::Left), 0),
            (ActivityKind::FeedStart(Side::Right), 2 * MIN),
            (ActivityKind::FeedStop(Side::Left), 5 * MIN),
        ]));
        assert_eq!(derived.sessions.len(), 2);
        assert_eq!(
            derived.sessions[0],
            Session {
                kind: SessionKind::FeedLeft,
                start_ms: 0,
                end_ms: Some(5 * MIN),
            }
        );
        assert_eq!(derived.sessions[1].kind, SessionKind::FeedRight);
        assert!(derived.sessions[1].is_open());
    }

    #[test]
    fn zero_duration_session_is_valid() {
        let derived = reconstruct(&events(&[
            (ActivityKind::Sleep, 7 * MIN),
            (ActivityKind::Wake, 7 * MIN),
        ]));
        assert_eq!(derived.sessions.len(), 1);
        assert_eq!(derived.sessions[0].duration_ms(100 * MIN), 0);
    }

    #[test]
    fn wake_only_policy_keeps_sleep_through_diaper_events() {
        let derived = reconstruct_with_policy(
            &events(&[
                (ActivityKind::Sleep, 0),
                (ActivityKind::Pee, 10 * MIN),
                (ActivityKind::Poop, 20 * MIN),
                (ActivityKind::Wake, 30 * MIN),
            ]),
            InterruptionPolicy::WakeOnly,
        );
        assert_eq!(derived.sessions.len(), 1);
        assert_eq!(derived.sessions[0].end_ms, Some(30 * MIN));
        assert_eq!(derived.points.len(), 2);
    }

    #[test]
    fn any_activity_policy_interrupts_sleep() {
        let derived = reconstruct_with_policy(
            &events(&[
                (ActivityKind::Sleep, 0),
                (ActivityKind::FeedStart(Side::Left), 30 * MIN),
                (ActivityKind::FeedStop(Side::Left), 45 * MIN),
            ]),
            InterruptionPolicy::AnyActivity,
        );
        let sleep: Vec<_> = derived
            .sessions
            .iter()
            .filter(|s| s.kind == SessionKind::Sleep)
            .collect();
        assert_eq!(sleep.len(), 1);
        assert_eq!(sleep[0].end_ms, Some(30 * MIN));
    }

    #[test]
    fn open_cursor_becomes_open_session() {
        let derived = reconstruct(&events(&[(ActivityKind::Sleep, 0)]));
        assert_eq!(derived.sessions.len(), 1);
        assert!(derived.sessions[0].is_open());
        assert_eq!(derived.sessions[0].duration_ms(120 * MIN), 120 * MIN);
    }

    #[test]
    fn derivation_is_order_independent() {
        let base = events(&[
            (ActivityKind::Sleep, 0),
            (ActivityKind::Pee, 10 * MIN),
            (ActivityKind::Wake, 30 * MIN),
            (ActivityKind::FeedStart(Side::Right), 40 * MIN),
            (ActivityKind::FeedStop(Side::Right), 55 * MIN),
            (ActivityKind::Cry, 60 * MIN),
        ]);
        let reference = reconstruct(&normalize(base.clone()));

        // A few hand-picked permutations; normalize restores order.
        for rotation in 1..base.len() {
            let mut shuffled = base.clone();
            shuffled.rotate_left(rotation);
            let derived = reconstruct(&normalize(shuffled));
            assert_eq!(derived, reference, "rotation {rotation} diverged");
        }
        let mut reversed = base;
        reversed.reverse();
        assert_eq!(reconstruct(&normalize(reversed)), reference);
    }

    #[test]
    fn rederivation_is_idempotent() {
        let input = events(&[
            (ActivityKind::Sleep, 0),
            (ActivityKind::Wake, 15 * MIN),
            (ActivityKind::FeedStart(Side::Left), 20 * MIN),
        ]);
        assert_eq!(reconstruct(&input), reconstruct(&input));
    }
}
