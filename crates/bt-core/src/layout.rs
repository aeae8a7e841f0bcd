//! Positional layout of one calendar day for timeline rendering.
//!
//! Maps reconstructed sessions and point events onto a vertical 24-hour
//! axis: each item gets a column (one per activity family) and offsets
//! expressed as percentages of the 1440-minute day, ready for a renderer to
//! place without further math.

use serde::Serialize;

use crate::session::{Derived, PointKind, SessionKind};

/// Milliseconds in a rendered day.
pub const DAY_MS: i64 = 86_400_000;

/// The vertical lane an item is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutColumn {
    Sleep,
    Pee,
    Poop,
    FeedLeft,
    FeedRight,
    Cry,
}

impl LayoutColumn {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::Pee => "pee",
            Self::Poop => "poop",
            Self::FeedLeft => "feed_left",
            Self::FeedRight => "feed_right",
            Self::Cry => "cry",
        }
    }

    const fn for_session(kind: SessionKind) -> Self {
        match kind {
            SessionKind::Sleep => Self::Sleep,
            SessionKind::FeedLeft => Self::FeedLeft,
            SessionKind::FeedRight => Self::FeedRight,
        }
    }

    const fn for_point(kind: PointKind) -> Self {
        match kind {
            PointKind::Pee => Self::Pee,
            PointKind::Poop => Self::Poop,
            PointKind::Cry => Self::Cry,
        }
    }
}

impl std::fmt::Display for LayoutColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One positioned item on the day axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutItem {
    /// A session slice: vertical extent proportional to its duration within
    /// the day.
    Block {
        column: LayoutColumn,
        start_ms: i64,
        end_ms: i64,
        start_pct: f64,
        height_pct: f64,
        /// Still running at the evaluation instant, which falls on this day.
        ongoing: bool,
    },
    /// A momentary event: a single position on the axis.
    Marker {
        column: LayoutColumn,
        timestamp_ms: i64,
        position_pct: f64,
    },
}

impl LayoutItem {
    /// Vertical sort key: where the item starts on the day axis.
    #[must_use]
    pub const fn axis_ms(&self) -> i64 {
        match self {
            Self::Block { start_ms, .. } => *start_ms,
            Self::Marker { timestamp_ms, .. } => *timestamp_ms,
        }
    }
}

/// Lays out the day `[day_start_ms, day_start_ms + 24h)`.
///
/// Open sessions run to `now_ms` before clipping, so a bout crossing
/// midnight shows up on both days: clipped to midnight on the first
/// (`ongoing: false` there, the day is over) and from midnight on the day
/// that actually contains `now_ms`, where it is flagged `ongoing`. Items
/// come back sorted by vertical position.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn layout_day(derived: &Derived, day_start_ms: i64, now_ms: i64) -> Vec<LayoutItem> {
    let day_end_ms = day_start_ms + DAY_MS;
    let pct_of_day = |ms: i64| (ms - day_start_ms) as f64 / DAY_MS as f64 * 100.0;
    let mut items = Vec::new();

    for session in &derived.sessions {
        let effective_end_ms = session.end_ms.unwrap_or(now_ms);
        let clipped_start = session.start_ms.max(day_start_ms);
        let clipped_end = effective_end_ms.min(day_end_ms);
        if clipped_end <= clipped_start {
            continue;
        }
        let ongoing = session.is_open() && now_ms >= day_start_ms && now_ms < day_end_ms;
        items.push(LayoutItem::Block {
            column: LayoutColumn::for_session(session.kind),
            start_ms: clipped_start,
            end_ms: clipped_end,
            start_pct: pct_of_day(clipped_start),
            height_pct: pct_of_day(clipped_end) - pct_of_day(clipped_start),
            ongoing,
        });
    }

    for point in &derived.points {
        if point.timestamp_ms < day_start_ms || point.timestamp_ms >= day_end_ms {
            continue;
        }
        items.push(LayoutItem::Marker {
            column: LayoutColumn::for_point(point.kind),
            timestamp_ms: point.timestamp_ms,
            position_pct: pct_of_day(point.timestamp_ms),
        });
    }

    items.sort_by_key(LayoutItem::axis_ms);
    items
}
