//! Period statistics over reconstructed sessions and point events.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::localtime::{local_date_of, local_midnight_ms, week_monday};
use crate::session::{Derived, PointKind, SessionKind};

/// A half-open time interval `[start_ms, end_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeWindow {
    #[must_use]
    pub const fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Whether the instant falls inside the window.
    #[must_use]
    pub const fn contains(&self, timestamp_ms: i64) -> bool {
        timestamp_ms >= self.start_ms && timestamp_ms < self.end_ms
    }

    /// Length of the intersection between `[start_ms, end_ms)` and this
    /// window; zero when they do not overlap.
    #[must_use]
    pub fn overlap_ms(&self, start_ms: i64, end_ms: i64) -> i64 {
        let clipped_start = start_ms.max(self.start_ms);
        let clipped_end = end_ms.min(self.end_ms);
        (clipped_end - clipped_start).max(0)
    }
}

/// Predefined reporting periods, all ending at the evaluation instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsPeriod {
    /// The last 60 minutes.
    Hour,
    /// The last 24 hours.
    Day,
    /// The last 48 hours.
    Days2,
    /// The last 7 days.
    Week,
    /// Since the most recent Monday 00:00 local time.
    ThisWeek,
}

impl StatsPeriod {
    pub const ALL: [Self; 5] = [
        Self::Hour,
        Self::Day,
        Self::Days2,
        Self::Week,
        Self::ThisWeek,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Days2 => "days2",
            Self::Week => "week",
            Self::ThisWeek => "thisweek",
        }
    }

    /// Resolves the period to a concrete window ending at `now_ms`.
    #[must_use]
    pub fn window_ending_at(self, now_ms: i64) -> TimeWindow {
        const HOUR_MS: i64 = 3_600_000;
        const DAY_MS: i64 = 24 * HOUR_MS;
        let start_ms = match self {
            Self::Hour => now_ms - HOUR_MS,
            Self::Day => now_ms - DAY_MS,
            Self::Days2 => now_ms - 2 * DAY_MS,
            Self::Week => now_ms - 7 * DAY_MS,
            Self::ThisWeek => local_midnight_ms(week_monday(local_date_of(now_ms))),
        };
        TimeWindow::new(start_ms, now_ms)
    }
}

impl fmt::Display for StatsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatsPeriod {
    type Err = UnknownPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "days2" => Ok(Self::Days2),
            "week" => Ok(Self::Week),
            "thisweek" => Ok(Self::ThisWeek),
            _ => Err(UnknownPeriod(s.to_string())),
        }
    }
}

/// Error type for unknown period names.
#[derive(Debug, Clone)]
pub struct UnknownPeriod(String);

impl fmt::Display for UnknownPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown period: {} (expected one of", self.0)?;
        for period in StatsPeriod::ALL {
            write!(f, " {period}")?;
        }
        write!(f, ")")
    }
}

impl std::error::Error for UnknownPeriod {}

/// Aggregate statistics for one window. All fields are plain numbers so the
/// struct serializes directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodStats {
    pub sleep_total_ms: i64,
    pub sleep_count: u32,
    pub sleep_avg_ms: i64,
    pub feed_left_total_ms: i64,
    pub feed_left_count: u32,
    pub feed_right_total_ms: i64,
    pub feed_right_count: u32,
    pub pee_count: u32,
    pub poop_count: u32,
}

/// Computes statistics for `window`, resolving open sessions against
/// `now_ms`.
///
/// Sessions are clipped to the window: the part of a bout inside the window
/// contributes to the duration totals, but a bout only counts toward its
/// `*_count` when it *started* inside the window. A bout overlapping in from
/// before the window therefore adds time without inflating the count, and
/// the same bout is never counted twice across adjacent windows.
#[must_use]
pub fn aggregate(derived: &Derived, window: TimeWindow, now_ms: i64) -> PeriodStats {
    let mut stats = PeriodStats::default();

    for session in &derived.sessions {
        let end_ms = session.end_ms.unwrap_or(now_ms);
        let clipped_ms = window.overlap_ms(session.start_ms, end_ms);
        let counted = window.contains(session.start_ms);
        match session.kind {
            SessionKind::Sleep => {
                stats.sleep_total_ms += clipped_ms;
                stats.sleep_count += u32::from(counted);
            }
            SessionKind::FeedLeft => {
                stats.feed_left_total_ms += clipped_ms;
                stats.feed_left_count += u32::from(counted);
            }
            SessionKind::FeedRight => {
                stats.feed_right_total_ms += clipped_ms;
                stats.feed_right_count += u32::from(counted);
            }
        }
    }

    for point in &derived.points {
        if !window.contains(point.timestamp_ms) {
            continue;
        }
        match point.kind {
            PointKind::Pee => stats.pee_count += 1,
            PointKind::Poop => stats.poop_count += 1,
            PointKind::Cry => {}
        }
    }

    if stats.sleep_count > 0 {
        stats.sleep_avg_ms = stats.sleep_total_ms / i64::from(stats.sleep_count);
    }

    stats
}
