//! Caller-side cache of per-day event snapshots.
//!
//! The engine recomputes everything from whatever snapshot it is handed, so
//! the only caching worth doing lives on the fetch side: remember which days
//! have been loaded (an empty day is loaded too, just empty) and load
//! neighbors in a fixed priority order so flipping between days stays cheap.
//! A later fetch for the same day simply overwrites the entry; there is no
//! merging.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use bt_core::Event;

/// Per-day event snapshots. A missing key means the day was never loaded;
/// an empty vector means it was loaded and holds no events.
#[derive(Debug, Default)]
pub struct DayCache {
    days: HashMap<NaiveDate, Vec<Event>>,
}

impl DayCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached snapshot for `day`, or `None` when it was never loaded.
    #[must_use]
    pub fn get(&self, day: NaiveDate) -> Option<&[Event]> {
        self.days.get(&day).map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_loaded(&self, day: NaiveDate) -> bool {
        self.days.contains_key(&day)
    }

    /// Stores a snapshot, replacing any previous one for the day.
    pub fn insert(&mut self, day: NaiveDate, events: Vec<Event>) {
        self.days.insert(day, events);
    }
}

/// The order in which days should be fetched when `day` is viewed: the day
/// itself, then the previous day, then the next day - but never a day in the
/// future, there is nothing there yet.
#[must_use]
pub fn prefetch_order(day: NaiveDate, today: NaiveDate) -> Vec<NaiveDate> {
    let mut order = vec![day, day - Duration::days(1)];
    let next = day + Duration::days(1);
    if next <= today {
        order.push(next);
    }
    order
}
