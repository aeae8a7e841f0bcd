//! Storage layer for the baby tracker event log.
//!
//! Provides persistence for caregiver-entered events using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but
//! not `Sync`: an instance can move between threads but needs external
//! synchronization to be shared.
//!
//! # Schema
//!
//! Timestamps are stored as INTEGER milliseconds since the Unix epoch, the
//! unit every derivation in `bt-core` works in. The `kind` column stores the
//! activity name string (`sleep`, `leftBoob`, ...); rows whose kind no
//! longer parses are skipped with a warning when reading rather than failing
//! the whole query, so one bad row cannot take down a day view.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use bt_core::{ActivityKind, Event, EventId};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// An event row as stored, before adaptation into the engine's model.
///
/// Keeps fields the engine does not consume (the recording caregiver) and
/// the kind as its raw string, so dumps reproduce the log verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredEvent {
    pub id: String,
    pub timestamp_ms: i64,
    pub kind: String,
    pub author: Option<String>,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                timestamp INTEGER NOT NULL,
                kind TEXT NOT NULL,
                author TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_events_timestamp ON events(timestamp);
            ",
        )?;
        Ok(())
    }

    /// Inserts one event with a fresh UUID, returning it.
    pub fn insert_event(
        &self,
        kind: ActivityKind,
        timestamp_ms: i64,
        author: Option<&str>,
    ) -> Result<Event, DbError> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO events (id, timestamp, kind, author) VALUES (?, ?, ?, ?)",
            params![id, timestamp_ms, kind.as_str(), author],
        )?;
        // The ID is a fresh UUID, never empty.
        let id = EventId::new(id).expect("uuid is non-empty");
        Ok(Event::new(id, kind, timestamp_ms))
    }

    /// Fetches events within `[start_ms, end_ms)`, adapted to the engine's
    /// model and ordered by `(timestamp, id)`.
    pub fn events_in_range(&self, start_ms: i64, end_ms: i64) -> Result<Vec<Event>, DbError> {
        if end_ms <= start_ms {
            return Ok(Vec::new());
        }
        let rows = self.query_stored(
            "SELECT id, timestamp, kind, author FROM events
             WHERE timestamp >= ? AND timestamp < ?
             ORDER BY timestamp ASC, id ASC",
            params![start_ms, end_ms],
        )?;
        Ok(rows.into_iter().filter_map(adapt_row).collect())
    }

    /// Lists raw rows, optionally bounded, ordered by `(timestamp, id)`.
    pub fn list_raw(
        &self,
        after_ms: Option<i64>,
        before_ms: Option<i64>,
    ) -> Result<Vec<StoredEvent>, DbError> {
        self.query_stored(
            "SELECT id, timestamp, kind, author FROM events
             WHERE timestamp >= ? AND timestamp < ?
             ORDER BY timestamp ASC, id ASC",
            params![after_ms.unwrap_or(i64::MIN), before_ms.unwrap_or(i64::MAX)],
        )
    }

    /// The most recent event by timestamp, if any.
    pub fn last_event(&self) -> Result<Option<StoredEvent>, DbError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, timestamp, kind, author FROM events
                 ORDER BY timestamp DESC, id DESC LIMIT 1",
                [],
                |row| {
                    Ok(StoredEvent {
                        id: row.get(0)?,
                        timestamp_ms: row.get(1)?,
                        kind: row.get(2)?,
                        author: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Deletes every event at exactly `timestamp_ms`. Returns the number of
    /// rows removed.
    pub fn delete_at(&self, timestamp_ms: i64) -> Result<usize, DbError> {
        let deleted = self.conn.execute(
            "DELETE FROM events WHERE timestamp = ?",
            params![timestamp_ms],
        )?;
        Ok(deleted)
    }

    /// Rewrites the kind of every event at exactly `timestamp_ms`. Returns
    /// the number of rows changed.
    pub fn retype_at(&self, timestamp_ms: i64, new_kind: ActivityKind) -> Result<usize, DbError> {
        let changed = self.conn.execute(
            "UPDATE events SET kind = ? WHERE timestamp = ?",
            params![new_kind.as_str(), timestamp_ms],
        )?;
        Ok(changed)
    }

    /// Moves events from `old_ms` to `new_ms`. Returns the number of rows
    /// changed.
    pub fn change_timestamp(&self, old_ms: i64, new_ms: i64) -> Result<usize, DbError> {
        let changed = self.conn.execute(
            "UPDATE events SET timestamp = ? WHERE timestamp = ?",
            params![new_ms, old_ms],
        )?;
        Ok(changed)
    }

    /// Removes every event.
    pub fn erase_all(&self) -> Result<(), DbError> {
        self.conn.execute("DELETE FROM events", [])?;
        Ok(())
    }

    /// Records a one-button press, applying the toggle rules the tracker's
    /// remote has always had:
    ///
    /// - `sleep` while already asleep records a `wake` instead;
    /// - a feed start while the same side is open records that side's stop;
    /// - feeding or diaper events arriving while asleep first record a
    ///   `wake` one second earlier, since the baby is evidently up.
    ///
    /// Returns the events actually written, in insertion order.
    pub fn record_tap(
        &self,
        kind: ActivityKind,
        now_ms: i64,
        author: Option<&str>,
    ) -> Result<Vec<Event>, DbError> {
        let last_kind = self
            .last_event()?
            .and_then(|event| event.kind.parse::<ActivityKind>().ok());

        let mut action = kind;
        match (kind, last_kind) {
            (ActivityKind::Sleep, Some(ActivityKind::Sleep)) => {
                action = ActivityKind::Wake;
            }
            (ActivityKind::FeedStart(side), Some(ActivityKind::FeedStart(last_side)))
                if side == last_side =>
            {
                action = ActivityKind::FeedStop(side);
            }
            _ => {}
        }

        let wake_first = matches!(
            action,
            ActivityKind::Pee | ActivityKind::Poop | ActivityKind::FeedStart(_)
        ) && last_kind == Some(ActivityKind::Sleep);

        let mut written = Vec::new();
        if wake_first {
            written.push(self.insert_event(ActivityKind::Wake, now_ms - 1_000, author)?);
        }
        written.push(self.insert_event(action, now_ms, author)?);
        Ok(written)
    }

    fn query_stored(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<StoredEvent>, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok(StoredEvent {
                id: row.get(0)?,
                timestamp_ms: row.get(1)?,
                kind: row.get(2)?,
                author: row.get(3)?,
            })
        })?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }
}

/// Adapts a stored row into the engine's event model.
///
/// Rows with an unknown kind or an empty ID are dropped with a warning, per
/// the reject-the-event-not-the-batch rule.
fn adapt_row(row: StoredEvent) -> Option<Event> {
    let kind = match row.kind.parse::<ActivityKind>() {
        Ok(kind) => kind,
        Err(err) => {
            tracing::warn!(id = %row.id, %err, "skipping event with unknown kind");
            return None;
        }
    };
    let id = match EventId::new(row.id.clone()) {
        Ok(id) => id,
        Err(err) => {
            tracing::warn!(timestamp_ms = row.timestamp_ms, %err, "skipping event with bad id");
            return None;
        }
    };
    Some(Event::new(id, kind, row.timestamp_ms))
}
