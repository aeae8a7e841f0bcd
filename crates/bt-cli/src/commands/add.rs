//! Add command: backfill an event, optionally with a duration.

use std::io::Write;

use anyhow::{Result, bail};

use bt_core::ActivityKind;
use bt_db::Database;

use crate::commands::util::format_clock;

#[allow(clippy::too_many_arguments)]
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    kind: ActivityKind,
    ago_minutes: Option<i64>,
    at_ms: Option<i64>,
    duration_minutes: Option<i64>,
    author: Option<&str>,
    now_ms: i64,
) -> Result<()> {
    let timestamp_ms = at_ms.unwrap_or_else(|| now_ms - ago_minutes.unwrap_or(0) * 60_000);

    // Resolve the closing event up front so nothing is written on bad input.
    let closing = match duration_minutes {
        None => None,
        Some(minutes) => {
            let closing_kind = match kind {
                ActivityKind::Sleep => ActivityKind::Wake,
                ActivityKind::FeedStart(side) => ActivityKind::FeedStop(side),
                _ => bail!("--duration only applies to sleep or a feed start, not {kind}"),
            };
            Some((closing_kind, timestamp_ms + minutes * 60_000))
        }
    };

    let event = db.insert_event(kind, timestamp_ms, author)?;
    writeln!(
        writer,
        "Recorded {} at {}",
        event.kind,
        format_clock(event.timestamp_ms)
    )?;

    if let Some((closing_kind, closing_ms)) = closing {
        let event = db.insert_event(closing_kind, closing_ms, author)?;
        writeln!(
            writer,
            "Recorded {} at {}",
            event.kind,
            format_clock(event.timestamp_ms)
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use bt_core::Side;

    #[test]
    fn add_with_duration_writes_the_closing_event() {
        let db = Database::open_in_memory().unwrap();
        let now = 86_400_000;
        let mut buffer = Vec::new();
        run(
            &mut buffer,
            &db,
            ActivityKind::FeedStart(Side::Left),
            Some(20),
            None,
            Some(15),
            Some("Mathilde"),
            now,
        )
        .unwrap();

        let events = db.events_in_range(0, now).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, ActivityKind::FeedStart(Side::Left));
        assert_eq!(events[0].timestamp_ms, now - 20 * 60_000);
        assert_eq!(events[1].kind, ActivityKind::FeedStop(Side::Left));
        assert_eq!(events[1].timestamp_ms, now - 5 * 60_000);
    }

    #[test]
    fn duration_on_a_point_event_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let mut buffer = Vec::new();
        let result = run(
            &mut buffer,
            &db,
            ActivityKind::Pee,
            None,
            None,
            Some(5),
            None,
            86_400_000,
        );
        assert!(result.is_err());
        // Nothing was written.
        assert!(db.list_raw(None, None).unwrap().is_empty());
    }

    #[test]
    fn explicit_timestamp_wins() {
        let db = Database::open_in_memory().unwrap();
        let mut buffer = Vec::new();
        run(
            &mut buffer,
            &db,
            ActivityKind::Poop,
            None,
            Some(12_345),
            None,
            None,
            86_400_000,
        )
        .unwrap();
        let events = db.events_in_range(0, 86_400_000).unwrap();
        assert_eq!(events[0].timestamp_ms, 12_345);
    }
}
