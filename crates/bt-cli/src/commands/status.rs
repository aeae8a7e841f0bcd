//! Status command: the baby's current state.

use std::io::Write;

use anyhow::Result;

use bt_core::{current_state, normalize};
use bt_db::Database;

use crate::commands::util::{format_clock, format_duration};

/// How far back to look for state-determining events. The home view has
/// always derived state from the last 24 hours of the log.
const STATE_WINDOW_MS: i64 = 24 * 3_600_000;

pub fn run<W: Write>(writer: &mut W, db: &Database, now_ms: i64) -> Result<()> {
    let events = normalize(db.events_in_range(now_ms - STATE_WINDOW_MS, now_ms + 1)?);
    let snapshot = current_state(&events);

    writeln!(writer, "State: {}", snapshot.state)?;
    if let Some(since_ms) = snapshot.since_ms {
        writeln!(
            writer,
            "Since: {} ({} ago)",
            format_clock(since_ms),
            format_duration(now_ms - since_ms)
        )?;
    } else {
        writeln!(writer, "No sleep or feeding event in the last 24 hours.")?;
    }

    Ok(())
}
