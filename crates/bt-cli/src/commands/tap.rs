//! Tap command: the one-button remote.

use std::io::Write;

use anyhow::Result;

use bt_core::ActivityKind;
use bt_db::Database;

use crate::commands::util::format_clock;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    kind: ActivityKind,
    author: Option<&str>,
    now_ms: i64,
) -> Result<()> {
    let written = db.record_tap(kind, now_ms, author)?;
    for event in &written {
        writeln!(
            writer,
            "Recorded {} at {}",
            event.kind,
            format_clock(event.timestamp_ms)
        )?;
    }
    Ok(())
}
