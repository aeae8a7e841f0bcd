//! Edit commands: delete, retype and reschedule logged events.

use std::io::Write;

use anyhow::Result;

use bt_core::ActivityKind;
use bt_db::Database;

pub fn delete<W: Write>(writer: &mut W, db: &Database, at_ms: i64) -> Result<()> {
    let removed = db.delete_at(at_ms)?;
    report(writer, removed, "Deleted", at_ms)
}

pub fn retype<W: Write>(
    writer: &mut W,
    db: &Database,
    at_ms: i64,
    new_kind: ActivityKind,
) -> Result<()> {
    let changed = db.retype_at(at_ms, new_kind)?;
    report(writer, changed, "Retyped", at_ms)
}

pub fn reschedule<W: Write>(writer: &mut W, db: &Database, at_ms: i64, to_ms: i64) -> Result<()> {
    let moved = db.change_timestamp(at_ms, to_ms)?;
    report(writer, moved, "Rescheduled", at_ms)
}

fn report<W: Write>(writer: &mut W, count: usize, verb: &str, at_ms: i64) -> Result<()> {
    if count == 0 {
        writeln!(writer, "No events at {at_ms}.")?;
    } else {
        writeln!(writer, "{verb} {count} event(s) at {at_ms}.")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_reports_misses() {
        let db = Database::open_in_memory().unwrap();
        let mut buffer = Vec::new();
        delete(&mut buffer, &db, 1_000).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "No events at 1000.\n");
    }

    #[test]
    fn retype_then_reschedule() {
        let db = Database::open_in_memory().unwrap();
        db.insert_event(ActivityKind::Pee, 1_000, None).unwrap();

        let mut buffer = Vec::new();
        retype(&mut buffer, &db, 1_000, ActivityKind::Poop).unwrap();
        reschedule(&mut buffer, &db, 1_000, 5_000).unwrap();

        let events = db.events_in_range(0, 10_000).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ActivityKind::Poop);
        assert_eq!(events[0].timestamp_ms, 5_000);
    }
}
