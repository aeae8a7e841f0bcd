//! Events command for dumping the raw log.
//!
//! Outputs rows as JSONL for debugging and ad-hoc processing, including
//! rows whose kind the engine no longer understands.

use std::io::Write;

use anyhow::Result;

use bt_db::Database;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    after_ms: Option<i64>,
    before_ms: Option<i64>,
) -> Result<()> {
    for event in db.list_raw(after_ms, before_ms)? {
        writeln!(writer, "{}", serde_json::to_string(&event)?)?;
    }
    Ok(())
}
