//! Day command: positional timeline for one calendar day.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use bt_core::{DAY_MS, LayoutItem, layout_day, normalize, reconstruct};
use bt_core::localtime::{local_date_of, local_midnight_ms};
use bt_db::Database;

use crate::cache::{DayCache, prefetch_order};
use crate::commands::util::{format_clock, format_duration};

/// Fetch margin before local midnight, so a bout that started the previous
/// evening and ran past midnight still shows up from 00:00.
const LOOKBACK_MS: i64 = 2 * DAY_MS;

/// JSON payload for `--json` output.
#[derive(Debug, Serialize)]
struct DayReport {
    date: NaiveDate,
    items: Vec<LayoutItem>,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    date: Option<NaiveDate>,
    json: bool,
    now_ms: i64,
) -> Result<()> {
    let today = local_date_of(now_ms);
    let date = date.unwrap_or(today);

    // Warm the viewed day and its neighbors in priority order, the way the
    // interactive calendar prefetches while flipping through days.
    let mut cache = DayCache::new();
    for day in prefetch_order(date, today) {
        if cache.is_loaded(day) {
            continue;
        }
        let day_start_ms = local_midnight_ms(day);
        let events = db.events_in_range(day_start_ms - LOOKBACK_MS, day_start_ms + DAY_MS)?;
        cache.insert(day, events);
    }

    let events = normalize(cache.get(date).map_or_else(Vec::new, <[_]>::to_vec));
    let derived = reconstruct(&events);
    let items = layout_day(&derived, local_midnight_ms(date), now_ms);

    if json {
        let report = DayReport { date, items };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    writeln!(writer, "TIMELINE: {date}")?;
    writeln!(writer)?;
    if items.is_empty() {
        writeln!(writer, "No events.")?;
        return Ok(());
    }
    for item in &items {
        writeln!(writer, "{}", format_item(item))?;
    }
    Ok(())
}

fn format_item(item: &LayoutItem) -> String {
    match item {
        LayoutItem::Block {
            column,
            start_ms,
            end_ms,
            start_pct,
            height_pct,
            ongoing,
        } => {
            let suffix = if *ongoing { "  (ongoing)" } else { "" };
            format!(
                "{}-{}  {:<10} {:>7}  [{:.1}% +{:.1}%]{suffix}",
                format_clock(*start_ms),
                format_clock(*end_ms),
                column.as_str(),
                format_duration(end_ms - start_ms),
                start_pct,
                height_pct,
            )
        }
        LayoutItem::Marker {
            column,
            timestamp_ms,
            position_pct,
        } => format!(
            "{}        {:<10}          [{:.1}%]",
            format_clock(*timestamp_ms),
            column.as_str(),
            position_pct,
        ),
    }
}
