//! Stats command: aggregate statistics over a reporting period.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use bt_core::{PeriodStats, StatsPeriod, TimeWindow, aggregate, normalize, reconstruct};
use bt_db::Database;

use crate::commands::util::{format_clock, format_duration};

/// Fetch margin before the window start, so a bout already running when the
/// window opens is still reconstructed and clipped instead of invisible.
/// Two days comfortably covers any plausible sleep.
const LOOKBACK_MS: i64 = 2 * 86_400_000;

/// JSON payload for `--json` output.
#[derive(Debug, Serialize)]
struct StatsReport<'a> {
    period: &'a str,
    window: TimeWindow,
    stats: PeriodStats,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    period: StatsPeriod,
    json: bool,
    now_ms: i64,
) -> Result<()> {
    let window = period.window_ending_at(now_ms);
    let events = normalize(db.events_in_range(window.start_ms - LOOKBACK_MS, now_ms + 1)?);
    let derived = reconstruct(&events);
    let stats = aggregate(&derived, window, now_ms);

    if json {
        let report = StatsReport {
            period: period.as_str(),
            window,
            stats,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());
        writeln!(
            writer,
            "STATS: {period} ({} \u{2192} {}, {timezone})",
            format_clock(window.start_ms),
            format_clock(window.end_ms),
        )?;
        writeln!(writer)?;
        write!(writer, "{}", format_stats_body(&stats))?;
    }

    Ok(())
}

/// The period-independent part of the human-readable report.
fn format_stats_body(stats: &PeriodStats) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    writeln!(
        out,
        "Sleep    total {}   bouts {}   avg {}",
        format_duration(stats.sleep_total_ms),
        stats.sleep_count,
        format_duration(stats.sleep_avg_ms),
    )
    .unwrap();
    writeln!(
        out,
        "Feeds    left {}x ({})   right {}x ({})",
        stats.feed_left_count,
        format_duration(stats.feed_left_total_ms),
        stats.feed_right_count,
        format_duration(stats.feed_right_total_ms),
    )
    .unwrap();
    writeln!(
        out,
        "Diapers  pee {}   poop {}",
        stats.pee_count, stats.poop_count
    )
    .unwrap();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use bt_core::ActivityKind;
    use bt_core::Side;
    use insta::assert_snapshot;

    const MIN: i64 = 60_000;
    const HOUR: i64 = 60 * MIN;

    #[test]
    fn body_formatting() {
        let stats = PeriodStats {
            sleep_total_ms: 11 * HOUR + 20 * MIN,
            sleep_count: 5,
            sleep_avg_ms: 2 * HOUR + 16 * MIN,
            feed_left_total_ms: HOUR + 5 * MIN,
            feed_left_count: 4,
            feed_right_total_ms: 48 * MIN,
            feed_right_count: 3,
            pee_count: 6,
            poop_count: 2,
        };
        assert_snapshot!(format_stats_body(&stats), @r"
        Sleep    total 11h 20m   bouts 5   avg 2h 16m
        Feeds    left 4x (1h 5m)   right 3x (48m)
        Diapers  pee 6   poop 2
        ");
    }

    #[test]
    fn zero_stats_render_without_nans() {
        let body = format_stats_body(&PeriodStats::default());
        assert!(body.contains("total 0m"));
        assert!(body.contains("avg 0m"));
    }

    #[test]
    fn json_report_includes_window_and_counts() {
        let db = Database::open_in_memory().unwrap();
        let now = 30 * 86_400_000;
        db.insert_event(ActivityKind::Sleep, now - 2 * HOUR, None)
            .unwrap();
        db.insert_event(ActivityKind::Wake, now - HOUR, None).unwrap();
        db.insert_event(ActivityKind::FeedStart(Side::Left), now - 30 * MIN, None)
            .unwrap();

        let mut buffer = Vec::new();
        run(&mut buffer, &db, StatsPeriod::Day, true, now).unwrap();
        let report: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(report["period"], "day");
        assert_eq!(report["window"]["end_ms"], now);
        assert_eq!(report["stats"]["sleep_total_ms"], HOUR);
        assert_eq!(report["stats"]["sleep_count"], 1);
        // The open feed runs to now.
        assert_eq!(report["stats"]["feed_left_total_ms"], 30 * MIN);
        assert_eq!(report["stats"]["feed_left_count"], 1);
    }

    #[test]
    fn bout_started_before_window_is_clipped_in() {
        let db = Database::open_in_memory().unwrap();
        let now = 30 * 86_400_000;
        // Sleep started 90 minutes before the hour window opens.
        db.insert_event(ActivityKind::Sleep, now - HOUR - 90 * MIN, None)
            .unwrap();

        let mut buffer = Vec::new();
        run(&mut buffer, &db, StatsPeriod::Hour, true, now).unwrap();
        let report: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(report["stats"]["sleep_total_ms"], HOUR);
        assert_eq!(report["stats"]["sleep_count"], 0);
    }
}
