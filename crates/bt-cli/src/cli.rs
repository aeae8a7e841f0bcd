//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use bt_core::{ActivityKind, StatsPeriod};

/// Baby activity tracker.
///
/// Records caregiver-entered events (sleep, feeding, diapers, crying) and
/// derives the current state, per-period statistics and a daily timeline
/// from the log.
#[derive(Debug, Parser)]
#[command(name = "bt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the baby's current state.
    Status,

    /// Show aggregate statistics for a period.
    Stats {
        /// Period: hour, day, days2, week or thisweek.
        #[arg(long, default_value = "day")]
        period: StatsPeriod,

        /// Output as JSON instead of human-readable text.
        #[arg(long)]
        json: bool,
    },

    /// Show the timeline for one calendar day.
    Day {
        /// Local date (YYYY-MM-DD). Defaults to today.
        date: Option<NaiveDate>,

        /// Output as JSON instead of human-readable text.
        #[arg(long)]
        json: bool,
    },

    /// Record an activity right now, with the one-button toggle rules
    /// (a second `sleep` means wake, a second same-side feed means stop).
    Tap {
        /// Activity name: sleep, wake, pee, poop, crying, leftBoob,
        /// rightBoob, leftBoobStop, rightBoobStop.
        kind: ActivityKind,

        /// Caregiver recording the event.
        #[arg(long)]
        author: Option<String>,
    },

    /// Backfill an activity at a chosen time.
    Add {
        /// Activity name (see `tap`).
        kind: ActivityKind,

        /// How many minutes ago the activity happened.
        #[arg(long, conflicts_with = "at")]
        ago: Option<i64>,

        /// Exact timestamp, milliseconds since the Unix epoch.
        #[arg(long)]
        at: Option<i64>,

        /// Also write the matching closing event this many minutes later
        /// (sleep gets a wake, a feed start gets its stop).
        #[arg(long)]
        duration: Option<i64>,

        /// Caregiver recording the event.
        #[arg(long)]
        author: Option<String>,
    },

    /// Dump raw events as JSONL.
    Events {
        /// Only events at or after this timestamp (epoch milliseconds).
        #[arg(long)]
        after: Option<i64>,

        /// Only events before this timestamp (epoch milliseconds).
        #[arg(long)]
        before: Option<i64>,
    },

    /// Delete the events recorded at a timestamp.
    Delete {
        /// Timestamp, milliseconds since the Unix epoch.
        #[arg(long)]
        at: i64,
    },

    /// Change the kind of the events recorded at a timestamp.
    Retype {
        /// Timestamp, milliseconds since the Unix epoch.
        #[arg(long)]
        at: i64,

        /// New activity name (see `tap`).
        kind: ActivityKind,
    },

    /// Move the events recorded at a timestamp to another instant.
    Reschedule {
        /// Current timestamp, milliseconds since the Unix epoch.
        #[arg(long)]
        at: i64,

        /// New timestamp, milliseconds since the Unix epoch.
        #[arg(long)]
        to: i64,
    },
}
