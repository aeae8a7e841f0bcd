//! Core derivation engine for the baby tracker.
//!
//! Turns the raw, unordered event log into derived views:
//! - Session reconstruction: sleep and feeding bouts folded from start/stop
//!   events, including still-open bouts
//! - Current state: asleep / feeding / idle, with feeding taking precedence
//! - Period statistics: counts, totals and averages over arbitrary windows
//! - Day layout: per-day positional coordinates for timeline rendering
//!
//! Everything here is a pure function of the supplied event collection; the
//! engine holds no state between calls and owns no I/O.

pub mod activity;
pub mod event;
pub mod layout;
pub mod localtime;
pub mod session;
pub mod state;
pub mod stats;
mod types;

pub use activity::{ActivityKind, Side, UnknownActivity};
pub use event::{Event, normalize};
pub use layout::{DAY_MS, LayoutColumn, LayoutItem, layout_day};
pub use session::{
    Derived, INTERRUPTION_POLICY, InterruptionPolicy, PointEvent, PointKind, Session, SessionKind,
    reconstruct, reconstruct_with_policy,
};
pub use state::{BabyState, StateSnapshot, current_state};
pub use stats::{PeriodStats, StatsPeriod, TimeWindow, UnknownPeriod, aggregate};
pub use types::{EventId, ValidationError};
