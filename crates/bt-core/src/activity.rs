//! Activity kind enum as the single source of truth for event name strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which breast a feeding event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical activity kinds recorded in the event log.
///
/// The string forms match what caregivers' clients have always written to
/// the log, so existing data parses unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    /// Baby fell asleep.
    Sleep,
    /// Baby woke up.
    Wake,
    /// Wet diaper.
    Pee,
    /// Soiled diaper.
    Poop,
    /// Crying spell.
    Cry,
    /// Started feeding on the given side.
    FeedStart(Side),
    /// Stopped feeding on the given side.
    FeedStop(Side),
}

impl ActivityKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::Wake => "wake",
            Self::Pee => "pee",
            Self::Poop => "poop",
            Self::Cry => "crying",
            Self::FeedStart(Side::Left) => "leftBoob",
            Self::FeedStart(Side::Right) => "rightBoob",
            Self::FeedStop(Side::Left) => "leftBoobStop",
            Self::FeedStop(Side::Right) => "rightBoobStop",
        }
    }

    /// Whether this kind is momentary: it contributes to counts but never
    /// opens or closes an interval.
    #[must_use]
    pub const fn is_point(&self) -> bool {
        matches!(self, Self::Pee | Self::Poop | Self::Cry)
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = UnknownActivity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sleep" => Ok(Self::Sleep),
            "wake" => Ok(Self::Wake),
            "pee" => Ok(Self::Pee),
            // "poo" appeared in one backend revision
            "poop" | "poo" => Ok(Self::Poop),
            "crying" => Ok(Self::Cry),
            "leftBoob" => Ok(Self::FeedStart(Side::Left)),
            "rightBoob" => Ok(Self::FeedStart(Side::Right)),
            "leftBoobStop" => Ok(Self::FeedStop(Side::Left)),
            "rightBoobStop" => Ok(Self::FeedStop(Side::Right)),
            _ => Err(UnknownActivity(s.to_string())),
        }
    }
}

impl Serialize for ActivityKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActivityKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown activity name strings.
#[derive(Debug, Clone)]
pub struct UnknownActivity(String);

impl fmt::Display for UnknownActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown activity: {}", self.0)
    }
}

impl std::error::Error for UnknownActivity {}
