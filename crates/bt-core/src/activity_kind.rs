//! Activity kind enum as the single source of truth for kind strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of tracked activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    NursingLeft,
    NursingRight,
    Bottle,
    Solids,
    Sleep,
    Pump,
}

impl ActivityKind {
    pub const ALL: [Self; 6] = [
        Self::NursingLeft,
        Self::NursingRight,
        Self::Bottle,
        Self::Solids,
        Self::Sleep,
        Self::Pump,
    ];

    /// Canonical string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NursingLeft => "nursing_left",
            Self::NursingRight => "nursing_right",
            Self::Bottle => "bottle",
            Self::Solids => "solids",
            Self::Sleep => "sleep",
            Self::Pump => "pump",
        }
    }

    /// Nursing on either side.
    #[must_use]
    pub const fn is_nursing(self) -> bool {
        matches!(self, Self::NursingLeft | Self::NursingRight)
    }

    /// Kinds that count toward the feeding cadence. Pump, solids and sleep don't.
    #[must_use]
    pub const fn is_feed(self) -> bool {
        matches!(self, Self::NursingLeft | Self::NursingRight | Self::Bottle)
    }

    /// Short human label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NursingLeft => "Nursing (L)",
            Self::NursingRight => "Nursing (R)",
            Self::Bottle => "Bottle",
            Self::Solids => "Solids",
            Self::Sleep => "Sleep",
            Self::Pump => "Pump",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = UnknownActivityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nursing_left" | "BREAST_LEFT" => Ok(Self::NursingLeft),
            "nursing_right" | "BREAST_RIGHT" => Ok(Self::NursingRight),
            "bottle" | "BOTTLE" => Ok(Self::Bottle),
            "solids" | "SOLIDS" => Ok(Self::Solids),
            "sleep" | "SLEEP" => Ok(Self::Sleep),
            "pump" | "PUMP" => Ok(Self::Pump),
            _ => Err(UnknownActivityKind(s.to_string())),
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

/// Error type for unknown activity kind strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownActivityKind(String);

impl fmt::Display for UnknownActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown activity kind: {}", self.0)
    }
}

impl std::error::Error for UnknownActivityKind {}

/// Kinds that can run as a live timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "ActivityKind", try_from = "ActivityKind")]
pub enum TimerKind {
    NursingLeft,
    NursingRight,
    Sleep,
}

impl From<TimerKind> for ActivityKind {
    fn from(kind: TimerKind) -> Self {
        match kind {
            TimerKind::NursingLeft => Self::NursingLeft,
            TimerKind::NursingRight => Self::NursingRight,
            TimerKind::Sleep => Self::Sleep,
        }
    }
}

impl TryFrom<ActivityKind> for TimerKind {
    type Error = UnknownActivityKind;

    fn try_from(kind: ActivityKind) -> Result<Self, Self::Error> {
        match kind {
            ActivityKind::NursingLeft => Ok(Self::NursingLeft),
            ActivityKind::NursingRight => Ok(Self::NursingRight),
            ActivityKind::Sleep => Ok(Self::Sleep),
            other => Err(UnknownActivityKind(format!("{other} is not timed"))),
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ActivityKind::from(*self).fmt(f)
    }
}

impl FromStr for TimerKind {
    type Err = UnknownActivityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind: ActivityKind = s.replace('-', "_").parse()?;
        Self::try_from(kind)
    }
}
