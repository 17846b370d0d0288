//! Scoring modes for guild events.

use serde::{Deserialize, Serialize};

/// Which scoring rules an event uses.
///
/// The mode decides both the shape of the raw records and how the
/// computation engine derives ranks from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Mode {
    /// Multi-day cumulative competition ("ex" on the wire). Records carry
    /// per-day values; six rank columns are derived.
    #[default]
    #[serde(rename = "ex")]
    Aggregate,
    /// Single-score seasonal competition ("ss" on the wire). Records carry
    /// one score and an optional server-supplied rank.
    #[serde(rename = "ss")]
    Single,
}

impl Mode {
    /// The wire tag used by the event catalog.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Mode::Aggregate => "ex",
            Mode::Single => "ss",
        }
    }

    /// Divisor and suffix for compact score display.
    pub fn score_unit(&self) -> (u64, &'static str) {
        match self {
            Mode::Aggregate => (1_000_000, "M"),
            Mode::Single => (1_000, "K"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ex" => Ok(Mode::Aggregate),
            "ss" => Ok(Mode::Single),
            other => Err(format!("unknown mode tag: {}", other)),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}
