//! Ranking record models: raw wire shapes and derived datasets.

use serde::{Deserialize, Serialize};

use super::Mode;

/// Members assumed when a seasonal record omits the field.
pub const DEFAULT_MEMBERS: u32 = 20;

/// One guild's row as it arrives from an event resource.
///
/// Both modes share this wire shape; which fields are populated depends on
/// the event's mode. Every numeric field is optional upstream — absence
/// means zero (or [`DEFAULT_MEMBERS`] for `members`), never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    /// Guild display name, the entity identifier across events
    #[serde(rename = "guildName")]
    pub guild_name: String,

    /// Day 1 value (Aggregate mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day1: Option<u64>,

    /// Day 2 value (Aggregate mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day2: Option<u64>,

    /// Day 3 value (Aggregate mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day3: Option<u64>,

    /// Seasonal score (Single mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u64>,

    /// Server-supplied rank (Single mode), absent when unranked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,

    /// Member count (Single mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<u32>,
}

impl RawRecord {
    /// A record carrying only a name; numeric fields default on read.
    pub fn named(guild_name: impl Into<String>) -> Self {
        Self {
            guild_name: guild_name.into(),
            day1: None,
            day2: None,
            day3: None,
            score: None,
            rank: None,
            members: None,
        }
    }

    /// Per-day value with the zero default applied. Days are 1-based.
    pub fn day(&self, n: u8) -> u64 {
        match n {
            1 => self.day1.unwrap_or(0),
            2 => self.day2.unwrap_or(0),
            3 => self.day3.unwrap_or(0),
            _ => 0,
        }
    }

    pub fn score_or_default(&self) -> u64 {
        self.score.unwrap_or(0)
    }

    pub fn members_or_default(&self) -> u32 {
        self.members.unwrap_or(DEFAULT_MEMBERS)
    }

    /// Best available total: the explicit score, else the day sum.
    pub fn total_score(&self) -> u64 {
        match self.score {
            Some(s) => s,
            None => self.day(1) + self.day(2) + self.day(3),
        }
    }
}

/// A per-event resource: its ranking plus display metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Elemental attribute key into the color palette, if declared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,

    /// The raw ranking rows; absent field reads as empty
    #[serde(default)]
    pub ranking: Vec<RawRecord>,
}

/// A fully derived Aggregate-mode row: per-day values, cumulative totals,
/// and a dense 1..N rank for each of the six value columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedRecord {
    #[serde(rename = "guildName")]
    pub guild_name: String,

    pub d1: u64,
    pub d2: u64,
    pub d3: u64,

    /// Cumulative totals: t1 = d1, t2 = d1+d2, t3 = d1+d2+d3
    pub t1: u64,
    pub t2: u64,
    pub t3: u64,

    pub rank_t1: u32,
    pub rank_t2: u32,
    pub rank_t3: u32,
    pub rank_d1: u32,
    pub rank_d2: u32,
    pub rank_d3: u32,
}

/// A Single-mode row after sorting; ranks are taken from the wire as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonRecord {
    #[serde(rename = "guildName")]
    pub guild_name: String,

    pub score: u64,

    /// Server-supplied rank; `None` renders as the unranked placeholder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,

    pub members: u32,
}

/// One event's fully derived, display-ordered ranking.
///
/// The two variants carry mode-specific rows; all mode branching happens in
/// `calculate::compute`, not in consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", content = "records")]
pub enum Dataset {
    #[serde(rename = "ex")]
    Aggregate(Vec<RankedRecord>),
    #[serde(rename = "ss")]
    Single(Vec<SeasonRecord>),
}

impl Dataset {
    pub fn mode(&self) -> Mode {
        match self {
            Dataset::Aggregate(_) => Mode::Aggregate,
            Dataset::Single(_) => Mode::Single,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Dataset::Aggregate(records) => records.len(),
            Dataset::Single(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Guild names in display order.
    pub fn guild_names(&self) -> Vec<&str> {
        match self {
            Dataset::Aggregate(records) => {
                records.iter().map(|r| r.guild_name.as_str()).collect()
            }
            Dataset::Single(records) => records.iter().map(|r| r.guild_name.as_str()).collect(),
        }
    }
}
