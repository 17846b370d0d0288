//! Presentation-layer contract.
//!
//! Pure builders that turn derived datasets and history series into the
//! view models the table and chart renderers consume: per-mode column
//! layouts, display rows with gap columns and badge tiers, the dual-axis
//! chart shape, the name filter, and the text-fit shrink factor.

use serde::Serialize;

use crate::calculate::{self, RankTier};
use crate::models::{Dataset, HistorySeries, Mode};

/// Placeholder shown for an absent rank.
pub const UNRANKED: &str = "－";

/// Shrink slightly past the exact fit so scaled text keeps a margin.
const FIT_MARGIN: f64 = 0.95;

// ── Table layout ────────────────────────────────────────────────

/// One table column: a stable key for the renderer plus its header label
/// and, for the aggregate layout, the header group it sits under.
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<&'static str>,
}

impl Column {
    fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            group: None,
        }
    }

    fn grouped(key: &'static str, label: &'static str, group: &'static str) -> Self {
        Self {
            key,
            label,
            group: Some(group),
        }
    }
}

/// Column layout for one mode's table.
#[derive(Debug, Clone, Serialize)]
pub struct TableLayout {
    pub mode: Mode,
    pub columns: Vec<Column>,
}

/// The two fixed header layouts.
pub fn table_layout(mode: Mode) -> TableLayout {
    let columns = match mode {
        Mode::Aggregate => vec![
            Column::new("rank", "順"),
            Column::new("name", "ギルド名"),
            Column::grouped("rank_t1", "順", "累計"),
            Column::grouped("t1", "Day1", "累計"),
            Column::grouped("rank_t2", "順", "累計"),
            Column::grouped("t2", "Day2", "累計"),
            Column::grouped("rank_t3", "順", "累計"),
            Column::grouped("t3", "Day3", "累計"),
            Column::grouped("gap_to_leader", "1位差", "差分"),
            Column::grouped("gap_to_previous", "上差", "差分"),
            Column::grouped("rank_d1", "順", "日間"),
            Column::grouped("d1", "Day1", "日間"),
            Column::grouped("rank_d2", "順", "日間"),
            Column::grouped("d2", "Day2", "日間"),
            Column::grouped("rank_d3", "順", "日間"),
            Column::grouped("d3", "Day3", "日間"),
        ],
        Mode::Single => vec![
            Column::new("rank", "順"),
            Column::new("name", "ギルド名"),
            Column::new("score", "スコア"),
            Column::new("members", "人"),
            Column::new("average", "平均"),
            Column::new("gap_to_leader", "1位差"),
            Column::new("gap_to_previous", "上差"),
        ],
    };
    TableLayout { mode, columns }
}

// ── Rows ────────────────────────────────────────────────────────

/// A rank rendered as a badge: display text plus visual tier class.
#[derive(Debug, Clone, Serialize)]
pub struct Badge {
    pub text: String,
    pub tier: &'static str,
}

impl Badge {
    pub fn from_rank(rank: u32) -> Self {
        Self {
            text: rank.to_string(),
            tier: RankTier::from_rank(rank).css_class(),
        }
    }

    /// Absent ranks render the placeholder in the shared tier.
    pub fn from_optional(rank: Option<u32>) -> Self {
        match rank {
            Some(rank) => Self::from_rank(rank),
            None => Self {
                text: UNRANKED.to_string(),
                tier: RankTier::Standard.css_class(),
            },
        }
    }
}

/// A value cell paired with its per-column rank badge.
#[derive(Debug, Clone, Serialize)]
pub struct CellPair {
    pub badge: Badge,
    pub value: u64,
}

/// One aggregate-mode display row.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateRow {
    pub badge: Badge,
    #[serde(rename = "guildName")]
    pub guild_name: String,
    pub t1: CellPair,
    pub t2: CellPair,
    pub t3: CellPair,
    pub gap_to_leader: u64,
    pub gap_to_previous: u64,
    pub d1: CellPair,
    pub d2: CellPair,
    pub d3: CellPair,
}

/// One single-mode display row.
#[derive(Debug, Clone, Serialize)]
pub struct SingleRow {
    pub badge: Badge,
    #[serde(rename = "guildName")]
    pub guild_name: String,
    pub score: u64,
    pub members: u32,
    /// Per-member thousands: score / 1000 / members, one decimal
    pub average: f64,
    pub gap_to_leader: u64,
    pub gap_to_previous: u64,
}

/// Display rows for one mode's table.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RankingRows {
    Aggregate(Vec<AggregateRow>),
    Single(Vec<SingleRow>),
}

impl RankingRows {
    pub fn len(&self) -> usize {
        match self {
            RankingRows::Aggregate(rows) => rows.len(),
            RankingRows::Single(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop rows whose guild name does not match the filter term.
    pub fn retain_matching(&mut self, term: &str) {
        match self {
            RankingRows::Aggregate(rows) => {
                rows.retain(|r| matches_filter(&r.guild_name, term))
            }
            RankingRows::Single(rows) => rows.retain(|r| matches_filter(&r.guild_name, term)),
        }
    }
}

/// Build display rows from a derived dataset, preserving its order.
pub fn ranking_rows(dataset: &Dataset) -> RankingRows {
    match dataset {
        Dataset::Aggregate(records) => {
            let totals: Vec<u64> = records.iter().map(|r| r.t3).collect();
            let gaps = calculate::gaps(&totals);
            let rows = records
                .iter()
                .zip(gaps)
                .map(|(r, gap)| AggregateRow {
                    badge: Badge::from_rank(r.rank_t3),
                    guild_name: r.guild_name.clone(),
                    t1: CellPair {
                        badge: Badge::from_rank(r.rank_t1),
                        value: r.t1,
                    },
                    t2: CellPair {
                        badge: Badge::from_rank(r.rank_t2),
                        value: r.t2,
                    },
                    t3: CellPair {
                        badge: Badge::from_rank(r.rank_t3),
                        value: r.t3,
                    },
                    gap_to_leader: gap.to_leader,
                    gap_to_previous: gap.to_previous,
                    d1: CellPair {
                        badge: Badge::from_rank(r.rank_d1),
                        value: r.d1,
                    },
                    d2: CellPair {
                        badge: Badge::from_rank(r.rank_d2),
                        value: r.d2,
                    },
                    d3: CellPair {
                        badge: Badge::from_rank(r.rank_d3),
                        value: r.d3,
                    },
                })
                .collect();
            RankingRows::Aggregate(rows)
        }
        Dataset::Single(records) => {
            let scores: Vec<u64> = records.iter().map(|r| r.score).collect();
            let gaps = calculate::gaps(&scores);
            let rows = records
                .iter()
                .zip(gaps)
                .map(|(r, gap)| SingleRow {
                    badge: Badge::from_optional(r.rank),
                    guild_name: r.guild_name.clone(),
                    score: r.score,
                    members: r.members,
                    average: per_member_average(r.score, r.members),
                    gap_to_leader: gap.to_leader,
                    gap_to_previous: gap.to_previous,
                })
                .collect();
            RankingRows::Single(rows)
        }
    }
}

fn per_member_average(score: u64, members: u32) -> f64 {
    if members == 0 {
        return 0.0;
    }
    let avg = score as f64 / 1000.0 / members as f64;
    (avg * 10.0).round() / 10.0
}

// ── History chart ───────────────────────────────────────────────

/// The inverted rank axis: lower numeric rank sits higher, with one unit
/// of padding on each side (never below 0.5).
#[derive(Debug, Clone, Serialize)]
pub struct RankAxis {
    pub min: f64,
    pub max: f64,
    pub inverted: bool,
}

/// The score axis: values are divided down and suffixed per mode.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreAxis {
    pub divisor: u64,
    pub unit: &'static str,
}

/// Everything the dual-axis trend chart needs for one guild.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryChart {
    #[serde(rename = "guildName")]
    pub guild_name: String,
    pub labels: Vec<String>,
    pub ranks: Vec<Option<u32>>,
    pub scores: Vec<u64>,
    pub point_colors: Vec<String>,
    pub bar_colors: Vec<String>,
    pub rank_axis: RankAxis,
    pub score_axis: ScoreAxis,
}

/// Build the chart view model from an assembled series.
pub fn history_chart(series: &HistorySeries, mode: Mode) -> HistoryChart {
    let (min_rank, max_rank) = series.rank_bounds();
    let (divisor, unit) = mode.score_unit();

    HistoryChart {
        guild_name: series.guild_name.clone(),
        labels: series.labels.clone(),
        ranks: series.ranks.clone(),
        scores: series.scores.clone(),
        point_colors: series.point_colors.clone(),
        bar_colors: series.bar_colors.clone(),
        rank_axis: RankAxis {
            min: (min_rank as f64 - 1.0).max(0.5),
            max: max_rank as f64 + 1.0,
            inverted: true,
        },
        score_axis: ScoreAxis { divisor, unit },
    }
}

/// Compact score text for chart labels: "1.2M" / "45K" depending on mode.
pub fn scaled_score(mode: Mode, value: u64, precision: usize) -> String {
    let (divisor, unit) = mode.score_unit();
    format!(
        "{:.*}{}",
        precision,
        value as f64 / divisor as f64,
        unit
    )
}

// ── Filtering and fitting ───────────────────────────────────────

/// Case-insensitive substring match on a guild name. An empty term
/// matches everything.
pub fn matches_filter(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

/// Uniform shrink factor for overflowing name text, anchored at the left
/// edge by the renderer. `None` when the text already fits.
pub fn fit_scale(text_width: f64, container_width: f64) -> Option<f64> {
    if text_width > container_width && container_width > 0.0 {
        Some(container_width / text_width * FIT_MARGIN)
    } else {
        None
    }
}
