//! Rank computation engine.
//!
//! Turns raw per-guild event records into a fully derived, display-ordered
//! dataset:
//! - Aggregate mode: cumulative totals plus six dense rank columns
//! - Single mode: score-ordered rows with the server-supplied rank
//! - Gap columns against the leader and the preceding row
//! - Badge tier mapping shared by both modes

use crate::models::{Dataset, Mode, RankedRecord, RawRecord, SeasonRecord};

/// Derive the ranked dataset for one event. This is the single mode
/// dispatch point; everything downstream consumes the tagged result.
pub fn compute(records: Vec<RawRecord>, mode: Mode) -> Dataset {
    match mode {
        Mode::Aggregate => Dataset::Aggregate(compute_aggregate(records)),
        Mode::Single => Dataset::Single(compute_single(records)),
    }
}

/// Dense 1..N ranks over one value column, descending.
///
/// Ties are not merged: equal values get distinct consecutive ranks, in
/// input order (stable sort, no secondary key). `ranks[i]` is the rank of
/// `values[i]`.
pub fn sub_ranks(values: &[u64]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].cmp(&values[a]));

    let mut ranks = vec![0u32; values.len()];
    for (position, &index) in order.iter().enumerate() {
        ranks[index] = position as u32 + 1;
    }
    ranks
}

fn compute_aggregate(records: Vec<RawRecord>) -> Vec<RankedRecord> {
    let mut derived: Vec<RankedRecord> = records
        .into_iter()
        .map(|r| {
            let (d1, d2, d3) = (r.day(1), r.day(2), r.day(3));
            RankedRecord {
                guild_name: r.guild_name,
                d1,
                d2,
                d3,
                t1: d1,
                t2: d1 + d2,
                t3: d1 + d2 + d3,
                rank_t1: 0,
                rank_t2: 0,
                rank_t3: 0,
                rank_d1: 0,
                rank_d2: 0,
                rank_d3: 0,
            }
        })
        .collect();

    let columns: [(fn(&RankedRecord) -> u64, fn(&mut RankedRecord, u32)); 6] = [
        (|r| r.t1, |r, rank| r.rank_t1 = rank),
        (|r| r.t2, |r, rank| r.rank_t2 = rank),
        (|r| r.t3, |r, rank| r.rank_t3 = rank),
        (|r| r.d1, |r, rank| r.rank_d1 = rank),
        (|r| r.d2, |r, rank| r.rank_d2 = rank),
        (|r| r.d3, |r, rank| r.rank_d3 = rank),
    ];

    for (value_of, assign) in columns {
        let values: Vec<u64> = derived.iter().map(value_of).collect();
        for (record, rank) in derived.iter_mut().zip(sub_ranks(&values)) {
            assign(record, rank);
        }
    }

    derived.sort_by_key(|r| r.rank_t3);
    derived
}

fn compute_single(records: Vec<RawRecord>) -> Vec<SeasonRecord> {
    let mut rows: Vec<SeasonRecord> = records
        .into_iter()
        .map(|r| SeasonRecord {
            score: r.score_or_default(),
            rank: r.rank,
            members: r.members_or_default(),
            guild_name: r.guild_name,
        })
        .collect();

    rows.sort_by(|a, b| b.score.cmp(&a.score));
    rows
}

/// Score gaps for one display row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    /// Distance to the top-ranked row's value
    pub to_leader: u64,
    /// Distance to the immediately preceding row (0 for the leader)
    pub to_previous: u64,
}

/// Per-row gaps over the primary values in display (descending) order.
pub fn gaps(values: &[u64]) -> Vec<Gap> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| Gap {
            to_leader: values[0].saturating_sub(v),
            to_previous: values[i.saturating_sub(1)].saturating_sub(v),
        })
        .collect()
}

/// Visual tier of a rank badge: ranks 1–5 each get their own tier, 6 and
/// beyond share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankTier {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Standard,
}

impl RankTier {
    pub fn from_rank(rank: u32) -> Self {
        match rank {
            1 => RankTier::First,
            2 => RankTier::Second,
            3 => RankTier::Third,
            4 => RankTier::Fourth,
            5 => RankTier::Fifth,
            _ => RankTier::Standard,
        }
    }

    /// CSS class used by the table renderer.
    pub fn css_class(&self) -> &'static str {
        match self {
            RankTier::First => "badge-1",
            RankTier::Second => "badge-2",
            RankTier::Third => "badge-3",
            RankTier::Fourth => "badge-4",
            RankTier::Fifth => "badge-5",
            RankTier::Standard => "badge-norm",
        }
    }
}
