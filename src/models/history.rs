//! Per-guild trend series assembled across past events.

use serde::{Deserialize, Serialize};

/// Rank bounds used when no rank exists anywhere in the window.
pub const DEFAULT_RANK_BOUNDS: (u32, u32) = (1, 10);

/// One slot of a guild's history: a past event the guild may or may not
/// have participated in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Event label with fixed series-name noise stripped
    pub label: String,

    /// Rank in that event; `None` when the guild did not participate
    pub rank: Option<u32>,

    /// Total score in that event; 0 when absent
    pub score: u64,

    /// Point color from the event's attribute
    pub point_color: String,

    /// Bar color (point color with alpha suffix)
    pub bar_color: String,
}

/// A guild's trend across a bounded window of past events of one mode,
/// chronological oldest-first.
///
/// Kept as parallel sequences because that is the chart contract: slot `i`
/// of every sequence describes the same event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistorySeries {
    pub guild_name: String,
    pub labels: Vec<String>,
    pub ranks: Vec<Option<u32>>,
    pub scores: Vec<u64>,
    pub point_colors: Vec<String>,
    pub bar_colors: Vec<String>,
}

impl HistorySeries {
    pub fn new(guild_name: impl Into<String>) -> Self {
        Self {
            guild_name: guild_name.into(),
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Append one slot, keeping all sequences in lockstep.
    pub fn push(&mut self, point: HistoryPoint) {
        self.labels.push(point.label);
        self.ranks.push(point.rank);
        self.scores.push(point.score);
        self.point_colors.push(point.point_color);
        self.bar_colors.push(point.bar_color);
    }

    /// Min/max over the ranks that exist; [`DEFAULT_RANK_BOUNDS`] when the
    /// guild participated in none of the window's events.
    pub fn rank_bounds(&self) -> (u32, u32) {
        let present: Vec<u32> = self.ranks.iter().flatten().copied().collect();
        match (present.iter().min(), present.iter().max()) {
            (Some(&min), Some(&max)) => (min, max),
            _ => DEFAULT_RANK_BOUNDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(rank: Option<u32>, score: u64) -> HistoryPoint {
        HistoryPoint {
            label: "war".to_string(),
            rank,
            score,
            point_color: "#d4af37".to_string(),
            bar_color: "#d4af3733".to_string(),
        }
    }

    #[test]
    fn test_push_keeps_sequences_parallel() {
        let mut s = HistorySeries::new("A");
        s.push(point(Some(3), 100));
        s.push(point(None, 0));

        assert_eq!(s.len(), 2);
        assert_eq!(s.ranks, vec![Some(3), None]);
        assert_eq!(s.scores, vec![100, 0]);
        assert_eq!(s.labels.len(), s.bar_colors.len());
    }

    #[test]
    fn test_rank_bounds_skip_absent_slots() {
        let mut s = HistorySeries::new("A");
        s.push(point(Some(7), 1));
        s.push(point(None, 0));
        s.push(point(Some(2), 5));

        assert_eq!(s.rank_bounds(), (2, 7));
    }

    #[test]
    fn test_rank_bounds_default_when_never_present() {
        let mut s = HistorySeries::new("A");
        s.push(point(None, 0));
        assert_eq!(s.rank_bounds(), DEFAULT_RANK_BOUNDS);

        let empty = HistorySeries::new("B");
        assert_eq!(empty.rank_bounds(), DEFAULT_RANK_BOUNDS);
    }
}
