//! Cross-event trend assembly.
//!
//! Walks a bounded trailing window of past events of one mode, extracts a
//! single guild's rank and score from each, and assembles the parallel
//! series the trend chart consumes. Individual event failures degrade the
//! window instead of aborting it; stale requests are discarded via a
//! monotonic generation token.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::warn;

use crate::calculate;
use crate::fetch::RankingClient;
use crate::models::{palette, Dataset, EventCatalog, HistoryPoint, HistorySeries, Mode, RawRecord};

/// Default number of past events in a trend window.
pub const DEFAULT_WINDOW: usize = 10;

/// Fixed series-name substrings stripped from chart labels.
const LABEL_NOISE: [&str; 2] = ["魔界殲滅戦争", "魔界戦記 "];

/// Errors from history assembly.
///
/// Per-event fetch failures are not errors here — they degrade the series
/// by omitting the slot.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// A newer request started while this one was in flight; the caller
    /// must discard the result silently.
    #[error("superseded by a newer history request")]
    Stale,
}

/// Assembles per-guild trend series, newest request wins.
#[derive(Debug, Default)]
pub struct HistoryAggregator {
    generation: AtomicU64,
}

impl HistoryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request generation. Any in-flight assembly holding an
    /// older token becomes stale.
    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `token` still identifies the newest request.
    pub fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }

    /// Assemble a guild's trend over the trailing `window` events of
    /// `mode`, chronological oldest-first.
    ///
    /// One fetch is awaited at a time; after every await the token is
    /// re-checked so a superseded request stops early instead of racing the
    /// newer one.
    pub async fn assemble(
        &self,
        client: &RankingClient,
        catalog: &EventCatalog,
        guild_name: &str,
        mode: Mode,
        window: usize,
        token: u64,
    ) -> Result<HistorySeries, HistoryError> {
        let mut series = HistorySeries::new(guild_name);

        for event in catalog.trailing_window(mode, window) {
            let loaded = client.load_event(&event.file).await;
            if !self.is_current(token) {
                return Err(HistoryError::Stale);
            }

            let payload = match loaded {
                Ok(loaded) => loaded.payload,
                Err(e) => {
                    // Degrade: this event's slot is omitted from the series.
                    warn!("Skipping {} in history window: {}", event.file, e);
                    continue;
                }
            };

            let color = palette::attribute_color(payload.attribute.as_deref()).to_string();
            let found = payload
                .ranking
                .iter()
                .find(|r| r.guild_name == guild_name);

            let (rank, score) = match found {
                Some(record) => (
                    slot_rank(record, &payload.ranking, guild_name, mode),
                    record.total_score(),
                ),
                // Guild did not participate: the slot stays, with a gap.
                None => (None, 0),
            };

            series.push(HistoryPoint {
                label: strip_label_noise(&event.name),
                rank,
                score,
                bar_color: palette::bar_color(&color),
                point_color: color,
            });
        }

        Ok(series)
    }

    /// One-shot assembly for callers without concurrent requests (CLI).
    pub async fn history(
        &self,
        client: &RankingClient,
        catalog: &EventCatalog,
        guild_name: &str,
        mode: Mode,
        window: usize,
    ) -> Result<HistorySeries, HistoryError> {
        let token = self.begin();
        self.assemble(client, catalog, guild_name, mode, window, token)
            .await
    }
}

/// Rank for one history slot. Single mode trusts the wire rank; Aggregate
/// mode prefers a wire rank when a file carries one, otherwise derives the
/// guild's overall rank from that event's records.
fn slot_rank(record: &RawRecord, ranking: &[RawRecord], guild_name: &str, mode: Mode) -> Option<u32> {
    match mode {
        Mode::Single => record.rank,
        Mode::Aggregate => record.rank.or_else(|| {
            match calculate::compute(ranking.to_vec(), Mode::Aggregate) {
                Dataset::Aggregate(records) => records
                    .iter()
                    .find(|r| r.guild_name == guild_name)
                    .map(|r| r.rank_t3),
                Dataset::Single(_) => None,
            }
        }),
    }
}

/// Event names carry a fixed series prefix that would crowd the chart axis.
fn strip_label_noise(name: &str) -> String {
    let mut label = name.to_string();
    for noise in LABEL_NOISE {
        label = label.replace(noise, "");
    }
    label
}
