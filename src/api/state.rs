use std::sync::Arc;

use crate::history::HistoryAggregator;
use crate::fetch::RankingClient;
use crate::models::EventCatalog;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<RankingClient>,
    pub aggregator: Arc<HistoryAggregator>,
    pub catalog: Arc<tokio::sync::RwLock<EventCatalog>>,
    pub history_window: usize,
}

impl AppState {
    pub fn new(client: RankingClient, catalog: EventCatalog, history_window: usize) -> Self {
        Self {
            client: Arc::new(client),
            aggregator: Arc::new(HistoryAggregator::new()),
            catalog: Arc::new(tokio::sync::RwLock::new(catalog)),
            history_window,
        }
    }

    /// Swap in a freshly loaded catalog wholesale.
    pub async fn replace_catalog(&self, catalog: EventCatalog) {
        *self.catalog.write().await = catalog;
    }
}
