//! Ranking resource loading.
//!
//! Loads the event catalog (`events.json`) and per-event ranking files
//! (`data/<file>`) from either a remote HTTP base URL or a local data
//! directory. All loads are read-only; failures are reported to the caller
//! and never crash the process.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};
use url::Url;

use crate::models::{EventCatalog, EventPayload};

/// Errors that can occur while loading ranking resources.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP {status}: {resource}")]
    HttpStatus { status: u16, resource: String },

    #[error("Invalid resource reference: {0}")]
    InvalidReference(String),
}

/// Where ranking resources live.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// A web root serving `events.json` and `data/*` as static files
    Remote { base: Url },

    /// A local directory with the same layout
    Local { dir: PathBuf },
}

/// Configuration for the HTTP side of the loader.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("guildboard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// One loaded per-event resource, stamped with its load time.
#[derive(Debug, Clone)]
pub struct LoadedEvent {
    pub file: String,
    pub payload: EventPayload,
    pub fetched_at: DateTime<Utc>,
}

/// Read-only loader for catalog and ranking resources.
pub struct RankingClient {
    client: Client,
    source: DataSource,
}

impl RankingClient {
    /// Create a loader over the given source.
    pub fn new(source: DataSource, config: ClientConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("guildboard/0.1.0")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, source })
    }

    /// Create a loader with default HTTP configuration.
    pub fn with_defaults(source: DataSource) -> Result<Self, FetchError> {
        Self::new(source, ClientConfig::default())
    }

    /// Load the event catalog. Called once at startup; the result replaces
    /// any previously held catalog wholesale.
    pub async fn load_catalog(&self) -> Result<EventCatalog, FetchError> {
        let bytes = self.read_resource("events.json").await?;
        let catalog: EventCatalog = serde_json::from_slice(&bytes)?;
        info!("Loaded catalog with {} events", catalog.len());
        Ok(catalog)
    }

    /// Load one event's ranking resource by its catalog file reference.
    pub async fn load_event(&self, file: &str) -> Result<LoadedEvent, FetchError> {
        validate_reference(file)?;
        let bytes = self.read_resource(&format!("data/{}", file)).await?;
        let payload: EventPayload = serde_json::from_slice(&bytes)?;
        debug!("Loaded {} with {} records", file, payload.ranking.len());
        Ok(LoadedEvent {
            file: file.to_string(),
            payload,
            fetched_at: Utc::now(),
        })
    }

    async fn read_resource(&self, relative: &str) -> Result<Vec<u8>, FetchError> {
        match &self.source {
            DataSource::Remote { base } => {
                let url = base
                    .join(relative)
                    .map_err(|_| FetchError::InvalidReference(relative.to_string()))?;
                debug!("Fetching {}", url);

                let response = self.client.get(url.as_str()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::HttpStatus {
                        status: status.as_u16(),
                        resource: url.to_string(),
                    });
                }
                Ok(response.bytes().await?.to_vec())
            }
            DataSource::Local { dir } => {
                let path = dir.join(relative);
                debug!("Reading {:?}", path);
                Ok(fs::read(&path).await?)
            }
        }
    }
}

/// Catalog file references are relative paths like `ex/2025_0601.json`;
/// anything that climbs out of the data root is rejected.
fn validate_reference(file: &str) -> Result<(), FetchError> {
    if file.is_empty()
        || file.starts_with('/')
        || file.split('/').any(|segment| segment == "..")
    {
        return Err(FetchError::InvalidReference(file.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mode;
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir) {
        let data_dir = dir.path().join("data").join("ex");
        std::fs::create_dir_all(&data_dir).unwrap();
        std::fs::write(
            dir.path().join("events.json"),
            r#"[
                {"type": "ex", "name": "war 1", "file": "ex/1.json"},
                {"type": "ss", "name": "season 1", "file": "ss/1.json"}
            ]"#,
        )
        .unwrap();
        std::fs::write(
            data_dir.join("1.json"),
            r#"{
                "title": "war 1",
                "attribute": "赤",
                "ranking": [{"guildName": "A", "day1": 100}]
            }"#,
        )
        .unwrap();
    }

    fn local_client(dir: &TempDir) -> RankingClient {
        RankingClient::with_defaults(DataSource::Local {
            dir: dir.path().to_path_buf(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_load_catalog_from_local_dir() {
        let tmp = TempDir::new().unwrap();
        write_fixture(&tmp);

        let catalog = local_client(&tmp).load_catalog().await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.all()[0].mode, Mode::Aggregate);
    }

    #[tokio::test]
    async fn test_load_event_from_local_dir() {
        let tmp = TempDir::new().unwrap();
        write_fixture(&tmp);

        let loaded = local_client(&tmp).load_event("ex/1.json").await.unwrap();
        assert_eq!(loaded.payload.attribute.as_deref(), Some("赤"));
        assert_eq!(loaded.payload.ranking.len(), 1);
        assert_eq!(loaded.payload.ranking[0].day(1), 100);
    }

    #[tokio::test]
    async fn test_load_event_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        write_fixture(&tmp);

        let result = local_client(&tmp).load_event("ex/nope.json").await;
        assert!(matches!(result, Err(FetchError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_event_rejects_traversal() {
        let tmp = TempDir::new().unwrap();
        write_fixture(&tmp);

        let result = local_client(&tmp).load_event("../events.json").await;
        assert!(matches!(result, Err(FetchError::InvalidReference(_))));
    }

    #[test]
    fn test_validate_reference() {
        assert!(validate_reference("ex/1.json").is_ok());
        assert!(validate_reference("").is_err());
        assert!(validate_reference("/etc/passwd").is_err());
        assert!(validate_reference("ex/../../secret").is_err());
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("guildboard/"));
    }
}
