use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate;
use crate::models::Mode;
use crate::view::{self, RankingRows, TableLayout};

#[derive(Debug, Deserialize)]
pub struct RankingParams {
    /// Mode override; defaults to the catalog entry's mode
    pub mode: Option<Mode>,

    /// Case-insensitive guild-name filter
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RankingResponse {
    pub file: String,
    pub mode: Mode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    pub layout: TableLayout,
    pub rows: RankingRows,
    /// Records in the dataset before filtering
    pub total: usize,
    /// Rows surviving the name filter
    pub shown: usize,
}

/// Load one event's raw ranking, derive its dataset, and render the table
/// view model. A load failure leaves the caller's prior view intact; this
/// endpoint only reports it.
pub async fn event_ranking(
    State(state): State<AppState>,
    Path(file): Path<String>,
    Query(params): Query<RankingParams>,
) -> Result<Json<RankingResponse>, ApiError> {
    let mode = match params.mode {
        Some(mode) => mode,
        None => {
            let catalog = state.catalog.read().await;
            catalog
                .find_by_file(&file)
                .map(|e| e.mode)
                .ok_or_else(|| {
                    ApiError::BadRequest(format!("unknown event file (pass ?mode=): {}", file))
                })?
        }
    };

    let loaded = state.client.load_event(&file).await.map_err(|e| {
        error!("Ranking load failed for {}: {}", file, e);
        ApiError::from(e)
    })?;

    let dataset = calculate::compute(loaded.payload.ranking, mode);
    let total = dataset.len();

    let layout = view::table_layout(mode);
    let mut rows = view::ranking_rows(&dataset);
    if let Some(ref term) = params.q {
        rows.retain_matching(term);
    }
    let shown = rows.len();

    Ok(Json(RankingResponse {
        file,
        mode,
        title: loaded.payload.title,
        attribute: loaded.payload.attribute,
        layout,
        rows,
        total,
        shown,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::fetch::{DataSource, RankingClient};
    use crate::models::{EventCatalog, EventDescriptor, Mode};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn write_fixture(dir: &std::path::Path) {
        std::fs::create_dir_all(dir.join("data/ex")).unwrap();
        std::fs::create_dir_all(dir.join("data/ss")).unwrap();
        std::fs::write(
            dir.join("data/ex/1.json"),
            r#"{"title": "war 1", "attribute": "緑", "ranking": [
                {"guildName": "Alpha", "day1": 100, "day2": 50, "day3": 0},
                {"guildName": "Beta", "day1": 80, "day2": 80, "day3": 80}
            ]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("data/ss/1.json"),
            r#"{"ranking": [
                {"guildName": "Gamma", "score": 5000},
                {"guildName": "Delta", "score": 9000, "rank": 1, "members": 18}
            ]}"#,
        )
        .unwrap();
    }

    fn test_state(dir: &std::path::Path) -> AppState {
        write_fixture(dir);
        let client = RankingClient::with_defaults(DataSource::Local {
            dir: dir.to_path_buf(),
        })
        .unwrap();
        let catalog = EventCatalog::new(vec![
            EventDescriptor::new("war 1", "ex/1.json", Mode::Aggregate),
            EventDescriptor::new("season 1", "ss/1.json", Mode::Single),
        ]);
        AppState::new(client, catalog, 10)
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_aggregate_ranking_table() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(tmp.path()), None);

        let (status, json) = get_json(app, "/api/ranking/ex/1.json").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["mode"], "ex");
        assert_eq!(json["title"], "war 1");
        assert_eq!(json["total"], 2);
        assert_eq!(json["layout"]["columns"].as_array().unwrap().len(), 16);

        // Beta leads on cumulative total.
        let rows = json["rows"].as_array().unwrap();
        assert_eq!(rows[0]["guildName"], "Beta");
        assert_eq!(rows[0]["badge"]["tier"], "badge-1");
        assert_eq!(rows[0]["t3"]["value"], 240);
        assert_eq!(rows[1]["gap_to_leader"], 90);
    }

    #[tokio::test]
    async fn test_single_ranking_table() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(tmp.path()), None);

        let (status, json) = get_json(app, "/api/ranking/ss/1.json").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["mode"], "ss");
        let rows = json["rows"].as_array().unwrap();
        assert_eq!(rows[0]["guildName"], "Delta");
        assert_eq!(rows[0]["members"], 18);
        assert_eq!(rows[1]["guildName"], "Gamma");
        assert_eq!(rows[1]["gap_to_leader"], 4000);
        // Gamma arrived without a rank field.
        assert_eq!(rows[1]["badge"]["text"], "－");
    }

    #[tokio::test]
    async fn test_ranking_name_filter() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(tmp.path()), None);

        let (status, json) = get_json(app, "/api/ranking/ex/1.json?q=alp").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 2);
        assert_eq!(json["shown"], 1);
        assert_eq!(json["rows"][0]["guildName"], "Alpha");
    }

    #[tokio::test]
    async fn test_ranking_mode_override() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());
        // File not in the catalog: the mode query carries it.
        std::fs::write(
            tmp.path().join("data/ex/extra.json"),
            r#"{"ranking": [{"guildName": "Solo", "day1": 1}]}"#,
        )
        .unwrap();
        let app = build_router(state, None);

        let (status, json) = get_json(app, "/api/ranking/ex/extra.json?mode=ex").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["rows"][0]["guildName"], "Solo");
    }

    #[tokio::test]
    async fn test_ranking_unknown_file_without_mode_is_bad_request() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(tmp.path()), None);

        let (status, json) = get_json(app, "/api/ranking/ex/ghost.json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_ranking_missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(tmp.path()), None);

        let (status, json) = get_json(app, "/api/ranking/ex/ghost.json?mode=ex").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }
}
