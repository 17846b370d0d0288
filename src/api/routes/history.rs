use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::Mode;
use crate::view::{self, HistoryChart};

/// Upper bound on a requested trend window.
const MAX_WINDOW: usize = 50;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub mode: Mode,
    pub window: Option<usize>,
}

/// Assemble a guild's trend chart over the trailing window of its mode.
///
/// Requests race last-started-wins: a request superseded while fetching
/// reports `STALE_REQUEST` and its result is discarded.
pub async fn guild_history(
    State(state): State<AppState>,
    Path(guild_name): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryChart>, ApiError> {
    let window = params
        .window
        .unwrap_or(state.history_window)
        .clamp(1, MAX_WINDOW);

    let catalog = state.catalog.read().await.clone();
    let token = state.aggregator.begin();
    debug!(
        "History request {} for {} ({} events max)",
        token, guild_name, window
    );

    let series = state
        .aggregator
        .assemble(&state.client, &catalog, &guild_name, params.mode, window, token)
        .await?;

    Ok(Json(view::history_chart(&series, params.mode)))
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
        std::fs::write(
            dir.join("data/ex/1.json"),
            r#"{"attribute": "赤", "ranking": [
                {"guildName": "Alpha", "day1": 100, "day2": 50, "day3": 0},
                {"guildName": "Beta", "day1": 80, "day2": 80, "day3": 80}
            ]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("data/ex/2.json"),
            r#"{"ranking": [
                {"guildName": "Beta", "day1": 10, "day2": 10, "day3": 10}
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
            EventDescriptor::new("魔界殲滅戦争 第1回", "ex/1.json", Mode::Aggregate),
            EventDescriptor::new("魔界殲滅戦争 第2回", "ex/2.json", Mode::Aggregate),
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
    async fn test_history_chart_for_participant() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(tmp.path()), None);

        let (status, json) = get_json(app, "/api/history/Beta?mode=ex").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["guildName"], "Beta");
        assert_eq!(json["labels"].as_array().unwrap().len(), 2);
        assert_eq!(json["ranks"][0], 1);
        assert_eq!(json["ranks"][1], 1);
        assert_eq!(json["scores"][0], 240);
        assert_eq!(json["rank_axis"]["inverted"], true);
        assert_eq!(json["score_axis"]["unit"], "M");
    }

    #[tokio::test]
    async fn test_history_gap_for_partial_participant() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(tmp.path()), None);

        let (status, json) = get_json(app, "/api/history/Alpha?mode=ex").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ranks"][0], 2);
        assert!(json["ranks"][1].is_null());
        assert_eq!(json["scores"][1], 0);
    }

    #[tokio::test]
    async fn test_history_window_param_limits_series() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(tmp.path()), None);

        let (status, json) = get_json(app, "/api/history/Beta?mode=ex&window=1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["labels"].as_array().unwrap().len(), 1);
        assert_eq!(json["scores"][0], 30);
    }

    #[tokio::test]
    async fn test_history_requires_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(tmp.path()), None);

        let (status, _) = get_json(app, "/api/history/Beta").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_history_unknown_guild_is_all_gaps() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(test_state(tmp.path()), None);

        let (status, json) = get_json(app, "/api/history/Nobody?mode=ex").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["ranks"][0].is_null());
        assert!(json["ranks"][1].is_null());
        // Default bounds with padding: 1-1 clamped to 0.5, 10+1.
        assert_eq!(json["rank_axis"]["min"], 0.5);
        assert_eq!(json["rank_axis"]["max"], 11.0);
    }
}
