use axum::http::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;
use standings::api::{self, AppState};
use standings::config::Config;
use standings::db::init_db;
use standings::domain::{LeaderboardId, ReportDate, ScoredRow};
use standings::orchestration::{PageLimits, StandingsService};
use standings::{LeaderboardRegistry, Repository, StoreScoreFeed, SystemClock};
use tempfile::TempDir;
use tower::util::ServiceExt;

const DEFINITIONS: &str = r#"[
    {"id": "daily-xp", "title": "Daily XP", "visibility": "public", "scoringWindow": "daily", "maxEntries": 3},
    {"id": "monthly-reports", "title": "Reports", "visibility": "moderator-only", "scoringWindow": "monthly"}
]"#;

fn date(s: &str) -> ReportDate {
    s.parse().unwrap()
}

async fn setup_test_app() -> (axum::Router, Arc<Repository>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let definitions_path = temp_dir.path().join("leaderboards.json");
    std::fs::write(&definitions_path, DEFINITIONS).unwrap();

    let mut env = HashMap::new();
    env.insert("DATABASE_PATH".to_string(), db_path);
    env.insert(
        "LEADERBOARDS_PATH".to_string(),
        definitions_path.to_string_lossy().to_string(),
    );
    env.insert("PORT".to_string(), "0".to_string());
    let config = Config::from_env_map(env).unwrap();

    let pool = init_db(&config.database_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));
    let registry = LeaderboardRegistry::from_json_file(&config.leaderboards_path).unwrap();

    let service = StandingsService::new(
        Arc::new(registry),
        Arc::new(StoreScoreFeed::new(repo.clone())),
        Arc::new(SystemClock),
        config.feed_timeout,
        PageLimits {
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        },
    );
    let state = AppState::new(Arc::new(service));

    (api::create_router(state), repo, temp_dir)
}

async fn get_json(app: axum::Router, uri: &str, moderator: bool) -> (StatusCode, serde_json::Value) {
    let mut builder = axum::http::Request::builder().method("GET").uri(uri);
    if moderator {
        builder = builder
            .header("x-caller-id", "mod-1")
            .header("x-caller-role", "moderator");
    }
    let request = builder.body(axum::body::Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _repo, _temp) = setup_test_app().await;

    let (status, json) = get_json(app, "/health", false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_ready_reports_definition_count() {
    let (app, _repo, _temp) = setup_test_app().await;

    let (status, json) = get_json(app, "/ready", false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ready");
    assert_eq!(json["leaderboards"], 2);
}

#[tokio::test]
async fn test_published_snapshot_served_from_store() {
    let (app, repo, _temp) = setup_test_app().await;
    let day = date("2024-03-04");

    repo.publish_snapshot(
        &LeaderboardId::new("daily-xp"),
        day,
        &[
            ScoredRow::new("ada", 120).with_metadata(serde_json::json!({"name": "Ada"})),
            ScoredRow::new("bob", 95),
            ScoredRow::new("cyd", 95),
            ScoredRow::new("dee", 40),
            ScoredRow::new("eve", 10),
        ],
    )
    .await
    .unwrap();

    let (status, json) = get_json(app.clone(), "/v1/leaderboards/daily-xp?date=2024-03-04", false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 5);
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["metadata"]["name"], "Ada");
    assert_eq!(entries[1]["rank"], 2);
    assert_eq!(entries[2]["rank"], 2);

    let (status, json) = get_json(
        app,
        "/v1/leaderboards/daily-xp/positions?date=2024-03-04&entityId=eve",
        false,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["entry"]["rank"], 5);
    assert_eq!(json["above"]["entityId"], "dee");
}

#[tokio::test]
async fn test_unpublished_date_is_not_found() {
    let (app, _repo, _temp) = setup_test_app().await;

    let (status, json) = get_json(app, "/v1/leaderboards/daily-xp?date=2024-03-04", false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_published_empty_snapshot_is_empty_page() {
    let (app, repo, _temp) = setup_test_app().await;

    repo.publish_snapshot(&LeaderboardId::new("daily-xp"), date("2024-03-04"), &[])
        .await
        .unwrap();

    let (status, json) = get_json(app, "/v1/leaderboards/daily-xp?date=2024-03-04", false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 0);
    assert_eq!(json["entries"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_monthly_board_reads_first_of_month_for_moderators() {
    let (app, repo, _temp) = setup_test_app().await;

    repo.publish_snapshot(
        &LeaderboardId::new("monthly-reports"),
        date("2024-03-01"),
        &[ScoredRow::new("spammer", 7).hidden()],
    )
    .await
    .unwrap();

    let (status, _) = get_json(
        app.clone(),
        "/v1/leaderboards/monthly-reports?date=2024-03-19",
        false,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = get_json(
        app,
        "/v1/leaderboards/monthly-reports?date=2024-03-19",
        true,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["date"], "2024-03-01");
    assert_eq!(json["entries"][0]["entityId"], "spammer");
    assert_eq!(json["entries"][0]["hidden"], true);
}
