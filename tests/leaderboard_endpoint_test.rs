use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use standings::api::{self, AppState};
use standings::domain::{
    HiddenRows, LeaderboardDefinition, ReportDate, ScoredRow, ScoringWindow, Visibility,
};
use standings::orchestration::{PageLimits, StandingsService};
use standings::{LeaderboardRegistry, ManualClock, MockScoreFeed};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

struct TestApp {
    app: axum::Router,
    feed: Arc<MockScoreFeed>,
}

fn date(s: &str) -> ReportDate {
    s.parse().unwrap()
}

fn sample_rows() -> Vec<ScoredRow> {
    vec![
        ScoredRow::new("A", 100).with_metadata(serde_json::json!({"name": "Ada"})),
        ScoredRow::new("B", 90),
        ScoredRow::new("C", 90),
        ScoredRow::new("D", 80),
    ]
}

fn setup_test_app() -> TestApp {
    let registry = LeaderboardRegistry::from_definitions(vec![
        LeaderboardDefinition::new("weekly", "Weekly").with_scoring_window(ScoringWindow::Weekly),
        LeaderboardDefinition::new("flagged", "Flagged accounts")
            .with_visibility(Visibility::ModeratorOnly),
        LeaderboardDefinition::new("top2", "Top two").with_max_entries(2),
        LeaderboardDefinition::new("masked", "Masked").with_hidden_rows(HiddenRows::Redact),
    ])
    .unwrap();

    let day = date("2024-03-04");
    let mut with_hidden = sample_rows();
    with_hidden[1] = ScoredRow::new("B", 90).hidden();

    let feed = Arc::new(
        MockScoreFeed::new()
            .with_rows("weekly", day, with_hidden.clone())
            .with_rows("flagged", day, sample_rows())
            .with_rows("top2", day, sample_rows())
            .with_rows("masked", day, with_hidden),
    );

    let now: DateTime<Utc> = "2024-03-06T12:00:00Z".parse().unwrap();
    let service = StandingsService::new(
        Arc::new(registry),
        feed.clone(),
        Arc::new(ManualClock::new(now)),
        Duration::from_secs(1),
        PageLimits {
            default_page_size: 50,
            max_page_size: 100,
        },
    );

    TestApp {
        app: api::create_router(AppState::new(Arc::new(service))),
        feed,
    }
}

async fn request(
    app: axum::Router,
    uri: &str,
    caller: Option<(&str, bool)>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = axum::http::Request::builder().method("GET").uri(uri);
    if let Some((id, is_moderator)) = caller {
        builder = builder.header("x-caller-id", id);
        if is_moderator {
            builder = builder.header("x-caller-role", "moderator");
        }
    }
    let req = builder.body(axum::body::Body::empty()).unwrap();

    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

fn ids(v: &serde_json::Value, field: &str) -> Vec<String> {
    v.as_array()
        .unwrap()
        .iter()
        .map(|e| e[field].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_list_filters_moderator_only_boards() {
    let t = setup_test_app();

    let (status, body) = request(t.app.clone(), "/v1/leaderboards", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body, "id"), vec!["weekly", "top2", "masked"]);

    let (status, body) = request(t.app.clone(), "/v1/leaderboards", Some(("mod", true))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body, "id"), vec!["weekly", "flagged", "top2", "masked"]);
    assert_eq!(body[1]["visibility"], "moderator-only");
    assert_eq!(body[1]["title"], "Flagged accounts");
}

#[tokio::test]
async fn test_competition_ranks_in_page() {
    let t = setup_test_app();

    let (status, body) =
        request(t.app.clone(), "/v1/leaderboards/top2?date=2024-03-04&pageSize=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["leaderboardId"], "top2");
    assert_eq!(body["date"], "2024-03-04");
    assert_eq!(body["total"], 4);
    assert_eq!(body["hasMore"], false);

    let entries = &body["entries"];
    assert_eq!(ids(entries, "entityId"), vec!["A", "B"]);
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[0]["score"], 100.0);
    assert_eq!(entries[0]["metadata"]["name"], "Ada");
    assert_eq!(entries[1]["rank"], 2);
}

#[tokio::test]
async fn test_moderator_sees_all_ranks_with_ties() {
    let t = setup_test_app();

    let (status, body) = request(
        t.app.clone(),
        "/v1/leaderboards/flagged?date=2024-03-04",
        Some(("mod", true)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ranks: Vec<i64> = body["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["rank"].as_i64().unwrap())
        .collect();
    assert_eq!(ranks, vec![1, 2, 2, 4]);
}

#[tokio::test]
async fn test_weekly_date_normalizes_to_week_start() {
    let t = setup_test_app();

    // Wednesday and Monday of the same ISO week hit the same snapshot.
    let (status, body) =
        request(t.app.clone(), "/v1/leaderboards/weekly?date=2024-03-06", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2024-03-04");

    let (status, _) = request(t.app.clone(), "/v1/leaderboards/weekly?date=2024-03-04", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(t.feed.fetch_count(), 1);
}

#[tokio::test]
async fn test_hidden_rows_stripped_for_public_only() {
    let t = setup_test_app();

    let (_, public) = request(t.app.clone(), "/v1/leaderboards/weekly?date=2024-03-04", None).await;
    assert_eq!(ids(&public["entries"], "entityId"), vec!["A", "C", "D"]);
    assert_eq!(public["entries"][1]["rank"], 2);
    assert_eq!(public["total"], 3);

    let (_, moderator) = request(
        t.app.clone(),
        "/v1/leaderboards/weekly?date=2024-03-04",
        Some(("mod", true)),
    )
    .await;
    assert_eq!(ids(&moderator["entries"], "entityId"), vec!["A", "B", "C", "D"]);
    assert_eq!(moderator["entries"][1]["hidden"], true);
}

#[tokio::test]
async fn test_hidden_rows_redacted_in_place() {
    let t = setup_test_app();

    let (status, body) =
        request(t.app.clone(), "/v1/leaderboards/masked?date=2024-03-04", None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = &body["entries"];
    assert_eq!(ids(entries, "entityId"), vec!["A", "redacted", "C", "D"]);
    assert_eq!(entries[1]["rank"], 2);
    assert_eq!(entries[1]["redacted"], true);
    assert!(entries[1]["metadata"].is_null());
    assert!(entries[0].get("redacted").is_none());
}

#[tokio::test]
async fn test_forbidden_for_non_moderator_everywhere() {
    let t = setup_test_app();

    let (status, body) =
        request(t.app.clone(), "/v1/leaderboards/flagged?date=2024-03-04", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("flagged"));

    let (status, _) = request(
        t.app.clone(),
        "/v1/leaderboards/flagged/positions?date=2024-03-04&entityId=A",
        Some(("alice", false)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(t.feed.fetch_count(), 0);
}

#[tokio::test]
async fn test_not_found_and_bad_request() {
    let t = setup_test_app();

    let (status, _) = request(t.app.clone(), "/v1/leaderboards/nope?date=2024-03-04", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Published boards, unpublished date.
    let (status, _) = request(t.app.clone(), "/v1/leaderboards/top2?date=2023-01-01", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = request(t.app.clone(), "/v1/leaderboards/top2", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("date"));

    let (status, _) = request(t.app.clone(), "/v1/leaderboards/top2?date=2024-13-40", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
        t.app.clone(),
        "/v1/leaderboards/top2?date=2024-03-04&pageSize=1000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        request(t.app.clone(), "/v1/leaderboards/top2?date=2024-03-04&page=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_numeric_paging_is_json_bad_request() {
    let t = setup_test_app();

    for uri in [
        "/v1/leaderboards/top2?date=2024-03-04&page=abc",
        "/v1/leaderboards/top2?date=2024-03-04&pageSize=ten",
        "/v1/leaderboards/top2?date=2024-03-04&page=-1",
    ] {
        let (status, body) = request(t.app.clone(), uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].is_string(), "{}", uri);
    }
    assert_eq!(t.feed.fetch_count(), 0);
}

#[tokio::test]
async fn test_position_with_neighbors() {
    let t = setup_test_app();

    let (status, body) = request(
        t.app.clone(),
        "/v1/leaderboards/flagged/positions?date=2024-03-04&entityId=D",
        Some(("mod", true)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ranked");
    assert_eq!(body["entry"]["rank"], 4);
    assert_eq!(body["above"]["entityId"], "C");
    assert!(body["below"].is_null());
}

#[tokio::test]
async fn test_position_of_truncated_entity_keeps_true_rank() {
    let t = setup_test_app();

    let (status, body) = request(
        t.app.clone(),
        "/v1/leaderboards/top2/positions?date=2024-03-04&entityId=D",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["rank"], 4);
}

#[tokio::test]
async fn test_position_defaults_to_caller() {
    let t = setup_test_app();

    let (status, body) = request(
        t.app.clone(),
        "/v1/leaderboards/top2/positions?date=2024-03-04",
        Some(("C", false)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["entityId"], "C");
    assert_eq!(body["entry"]["rank"], 2);
    assert_eq!(body["above"]["entityId"], "B");
    assert_eq!(body["below"]["entityId"], "D");
}

#[tokio::test]
async fn test_position_without_identity_is_bad_request() {
    let t = setup_test_app();

    let (status, _) = request(
        t.app.clone(),
        "/v1/leaderboards/top2/positions?date=2024-03-04",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_position_for_absent_entity_is_not_ranked() {
    let t = setup_test_app();

    let (status, body) = request(
        t.app.clone(),
        "/v1/leaderboards/top2/positions?date=2024-03-04&entityId=nobody",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "notRanked");
    assert_eq!(body["entityId"], "nobody");
    assert!(body.get("entry").is_none());
}

#[tokio::test]
async fn test_hidden_entity_not_ranked_for_public_caller() {
    let t = setup_test_app();

    let (_, public) = request(
        t.app.clone(),
        "/v1/leaderboards/masked/positions?date=2024-03-04&entityId=B",
        None,
    )
    .await;
    assert_eq!(public["status"], "notRanked");

    let (_, moderator) = request(
        t.app.clone(),
        "/v1/leaderboards/masked/positions?date=2024-03-04&entityId=B",
        Some(("mod", true)),
    )
    .await;
    assert_eq!(moderator["entry"]["rank"], 2);
}

#[tokio::test]
async fn test_upstream_failure_is_service_unavailable() {
    let t = setup_test_app();
    t.feed.set_failing(true);

    let (status, body) =
        request(t.app.clone(), "/v1/leaderboards/top2?date=2024-03-04", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());
}
