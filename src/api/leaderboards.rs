use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::AppState;
use crate::domain::{Caller, LeaderboardPage, LeaderboardSummary, ReportDate};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    pub date: Option<String>,
    // Parsed by `parse_number` so malformed values get the JSON error body.
    pub page: Option<String>,
    pub page_size: Option<String>,
}

pub async fn list_leaderboards(
    State(state): State<AppState>,
    caller: Caller,
) -> Json<Vec<LeaderboardSummary>> {
    Json(state.service.list_leaderboards(&caller))
}

pub async fn get_leaderboard(
    Path(leaderboard_id): Path<String>,
    Query(params): Query<LeaderboardQuery>,
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<LeaderboardPage>, AppError> {
    let date = parse_date(params.date.as_deref())?;
    let page = state
        .service
        .page_limits()
        .resolve(
            parse_number("page", params.page.as_deref())?,
            parse_number("pageSize", params.page_size.as_deref())?,
        )?;

    let result = state
        .service
        .get_leaderboard(&caller, &leaderboard_id, date, page)
        .await?;

    Ok(Json(LeaderboardPage::clone(&result)))
}

pub(crate) fn parse_date(raw: Option<&str>) -> Result<ReportDate, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("date is required (YYYY-MM-DD)".to_string()))?;
    raw.parse::<ReportDate>()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

fn parse_number(name: &str, raw: Option<&str>) -> Result<Option<u32>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse::<u32>().map(Some).map_err(|_| {
            AppError::BadRequest(format!("{} must be a positive integer, got {:?}", name, value))
        }),
    }
}
