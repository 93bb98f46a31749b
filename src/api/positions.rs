use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::leaderboards::parse_date;
use crate::api::AppState;
use crate::domain::{Caller, EntityId, PositionResult};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionsQuery {
    pub date: Option<String>,
    pub entity_id: Option<String>,
}

pub async fn get_leaderboard_positions(
    Path(leaderboard_id): Path<String>,
    Query(params): Query<PositionsQuery>,
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<PositionResult>, AppError> {
    let date = parse_date(params.date.as_deref())?;
    let entity_id = params
        .entity_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(EntityId::new);

    let result = state
        .service
        .get_leaderboard_positions(&caller, &leaderboard_id, date, entity_id)
        .await?;

    Ok(Json(result))
}
