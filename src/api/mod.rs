pub mod caller;
pub mod health;
pub mod leaderboards;
pub mod positions;

use crate::orchestration::StandingsService;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StandingsService>,
}

impl AppState {
    pub fn new(service: Arc<StandingsService>) -> Self {
        Self { service }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/leaderboards", get(leaderboards::list_leaderboards))
        .route("/v1/leaderboards/:id", get(leaderboards::get_leaderboard))
        .route(
            "/v1/leaderboards/:id/positions",
            get(positions::get_leaderboard_positions),
        )
        .layer(cors)
        .with_state(state)
}
