//! Score feed backed by the local SQLite snapshot store.

use super::{FeedError, ScoreFeed};
use crate::db::Repository;
use crate::domain::{LeaderboardId, ReportDate, ScoredRow};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct StoreScoreFeed {
    repo: Arc<Repository>,
}

impl StoreScoreFeed {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }
}

impl fmt::Debug for StoreScoreFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreScoreFeed").finish_non_exhaustive()
    }
}

#[async_trait]
impl ScoreFeed for StoreScoreFeed {
    async fn fetch_scored_rows(
        &self,
        leaderboard_id: &LeaderboardId,
        date: ReportDate,
    ) -> Result<Vec<ScoredRow>, FeedError> {
        self.repo
            .query_scored_rows(leaderboard_id, date)
            .await
            .map_err(|e| FeedError::NetworkError(e.to_string()))?
            .ok_or_else(|| FeedError::no_data(leaderboard_id, date))
    }
}
