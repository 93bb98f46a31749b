//! Score feed served by an upstream HTTP service.

use super::{FeedError, ScoreFeed};
use crate::domain::{LeaderboardId, ReportDate, ScoredRow};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

/// Fetches `GET {base_url}/leaderboards/{id}/rows?date=YYYY-MM-DD`.
///
/// The response body is a JSON array of scored rows. A 404 means the date
/// has not been published. No retries are attempted here.
#[derive(Debug, Clone)]
pub struct HttpScoreFeed {
    client: Client,
    base_url: String,
}

impl HttpScoreFeed {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn rows_url(&self, leaderboard_id: &LeaderboardId) -> String {
        format!("{}/leaderboards/{}/rows", self.base_url, leaderboard_id)
    }
}

#[async_trait]
impl ScoreFeed for HttpScoreFeed {
    async fn fetch_scored_rows(
        &self,
        leaderboard_id: &LeaderboardId,
        date: ReportDate,
    ) -> Result<Vec<ScoredRow>, FeedError> {
        let url = self.rows_url(leaderboard_id);
        debug!(url = %url, date = %date, "Fetching scored rows");

        let response = self
            .client
            .get(&url)
            .query(&[("date", date.to_string())])
            .send()
            .await
            .map_err(|e| FeedError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FeedError::no_data(leaderboard_id, date));
        }
        if !status.is_success() {
            return Err(FeedError::HttpError {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Unexpected status")
                    .to_string(),
            });
        }

        response
            .json::<Vec<ScoredRow>>()
            .await
            .map_err(|e| FeedError::ParseError(e.to_string()))
    }
}
