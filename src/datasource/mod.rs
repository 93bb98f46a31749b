//! Score feed abstraction: where raw scored rows come from.

use crate::domain::{LeaderboardId, ReportDate, ScoredRow};
use async_trait::async_trait;
use std::fmt;

pub mod http;
pub mod mock;
pub mod store;

pub use http::HttpScoreFeed;
pub use mock::MockScoreFeed;
pub use store::StoreScoreFeed;

/// Supplier of scored rows for one leaderboard and reporting date.
///
/// Implementations do not retry; retry policy belongs to the caller.
#[async_trait]
pub trait ScoreFeed: Send + Sync + fmt::Debug {
    /// Fetch every row for a leaderboard/date.
    ///
    /// # Returns
    /// The rows in no particular order. An empty vector means the date was
    /// published with no entrants; an unpublished date is `FeedError::NoData`.
    async fn fetch_scored_rows(
        &self,
        leaderboard_id: &LeaderboardId,
        date: ReportDate,
    ) -> Result<Vec<ScoredRow>, FeedError>;
}

/// Error type for feed operations.
#[derive(Debug, Clone)]
pub enum FeedError {
    /// Nothing has been published for this leaderboard/date.
    NoData {
        leaderboard_id: LeaderboardId,
        date: ReportDate,
    },
    /// Transport failure (connection refused, DNS, database unreachable)
    NetworkError(String),
    /// Upstream answered with a non-success status
    HttpError { status: u16, message: String },
    /// Malformed payload
    ParseError(String),
}

impl FeedError {
    pub fn no_data(leaderboard_id: &LeaderboardId, date: ReportDate) -> Self {
        FeedError::NoData {
            leaderboard_id: leaderboard_id.clone(),
            date,
        }
    }
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::NoData {
                leaderboard_id,
                date,
            } => write!(f, "No data for {} on {}", leaderboard_id, date),
            FeedError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            FeedError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            FeedError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for FeedError {}
