//! In-memory score feed for tests: canned rows, a call counter, latency and failure switches.

use super::{FeedError, ScoreFeed};
use crate::domain::{LeaderboardId, ReportDate, ScoredRow};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct MockScoreFeed {
    rows: RwLock<HashMap<(LeaderboardId, ReportDate), Vec<ScoredRow>>>,
    delay: Option<Duration>,
    failing: AtomicBool,
    fetches: AtomicUsize,
}

impl MockScoreFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish rows for a leaderboard/date.
    pub fn with_rows(self, leaderboard_id: &str, date: ReportDate, rows: Vec<ScoredRow>) -> Self {
        self.set_rows(leaderboard_id, date, rows);
        self
    }

    /// Sleep this long inside every fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace (or publish) rows at runtime, simulating an upstream change.
    pub fn set_rows(&self, leaderboard_id: &str, date: ReportDate, rows: Vec<ScoredRow>) {
        self.rows
            .write()
            .insert((LeaderboardId::new(leaderboard_id), date), rows);
    }

    /// Make subsequent fetches fail with a network error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of fetches attempted so far, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoreFeed for MockScoreFeed {
    async fn fetch_scored_rows(
        &self,
        leaderboard_id: &LeaderboardId,
        date: ReportDate,
    ) -> Result<Vec<ScoredRow>, FeedError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(FeedError::NetworkError("mock feed unavailable".to_string()));
        }

        self.rows
            .read()
            .get(&(leaderboard_id.clone(), date))
            .cloned()
            .ok_or_else(|| FeedError::no_data(leaderboard_id, date))
    }
}
