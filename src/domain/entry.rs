//! Rows in, ranked entries and pages out.

use serde::{Deserialize, Serialize};

use super::{EntityId, LeaderboardId, ReportDate, Score};

/// One entity's raw input for a leaderboard/date, as supplied by the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRow {
    pub entity_id: EntityId,
    pub score: Score,
    /// Opaque display fields (name, avatar, ...).
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// Set for rows belonging to disabled entities.
    #[serde(default)]
    pub hidden: bool,
}

impl ScoredRow {
    pub fn new(entity_id: impl Into<String>, score: impl Into<Score>) -> Self {
        Self {
            entity_id: EntityId::new(entity_id),
            score: score.into(),
            metadata: serde_json::Value::Null,
            hidden: false,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based standard competition rank.
    pub rank: u32,
    pub entity_id: EntityId,
    pub score: Score,
    pub metadata: serde_json::Value,
    /// Previous period rank minus current rank; positive means the entity climbed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<i64>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub redacted: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Pagination parameters for `GetLeaderboard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.page_size as usize)
    }
}

/// One page of a ranked leaderboard; the unit stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardPage {
    pub leaderboard_id: LeaderboardId,
    pub date: ReportDate,
    pub page: u32,
    pub page_size: u32,
    /// Ranked population visible to the caller, before any `maxEntries` cap.
    pub total: usize,
    pub has_more: bool,
    pub entries: Vec<LeaderboardEntry>,
}

/// Outcome of resolving one entity's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PositionResult {
    #[serde(rename_all = "camelCase")]
    Ranked {
        entry: LeaderboardEntry,
        above: Option<LeaderboardEntry>,
        below: Option<LeaderboardEntry>,
    },
    #[serde(rename_all = "camelCase")]
    NotRanked { entity_id: EntityId },
}

impl PositionResult {
    pub fn rank(&self) -> Option<u32> {
        match self {
            PositionResult::Ranked { entry, .. } => Some(entry.rank),
            PositionResult::NotRanked { .. } => None,
        }
    }

    pub fn is_ranked(&self) -> bool {
        matches!(self, PositionResult::Ranked { .. })
    }
}
