//! Leaderboard definitions: static metadata loaded once at startup.

use serde::{Deserialize, Serialize};

use super::{LeaderboardId, ReportDate};

/// Who may see a leaderboard at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    Public,
    ModeratorOnly,
}

/// How a requested date maps onto the reporting date the feed is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringWindow {
    Daily,
    Weekly,
    Monthly,
    AllTime,
}

impl ScoringWindow {
    /// Normalize a requested date to the start of its reporting period.
    pub fn reporting_date(&self, date: ReportDate) -> ReportDate {
        match self {
            ScoringWindow::Daily | ScoringWindow::AllTime => date,
            ScoringWindow::Weekly => date.week_start(),
            ScoringWindow::Monthly => date.month_start(),
        }
    }

    /// Reporting date of the period before the one containing `date`.
    pub fn previous_period(&self, date: ReportDate) -> ReportDate {
        match self {
            ScoringWindow::Daily | ScoringWindow::AllTime => date.shift_days(-1),
            ScoringWindow::Weekly => date.week_start().shift_days(-7),
            ScoringWindow::Monthly => date.previous_month_start(),
        }
    }
}

/// What non-moderators see of rows flagged hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HiddenRows {
    #[default]
    Strip,
    Redact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardDefinition {
    pub id: LeaderboardId,
    pub title: String,
    pub visibility: Visibility,
    pub scoring_window: ScoringWindow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
    #[serde(default)]
    pub hidden_rows: HiddenRows,
    #[serde(default)]
    pub track_delta: bool,
}

impl LeaderboardDefinition {
    /// A public daily board with no cap, no delta, stripped hidden rows.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: LeaderboardId::new(id),
            title: title.into(),
            visibility: Visibility::Public,
            scoring_window: ScoringWindow::Daily,
            max_entries: None,
            hidden_rows: HiddenRows::Strip,
            track_delta: false,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_scoring_window(mut self, window: ScoringWindow) -> Self {
        self.scoring_window = window;
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    pub fn with_hidden_rows(mut self, policy: HiddenRows) -> Self {
        self.hidden_rows = policy;
        self
    }

    pub fn with_delta(mut self) -> Self {
        self.track_delta = true;
        self
    }

    pub fn is_moderator_only(&self) -> bool {
        self.visibility == Visibility::ModeratorOnly
    }

    pub fn summary(&self) -> LeaderboardSummary {
        LeaderboardSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            visibility: self.visibility,
        }
    }
}

/// The listing shape returned by `ListLeaderboards`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSummary {
    pub id: LeaderboardId,
    pub title: String,
    pub visibility: Visibility,
}
