//! The three query operations: list, page, position.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheKey, Clock, TimeWindowedCache};
use crate::datasource::ScoreFeed;
use crate::domain::{
    Caller, EntityId, LeaderboardDefinition, LeaderboardPage, LeaderboardSummary, PageRequest,
    PositionResult, Privilege, ReportDate, ScoredRow,
};
use crate::engine::{PositionResolver, RankedBoard, RankingEngine, VisibilityFilter};
use crate::error::AppError;
use crate::registry::LeaderboardRegistry;

const GET_LEADERBOARD: &str = "GetLeaderboard";
const RANKED_BOARD: &str = "RankedBoard";

/// Fetches rows under a deadline and turns them into a privilege-filtered board.
#[derive(Clone)]
pub struct BoardBuilder {
    feed: Arc<dyn ScoreFeed>,
    feed_timeout: Duration,
}

impl BoardBuilder {
    pub fn new(feed: Arc<dyn ScoreFeed>, feed_timeout: Duration) -> Self {
        Self { feed, feed_timeout }
    }

    /// Rank the full population, decorate deltas, then apply row visibility.
    ///
    /// `date` must already be the definition's reporting date.
    pub async fn build(
        &self,
        definition: &LeaderboardDefinition,
        date: ReportDate,
        privilege: Privilege,
    ) -> Result<RankedBoard, AppError> {
        let rows = self.fetch(definition, date).await?;
        let mut entries = RankingEngine::rank(rows);

        if definition.track_delta {
            let previous_date = definition.scoring_window.previous_period(date);
            match self.fetch(definition, previous_date).await {
                Ok(previous_rows) => {
                    let previous = RankingEngine::rank(previous_rows);
                    RankingEngine::apply_deltas(&mut entries, &previous);
                }
                Err(e) => {
                    tracing::warn!(
                        leaderboard = %definition.id,
                        date = %previous_date,
                        error = %e,
                        "Previous period unavailable; serving without rank deltas"
                    );
                }
            }
        }

        let entries = VisibilityFilter::filter_entries(entries, definition, privilege);
        Ok(RankedBoard::new(
            definition.id.clone(),
            date,
            entries,
            definition.max_entries,
        ))
    }

    async fn fetch(
        &self,
        definition: &LeaderboardDefinition,
        date: ReportDate,
    ) -> Result<Vec<ScoredRow>, AppError> {
        let fetched = tokio::time::timeout(
            self.feed_timeout,
            self.feed.fetch_scored_rows(&definition.id, date),
        )
        .await;

        match fetched {
            Ok(Ok(rows)) => Ok(rows),
            Ok(Err(e)) => {
                let err = AppError::from(e);
                if matches!(err, AppError::UpstreamUnavailable(_)) {
                    tracing::error!(leaderboard = %definition.id, date = %date, error = %err, "Score feed failed");
                }
                Err(err)
            }
            Err(_) => {
                tracing::error!(
                    leaderboard = %definition.id,
                    date = %date,
                    timeout_ms = self.feed_timeout.as_millis() as u64,
                    "Score feed timed out"
                );
                Err(AppError::UpstreamUnavailable(format!(
                    "score feed timed out after {}ms",
                    self.feed_timeout.as_millis()
                )))
            }
        }
    }
}

/// Ranked boards memoized per (leaderboard, reporting date, privilege) until
/// the next UTC midnight.
///
/// Pages and position lookups for one board on one day all read the same
/// ranking, so they agree with each other and cost one feed fetch between them.
#[derive(Clone)]
pub struct BoardCache {
    builder: BoardBuilder,
    boards: TimeWindowedCache<Arc<RankedBoard>, AppError>,
}

impl BoardCache {
    pub fn new(builder: BoardBuilder, clock: Arc<dyn Clock>) -> Self {
        Self {
            builder,
            boards: TimeWindowedCache::new(clock),
        }
    }

    /// `date` must already be the definition's reporting date.
    pub async fn board(
        &self,
        definition: Arc<LeaderboardDefinition>,
        date: ReportDate,
        privilege: Privilege,
    ) -> Result<Arc<RankedBoard>, AppError> {
        let key = CacheKey::derive(
            RANKED_BOARD,
            [
                ("leaderboardId", definition.id.to_string()),
                ("date", date.to_string()),
            ],
            privilege,
        );

        let builder = self.builder.clone();
        let board = self
            .boards
            .get_or_compute(key, move || async move {
                let board = builder.build(&definition, date, privilege).await?;
                Ok::<_, AppError>(Arc::new(board))
            })
            .await?;

        Ok(board)
    }
}

/// Page-size limits applied to `GetLeaderboard`.
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl PageLimits {
    /// Fill defaults and validate a client's pagination parameters.
    pub fn resolve(&self, page: Option<u32>, page_size: Option<u32>) -> Result<PageRequest, AppError> {
        let page = page.unwrap_or(1);
        let page_size = page_size.unwrap_or(self.default_page_size);

        if page == 0 {
            return Err(AppError::BadRequest("page must be >= 1".to_string()));
        }
        if page_size == 0 || page_size > self.max_page_size {
            return Err(AppError::BadRequest(format!(
                "pageSize must be between 1 and {}",
                self.max_page_size
            )));
        }
        Ok(PageRequest::new(page, page_size))
    }
}

pub struct StandingsService {
    registry: Arc<LeaderboardRegistry>,
    boards: BoardCache,
    pages: TimeWindowedCache<Arc<LeaderboardPage>, AppError>,
    page_limits: PageLimits,
}

impl StandingsService {
    pub fn new(
        registry: Arc<LeaderboardRegistry>,
        feed: Arc<dyn ScoreFeed>,
        clock: Arc<dyn Clock>,
        feed_timeout: Duration,
        page_limits: PageLimits,
    ) -> Self {
        Self {
            registry,
            boards: BoardCache::new(BoardBuilder::new(feed, feed_timeout), clock.clone()),
            pages: TimeWindowedCache::new(clock),
            page_limits,
        }
    }

    pub fn registry(&self) -> &LeaderboardRegistry {
        &self.registry
    }

    pub fn page_limits(&self) -> PageLimits {
        self.page_limits
    }

    /// `ListLeaderboards`: cheap and static, never cached.
    pub fn list_leaderboards(&self, caller: &Caller) -> Vec<LeaderboardSummary> {
        self.registry
            .list_definitions(caller.is_moderator)
            .iter()
            .map(|def| def.summary())
            .collect()
    }

    /// `GetLeaderboard`: one page, served through the day-partitioned cache
    /// and sliced from the day's shared ranked board.
    pub async fn get_leaderboard(
        &self,
        caller: &Caller,
        leaderboard_id: &str,
        date: ReportDate,
        page: PageRequest,
    ) -> Result<Arc<LeaderboardPage>, AppError> {
        let privilege = caller.privilege();
        let definition = self.registry.resolve(leaderboard_id, privilege)?;
        let date = definition.scoring_window.reporting_date(date);

        let key = CacheKey::derive(
            GET_LEADERBOARD,
            [
                ("leaderboardId", definition.id.to_string()),
                ("date", date.to_string()),
                ("page", page.page.to_string()),
                ("pageSize", page.page_size.to_string()),
            ],
            privilege,
        );

        let boards = self.boards.clone();
        let page_result = self
            .pages
            .get_or_compute(key, move || async move {
                let board = boards.board(definition, date, privilege).await?;
                Ok::<_, AppError>(Arc::new(board.page(page)))
            })
            .await?;

        Ok(page_result)
    }

    /// `GetLeaderboardPositions`: where one entity stands, with its neighbours,
    /// read from the same ranked board the pages are cut from.
    ///
    /// `entity_id` defaults to the caller's own identity.
    pub async fn get_leaderboard_positions(
        &self,
        caller: &Caller,
        leaderboard_id: &str,
        date: ReportDate,
        entity_id: Option<EntityId>,
    ) -> Result<PositionResult, AppError> {
        let privilege = caller.privilege();
        let definition = self.registry.resolve(leaderboard_id, privilege)?;

        let entity_id = entity_id.or_else(|| caller.id.clone()).ok_or_else(|| {
            AppError::BadRequest(
                "entityId is required when the caller is not authenticated".to_string(),
            )
        })?;

        let date = definition.scoring_window.reporting_date(date);
        let board = self.boards.board(definition, date, privilege).await?;
        Ok(PositionResolver::position_of(&board, &entity_id))
    }
}
