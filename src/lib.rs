pub mod api;
pub mod cache;
pub mod config;
pub mod datasource;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod registry;

pub use cache::{Clock, ManualClock, SystemClock, TimeWindowedCache};
pub use config::Config;
pub use datasource::{FeedError, HttpScoreFeed, MockScoreFeed, ScoreFeed, StoreScoreFeed};
pub use db::{init_db, Repository};
pub use domain::{
    Caller, EntityId, LeaderboardDefinition, LeaderboardEntry, LeaderboardId, LeaderboardPage,
    PageRequest, PositionResult, Privilege, ReportDate, Score, ScoredRow,
};
pub use error::AppError;
pub use orchestration::{PageLimits, StandingsService};
pub use registry::LeaderboardRegistry;
