//! Domain types for the standings service.
//!
//! This module provides:
//! - Identifier and date primitives: LeaderboardId, EntityId, ReportDate
//! - Lossless Score values
//! - Leaderboard definitions, scored rows, ranked entries and pages
//! - The caller capability (privilege class) passed into every query

pub mod caller;
pub mod definition;
pub mod entry;
pub mod primitives;
pub mod score;

pub use caller::{Caller, Privilege};
pub use definition::{
    HiddenRows, LeaderboardDefinition, LeaderboardSummary, ScoringWindow, Visibility,
};
pub use entry::{LeaderboardEntry, LeaderboardPage, PageRequest, PositionResult, ScoredRow};
pub use primitives::{EntityId, LeaderboardId, ReportDate, ReportDateParseError};
pub use score::Score;
