//! Pure computation over scored rows: ranking, visibility, position lookup.
//!
//! Nothing here performs I/O or holds shared state, so it needs no locking.

pub mod board;
pub mod position;
pub mod ranking;
pub mod visibility;

pub use board::RankedBoard;
pub use position::PositionResolver;
pub use ranking::RankingEngine;
pub use visibility::VisibilityFilter;
