pub mod standings;

pub use standings::{BoardBuilder, BoardCache, PageLimits, StandingsService};
