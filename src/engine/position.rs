//! "You are here" lookups against the untruncated ranking.

use crate::domain::{EntityId, PositionResult};
use crate::engine::RankedBoard;

pub struct PositionResolver;

impl PositionResolver {
    /// Resolve an entity's entry and its immediate neighbours.
    ///
    /// Works on the full ranking, so entities cut by `maxEntries` still get
    /// their true rank. An entity with no row yields `NotRanked`.
    pub fn position_of(board: &RankedBoard, entity_id: &EntityId) -> PositionResult {
        let Some(idx) = board.position_index(entity_id) else {
            return PositionResult::NotRanked {
                entity_id: entity_id.clone(),
            };
        };

        let full = board.full();
        PositionResult::Ranked {
            entry: full[idx].clone(),
            above: idx.checked_sub(1).map(|i| full[i].clone()),
            below: full.get(idx + 1).cloned(),
        }
    }
}
