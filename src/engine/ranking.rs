//! Deterministic ranking of scored rows.
//!
//! Rows are ordered by score descending, then entity id ascending, so the
//! same input always yields the same order and the same pagination. Ranks
//! follow standard competition ranking ("1224"): equal scores share a rank
//! and the next distinct score skips ahead by the size of the tie group.

use std::collections::{HashMap, HashSet};

use crate::domain::{EntityId, LeaderboardEntry, ScoredRow};

pub struct RankingEngine;

impl RankingEngine {
    /// Rank a full row set. Never truncates; see `RankedBoard` for capped views.
    pub fn rank(mut rows: Vec<ScoredRow>) -> Vec<LeaderboardEntry> {
        rows.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.entity_id.cmp(&b.entity_id))
        });

        let mut seen: HashSet<EntityId> = HashSet::with_capacity(rows.len());
        let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(rows.len());

        for row in rows {
            if !seen.insert(row.entity_id.clone()) {
                tracing::warn!(
                    entity = %row.entity_id,
                    score = %row.score,
                    "Dropping duplicate row for entity"
                );
                continue;
            }

            let position = entries.len() as u32 + 1;
            let rank = match entries.last() {
                Some(prev) if prev.score == row.score => prev.rank,
                _ => position,
            };

            entries.push(LeaderboardEntry {
                rank,
                entity_id: row.entity_id,
                score: row.score,
                metadata: row.metadata,
                delta: None,
                hidden: row.hidden,
                redacted: false,
            });
        }

        entries
    }

    /// Decorate `current` with rank movement against the previous period's ranking.
    ///
    /// Entities with no previous rank keep `delta: None`.
    pub fn apply_deltas(current: &mut [LeaderboardEntry], previous: &[LeaderboardEntry]) {
        let previous_ranks: HashMap<&EntityId, u32> = previous
            .iter()
            .map(|entry| (&entry.entity_id, entry.rank))
            .collect();

        for entry in current.iter_mut() {
            entry.delta = previous_ranks
                .get(&entry.entity_id)
                .map(|prev| i64::from(*prev) - i64::from(entry.rank));
        }
    }
}
