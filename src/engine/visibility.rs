//! Row-level visibility: what a non-moderator may see of hidden rows.
//!
//! Leaderboard-level visibility is enforced by the registry; this filter
//! handles public boards that still contain rows of disabled entities.

use crate::domain::{EntityId, HiddenRows, LeaderboardDefinition, LeaderboardEntry, Privilege};

pub struct VisibilityFilter;

impl VisibilityFilter {
    /// Apply the definition's hidden-row policy for the given privilege.
    ///
    /// Ranks are never renumbered: surviving entries keep the rank they hold
    /// in the full population.
    pub fn filter_entries(
        entries: Vec<LeaderboardEntry>,
        definition: &LeaderboardDefinition,
        privilege: Privilege,
    ) -> Vec<LeaderboardEntry> {
        if privilege.is_moderator() {
            return entries;
        }

        match definition.hidden_rows {
            HiddenRows::Strip => entries.into_iter().filter(|e| !e.hidden).collect(),
            HiddenRows::Redact => entries.into_iter().map(redact_if_hidden).collect(),
        }
    }
}

fn redact_if_hidden(entry: LeaderboardEntry) -> LeaderboardEntry {
    if !entry.hidden {
        return entry;
    }
    LeaderboardEntry {
        entity_id: EntityId::redacted(),
        metadata: serde_json::Value::Null,
        hidden: false,
        redacted: true,
        ..entry
    }
}
