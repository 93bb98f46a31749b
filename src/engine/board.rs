//! A ranked leaderboard computed once, with full and capped views derived from it.

use std::collections::HashMap;

use crate::domain::{
    EntityId, LeaderboardEntry, LeaderboardId, LeaderboardPage, PageRequest, ReportDate,
};

/// Privilege-filtered ranking for one (leaderboard, date).
///
/// `entries` is the untruncated ranking; `max_entries` only limits what is
/// paged out to clients. Position lookups go through `index` so they never
/// scan the sequence.
#[derive(Debug, Clone)]
pub struct RankedBoard {
    leaderboard_id: LeaderboardId,
    date: ReportDate,
    entries: Vec<LeaderboardEntry>,
    max_entries: Option<usize>,
    index: HashMap<EntityId, usize>,
}

impl RankedBoard {
    pub fn new(
        leaderboard_id: LeaderboardId,
        date: ReportDate,
        entries: Vec<LeaderboardEntry>,
        max_entries: Option<usize>,
    ) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.redacted)
            .map(|(idx, entry)| (entry.entity_id.clone(), idx))
            .collect();

        Self {
            leaderboard_id,
            date,
            entries,
            max_entries,
            index,
        }
    }

    pub fn leaderboard_id(&self) -> &LeaderboardId {
        &self.leaderboard_id
    }

    pub fn date(&self) -> ReportDate {
        self.date
    }

    /// Every ranked entry, regardless of `max_entries`.
    pub fn full(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// The client-facing view, capped at `max_entries`.
    pub fn truncated(&self) -> &[LeaderboardEntry] {
        match self.max_entries {
            Some(max) if max < self.entries.len() => &self.entries[..max],
            _ => &self.entries,
        }
    }

    /// Index of an entity within `full()`.
    pub fn position_index(&self, entity_id: &EntityId) -> Option<usize> {
        self.index.get(entity_id).copied()
    }

    /// Slice one page out of the truncated view.
    pub fn page(&self, request: PageRequest) -> LeaderboardPage {
        let visible = self.truncated();
        let start = request.offset().min(visible.len());
        let end = start
            .saturating_add(request.page_size as usize)
            .min(visible.len());

        LeaderboardPage {
            leaderboard_id: self.leaderboard_id.clone(),
            date: self.date,
            page: request.page,
            page_size: request.page_size,
            total: self.entries.len(),
            has_more: end < visible.len(),
            entries: visible[start..end].to_vec(),
        }
    }
}
