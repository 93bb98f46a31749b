//! Leaderboard definitions, loaded once at startup and read-only afterwards.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::{LeaderboardDefinition, Privilege};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown leaderboard: {0}")]
    NotFound(String),
    #[error("leaderboard {0} is restricted to moderators")]
    Forbidden(String),
    #[error("duplicate leaderboard id: {0}")]
    DuplicateId(String),
    #[error("leaderboard {0}: maxEntries must be greater than zero")]
    InvalidMaxEntries(String),
    #[error("failed to read definitions file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse definitions: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Registry of leaderboard definitions in their configured (curated) order.
#[derive(Debug, Default)]
pub struct LeaderboardRegistry {
    definitions: Vec<Arc<LeaderboardDefinition>>,
    by_id: HashMap<String, usize>,
}

impl LeaderboardRegistry {
    /// Build a registry, keeping the given order.
    pub fn from_definitions(
        definitions: Vec<LeaderboardDefinition>,
    ) -> Result<Self, RegistryError> {
        let mut by_id = HashMap::with_capacity(definitions.len());
        for (idx, def) in definitions.iter().enumerate() {
            if def.max_entries == Some(0) {
                return Err(RegistryError::InvalidMaxEntries(def.id.to_string()));
            }
            if by_id.insert(def.id.as_str().to_string(), idx).is_some() {
                return Err(RegistryError::DuplicateId(def.id.to_string()));
            }
        }

        Ok(Self {
            definitions: definitions.into_iter().map(Arc::new).collect(),
            by_id,
        })
    }

    /// Parse a JSON array of definitions.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let definitions: Vec<LeaderboardDefinition> = serde_json::from_str(json)?;
        Self::from_definitions(definitions)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let registry = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            count = registry.len(),
            "Loaded leaderboard definitions"
        );
        Ok(registry)
    }

    /// Definitions visible to the caller, in configured order.
    pub fn list_definitions(&self, caller_is_moderator: bool) -> Vec<Arc<LeaderboardDefinition>> {
        self.definitions
            .iter()
            .filter(|def| caller_is_moderator || !def.is_moderator_only())
            .cloned()
            .collect()
    }

    /// Look up a definition, re-checking visibility for the caller.
    pub fn resolve(
        &self,
        id: &str,
        privilege: Privilege,
    ) -> Result<Arc<LeaderboardDefinition>, RegistryError> {
        let def = self
            .by_id
            .get(id)
            .map(|idx| &self.definitions[*idx])
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        if def.is_moderator_only() && !privilege.is_moderator() {
            return Err(RegistryError::Forbidden(id.to_string()));
        }

        Ok(Arc::clone(def))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
