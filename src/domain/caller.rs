//! The caller capability threaded explicitly into every query.

use serde::{Deserialize, Serialize};

use super::EntityId;

/// Privilege class of a caller. Part of every cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privilege {
    Public,
    Moderator,
}

impl Privilege {
    pub fn from_flag(is_moderator: bool) -> Self {
        if is_moderator {
            Privilege::Moderator
        } else {
            Privilege::Public
        }
    }

    pub fn is_moderator(&self) -> bool {
        *self == Privilege::Moderator
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Privilege::Public => "public",
            Privilege::Moderator => "moderator",
        }
    }
}

/// Identity supplied by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: Option<EntityId>,
    pub is_moderator: bool,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self {
            id: None,
            is_moderator: false,
        }
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self {
            id: Some(EntityId::new(id)),
            is_moderator: false,
        }
    }

    pub fn moderator(id: impl Into<String>) -> Self {
        Self {
            id: Some(EntityId::new(id)),
            is_moderator: true,
        }
    }

    pub fn privilege(&self) -> Privilege {
        Privilege::from_flag(self.is_moderator)
    }
}
