//! Cache key derivation.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::Privilege;

/// Opaque cache key: SHA-256 over the operation, its sorted parameters and
/// the caller's privilege class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive a key. Parameter order does not matter; names are trimmed and
    /// lowercased, values are taken as given.
    pub fn derive<'a, I>(operation: &str, params: I, privilege: Privilege) -> Self
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        let normalized: BTreeMap<String, String> = params
            .into_iter()
            .map(|(name, value)| (name.trim().to_ascii_lowercase(), value))
            .collect();

        let mut hasher = Sha256::new();
        hasher.update(operation.trim().to_ascii_lowercase().as_bytes());
        for (name, value) in &normalized {
            // Length prefixes keep ("ab","c") and ("a","bc") apart.
            hasher.update(b"\x1f");
            hasher.update((name.len() as u64).to_be_bytes());
            hasher.update(name.as_bytes());
            hasher.update((value.len() as u64).to_be_bytes());
            hasher.update(value.as_bytes());
        }
        hasher.update(b"\x1e");
        hasher.update(privilege.as_str().as_bytes());

        CacheKey(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short prefix is enough for logs.
        write!(f, "{}", &self.0[..12.min(self.0.len())])
    }
}
