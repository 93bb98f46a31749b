//! Lossless score value backed by rust_decimal.
//!
//! Feeds may report integer points or fractional ratings; both compare
//! exactly, so two entities tie only when their scores are truly equal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A leaderboard score. Serializes as a JSON number.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Score(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Score {
    pub fn new(value: Decimal) -> Self {
        Score(value)
    }

    pub fn from_i64(value: i64) -> Self {
        Score(Decimal::from(value))
    }

    pub fn inner(&self) -> Decimal {
        self.0
    }

    /// Canonical text form without trailing zeros or exponent, used for storage.
    pub fn to_canonical_string(&self) -> String {
        self.0.normalize().to_string()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Score {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Score)
    }
}

impl From<Decimal> for Score {
    fn from(value: Decimal) -> Self {
        Score(value)
    }
}

impl From<i64> for Score {
    fn from(value: i64) -> Self {
        Score::from_i64(value)
    }
}

impl From<i32> for Score {
    fn from(value: i32) -> Self {
        Score::from_i64(i64::from(value))
    }
}
