//! Domain primitives: LeaderboardId, EntityId, ReportDate.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a leaderboard definition (e.g. "weekly").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaderboardId(String);

impl LeaderboardId {
    pub fn new(id: impl Into<String>) -> Self {
        LeaderboardId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeaderboardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a ranked entity (a user, a model, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Placeholder identity carried by redacted entries.
    pub const REDACTED: &'static str = "redacted";

    pub fn new(id: impl Into<String>) -> Self {
        EntityId(id.into())
    }

    pub fn redacted() -> Self {
        EntityId(Self::REDACTED.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date {0:?}: expected YYYY-MM-DD")]
pub struct ReportDateParseError(pub String);

/// A UTC calendar date a leaderboard is reported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportDate(NaiveDate);

impl ReportDate {
    pub fn new(date: NaiveDate) -> Self {
        ReportDate(date)
    }

    /// Build from calendar parts; `None` if the date does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(ReportDate)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// Monday of the ISO week containing this date.
    pub fn week_start(&self) -> Self {
        ReportDate(self.0.week(Weekday::Mon).first_day())
    }

    pub fn month_start(&self) -> Self {
        ReportDate(self.0.with_day(1).unwrap_or(self.0))
    }

    /// Shift by a signed number of days, saturating at the calendar bounds.
    pub fn shift_days(&self, days: i64) -> Self {
        ReportDate(
            self.0
                .checked_add_signed(Duration::days(days))
                .unwrap_or(self.0),
        )
    }

    /// First day of the month preceding this date's month.
    pub fn previous_month_start(&self) -> Self {
        self.month_start().shift_days(-1).month_start()
    }
}

impl FromStr for ReportDate {
    type Err = ReportDateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(ReportDate)
            .map_err(|_| ReportDateParseError(s.to_string()))
    }
}

impl fmt::Display for ReportDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
