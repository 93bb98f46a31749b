//! SQLite storage for published leaderboard snapshots.
//!
//! This module provides:
//! - Database initialization, schema and pragma configuration
//! - A repository for publishing and reading scored rows

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::Repository;
