//! Repository for leaderboard snapshots and their scored rows.

use crate::domain::{EntityId, LeaderboardId, ReportDate, Score, ScoredRow};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use std::str::FromStr;
use tracing::warn;

pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Publish the rows for a leaderboard/date, replacing any previous snapshot.
    ///
    /// Runs in one transaction: readers see either the old rows or the new ones.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn publish_snapshot(
        &self,
        leaderboard_id: &LeaderboardId,
        date: ReportDate,
        rows: &[ScoredRow],
    ) -> Result<(), sqlx::Error> {
        let date_str = date.to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM scored_rows WHERE leaderboard_id = ? AND report_date = ?")
            .bind(leaderboard_id.as_str())
            .bind(date_str.as_str())
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO leaderboard_snapshots (leaderboard_id, report_date, published_at)
            VALUES (?, ?, ?)
            ON CONFLICT(leaderboard_id, report_date) DO UPDATE SET published_at = excluded.published_at
            "#,
        )
        .bind(leaderboard_id.as_str())
        .bind(date_str.as_str())
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(&mut *tx)
        .await?;

        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO scored_rows (leaderboard_id, report_date, entity_id, score, hidden, metadata)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(leaderboard_id, report_date, entity_id) DO UPDATE SET
                    score = excluded.score,
                    hidden = excluded.hidden,
                    metadata = excluded.metadata
                "#,
            )
            .bind(leaderboard_id.as_str())
            .bind(date_str.as_str())
            .bind(row.entity_id.as_str())
            .bind(row.score.to_canonical_string())
            .bind(row.hidden as i32)
            .bind(row.metadata.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Rows of a published snapshot, or `None` if the date was never published.
    ///
    /// Rows whose stored score does not parse are skipped with a warning.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn query_scored_rows(
        &self,
        leaderboard_id: &LeaderboardId,
        date: ReportDate,
    ) -> Result<Option<Vec<ScoredRow>>, sqlx::Error> {
        let date_str = date.to_string();

        let published: Option<(i64,)> = sqlx::query_as(
            "SELECT published_at FROM leaderboard_snapshots WHERE leaderboard_id = ? AND report_date = ?",
        )
        .bind(leaderboard_id.as_str())
        .bind(date_str.as_str())
        .fetch_optional(&self.pool)
        .await?;

        if published.is_none() {
            return Ok(None);
        }

        let rows = sqlx::query(
            r#"
            SELECT entity_id, score, hidden, metadata
            FROM scored_rows
            WHERE leaderboard_id = ? AND report_date = ?
            ORDER BY entity_id ASC
            "#,
        )
        .bind(leaderboard_id.as_str())
        .bind(date_str.as_str())
        .fetch_all(&self.pool)
        .await?;

        let mut scored = Vec::with_capacity(rows.len());
        for row in rows {
            let entity_id: String = row.get("entity_id");
            let score_str: String = row.get("score");
            let score = match Score::from_str(&score_str) {
                Ok(score) => score,
                Err(e) => {
                    warn!(entity = %entity_id, score = %score_str, error = %e, "Skipping row with invalid score");
                    continue;
                }
            };
            let metadata_str: String = row.get("metadata");
            let metadata = match serde_json::from_str(&metadata_str) {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(entity = %entity_id, error = %e, "Invalid stored metadata; serving row without it");
                    serde_json::Value::Null
                }
            };

            scored.push(ScoredRow {
                entity_id: EntityId::new(entity_id),
                score,
                metadata,
                hidden: row.get::<i32, _>("hidden") != 0,
            });
        }

        Ok(Some(scored))
    }
}
