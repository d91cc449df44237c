//! Activity score recomputation

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use super::fee::{self, FeeQuote};
use crate::database::queries::Queries;
use crate::error::UnionError;

pub const FEEDBACK_POINTS: i64 = 1;
pub const SURVEY_POINTS: i64 = 2;
pub const MAX_SCORE: i64 = 100;

pub struct ActivityEngine {
    pool: SqlitePool,
}

impl ActivityEngine {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Recompute and persist a member's score outside any caller transaction.
    pub async fn recompute(&self, member_id: i64) -> Result<i64, UnionError> {
        let mut conn = self.pool.acquire().await?;
        Self::recompute_in(&mut conn, member_id).await
    }

    /// Recompute using the caller's connection, so the upsert commits or rolls
    /// back together with whatever write triggered it.
    ///
    /// Representatives are never scored: they get 0 and nothing is written.
    /// Counting and the upsert are a single statement, which takes the write
    /// lock before it reads.
    pub async fn recompute_in(conn: &mut SqliteConnection, member_id: i64) -> Result<i64, UnionError> {
        let member = Queries::get_member(&mut *conn, member_id).await?;
        if !member.is_worker() {
            debug!("Member {} is not a worker, activity score fixed at 0", member_id);
            return Ok(0);
        }

        let score: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO activity_scores (member_id, score, updated_at)
            SELECT ?1, MIN(?2,
                (SELECT COUNT(*) FROM feedback WHERE member_id = ?1) * ?3
                + (SELECT COUNT(*) FROM survey_participations WHERE member_id = ?1) * ?4),
                ?5
            WHERE true
            ON CONFLICT (member_id) DO UPDATE SET
                score = excluded.score,
                updated_at = excluded.updated_at
            RETURNING score
            "#,
        )
        .bind(member_id)
        .bind(MAX_SCORE)
        .bind(FEEDBACK_POINTS)
        .bind(SURVEY_POINTS)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        info!("Activity score for member {}: {}", member_id, score);
        Ok(score)
    }

    /// Fee quote from the latest payroll and the stored score.
    ///
    /// Read-only: a member whose score was never computed is quoted at 0.
    pub async fn fee_quote(&self, member_id: i64) -> Result<FeeQuote, UnionError> {
        Queries::get_member(&self.pool, member_id).await?;

        let monthly_amount = Queries::latest_payroll(&self.pool, member_id)
            .await?
            .map(|p| p.amount)
            .unwrap_or(0.0);

        let score = Queries::stored_score(&self.pool, member_id)
            .await?
            .map(|s| s.score)
            .unwrap_or(0);

        Ok(fee::quote(monthly_amount, score))
    }
}
