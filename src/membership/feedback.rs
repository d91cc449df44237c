use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::activity::ActivityEngine;
use crate::database::models::Feedback;
use crate::database::queries::Queries;
use crate::error::UnionError;

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackReceipt {
    pub feedback: Feedback,
    pub score: i64,
}

pub struct FeedbackService {
    pool: SqlitePool,
}

impl FeedbackService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store the feedback and rescore the member in the same transaction.
    pub async fn submit(&self, member_id: i64, body: &str) -> Result<FeedbackReceipt, UnionError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(UnionError::required_field("body"));
        }

        Queries::get_member(&self.pool, member_id).await?;

        let mut tx = self.pool.begin().await?;

        let feedback_id = sqlx::query("INSERT INTO feedback (member_id, body, created_at) VALUES (?, ?, ?)")
            .bind(member_id)
            .bind(body)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        let score = ActivityEngine::recompute_in(&mut tx, member_id).await?;

        let feedback = sqlx::query_as::<_, Feedback>(
            "SELECT id, member_id, body, created_at FROM feedback WHERE id = ?",
        )
        .bind(feedback_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Feedback {} recorded for member {}", feedback_id, member_id);
        Ok(FeedbackReceipt { feedback, score })
    }

    pub async fn list_for_member(&self, member_id: i64) -> Result<Vec<Feedback>, UnionError> {
        Queries::get_member(&self.pool, member_id).await?;

        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            SELECT id, member_id, body, created_at
            FROM feedback
            WHERE member_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(feedback)
    }
}
