use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::database::models::Meeting;
use crate::database::queries::Queries;
use crate::error::UnionError;

#[derive(Debug, Clone, Deserialize)]
pub struct NewMeeting {
    pub officer_id: i64,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub scheduled_at: DateTime<Utc>,
}

pub struct MeetingBoard {
    pool: SqlitePool,
}

impl MeetingBoard {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: &NewMeeting) -> Result<Meeting, UnionError> {
        if new.title.trim().is_empty() {
            return Err(UnionError::required_field("title"));
        }
        Queries::get_officer(&self.pool, new.officer_id).await?;

        let meeting_id = sqlx::query(
            r#"
            INSERT INTO meetings (title, location, description, scheduled_at, created_by, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.title.trim())
        .bind(new.location.trim())
        .bind(new.description.trim())
        .bind(new.scheduled_at)
        .bind(new.officer_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!("Meeting {} scheduled for {}", meeting_id, new.scheduled_at);
        self.get(meeting_id).await
    }

    pub async fn get(&self, meeting_id: i64) -> Result<Meeting, UnionError> {
        sqlx::query_as::<_, Meeting>(
            r#"
            SELECT id, title, location, description, scheduled_at, created_by, created_at
            FROM meetings WHERE id = ?
            "#,
        )
        .bind(meeting_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| UnionError::NotFound(format!("Meeting {} not found", meeting_id)))
    }

    /// Soonest first.
    pub async fn list(&self) -> Result<Vec<Meeting>, UnionError> {
        let meetings = sqlx::query_as::<_, Meeting>(
            r#"
            SELECT id, title, location, description, scheduled_at, created_by, created_at
            FROM meetings
            ORDER BY scheduled_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(meetings)
    }

    pub async fn delete(&self, meeting_id: i64, requester_id: i64) -> Result<(), UnionError> {
        let meeting = self.get(meeting_id).await?;
        if meeting.created_by != requester_id {
            return Err(UnionError::Forbidden(format!(
                "Only the creator of meeting {} may delete it",
                meeting_id
            )));
        }

        sqlx::query("DELETE FROM meetings WHERE id = ?")
            .bind(meeting_id)
            .execute(&self.pool)
            .await?;

        info!("Meeting {} deleted by member {}", meeting_id, requester_id);
        Ok(())
    }
}
