use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::database::models::Post;
use crate::database::queries::Queries;
use crate::error::UnionError;

const DEFAULT_PAGE_SIZE: i64 = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub author_id: i64,
    pub body: String,
}

pub struct Feed {
    pool: SqlitePool,
}

impl Feed {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn publish(&self, new: &NewPost) -> Result<Post, UnionError> {
        if new.body.trim().is_empty() {
            return Err(UnionError::required_field("body"));
        }
        Queries::get_member(&self.pool, new.author_id).await?;

        let post_id = sqlx::query("INSERT INTO posts (author_id, body, created_at) VALUES (?, ?, ?)")
            .bind(new.author_id)
            .bind(new.body.trim())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        let post = sqlx::query_as::<_, Post>("SELECT id, author_id, body, created_at FROM posts WHERE id = ?")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(post)
    }

    /// Newest first, capped at `limit` (default 50).
    pub async fn recent(&self, limit: Option<i64>) -> Result<Vec<Post>, UnionError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 200);

        let posts = sqlx::query_as::<_, Post>(
            "SELECT id, author_id, body, created_at FROM posts ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }
}
