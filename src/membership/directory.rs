use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::database::models::{Member, Role};
use crate::database::queries::Queries;
use crate::error::UnionError;

#[derive(Debug, Clone, Deserialize)]
pub struct NewMember {
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

pub struct MemberDirectory {
    pool: SqlitePool,
}

impl MemberDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, new: &NewMember) -> Result<Member, UnionError> {
        let full_name = new.full_name.trim();
        let email = new.email.trim().to_lowercase();

        if full_name.is_empty() {
            return Err(UnionError::required_field("full_name"));
        }
        if !email.contains('@') {
            return Err(UnionError::ValidationError(format!(
                "Invalid email address '{}'",
                email
            )));
        }

        let member_id = sqlx::query(
            "INSERT INTO members (full_name, email, role, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(full_name)
        .bind(&email)
        .bind(new.role)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match UnionError::from(e) {
            UnionError::Conflict(_) => {
                UnionError::Conflict(format!("Email {} is already registered", email))
            }
            other => other,
        })?
        .last_insert_rowid();

        info!("Registered {} {} (ID: {})", new.role.as_str(), full_name, member_id);
        Queries::get_member(&self.pool, member_id).await
    }

    pub async fn get(&self, member_id: i64) -> Result<Member, UnionError> {
        Queries::get_member(&self.pool, member_id).await
    }

    pub async fn list(&self) -> Result<Vec<Member>, UnionError> {
        Queries::list_members(&self.pool).await
    }
}
