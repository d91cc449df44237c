use sqlx::SqliteExecutor;

use crate::database::models::*;
use crate::error::UnionError;

/// Lookups shared by the engines and the CRUD handlers. Every function takes
/// any SQLite executor so it can run against the pool or inside a transaction.
pub struct Queries;

impl Queries {
    pub async fn find_member<'e, E>(executor: E, member_id: i64) -> Result<Option<Member>, UnionError>
    where
        E: SqliteExecutor<'e>,
    {
        let member = sqlx::query_as::<_, Member>(
            "SELECT id, full_name, email, role, created_at FROM members WHERE id = ?",
        )
        .bind(member_id)
        .fetch_optional(executor)
        .await?;

        Ok(member)
    }

    pub async fn get_member<'e, E>(executor: E, member_id: i64) -> Result<Member, UnionError>
    where
        E: SqliteExecutor<'e>,
    {
        Self::find_member(executor, member_id)
            .await?
            .ok_or_else(|| UnionError::member_not_found(member_id))
    }

    /// Fails with `Forbidden` unless the member holds the representative role.
    pub async fn get_officer<'e, E>(executor: E, member_id: i64) -> Result<Member, UnionError>
    where
        E: SqliteExecutor<'e>,
    {
        let member = Self::get_member(executor, member_id).await?;
        if !member.is_officer() {
            return Err(UnionError::officer_required(member_id));
        }
        Ok(member)
    }

    pub async fn list_members<'e, E>(executor: E) -> Result<Vec<Member>, UnionError>
    where
        E: SqliteExecutor<'e>,
    {
        let members = sqlx::query_as::<_, Member>(
            "SELECT id, full_name, email, role, created_at FROM members ORDER BY id",
        )
        .fetch_all(executor)
        .await?;

        Ok(members)
    }

    pub async fn latest_payroll<'e, E>(executor: E, member_id: i64) -> Result<Option<Payroll>, UnionError>
    where
        E: SqliteExecutor<'e>,
    {
        let payroll = sqlx::query_as::<_, Payroll>(
            r#"
            SELECT id, member_id, pay_date, amount, document_path, created_at
            FROM payrolls
            WHERE member_id = ?
            ORDER BY pay_date DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(member_id)
        .fetch_optional(executor)
        .await?;

        Ok(payroll)
    }

    pub async fn stored_score<'e, E>(executor: E, member_id: i64) -> Result<Option<ActivityScoreRow>, UnionError>
    where
        E: SqliteExecutor<'e>,
    {
        let row = sqlx::query_as::<_, ActivityScoreRow>(
            "SELECT member_id, score, updated_at FROM activity_scores WHERE member_id = ?",
        )
        .bind(member_id)
        .fetch_optional(executor)
        .await?;

        Ok(row)
    }
}
