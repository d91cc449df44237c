//! Strike Decision Registry
//!
//! Creation, deletion and tallied reads of strike decisions

use chrono::Utc;
use sqlx::{FromRow, SqliteExecutor, SqlitePool};
use tracing::info;

use super::types::*;
use crate::database::models::Role;
use crate::database::queries::Queries;
use crate::error::UnionError;

const DECISION_COLUMNS: &str = "d.id, d.title, d.reason, d.decision_date, d.start_date, d.end_date, \
     d.participant_target, d.created_by, d.status, d.created_at";

#[derive(FromRow)]
struct TalliedRow {
    #[sqlx(flatten)]
    decision: StrikeDecision,
    yes_count: i64,
    total_votes: i64,
}

impl From<TalliedRow> for StrikeDecisionView {
    fn from(row: TalliedRow) -> Self {
        let tally = VoteTally::compute(row.yes_count, row.total_votes, row.decision.participant_target);
        StrikeDecisionView {
            decision: row.decision,
            tally,
        }
    }
}

pub struct StrikeRegistry {
    pool: SqlitePool,
}

impl StrikeRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a new decision for voting. The participant target is the number of
    /// rank-and-file members at this moment and does not move afterwards.
    pub async fn create(
        &self,
        officer_id: i64,
        new: &NewStrikeDecision,
    ) -> Result<StrikeDecisionView, UnionError> {
        if new.title.trim().is_empty() {
            return Err(UnionError::required_field("title"));
        }
        if new.reason.trim().is_empty() {
            return Err(UnionError::required_field("reason"));
        }
        if new.end_date < new.start_date {
            return Err(UnionError::ValidationError(format!(
                "End date {} is before start date {}",
                new.end_date, new.start_date
            )));
        }

        Queries::get_officer(&self.pool, officer_id).await?;

        // The head count is taken by the insert itself so the snapshot and the
        // write share one statement.
        let now = Utc::now();
        let decision_id = sqlx::query(
            r#"
            INSERT INTO strike_decisions
            (title, reason, decision_date, start_date, end_date, participant_target, created_by, status, created_at)
            SELECT ?, ?, ?, ?, ?, (SELECT COUNT(*) FROM members WHERE role = ?), ?, ?, ?
            WHERE true
            "#,
        )
        .bind(new.title.trim())
        .bind(new.reason.trim())
        .bind(new.decision_date.unwrap_or_else(|| now.date_naive()))
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(Role::Worker)
        .bind(officer_id)
        .bind(StrikeStatus::Voting)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        let view = self.get(decision_id).await?;
        info!(
            "Strike decision {} opened by officer {} (participant target {})",
            decision_id, officer_id, view.decision.participant_target
        );
        Ok(view)
    }

    pub async fn get(&self, decision_id: i64) -> Result<StrikeDecisionView, UnionError> {
        Self::load_view(&self.pool, decision_id).await
    }

    /// All decisions, most recent decision date first, each with its tally.
    pub async fn list(&self) -> Result<Vec<StrikeDecisionView>, UnionError> {
        let sql = format!(
            r#"
            SELECT {DECISION_COLUMNS},
                   COALESCE(SUM(v.in_favor), 0) AS yes_count,
                   COUNT(v.id) AS total_votes
            FROM strike_decisions d
            LEFT JOIN strike_votes v ON v.decision_id = d.id
            GROUP BY d.id
            ORDER BY d.decision_date DESC, d.id DESC
            "#
        );

        let rows = sqlx::query_as::<_, TalliedRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(StrikeDecisionView::from).collect())
    }

    /// Only the officer who created a decision may delete it; its votes go
    /// with it.
    pub async fn delete(&self, decision_id: i64, requester_id: i64) -> Result<(), UnionError> {
        let decision = Self::load_decision(&self.pool, decision_id).await?;
        if decision.created_by != requester_id {
            return Err(UnionError::Forbidden(format!(
                "Only the creator of strike decision {} may delete it",
                decision_id
            )));
        }

        sqlx::query("DELETE FROM strike_decisions WHERE id = ? AND created_by = ?")
            .bind(decision_id)
            .bind(requester_id)
            .execute(&self.pool)
            .await?;

        info!("Strike decision {} deleted by member {}", decision_id, requester_id);
        Ok(())
    }

    pub async fn load_decision<'e, E>(executor: E, decision_id: i64) -> Result<StrikeDecision, UnionError>
    where
        E: SqliteExecutor<'e>,
    {
        let sql = format!("SELECT {DECISION_COLUMNS} FROM strike_decisions d WHERE d.id = ?");
        sqlx::query_as::<_, StrikeDecision>(&sql)
            .bind(decision_id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| UnionError::decision_not_found(decision_id))
    }

    pub async fn load_view<'e, E>(executor: E, decision_id: i64) -> Result<StrikeDecisionView, UnionError>
    where
        E: SqliteExecutor<'e>,
    {
        let sql = format!(
            r#"
            SELECT {DECISION_COLUMNS},
                   COALESCE(SUM(v.in_favor), 0) AS yes_count,
                   COUNT(v.id) AS total_votes
            FROM strike_decisions d
            LEFT JOIN strike_votes v ON v.decision_id = d.id
            WHERE d.id = ?
            GROUP BY d.id
            "#
        );

        sqlx::query_as::<_, TalliedRow>(&sql)
            .bind(decision_id)
            .fetch_optional(executor)
            .await?
            .map(StrikeDecisionView::from)
            .ok_or_else(|| UnionError::decision_not_found(decision_id))
    }
}
