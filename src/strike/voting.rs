//! Strike Vote Management
//!
//! Records member ballots and drives the decision status machine

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::registry::StrikeRegistry;
use super::types::*;
use crate::database::queries::Queries;
use crate::error::UnionError;

pub struct VoteManager {
    pool: SqlitePool,
}

impl VoteManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Cast a member's ballot on a decision that is still open.
    ///
    /// The insert, the participation count and the automatic move to
    /// `pending_approval` commit together. The insert only succeeds while the
    /// decision is `voting`, and UNIQUE(decision_id, member_id) turns a racing
    /// duplicate into a `Conflict`.
    pub async fn cast_vote(
        &self,
        decision_id: i64,
        member_id: i64,
        choice: VoteChoice,
    ) -> Result<StrikeDecisionView, UnionError> {
        let decision = StrikeRegistry::load_decision(&self.pool, decision_id).await?;
        let voter = Queries::get_member(&self.pool, member_id).await?;
        if !voter.is_worker() {
            return Err(UnionError::Forbidden(format!(
                "Member {} is not a rank-and-file member and cannot vote",
                member_id
            )));
        }
        if decision.status != StrikeStatus::Voting {
            return Err(UnionError::voting_closed(decision_id, decision.status.as_str()));
        }

        let already_voted: Option<i64> =
            sqlx::query_scalar("SELECT id FROM strike_votes WHERE decision_id = ? AND member_id = ?")
                .bind(decision_id)
                .bind(member_id)
                .fetch_optional(&self.pool)
                .await?;
        if already_voted.is_some() {
            return Err(UnionError::duplicate_vote(decision_id, member_id));
        }

        let mut tx = self.pool.begin().await?;

        // Writing first takes the write lock before anything else is read.
        let inserted = sqlx::query(
            r#"
            INSERT INTO strike_votes (decision_id, member_id, in_favor, created_at)
            SELECT ?, ?, ?, ?
            WHERE EXISTS (SELECT 1 FROM strike_decisions WHERE id = ? AND status = ?)
            "#,
        )
        .bind(decision_id)
        .bind(member_id)
        .bind(choice.in_favor())
        .bind(Utc::now())
        .bind(decision_id)
        .bind(StrikeStatus::Voting)
        .execute(&mut *tx)
        .await
        .map_err(|e| match UnionError::from(e) {
            UnionError::Conflict(_) => UnionError::duplicate_vote(decision_id, member_id),
            other => other,
        })?;

        if inserted.rows_affected() == 0 {
            let current = StrikeRegistry::load_decision(&mut *tx, decision_id).await?;
            return Err(UnionError::voting_closed(decision_id, current.status.as_str()));
        }

        let voters: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT member_id) FROM strike_votes WHERE decision_id = ?")
                .bind(decision_id)
                .fetch_one(&mut *tx)
                .await?;

        if voters >= decision.participant_target {
            let moved = Self::transition(
                &mut tx,
                decision_id,
                StrikeStatus::Voting,
                StrikeStatus::PendingApproval,
            )
            .await?;
            if moved {
                info!(
                    "Strike decision {} reached full participation ({}/{}), awaiting approval",
                    decision_id, voters, decision.participant_target
                );
            }
        }

        tx.commit().await?;

        info!(
            "Member {} voted {:?} on strike decision {}",
            member_id, choice, decision_id
        );
        StrikeRegistry::load_view(&self.pool, decision_id).await
    }

    /// Officer closes voting before full participation.
    pub async fn end_voting(&self, decision_id: i64, officer_id: i64) -> Result<StrikeDecisionView, UnionError> {
        self.officer_transition(decision_id, officer_id, StrikeStatus::PendingApproval)
            .await
    }

    /// Officer approves or rejects a decision that is awaiting approval.
    pub async fn decide(
        &self,
        decision_id: i64,
        officer_id: i64,
        verdict: Verdict,
    ) -> Result<StrikeDecisionView, UnionError> {
        self.officer_transition(decision_id, officer_id, verdict.target_status())
            .await
    }

    async fn officer_transition(
        &self,
        decision_id: i64,
        officer_id: i64,
        next: StrikeStatus,
    ) -> Result<StrikeDecisionView, UnionError> {
        Queries::get_officer(&self.pool, officer_id).await?;
        let decision = StrikeRegistry::load_decision(&self.pool, decision_id).await?;

        if decision.status.is_terminal() {
            return Err(UnionError::Conflict(format!(
                "Strike decision {} is already {}",
                decision_id,
                decision.status.as_str()
            )));
        }
        if !decision.status.can_transition_to(next) {
            warn!(
                "Rejected transition {} -> {} for strike decision {}",
                decision.status.as_str(),
                next.as_str(),
                decision_id
            );
            return Err(invalid_transition(decision_id, decision.status, next));
        }

        let mut conn = self.pool.acquire().await?;
        if !Self::transition(&mut conn, decision_id, decision.status, next).await? {
            let current = StrikeRegistry::load_decision(&mut *conn, decision_id).await?;
            return Err(invalid_transition(decision_id, current.status, next));
        }
        drop(conn);

        info!(
            "Strike decision {} moved {} -> {} by officer {}",
            decision_id,
            decision.status.as_str(),
            next.as_str(),
            officer_id
        );
        StrikeRegistry::load_view(&self.pool, decision_id).await
    }

    /// Compare-and-set on the status column. Returns false when another
    /// request already moved the decision away from `from`.
    async fn transition(
        conn: &mut sqlx::SqliteConnection,
        decision_id: i64,
        from: StrikeStatus,
        to: StrikeStatus,
    ) -> Result<bool, UnionError> {
        let result = sqlx::query("UPDATE strike_decisions SET status = ? WHERE id = ? AND status = ?")
            .bind(to)
            .bind(decision_id)
            .bind(from)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn list_votes(&self, decision_id: i64) -> Result<Vec<StrikeVote>, UnionError> {
        StrikeRegistry::load_decision(&self.pool, decision_id).await?;

        let votes = sqlx::query_as::<_, StrikeVote>(
            r#"
            SELECT id, decision_id, member_id, in_favor, created_at
            FROM strike_votes
            WHERE decision_id = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(decision_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(votes)
    }
}

fn invalid_transition(decision_id: i64, from: StrikeStatus, to: StrikeStatus) -> UnionError {
    if to == StrikeStatus::PendingApproval {
        return UnionError::voting_closed(decision_id, from.as_str());
    }
    UnionError::Conflict(format!(
        "Strike decision {} cannot move from {} to {}",
        decision_id,
        from.as_str(),
        to.as_str()
    ))
}
