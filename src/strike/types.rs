//! Strike Decision Types and Data Structures

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::activity::fee::round_to;
use crate::error::UnionError;

/// Lifecycle of a strike decision.
///
/// `Voting` moves to `PendingApproval` once participation is complete (or an
/// officer ends voting early); an officer then approves or rejects it.
/// `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum StrikeStatus {
    Voting,
    PendingApproval,
    Approved,
    Rejected,
}

impl StrikeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrikeStatus::Voting => "voting",
            StrikeStatus::PendingApproval => "pending_approval",
            StrikeStatus::Approved => "approved",
            StrikeStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StrikeStatus::Approved | StrikeStatus::Rejected)
    }

    pub fn can_transition_to(&self, next: StrikeStatus) -> bool {
        matches!(
            (self, next),
            (StrikeStatus::Voting, StrikeStatus::PendingApproval)
                | (StrikeStatus::PendingApproval, StrikeStatus::Approved)
                | (StrikeStatus::PendingApproval, StrikeStatus::Rejected)
        )
    }
}

/// A member's ballot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    Yes,
    No,
}

impl VoteChoice {
    pub fn in_favor(&self) -> bool {
        *self == VoteChoice::Yes
    }

    /// Parses the wire value; anything but "yes"/"no" is a validation error.
    pub fn parse(s: &str) -> Result<Self, UnionError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(VoteChoice::Yes),
            "no" => Ok(VoteChoice::No),
            other => Err(UnionError::ValidationError(format!(
                "Invalid vote '{}': expected 'yes' or 'no'",
                other
            ))),
        }
    }
}

/// Officer verdict on a decision awaiting approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Approve,
    Reject,
}

impl Verdict {
    pub fn target_status(&self) -> StrikeStatus {
        match self {
            Verdict::Approve => StrikeStatus::Approved,
            Verdict::Reject => StrikeStatus::Rejected,
        }
    }

    pub fn parse(s: &str) -> Result<Self, UnionError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(Verdict::Approve),
            "reject" => Ok(Verdict::Reject),
            other => Err(UnionError::ValidationError(format!(
                "Invalid decision '{}': expected 'approve' or 'reject'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StrikeDecision {
    pub id: i64,
    pub title: String,
    pub reason: String,
    pub decision_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Rank-and-file head count taken when the decision was created.
    pub participant_target: i64,
    pub created_by: i64,
    pub status: StrikeStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStrikeDecision {
    pub title: String,
    pub reason: String,
    pub decision_date: Option<NaiveDate>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StrikeVote {
    pub id: i64,
    pub decision_id: i64,
    pub member_id: i64,
    pub in_favor: bool,
    pub created_at: DateTime<Utc>,
}

/// Vote counts derived from the ballots at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
    pub yes_count: i64,
    pub no_count: i64,
    pub total_votes: i64,
    pub yes_percentage: f64,
    pub participation_percentage: f64,
}

impl VoteTally {
    pub fn compute(yes_count: i64, total_votes: i64, participant_target: i64) -> Self {
        let yes_percentage = if total_votes > 0 {
            round_to(yes_count as f64 * 100.0 / total_votes as f64, 1)
        } else {
            0.0
        };

        let participation_percentage = if participant_target > 0 {
            round_to(total_votes as f64 * 100.0 / participant_target as f64, 1)
        } else {
            0.0
        };

        Self {
            yes_count,
            no_count: total_votes - yes_count,
            total_votes,
            yes_percentage,
            participation_percentage,
        }
    }
}

/// A decision together with its live tally, as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct StrikeDecisionView {
    #[serde(flatten)]
    pub decision: StrikeDecision,
    #[serde(flatten)]
    pub tally: VoteTally,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(StrikeStatus::Voting.can_transition_to(StrikeStatus::PendingApproval));
        assert!(StrikeStatus::PendingApproval.can_transition_to(StrikeStatus::Approved));
        assert!(StrikeStatus::PendingApproval.can_transition_to(StrikeStatus::Rejected));

        assert!(!StrikeStatus::Voting.can_transition_to(StrikeStatus::Approved));
        assert!(!StrikeStatus::PendingApproval.can_transition_to(StrikeStatus::Voting));
    }

    #[test]
    fn test_terminal_states_go_nowhere() {
        for terminal in [StrikeStatus::Approved, StrikeStatus::Rejected] {
            assert!(terminal.is_terminal());
            for next in [
                StrikeStatus::Voting,
                StrikeStatus::PendingApproval,
                StrikeStatus::Approved,
                StrikeStatus::Rejected,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_tally_percentages() {
        let tally = VoteTally::compute(7, 10, 20);
        assert_eq!(tally.no_count, 3);
        assert_eq!(tally.total_votes, 10);
        assert_eq!(tally.yes_percentage, 70.0);
        assert_eq!(tally.participation_percentage, 50.0);
    }

    #[test]
    fn test_tally_rounds_to_one_decimal() {
        let tally = VoteTally::compute(2, 3, 7);
        assert_eq!(tally.yes_percentage, 66.7);
        assert_eq!(tally.participation_percentage, 42.9);
    }

    #[test]
    fn test_empty_tally() {
        let tally = VoteTally::compute(0, 0, 0);
        assert_eq!(tally.yes_percentage, 0.0);
        assert_eq!(tally.participation_percentage, 0.0);
    }

    #[test]
    fn test_vote_parsing() {
        assert_eq!(VoteChoice::parse("yes").unwrap(), VoteChoice::Yes);
        assert_eq!(VoteChoice::parse(" NO ").unwrap(), VoteChoice::No);
        assert!(matches!(
            VoteChoice::parse("maybe"),
            Err(UnionError::ValidationError(_))
        ));
    }

    #[test]
    fn test_verdict_parsing() {
        assert_eq!(Verdict::parse("approve").unwrap().target_status(), StrikeStatus::Approved);
        assert_eq!(Verdict::parse("reject").unwrap().target_status(), StrikeStatus::Rejected);
        assert!(Verdict::parse("defer").is_err());
    }
}
