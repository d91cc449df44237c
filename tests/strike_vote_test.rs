//! Strike Vote Tests
//!
//! Vote casting, automatic closing, officer decisions and tallies

mod common;

use common::*;
use union_app::error::UnionError;
use union_app::strike::{StrikeRegistry, StrikeStatus, Verdict, VoteChoice, VoteManager};

#[tokio::test]
async fn test_new_decision_snapshots_participant_target() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup_test_db().await;
    let officer = create_officer(&db, "Rep").await;
    create_workers(&db, 4).await;

    let view = StrikeRegistry::new(db.pool().clone())
        .create(officer, &strike_proposal("Spring strike"))
        .await?;
    assert_eq!(view.decision.status, StrikeStatus::Voting);
    assert_eq!(view.decision.participant_target, 4);
    assert_eq!(view.decision.created_by, officer);
    assert_eq!(view.tally.total_votes, 0);
    assert_eq!(view.tally.yes_percentage, 0.0);

    // Members joining later do not move the target
    create_worker(&db, "Latecomer").await;
    let view = StrikeRegistry::new(db.pool().clone()).get(view.decision.id).await?;
    assert_eq!(view.decision.participant_target, 4);
    Ok(())
}

#[tokio::test]
async fn test_only_officers_open_decisions() {
    let db = setup_test_db().await;
    let worker = create_worker(&db, "Ali").await;

    let result = StrikeRegistry::new(db.pool().clone())
        .create(worker, &strike_proposal("Wildcat"))
        .await;
    assert!(matches!(result, Err(UnionError::Forbidden(_))));
}

#[tokio::test]
async fn test_decision_dates_validated() {
    let db = setup_test_db().await;
    let officer = create_officer(&db, "Rep").await;

    let mut proposal = strike_proposal("Backwards");
    proposal.end_date = date(2026, 3, 1);
    let result = StrikeRegistry::new(db.pool().clone()).create(officer, &proposal).await;
    assert!(matches!(result, Err(UnionError::ValidationError(_))));

    let mut proposal = strike_proposal("");
    proposal.title = "  ".to_string();
    let result = StrikeRegistry::new(db.pool().clone()).create(officer, &proposal).await;
    assert!(matches!(result, Err(UnionError::ValidationError(_))));
}

#[tokio::test]
async fn test_duplicate_vote_is_conflict() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup_test_db().await;
    let officer = create_officer(&db, "Rep").await;
    let workers = create_workers(&db, 3).await;
    let decision = open_strike(&db, officer, "Duplicate check").await;
    let votes = VoteManager::new(db.pool().clone());

    votes.cast_vote(decision, workers[0], VoteChoice::Yes).await?;
    let second = votes.cast_vote(decision, workers[0], VoteChoice::No).await;
    assert!(matches!(second, Err(UnionError::Conflict(_))));

    let view = StrikeRegistry::new(db.pool().clone()).get(decision).await?;
    assert_eq!(view.tally.total_votes, 1);
    assert_eq!(view.tally.yes_count, 1);
    Ok(())
}

#[tokio::test]
async fn test_storage_rejects_duplicate_ballots() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup_test_db().await;
    let officer = create_officer(&db, "Rep").await;
    let workers = create_workers(&db, 2).await;
    let decision = open_strike(&db, officer, "Constraint check").await;

    VoteManager::new(db.pool().clone())
        .cast_vote(decision, workers[0], VoteChoice::Yes)
        .await?;

    // Bypass the application check: the UNIQUE constraint still refuses it
    let raw = sqlx::query(
        "INSERT INTO strike_votes (decision_id, member_id, in_favor, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(decision)
    .bind(workers[0])
    .bind(false)
    .bind(chrono::Utc::now())
    .execute(db.pool())
    .await;
    let err = UnionError::from(raw.expect_err("duplicate insert must fail"));
    assert!(matches!(err, UnionError::Conflict(_)));
    Ok(())
}

#[tokio::test]
async fn test_last_voter_moves_decision_to_pending_approval() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup_test_db().await;
    let officer = create_officer(&db, "Rep").await;
    let workers = create_workers(&db, 3).await;
    let decision = open_strike(&db, officer, "Full turnout").await;
    let votes = VoteManager::new(db.pool().clone());

    let view = votes.cast_vote(decision, workers[0], VoteChoice::Yes).await?;
    assert_eq!(view.decision.status, StrikeStatus::Voting);
    let view = votes.cast_vote(decision, workers[1], VoteChoice::No).await?;
    assert_eq!(view.decision.status, StrikeStatus::Voting);

    let view = votes.cast_vote(decision, workers[2], VoteChoice::Yes).await?;
    assert_eq!(view.decision.status, StrikeStatus::PendingApproval);
    assert_eq!(view.tally.total_votes, 3);
    assert_eq!(view.tally.yes_count, 2);
    assert_eq!(view.tally.participation_percentage, 100.0);
    assert_eq!(view.tally.yes_percentage, 66.7);
    Ok(())
}

#[tokio::test]
async fn test_votes_rejected_after_voting_closes() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup_test_db().await;
    let officer = create_officer(&db, "Rep").await;
    let workers = create_workers(&db, 3).await;
    let votes = VoteManager::new(db.pool().clone());

    // pending_approval
    let pending = open_strike(&db, officer, "Pending").await;
    votes.cast_vote(pending, workers[0], VoteChoice::Yes).await?;
    votes.end_voting(pending, officer).await?;
    let result = votes.cast_vote(pending, workers[1], VoteChoice::Yes).await;
    assert!(matches!(result, Err(UnionError::Conflict(_))));

    // approved
    let approved = open_strike(&db, officer, "Approved").await;
    votes.end_voting(approved, officer).await?;
    votes.decide(approved, officer, Verdict::Approve).await?;
    let result = votes.cast_vote(approved, workers[1], VoteChoice::No).await;
    assert!(matches!(result, Err(UnionError::Conflict(_))));

    // rejected
    let rejected = open_strike(&db, officer, "Rejected").await;
    votes.end_voting(rejected, officer).await?;
    votes.decide(rejected, officer, Verdict::Reject).await?;
    let result = votes.cast_vote(rejected, workers[2], VoteChoice::Yes).await;
    assert!(matches!(result, Err(UnionError::Conflict(_))));

    let stray: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM strike_votes WHERE decision_id IN (?, ?)")
        .bind(approved)
        .bind(rejected)
        .fetch_one(db.pool())
        .await?;
    assert_eq!(stray, 0);
    Ok(())
}

#[tokio::test]
async fn test_officer_decisions_require_pending_approval() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup_test_db().await;
    let officer = create_officer(&db, "Rep").await;
    create_workers(&db, 2).await;
    let decision = open_strike(&db, officer, "Early call").await;
    let votes = VoteManager::new(db.pool().clone());

    let early = votes.decide(decision, officer, Verdict::Approve).await;
    assert!(matches!(early, Err(UnionError::Conflict(_))));

    let view = votes.end_voting(decision, officer).await?;
    assert_eq!(view.decision.status, StrikeStatus::PendingApproval);

    let again = votes.end_voting(decision, officer).await;
    assert!(matches!(again, Err(UnionError::Conflict(_))));

    let view = votes.decide(decision, officer, Verdict::Approve).await?;
    assert_eq!(view.decision.status, StrikeStatus::Approved);
    Ok(())
}

#[tokio::test]
async fn test_terminal_states_are_final() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup_test_db().await;
    let officer = create_officer(&db, "Rep").await;
    let workers = create_workers(&db, 1).await;
    let votes = VoteManager::new(db.pool().clone());

    for verdict in [Verdict::Approve, Verdict::Reject] {
        let decision = open_strike(&db, officer, "Final").await;
        votes.end_voting(decision, officer).await?;
        votes.decide(decision, officer, verdict).await?;

        assert!(matches!(
            votes.decide(decision, officer, Verdict::Approve).await,
            Err(UnionError::Conflict(_))
        ));
        assert!(matches!(
            votes.decide(decision, officer, Verdict::Reject).await,
            Err(UnionError::Conflict(_))
        ));
        assert!(matches!(
            votes.end_voting(decision, officer).await,
            Err(UnionError::Conflict(_))
        ));
        assert!(matches!(
            votes.cast_vote(decision, workers[0], VoteChoice::Yes).await,
            Err(UnionError::Conflict(_))
        ));

        let view = StrikeRegistry::new(db.pool().clone()).get(decision).await?;
        assert_eq!(view.decision.status, verdict.target_status());
    }
    Ok(())
}

#[tokio::test]
async fn test_decided_strike_reports_its_final_status() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup_test_db().await;
    let officer = create_officer(&db, "Rep").await;
    create_workers(&db, 1).await;
    let votes = VoteManager::new(db.pool().clone());

    let decision = open_strike(&db, officer, "Settled").await;
    votes.end_voting(decision, officer).await?;
    votes.decide(decision, officer, Verdict::Reject).await?;

    match votes.decide(decision, officer, Verdict::Approve).await {
        Err(UnionError::Conflict(message)) => assert!(message.contains("already rejected")),
        other => panic!("expected conflict, got {:?}", other.map(|v| v.decision.status)),
    }
    Ok(())
}

#[tokio::test]
async fn test_workers_cannot_decide() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup_test_db().await;
    let officer = create_officer(&db, "Rep").await;
    let workers = create_workers(&db, 2).await;
    let decision = open_strike(&db, officer, "Who decides").await;
    let votes = VoteManager::new(db.pool().clone());

    assert!(matches!(
        votes.end_voting(decision, workers[0]).await,
        Err(UnionError::Forbidden(_))
    ));
    votes.end_voting(decision, officer).await?;
    assert!(matches!(
        votes.decide(decision, workers[0], Verdict::Approve).await,
        Err(UnionError::Forbidden(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_officers_cannot_vote() {
    let db = setup_test_db().await;
    let officer = create_officer(&db, "Rep").await;
    create_workers(&db, 2).await;
    let decision = open_strike(&db, officer, "Officer ballot").await;

    let result = VoteManager::new(db.pool().clone())
        .cast_vote(decision, officer, VoteChoice::Yes)
        .await;
    assert!(matches!(result, Err(UnionError::Forbidden(_))));
}

#[tokio::test]
async fn test_vote_on_missing_decision() {
    let db = setup_test_db().await;
    let worker = create_worker(&db, "Ali").await;

    let result = VoteManager::new(db.pool().clone())
        .cast_vote(77, worker, VoteChoice::Yes)
        .await;
    assert!(matches!(result, Err(UnionError::NotFound(_))));
}

#[tokio::test]
async fn test_list_reports_tallies() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup_test_db().await;
    let officer = create_officer(&db, "Rep").await;
    let workers = create_workers(&db, 20).await;
    let registry = StrikeRegistry::new(db.pool().clone());
    let votes = VoteManager::new(db.pool().clone());

    let busy = open_strike(&db, officer, "Busy").await;
    let quiet = open_strike(&db, officer, "Quiet").await;

    for (i, worker) in workers.iter().take(10).enumerate() {
        let choice = if i < 7 { VoteChoice::Yes } else { VoteChoice::No };
        votes.cast_vote(busy, *worker, choice).await?;
    }

    let listed = registry.list().await?;
    assert_eq!(listed.len(), 2);

    let busy_view = listed.iter().find(|v| v.decision.id == busy).expect("busy listed");
    assert_eq!(busy_view.tally.yes_count, 7);
    assert_eq!(busy_view.tally.no_count, 3);
    assert_eq!(busy_view.tally.total_votes, 10);
    assert_eq!(busy_view.tally.yes_percentage, 70.0);
    assert_eq!(busy_view.tally.participation_percentage, 50.0);
    assert_eq!(busy_view.decision.status, StrikeStatus::Voting);

    let quiet_view = listed.iter().find(|v| v.decision.id == quiet).expect("quiet listed");
    assert_eq!(quiet_view.tally.total_votes, 0);
    assert_eq!(quiet_view.tally.yes_percentage, 0.0);
    assert_eq!(quiet_view.tally.participation_percentage, 0.0);

    assert_eq!(votes.list_votes(busy).await?.len(), 10);
    Ok(())
}

#[tokio::test]
async fn test_only_creator_deletes() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup_test_db().await;
    let creator = create_officer(&db, "Creator").await;
    let other = create_officer(&db, "Other").await;
    let workers = create_workers(&db, 2).await;
    let registry = StrikeRegistry::new(db.pool().clone());
    let decision = open_strike(&db, creator, "Short lived").await;

    VoteManager::new(db.pool().clone())
        .cast_vote(decision, workers[0], VoteChoice::Yes)
        .await?;

    assert!(matches!(
        registry.delete(decision, other).await,
        Err(UnionError::Forbidden(_))
    ));

    registry.delete(decision, creator).await?;
    assert!(matches!(registry.get(decision).await, Err(UnionError::NotFound(_))));
    assert!(matches!(
        registry.delete(decision, creator).await,
        Err(UnionError::NotFound(_))
    ));

    let orphaned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM strike_votes WHERE decision_id = ?")
        .bind(decision)
        .fetch_one(db.pool())
        .await?;
    assert_eq!(orphaned, 0);
    Ok(())
}
