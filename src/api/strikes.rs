use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use super::{ApiJson, AppState};
use crate::error::UnionError;
use crate::strike::{
    NewStrikeDecision, StrikeDecisionView, StrikeRegistry, StrikeVote, Verdict, VoteChoice,
    VoteManager,
};

#[derive(Debug, Deserialize)]
pub struct CreateDecisionRequest {
    pub officer_id: i64,
    #[serde(flatten)]
    pub decision: NewStrikeDecision,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub member_id: i64,
    pub vote: String,
}

#[derive(Debug, Deserialize)]
pub struct OfficerRequest {
    pub officer_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub officer_id: i64,
    pub decision: String,
}

#[derive(Debug, Deserialize)]
pub struct RequesterQuery {
    pub requester_id: i64,
}

/// POST /api/v1/strikes
pub async fn create_decision(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateDecisionRequest>,
) -> Result<(StatusCode, Json<StrikeDecisionView>), UnionError> {
    let view = StrikeRegistry::new(state.pool())
        .create(req.officer_id, &req.decision)
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/strikes
pub async fn list_decisions(
    State(state): State<AppState>,
) -> Result<Json<Vec<StrikeDecisionView>>, UnionError> {
    Ok(Json(StrikeRegistry::new(state.pool()).list().await?))
}

/// GET /api/v1/strikes/:id
pub async fn get_decision(
    State(state): State<AppState>,
    Path(decision_id): Path<i64>,
) -> Result<Json<StrikeDecisionView>, UnionError> {
    Ok(Json(StrikeRegistry::new(state.pool()).get(decision_id).await?))
}

/// DELETE /api/v1/strikes/:id?requester_id=
pub async fn delete_decision(
    State(state): State<AppState>,
    Path(decision_id): Path<i64>,
    Query(params): Query<RequesterQuery>,
) -> Result<StatusCode, UnionError> {
    StrikeRegistry::new(state.pool())
        .delete(decision_id, params.requester_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/strikes/:id/votes
pub async fn cast_vote(
    State(state): State<AppState>,
    Path(decision_id): Path<i64>,
    ApiJson(req): ApiJson<VoteRequest>,
) -> Result<Json<StrikeDecisionView>, UnionError> {
    let choice = VoteChoice::parse(&req.vote)?;
    let view = VoteManager::new(state.pool())
        .cast_vote(decision_id, req.member_id, choice)
        .await?;
    Ok(Json(view))
}

/// GET /api/v1/strikes/:id/votes
pub async fn list_votes(
    State(state): State<AppState>,
    Path(decision_id): Path<i64>,
) -> Result<Json<Vec<StrikeVote>>, UnionError> {
    Ok(Json(VoteManager::new(state.pool()).list_votes(decision_id).await?))
}

/// POST /api/v1/strikes/:id/end-voting
pub async fn end_voting(
    State(state): State<AppState>,
    Path(decision_id): Path<i64>,
    ApiJson(req): ApiJson<OfficerRequest>,
) -> Result<Json<StrikeDecisionView>, UnionError> {
    let view = VoteManager::new(state.pool())
        .end_voting(decision_id, req.officer_id)
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/strikes/:id/decision
pub async fn decide(
    State(state): State<AppState>,
    Path(decision_id): Path<i64>,
    ApiJson(req): ApiJson<DecisionRequest>,
) -> Result<Json<StrikeDecisionView>, UnionError> {
    let verdict = Verdict::parse(&req.decision)?;
    let view = VoteManager::new(state.pool())
        .decide(decision_id, req.officer_id, verdict)
        .await?;
    Ok(Json(view))
}
