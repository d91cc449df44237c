use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use super::{ApiJson, AppState};
use crate::activity::{ActivityEngine, FeeQuote};
use crate::database::models::{Feedback, Member, Payroll};
use crate::error::UnionError;
use crate::membership::feedback::FeedbackReceipt;
use crate::membership::{FeedbackService, MemberDirectory, NewMember, NewPayroll, PayrollLedger};

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub member_id: i64,
    pub score: i64,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub member_id: i64,
    pub body: String,
}

/// POST /api/v1/members
pub async fn register_member(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewMember>,
) -> Result<(StatusCode, Json<Member>), UnionError> {
    let member = MemberDirectory::new(state.pool()).register(&req).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// GET /api/v1/members
pub async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<Member>>, UnionError> {
    Ok(Json(MemberDirectory::new(state.pool()).list().await?))
}

/// GET /api/v1/members/:id
pub async fn get_member(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
) -> Result<Json<Member>, UnionError> {
    Ok(Json(MemberDirectory::new(state.pool()).get(member_id).await?))
}

/// GET /api/v1/members/:id/activity
/// Recomputes before answering, so the value is always current.
pub async fn recompute_activity(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
) -> Result<Json<ActivityResponse>, UnionError> {
    let score = ActivityEngine::new(state.pool()).recompute(member_id).await?;
    Ok(Json(ActivityResponse { member_id, score }))
}

/// GET /api/v1/members/:id/fee
pub async fn fee_quote(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
) -> Result<Json<FeeQuote>, UnionError> {
    Ok(Json(ActivityEngine::new(state.pool()).fee_quote(member_id).await?))
}

/// POST /api/v1/feedback
pub async fn submit_feedback(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackReceipt>), UnionError> {
    let receipt = FeedbackService::new(state.pool())
        .submit(req.member_id, &req.body)
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// GET /api/v1/members/:id/feedback
pub async fn list_feedback(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
) -> Result<Json<Vec<Feedback>>, UnionError> {
    Ok(Json(
        FeedbackService::new(state.pool())
            .list_for_member(member_id)
            .await?,
    ))
}

/// POST /api/v1/payrolls
pub async fn record_payroll(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewPayroll>,
) -> Result<(StatusCode, Json<Payroll>), UnionError> {
    let payroll = PayrollLedger::new(state.pool()).record(&req).await?;
    Ok((StatusCode::CREATED, Json(payroll)))
}

/// GET /api/v1/members/:id/payrolls
pub async fn list_payrolls(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
) -> Result<Json<Vec<Payroll>>, UnionError> {
    Ok(Json(
        PayrollLedger::new(state.pool())
            .list_for_member(member_id)
            .await?,
    ))
}
