use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use super::{ApiJson, AppState};
use crate::database::models::Survey;
use crate::error::UnionError;
use crate::surveys::{AnswerSubmission, NewSurvey, SubmissionReceipt, SurveyDetail, SurveyService};

/// POST /api/v1/surveys
pub async fn create_survey(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewSurvey>,
) -> Result<(StatusCode, Json<SurveyDetail>), UnionError> {
    let detail = SurveyService::new(state.pool()).create(&req).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/surveys
pub async fn list_surveys(State(state): State<AppState>) -> Result<Json<Vec<Survey>>, UnionError> {
    Ok(Json(SurveyService::new(state.pool()).list().await?))
}

/// GET /api/v1/surveys/:id
pub async fn get_survey(
    State(state): State<AppState>,
    Path(survey_id): Path<i64>,
) -> Result<Json<SurveyDetail>, UnionError> {
    Ok(Json(SurveyService::new(state.pool()).get(survey_id).await?))
}

/// POST /api/v1/surveys/:id/answers
pub async fn submit_answers(
    State(state): State<AppState>,
    Path(survey_id): Path<i64>,
    ApiJson(req): ApiJson<AnswerSubmission>,
) -> Result<Json<SubmissionReceipt>, UnionError> {
    let receipt = SurveyService::new(state.pool())
        .submit_answers(survey_id, &req)
        .await?;
    Ok(Json(receipt))
}
