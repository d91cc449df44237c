use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use super::strikes::RequesterQuery;
use super::{ApiJson, AppState};
use crate::community::{Feed, MeetingBoard, NewMeeting, NewPost};
use crate::database::models::{Meeting, Post};
use crate::error::UnionError;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
}

/// POST /api/v1/meetings
pub async fn create_meeting(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewMeeting>,
) -> Result<(StatusCode, Json<Meeting>), UnionError> {
    let meeting = MeetingBoard::new(state.pool()).create(&req).await?;
    Ok((StatusCode::CREATED, Json(meeting)))
}

/// GET /api/v1/meetings
pub async fn list_meetings(State(state): State<AppState>) -> Result<Json<Vec<Meeting>>, UnionError> {
    Ok(Json(MeetingBoard::new(state.pool()).list().await?))
}

/// DELETE /api/v1/meetings/:id?requester_id=
pub async fn delete_meeting(
    State(state): State<AppState>,
    Path(meeting_id): Path<i64>,
    Query(params): Query<RequesterQuery>,
) -> Result<StatusCode, UnionError> {
    MeetingBoard::new(state.pool())
        .delete(meeting_id, params.requester_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/posts
pub async fn create_post(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewPost>,
) -> Result<(StatusCode, Json<Post>), UnionError> {
    let post = Feed::new(state.pool()).publish(&req).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/v1/posts?limit=
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<Vec<Post>>, UnionError> {
    Ok(Json(Feed::new(state.pool()).recent(params.limit).await?))
}
