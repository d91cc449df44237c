pub mod community;
pub mod members;
pub mod strikes;
pub mod surveys;

use axum::{
    extract::{FromRequest, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::database::Database;
use crate::error::UnionError;

/// Shared state handed to every handler. The database is constructed once
/// in `main` and passed in here; nothing reaches for a global pool.
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
}

impl AppState {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn pool(&self) -> sqlx::SqlitePool {
        self.database.pool().clone()
    }
}

/// JSON body extractor whose rejections surface as validation errors.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(UnionError))]
pub struct ApiJson<T>(pub T);

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/v1/members",
            post(members::register_member).get(members::list_members),
        )
        .route("/api/v1/members/:id", get(members::get_member))
        .route("/api/v1/members/:id/activity", get(members::recompute_activity))
        .route("/api/v1/members/:id/fee", get(members::fee_quote))
        .route("/api/v1/members/:id/feedback", get(members::list_feedback))
        .route("/api/v1/members/:id/payrolls", get(members::list_payrolls))
        .route("/api/v1/feedback", post(members::submit_feedback))
        .route("/api/v1/payrolls", post(members::record_payroll))
        .route(
            "/api/v1/surveys",
            post(surveys::create_survey).get(surveys::list_surveys),
        )
        .route("/api/v1/surveys/:id", get(surveys::get_survey))
        .route("/api/v1/surveys/:id/answers", post(surveys::submit_answers))
        .route(
            "/api/v1/strikes",
            post(strikes::create_decision).get(strikes::list_decisions),
        )
        .route(
            "/api/v1/strikes/:id",
            get(strikes::get_decision).delete(strikes::delete_decision),
        )
        .route(
            "/api/v1/strikes/:id/votes",
            post(strikes::cast_vote).get(strikes::list_votes),
        )
        .route("/api/v1/strikes/:id/end-voting", post(strikes::end_voting))
        .route("/api/v1/strikes/:id/decision", post(strikes::decide))
        .route(
            "/api/v1/meetings",
            post(community::create_meeting).get(community::list_meetings),
        )
        .route(
            "/api/v1/meetings/:id",
            axum::routing::delete(community::delete_meeting),
        )
        .route(
            "/api/v1/posts",
            post(community::create_post).get(community::list_posts),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
        .with_state(state)
}

/// Liveness plus a database round trip; 503 when the database is unreachable.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, database) = match sqlx::query("SELECT 1").execute(state.database.pool()).await {
        Ok(_) => (StatusCode::OK, "healthy"),
        Err(e) => {
            tracing::warn!("Health check database probe failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "error")
        }
    };

    let body = Json(json!({
        "status": if status.is_success() { "healthy" } else { "unhealthy" },
        "service": "union-app",
        "database": database,
        "timestamp": chrono::Utc::now()
    }));
    (status, body)
}
