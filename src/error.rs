use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

impl From<sqlx::Error> for UnionError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound("Requested row does not exist".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::Conflict(format!("Unique constraint violated: {}", db_err.message()))
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for UnionError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::DatabaseError(format!("Migration error: {}", err))
    }
}

impl From<::config::ConfigError> for UnionError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<JsonRejection> for UnionError {
    fn from(rejection: JsonRejection) -> Self {
        Self::ValidationError(rejection.body_text())
    }
}

#[derive(Error, Debug)]
pub enum UnionError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl UnionError {
    pub fn member_not_found(member_id: i64) -> Self {
        Self::NotFound(format!("Member {} not found", member_id))
    }

    pub fn decision_not_found(decision_id: i64) -> Self {
        Self::NotFound(format!("Strike decision {} not found", decision_id))
    }

    pub fn voting_closed(decision_id: i64, status: &str) -> Self {
        Self::Conflict(format!(
            "Voting closed for strike decision {} (status: {})",
            decision_id, status
        ))
    }

    pub fn duplicate_vote(decision_id: i64, member_id: i64) -> Self {
        Self::Conflict(format!(
            "Duplicate vote: member {} already voted on strike decision {}",
            member_id, decision_id
        ))
    }

    pub fn officer_required(member_id: i64) -> Self {
        Self::Forbidden(format!("Member {} is not a union representative", member_id))
    }

    pub fn required_field(field: &str) -> Self {
        Self::ValidationError(format!("Field '{}' is required", field))
    }

    /// Stable machine-readable code sent to clients alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Forbidden(_) => "FORBIDDEN",
        }
    }
}

impl IntoResponse for UnionError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            UnionError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            UnionError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            UnionError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            UnionError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            UnionError::DatabaseError(msg) => {
                tracing::error!("Database error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            UnionError::ConfigError(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A configuration error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

pub type UnionResult<T> = Result<T, UnionError>;
