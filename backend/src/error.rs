//! Typed API errors.
//!
//! Every precondition failure a handler can hit maps to a distinct error
//! kind with its own HTTP status and machine-readable code, so the client
//! can render "already enrolled" differently from "class full".

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("class not found")]
    ClassNotFound,

    #[error("member not found")]
    MemberNotFound,

    #[error("exercise not found")]
    ExerciseNotFound,

    #[error("guide not found")]
    GuideNotFound,

    #[error("class is not active")]
    ClassNotActive,

    #[error("already enrolled in this class")]
    AlreadyEnrolled,

    #[error("not currently enrolled in this class")]
    NotEnrolled,

    #[error("class is full ({current}/{capacity})")]
    ClassFull { capacity: u32, current: u32 },

    #[error("capacity {requested} is below the current roster size {roster}")]
    CapacityBelowRoster { requested: u32, roster: u32 },

    #[error("email is already registered")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("admin role required")]
    Forbidden,

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Stable machine-readable code for the `error` field of the body.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::ClassNotFound => "class_not_found",
            ApiError::MemberNotFound => "member_not_found",
            ApiError::ExerciseNotFound => "exercise_not_found",
            ApiError::GuideNotFound => "guide_not_found",
            ApiError::ClassNotActive => "class_not_active",
            ApiError::AlreadyEnrolled => "already_enrolled",
            ApiError::NotEnrolled => "not_enrolled",
            ApiError::ClassFull { .. } => "class_full",
            ApiError::CapacityBelowRoster { .. } => "capacity_below_roster",
            ApiError::EmailTaken => "email_taken",
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::Validation(_) => "validation",
            ApiError::Unauthorized => "unauthorized",
            ApiError::Forbidden => "forbidden",
            ApiError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ClassNotFound
            | ApiError::MemberNotFound
            | ApiError::ExerciseNotFound
            | ApiError::GuideNotFound => StatusCode::NOT_FOUND,
            ApiError::ClassNotActive
            | ApiError::AlreadyEnrolled
            | ApiError::NotEnrolled
            | ApiError::ClassFull { .. }
            | ApiError::CapacityBelowRoster { .. }
            | ApiError::EmailTaken => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::ClassFull { capacity, current } => json!({
                "error": self.code(),
                "message": self.to_string(),
                "capacity": capacity,
                "current": current,
            }),
            ApiError::CapacityBelowRoster { requested, roster } => json!({
                "error": self.code(),
                "message": self.to_string(),
                "requested": requested,
                "roster": roster,
            }),
            ApiError::Internal(e) => {
                tracing::error!("internal error: {:?}", e);
                // Details stay in the log, not the response
                json!({
                    "error": self.code(),
                    "message": "internal error",
                })
            }
            _ => json!({
                "error": self.code(),
                "message": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
