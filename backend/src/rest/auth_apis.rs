//! Registration, login, and the current-member endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::auth::AuthMember;
use crate::error::ApiResult;
use crate::rest::AppState;
use shared::{AuthResponse, LoginRequest, Member, RegisterRequest};

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    info!("POST /api/auth/register - email: {}", request.email);

    let response = state.members.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    info!("POST /api/auth/login - email: {}", request.email);

    let response = state.members.login(request).await?;
    Ok(Json(response))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthMember) -> ApiResult<Json<Member>> {
    info!("GET /api/auth/me - member: {}", auth.member_id);

    let member = state.members.get_member(&auth.member_id).await?;
    Ok(Json(member))
}
