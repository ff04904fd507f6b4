//! Member endpoints: self-service profile management plus admin CRUD.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::auth::{AuthAdmin, AuthMember};
use crate::error::ApiResult;
use crate::rest::AppState;
use shared::{
    CreateMemberRequest, Member, MemberListResponse, MemberResponse, UpdateMemberRequest,
    UpdateProfileRequest,
};

/// PUT /api/members/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthMember,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Json<MemberResponse>> {
    info!("PUT /api/members/me - member: {}", auth.member_id);

    let response = state.members.update_profile(&auth.member_id, request).await?;
    Ok(Json(response))
}

/// DELETE /api/members/me
pub async fn delete_own_account(
    State(state): State<AppState>,
    auth: AuthMember,
) -> ApiResult<StatusCode> {
    info!("DELETE /api/members/me - member: {}", auth.member_id);

    state.members.delete_member(&auth.member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/members (admin)
pub async fn list_members(
    State(state): State<AppState>,
    _admin: AuthAdmin,
) -> ApiResult<Json<MemberListResponse>> {
    info!("GET /api/members");

    let response = state.members.list_members().await?;
    Ok(Json(response))
}

/// POST /api/members (admin)
pub async fn create_member(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Json(request): Json<CreateMemberRequest>,
) -> ApiResult<(StatusCode, Json<MemberResponse>)> {
    info!("POST /api/members - email: {}", request.email);

    let response = state.members.create_member(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/members/:id (admin)
pub async fn get_member(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(member_id): Path<String>,
) -> ApiResult<Json<Member>> {
    info!("GET /api/members/{}", member_id);

    let member = state.members.get_member(&member_id).await?;
    Ok(Json(member))
}

/// PUT /api/members/:id (admin)
pub async fn update_member(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(member_id): Path<String>,
    Json(request): Json<UpdateMemberRequest>,
) -> ApiResult<Json<MemberResponse>> {
    info!("PUT /api/members/{}", member_id);

    let response = state.members.update_member(&member_id, request).await?;
    Ok(Json(response))
}

/// DELETE /api/members/:id (admin)
pub async fn delete_member(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(member_id): Path<String>,
) -> ApiResult<StatusCode> {
    info!("DELETE /api/members/{}", member_id);

    state.members.delete_member(&member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
