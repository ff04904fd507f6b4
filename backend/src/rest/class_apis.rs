//! Class offering endpoints: member-facing reads, admin CRUD.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::auth::{AuthAdmin, AuthMember};
use crate::error::ApiResult;
use crate::rest::AppState;
use shared::{
    ClassListResponse, ClassOffering, ClassResponse, CreateClassRequest, UpdateClassRequest,
};

/// GET /api/classes
pub async fn list_classes(
    State(state): State<AppState>,
    auth: AuthMember,
) -> ApiResult<Json<ClassListResponse>> {
    info!("GET /api/classes - member: {}", auth.member_id);

    let response = state.classes.list_classes(Some(&auth.member_id)).await?;
    Ok(Json(response))
}

/// GET /api/classes/:id
pub async fn get_class(
    State(state): State<AppState>,
    auth: AuthMember,
    Path(class_id): Path<String>,
) -> ApiResult<Json<ClassOffering>> {
    info!("GET /api/classes/{} - member: {}", class_id, auth.member_id);

    let class = state.classes.get_class(&class_id, Some(&auth.member_id)).await?;
    Ok(Json(class))
}

/// POST /api/classes (admin)
pub async fn create_class(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Json(request): Json<CreateClassRequest>,
) -> ApiResult<(StatusCode, Json<ClassResponse>)> {
    info!("POST /api/classes - name: {}", request.name);

    let response = state.classes.create_class(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /api/classes/:id (admin)
pub async fn update_class(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(class_id): Path<String>,
    Json(request): Json<UpdateClassRequest>,
) -> ApiResult<Json<ClassResponse>> {
    info!("PUT /api/classes/{}", class_id);

    let response = state.classes.update_class(&class_id, request).await?;
    Ok(Json(response))
}

/// DELETE /api/classes/:id (admin)
pub async fn delete_class(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(class_id): Path<String>,
) -> ApiResult<StatusCode> {
    info!("DELETE /api/classes/{}", class_id);

    state.classes.delete_class(&class_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
