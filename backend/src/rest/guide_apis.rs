//! Guide metadata endpoints. The PDF files themselves are served statically
//! from the guides directory.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::auth::{AuthAdmin, AuthMember};
use crate::error::ApiResult;
use crate::rest::AppState;
use shared::{CreateGuideRequest, Guide, GuideListResponse, GuideResponse, UpdateGuideRequest};

/// GET /api/guides
pub async fn list_guides(
    State(state): State<AppState>,
    _auth: AuthMember,
) -> ApiResult<Json<GuideListResponse>> {
    info!("GET /api/guides");

    let response = state.guides.list_guides().await?;
    Ok(Json(response))
}

/// GET /api/guides/:id
pub async fn get_guide(
    State(state): State<AppState>,
    _auth: AuthMember,
    Path(guide_id): Path<String>,
) -> ApiResult<Json<Guide>> {
    info!("GET /api/guides/{}", guide_id);

    let guide = state.guides.get_guide(&guide_id).await?;
    Ok(Json(guide))
}

/// POST /api/guides (admin)
pub async fn create_guide(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Json(request): Json<CreateGuideRequest>,
) -> ApiResult<(StatusCode, Json<GuideResponse>)> {
    info!("POST /api/guides - title: {}", request.title);

    let response = state.guides.create_guide(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /api/guides/:id (admin)
pub async fn update_guide(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(guide_id): Path<String>,
    Json(request): Json<UpdateGuideRequest>,
) -> ApiResult<Json<GuideResponse>> {
    info!("PUT /api/guides/{}", guide_id);

    let response = state.guides.update_guide(&guide_id, request).await?;
    Ok(Json(response))
}

/// DELETE /api/guides/:id (admin)
pub async fn delete_guide(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(guide_id): Path<String>,
) -> ApiResult<StatusCode> {
    info!("DELETE /api/guides/{}", guide_id);

    state.guides.delete_guide(&guide_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
