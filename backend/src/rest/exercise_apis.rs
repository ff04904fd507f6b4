//! Exercise library endpoints: member-readable, admin-managed.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::auth::{AuthAdmin, AuthMember};
use crate::error::ApiResult;
use crate::rest::AppState;
use shared::{
    CreateExerciseRequest, Exercise, ExerciseListResponse, ExerciseResponse, UpdateExerciseRequest,
};

/// GET /api/exercises
pub async fn list_exercises(
    State(state): State<AppState>,
    _auth: AuthMember,
) -> ApiResult<Json<ExerciseListResponse>> {
    info!("GET /api/exercises");

    let response = state.exercises.list_exercises().await?;
    Ok(Json(response))
}

/// GET /api/exercises/:id
pub async fn get_exercise(
    State(state): State<AppState>,
    _auth: AuthMember,
    Path(exercise_id): Path<String>,
) -> ApiResult<Json<Exercise>> {
    info!("GET /api/exercises/{}", exercise_id);

    let exercise = state.exercises.get_exercise(&exercise_id).await?;
    Ok(Json(exercise))
}

/// POST /api/exercises (admin)
pub async fn create_exercise(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Json(request): Json<CreateExerciseRequest>,
) -> ApiResult<(StatusCode, Json<ExerciseResponse>)> {
    info!("POST /api/exercises - name: {}", request.name);

    let response = state.exercises.create_exercise(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /api/exercises/:id (admin)
pub async fn update_exercise(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(exercise_id): Path<String>,
    Json(request): Json<UpdateExerciseRequest>,
) -> ApiResult<Json<ExerciseResponse>> {
    info!("PUT /api/exercises/{}", exercise_id);

    let response = state.exercises.update_exercise(&exercise_id, request).await?;
    Ok(Json(response))
}

/// DELETE /api/exercises/:id (admin)
pub async fn delete_exercise(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(exercise_id): Path<String>,
) -> ApiResult<StatusCode> {
    info!("DELETE /api/exercises/{}", exercise_id);

    state.exercises.delete_exercise(&exercise_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
