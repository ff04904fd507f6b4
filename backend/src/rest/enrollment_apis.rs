//! Roster endpoints: member self-service enroll/unenroll, admin roster and
//! capacity management.

use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use crate::auth::{AuthAdmin, AuthMember};
use crate::error::ApiResult;
use crate::rest::AppState;
use shared::{ClassResponse, EnrollmentResponse, RosterResponse, UpdateCapacityRequest};

/// POST /api/classes/:id/enroll
pub async fn enroll(
    State(state): State<AppState>,
    auth: AuthMember,
    Path(class_id): Path<String>,
) -> ApiResult<Json<EnrollmentResponse>> {
    info!("POST /api/classes/{}/enroll - member: {}", class_id, auth.member_id);

    let response = state.roster.enroll(&class_id, &auth.member_id).await?;
    Ok(Json(response))
}

/// POST /api/classes/:id/unenroll
pub async fn unenroll(
    State(state): State<AppState>,
    auth: AuthMember,
    Path(class_id): Path<String>,
) -> ApiResult<Json<EnrollmentResponse>> {
    info!("POST /api/classes/{}/unenroll - member: {}", class_id, auth.member_id);

    let response = state.roster.unenroll(&class_id, &auth.member_id).await?;
    Ok(Json(response))
}

/// GET /api/classes/:id/roster (admin)
pub async fn list_roster(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(class_id): Path<String>,
) -> ApiResult<Json<RosterResponse>> {
    info!("GET /api/classes/{}/roster", class_id);

    let response = state.roster.list_roster(&class_id).await?;
    Ok(Json(response))
}

/// PUT /api/classes/:id/capacity (admin)
pub async fn update_capacity(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(class_id): Path<String>,
    Json(request): Json<UpdateCapacityRequest>,
) -> ApiResult<Json<ClassResponse>> {
    info!("PUT /api/classes/{}/capacity - capacity: {}", class_id, request.capacity);

    let response = state.roster.update_capacity(&class_id, request.capacity).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthConfig;
    use crate::error::ApiError;
    use crate::storage::DbConnection;
    use shared::{CreateClassRequest, DayOfWeek, FitnessGoal, RegisterRequest, Role, Sex};

    async fn setup() -> AppState {
        let db = DbConnection::init_test().await.expect("init test db");
        AppState::new(db, AuthConfig::new("test-secret".to_string()))
    }

    async fn register_member(state: &AppState, email: &str) -> AuthMember {
        let response = state
            .members
            .register(RegisterRequest {
                email: email.to_string(),
                name: "Handler Test".to_string(),
                password: "long enough password".to_string(),
                age: 28,
                sex: Sex::Female,
                goal: FitnessGoal::MuscleGain,
                weekly_goal: None,
            })
            .await
            .expect("register");
        AuthMember {
            member_id: response.member.id,
            role: Role::Member,
        }
    }

    async fn create_class(state: &AppState, capacity: u32) -> String {
        state
            .classes
            .create_class(CreateClassRequest {
                name: "Handler Spin".to_string(),
                description: None,
                day: DayOfWeek::Friday,
                start_time: "18:00".to_string(),
                end_time: "19:00".to_string(),
                instructor: "Pat".to_string(),
                capacity,
                active: None,
            })
            .await
            .expect("create class")
            .class
            .id
    }

    #[tokio::test]
    async fn enroll_handler_returns_updated_summary() {
        let state = setup().await;
        let member = register_member(&state, "handler@example.com").await;
        let class_id = create_class(&state, 3).await;

        let Json(response) = enroll(
            State(state.clone()),
            member.clone(),
            Path(class_id.clone()),
        )
        .await
        .expect("enroll");

        assert_eq!(response.class.id, class_id);
        assert_eq!(response.class.available, 2);

        // A second attempt surfaces the typed conflict
        let err = enroll(State(state), member, Path(class_id))
            .await
            .expect_err("double enroll");
        assert!(matches!(err, ApiError::AlreadyEnrolled));
    }

    #[tokio::test]
    async fn unenroll_handler_round_trip() {
        let state = setup().await;
        let member = register_member(&state, "roundtrip@example.com").await;
        let class_id = create_class(&state, 2).await;

        enroll(State(state.clone()), member.clone(), Path(class_id.clone()))
            .await
            .expect("enroll");

        let Json(response) = unenroll(State(state), member, Path(class_id))
            .await
            .expect("unenroll");
        assert_eq!(response.class.available, 2);
    }
}
