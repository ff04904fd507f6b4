//! REST interface layer.
//!
//! Translation only: handlers log the request, hand off to a domain
//! service, and let `ApiError` carry failures to the wire. No business
//! logic lives here.

pub mod auth_apis;
pub mod class_apis;
pub mod enrollment_apis;
pub mod exercise_apis;
pub mod guide_apis;
pub mod member_apis;

use std::path::Path;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::services::ServeDir;

use crate::auth::AuthConfig;
use crate::domain::{ClassService, ExerciseService, GuideService, MemberService, RosterService};
use crate::storage::DbConnection;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub members: MemberService,
    pub classes: ClassService,
    pub roster: RosterService,
    pub exercises: ExerciseService,
    pub guides: GuideService,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(db: DbConnection, auth: AuthConfig) -> Self {
        Self {
            members: MemberService::new(db.clone(), auth.clone()),
            classes: ClassService::new(db.clone()),
            roster: RosterService::new(db.clone()),
            exercises: ExerciseService::new(db.clone()),
            guides: GuideService::new(db),
            auth,
        }
    }
}

/// Build the application router: the JSON API under /api and the guide PDF
/// directory under /guides
pub fn router(state: AppState, guides_dir: &Path) -> Router {
    let api = Router::new()
        .route("/auth/register", post(auth_apis::register))
        .route("/auth/login", post(auth_apis::login))
        .route("/auth/me", get(auth_apis::me))
        .route(
            "/members",
            get(member_apis::list_members).post(member_apis::create_member),
        )
        .route(
            "/members/me",
            put(member_apis::update_profile).delete(member_apis::delete_own_account),
        )
        .route(
            "/members/:id",
            get(member_apis::get_member)
                .put(member_apis::update_member)
                .delete(member_apis::delete_member),
        )
        .route(
            "/classes",
            get(class_apis::list_classes).post(class_apis::create_class),
        )
        .route(
            "/classes/:id",
            get(class_apis::get_class)
                .put(class_apis::update_class)
                .delete(class_apis::delete_class),
        )
        .route("/classes/:id/enroll", post(enrollment_apis::enroll))
        .route("/classes/:id/unenroll", post(enrollment_apis::unenroll))
        .route("/classes/:id/roster", get(enrollment_apis::list_roster))
        .route("/classes/:id/capacity", put(enrollment_apis::update_capacity))
        .route(
            "/exercises",
            get(exercise_apis::list_exercises).post(exercise_apis::create_exercise),
        )
        .route(
            "/exercises/:id",
            get(exercise_apis::get_exercise)
                .put(exercise_apis::update_exercise)
                .delete(exercise_apis::delete_exercise),
        )
        .route(
            "/guides",
            get(guide_apis::list_guides).post(guide_apis::create_guide),
        )
        .route(
            "/guides/:id",
            get(guide_apis::get_guide)
                .put(guide_apis::update_guide)
                .delete(guide_apis::delete_guide),
        );

    Router::new()
        .nest("/api", api)
        .nest_service("/guides", ServeDir::new(guides_dir))
        .with_state(state)
}
