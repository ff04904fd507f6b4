//! Domain services: validation, logging, and orchestration over storage.

pub mod class_service;
pub mod exercise_service;
pub mod guide_service;
pub mod member_service;
pub mod roster_service;

pub use class_service::ClassService;
pub use exercise_service::ExerciseService;
pub use guide_service::GuideService;
pub use member_service::MemberService;
pub use roster_service::RosterService;

/// Merge an optional text field on update: an absent field keeps the current
/// value, a blank string clears it.
pub(crate) fn merge_optional_text(
    update: Option<String>,
    current: Option<String>,
) -> Option<String> {
    match update {
        Some(s) if s.trim().is_empty() => None,
        Some(s) => Some(s),
        None => current,
    }
}
