use serde::{Deserialize, Serialize};

/// Day of the week a class offering runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "monday" => Some(DayOfWeek::Monday),
            "tuesday" => Some(DayOfWeek::Tuesday),
            "wednesday" => Some(DayOfWeek::Wednesday),
            "thursday" => Some(DayOfWeek::Thursday),
            "friday" => Some(DayOfWeek::Friday),
            "saturday" => Some(DayOfWeek::Saturday),
            "sunday" => Some(DayOfWeek::Sunday),
            _ => None,
        }
    }
}

/// Member sex, as recorded on the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            "other" => Some(Sex::Other),
            _ => None,
        }
    }
}

/// Training goal a member is working toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    MuscleGain,
    Recomposition,
    FatLoss,
}

impl FitnessGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessGoal::MuscleGain => "muscle_gain",
            FitnessGoal::Recomposition => "recomposition",
            FitnessGoal::FatLoss => "fat_loss",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "muscle_gain" => Some(FitnessGoal::MuscleGain),
            "recomposition" => Some(FitnessGoal::Recomposition),
            "fat_loss" => Some(FitnessGoal::FatLoss),
            _ => None,
        }
    }
}

/// Account role controlling access to admin endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "member" => Some(Role::Member),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Difficulty rating for an exercise in the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

/// Normalize a "HH:MM" class time to its zero-padded 24-hour form.
///
/// Accepts "9:30" and returns "09:30"; returns None for anything that is not
/// a valid 24-hour time. Normalized times are fixed-width, so lexicographic
/// comparison orders them correctly.
pub fn normalize_time(value: &str) -> Option<String> {
    let time = chrono::NaiveTime::parse_from_str(value, "%H:%M").ok()?;
    Some(time.format("%H:%M").to_string())
}

/// A gym member account (password hash is never serialized out of the backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    /// Stored lowercased; unique case-insensitively
    pub email: String,
    pub name: String,
    /// Age in years (14-100)
    pub age: u32,
    pub sex: Sex,
    pub goal: FitnessGoal,
    /// Target classes attended per week (1-10, default 4)
    pub weekly_goal: u32,
    pub role: Role,
    /// RFC 3339 timestamps
    pub created_at: String,
    pub updated_at: String,
}

/// A scheduled weekly class with its derived enrollment state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassOffering {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub day: DayOfWeek,
    /// "HH:MM", zero-padded 24-hour
    pub start_time: String,
    pub end_time: String,
    pub instructor: String,
    /// Maximum roster size (inclusive bound, >= 1)
    pub capacity: u32,
    pub active: bool,
    /// Current roster size
    pub enrolled_count: u32,
    /// capacity - enrolled_count
    pub available: u32,
    pub is_full: bool,
    /// Whether the requesting member is on the roster (false for admin lists)
    pub enrolled: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Compact offering view returned by enroll/unenroll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub id: String,
    pub name: String,
    pub day: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    /// Remaining places after the operation
    pub available: u32,
}

/// One roster line, expanded to member display fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub member_id: String,
    pub name: String,
    pub email: String,
    pub goal: FitnessGoal,
    pub weekly_goal: u32,
}

/// An exercise in the library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub muscle_group: String,
    pub difficulty: Difficulty,
    pub description: Option<String>,
    /// Optional demonstration video link
    pub video_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Metadata for a downloadable PDF guide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// File name under the guides directory
    pub filename: String,
    /// Download path served by the backend
    pub url: String,
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Self-registration request (always creates a member-role account)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    /// Plaintext password, hashed before storage (min 8 chars)
    pub password: String,
    pub age: u32,
    pub sex: Sex,
    pub goal: FitnessGoal,
    /// Defaults to 4 when omitted
    pub weekly_goal: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Admin account creation; unlike self-registration the role can be set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMemberRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub age: u32,
    pub sex: Sex,
    pub goal: FitnessGoal,
    pub weekly_goal: Option<u32>,
    pub role: Option<Role>,
}

/// Self-service profile update; only provided fields change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub sex: Option<Sex>,
    pub goal: Option<FitnessGoal>,
    pub weekly_goal: Option<u32>,
    pub password: Option<String>,
}

/// Admin member update; extends the profile fields with email and role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpdateMemberRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub age: Option<u32>,
    pub sex: Option<Sex>,
    pub goal: Option<FitnessGoal>,
    pub weekly_goal: Option<u32>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
    pub description: Option<String>,
    pub day: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    pub instructor: String,
    pub capacity: u32,
    /// Defaults to true when omitted
    pub active: Option<bool>,
}

/// Admin class edit; capacity changes go through the dedicated endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    /// A blank string clears the description
    pub description: Option<String>,
    pub day: Option<DayOfWeek>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub instructor: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCapacityRequest {
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExerciseRequest {
    pub name: String,
    pub muscle_group: String,
    pub difficulty: Difficulty,
    pub description: Option<String>,
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpdateExerciseRequest {
    pub name: Option<String>,
    pub muscle_group: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// A blank string clears the description; same for the video link
    pub description: Option<String>,
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGuideRequest {
    pub title: String,
    pub description: Option<String>,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpdateGuideRequest {
    pub title: Option<String>,
    /// A blank string clears the description
    pub description: Option<String>,
    pub filename: Option<String>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Returned by register and login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    pub member: Member,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberResponse {
    pub member: Member,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberListResponse {
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassResponse {
    pub class: ClassOffering,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassListResponse {
    pub classes: Vec<ClassOffering>,
}

/// Returned by enroll and unenroll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentResponse {
    pub class: ClassSummary,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterResponse {
    pub class_id: String,
    pub class_name: String,
    pub capacity: u32,
    /// In enrollment order
    pub members: Vec<RosterEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseResponse {
    pub exercise: Exercise,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseListResponse {
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideResponse {
    pub guide: Guide,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideListResponse {
    pub guides: Vec<Guide>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_time_pads_hours() {
        assert_eq!(normalize_time("9:30"), Some("09:30".to_string()));
        assert_eq!(normalize_time("09:30"), Some("09:30".to_string()));
        assert_eq!(normalize_time("23:59"), Some("23:59".to_string()));
    }

    #[test]
    fn normalize_time_rejects_invalid() {
        assert_eq!(normalize_time("24:00"), None);
        assert_eq!(normalize_time("12:60"), None);
        assert_eq!(normalize_time("noon"), None);
        assert_eq!(normalize_time(""), None);
    }

    #[test]
    fn enums_round_trip_their_storage_form() {
        assert_eq!(DayOfWeek::from_str("wednesday"), Some(DayOfWeek::Wednesday));
        assert_eq!(DayOfWeek::Wednesday.as_str(), "wednesday");
        assert_eq!(FitnessGoal::from_str("muscle_gain"), Some(FitnessGoal::MuscleGain));
        assert_eq!(Role::from_str("admin"), Some(Role::Admin));
        assert_eq!(Sex::from_str("unknown"), None);
        assert_eq!(Difficulty::from_str("advanced"), Some(Difficulty::Advanced));
    }
}
