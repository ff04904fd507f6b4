use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::storage::classes::ClassRecord;
use crate::storage::DbConnection;
use shared::{
    normalize_time, ClassListResponse, ClassOffering, ClassResponse, CreateClassRequest,
    UpdateClassRequest,
};

/// Service for administering class offerings (schedule, instructor, active
/// flag). Roster and capacity mutations live in the roster service.
#[derive(Clone)]
pub struct ClassService {
    db: DbConnection,
}

impl ClassService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Create a new class offering
    pub async fn create_class(&self, request: CreateClassRequest) -> ApiResult<ClassResponse> {
        info!("Creating class: name={}", request.name);

        let name = validate_text(&request.name, "name")?;
        let instructor = validate_text(&request.instructor, "instructor")?;
        let (start_time, end_time) = validate_times(&request.start_time, &request.end_time)?;
        if request.capacity < 1 {
            return Err(ApiError::Validation("capacity must be at least 1".to_string()));
        }

        let now = Utc::now().to_rfc3339();
        let record = ClassRecord {
            id: Uuid::new_v4().to_string(),
            name,
            description: request.description,
            day: request.day,
            start_time,
            end_time,
            instructor,
            capacity: request.capacity,
            active: request.active.unwrap_or(true),
            created_at: now.clone(),
            updated_at: now,
        };

        self.db.store_class(&record).await?;
        info!("Created class {} ({})", record.id, record.name);

        let class = self.get_class(&record.id, None).await?;
        Ok(ClassResponse {
            class,
            success_message: "Class created successfully".to_string(),
        })
    }

    /// Get a class with derived enrollment state; `viewer` sets the
    /// requesting member's `enrolled` flag
    pub async fn get_class(&self, class_id: &str, viewer: Option<&str>) -> ApiResult<ClassOffering> {
        self.db
            .get_class(class_id, viewer)
            .await?
            .ok_or(ApiError::ClassNotFound)
    }

    /// List all class offerings
    pub async fn list_classes(&self, viewer: Option<&str>) -> ApiResult<ClassListResponse> {
        let classes = self.db.list_classes(viewer).await?;
        Ok(ClassListResponse { classes })
    }

    /// Update schedule fields; only provided fields change. Capacity goes
    /// through the roster service.
    pub async fn update_class(
        &self,
        class_id: &str,
        request: UpdateClassRequest,
    ) -> ApiResult<ClassResponse> {
        info!("Updating class: {}", class_id);

        let current = self.get_class(class_id, None).await?;

        let name = match request.name {
            Some(n) => validate_text(&n, "name")?,
            None => current.name,
        };
        let instructor = match request.instructor {
            Some(i) => validate_text(&i, "instructor")?,
            None => current.instructor,
        };
        let start = request.start_time.as_deref().unwrap_or(&current.start_time);
        let end = request.end_time.as_deref().unwrap_or(&current.end_time);
        let (start_time, end_time) = validate_times(start, end)?;

        let record = ClassRecord {
            id: current.id.clone(),
            name,
            description: super::merge_optional_text(request.description, current.description),
            day: request.day.unwrap_or(current.day),
            start_time,
            end_time,
            instructor,
            capacity: current.capacity,
            active: request.active.unwrap_or(current.active),
            created_at: current.created_at,
            updated_at: Utc::now().to_rfc3339(),
        };

        if !self.db.update_class(&record).await? {
            return Err(ApiError::ClassNotFound);
        }

        info!("Updated class {}", record.id);
        let class = self.get_class(&record.id, None).await?;
        Ok(ClassResponse {
            class,
            success_message: "Class updated successfully".to_string(),
        })
    }

    /// Delete a class unconditionally; enrolled members are not notified
    /// beyond the log note
    pub async fn delete_class(&self, class_id: &str) -> ApiResult<()> {
        info!("Deleting class: {}", class_id);

        match self.db.delete_class(class_id).await? {
            None => Err(ApiError::ClassNotFound),
            Some(0) => {
                info!("Deleted class {}", class_id);
                Ok(())
            }
            Some(stranded) => {
                warn!(
                    "Deleted class {} with {} member(s) still enrolled",
                    class_id, stranded
                );
                Ok(())
            }
        }
    }
}

fn validate_text(value: &str, field: &str) -> ApiResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

/// Normalize both times and enforce start < end. Normalized "HH:MM" is
/// fixed-width, so the string comparison is a correct time comparison.
fn validate_times(start: &str, end: &str) -> ApiResult<(String, String)> {
    let start = normalize_time(start)
        .ok_or_else(|| ApiError::Validation(format!("invalid start time: {start}")))?;
    let end = normalize_time(end)
        .ok_or_else(|| ApiError::Validation(format!("invalid end time: {end}")))?;
    if start >= end {
        return Err(ApiError::Validation(format!(
            "start time {start} must be before end time {end}"
        )));
    }
    Ok((start, end))
}

// Keeps test setup for other services out of their files
#[cfg(test)]
pub(crate) async fn test_class(
    db: &DbConnection,
    name: &str,
    capacity: u32,
    active: bool,
) -> anyhow::Result<String> {
    let now = Utc::now().to_rfc3339();
    let record = ClassRecord {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        description: None,
        day: shared::DayOfWeek::Monday,
        start_time: "18:00".to_string(),
        end_time: "19:00".to_string(),
        instructor: "Alex".to_string(),
        capacity,
        active,
        created_at: now.clone(),
        updated_at: now,
    };
    db.store_class(&record).await?;
    Ok(record.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::DayOfWeek;

    async fn setup() -> ClassService {
        let db = DbConnection::init_test().await.expect("init test db");
        ClassService::new(db)
    }

    fn create_request() -> CreateClassRequest {
        CreateClassRequest {
            name: "Morning Yoga".to_string(),
            description: Some("All levels".to_string()),
            day: DayOfWeek::Tuesday,
            start_time: "7:30".to_string(),
            end_time: "08:30".to_string(),
            instructor: "Sam".to_string(),
            capacity: 12,
            active: None,
        }
    }

    #[tokio::test]
    async fn create_normalizes_times_and_defaults_active() {
        let service = setup().await;

        let response = service.create_class(create_request()).await.expect("create");
        let class = response.class;

        assert_eq!(class.start_time, "07:30");
        assert_eq!(class.end_time, "08:30");
        assert!(class.active);
        assert_eq!(class.capacity, 12);
        assert_eq!(class.enrolled_count, 0);
        assert_eq!(class.available, 12);
        assert!(!class.is_full);
    }

    #[tokio::test]
    async fn create_rejects_inverted_times() {
        let service = setup().await;

        let mut request = create_request();
        request.start_time = "09:00".to_string();
        request.end_time = "08:00".to_string();
        assert!(matches!(
            service.create_class(request).await,
            Err(ApiError::Validation(_))
        ));

        // Equal start and end is also invalid
        let mut request = create_request();
        request.start_time = "08:00".to_string();
        request.end_time = "8:00".to_string();
        assert!(matches!(
            service.create_class(request).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn create_rejects_zero_capacity_and_blank_name() {
        let service = setup().await;

        let mut request = create_request();
        request.capacity = 0;
        assert!(matches!(
            service.create_class(request).await,
            Err(ApiError::Validation(_))
        ));

        let mut request = create_request();
        request.name = "   ".to_string();
        assert!(matches!(
            service.create_class(request).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn update_changes_only_provided_fields() {
        let service = setup().await;
        let created = service.create_class(create_request()).await.expect("create");

        let updated = service
            .update_class(
                &created.class.id,
                UpdateClassRequest {
                    instructor: Some("Robin".to_string()),
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.class.instructor, "Robin");
        assert!(!updated.class.active);
        assert_eq!(updated.class.name, "Morning Yoga");
        assert_eq!(updated.class.start_time, "07:30");
    }

    #[tokio::test]
    async fn update_can_clear_the_description() {
        let service = setup().await;
        let created = service.create_class(create_request()).await.expect("create");
        assert_eq!(created.class.description.as_deref(), Some("All levels"));

        // Absent field keeps the current value
        let kept = service
            .update_class(
                &created.class.id,
                UpdateClassRequest {
                    instructor: Some("Robin".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(kept.class.description.as_deref(), Some("All levels"));

        // A blank string clears it
        let cleared = service
            .update_class(
                &created.class.id,
                UpdateClassRequest {
                    description: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(cleared.class.description, None);
    }

    #[tokio::test]
    async fn update_validates_resulting_times() {
        let service = setup().await;
        let created = service.create_class(create_request()).await.expect("create");

        // Moving only the end time before the existing start must fail
        let err = service
            .update_class(
                &created.class.id,
                UpdateClassRequest {
                    end_time: Some("07:00".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect_err("inverted");
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_is_unconditional() {
        let service = setup().await;
        let created = service.create_class(create_request()).await.expect("create");

        service.delete_class(&created.class.id).await.expect("delete");
        assert!(matches!(
            service.get_class(&created.class.id, None).await,
            Err(ApiError::ClassNotFound)
        ));
        assert!(matches!(
            service.delete_class(&created.class.id).await,
            Err(ApiError::ClassNotFound)
        ));
    }
}
