use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::storage::DbConnection;
use shared::{
    CreateExerciseRequest, Exercise, ExerciseListResponse, ExerciseResponse, UpdateExerciseRequest,
};

/// Service for the exercise library
#[derive(Clone)]
pub struct ExerciseService {
    db: DbConnection,
}

impl ExerciseService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Add an exercise to the library
    pub async fn create_exercise(&self, request: CreateExerciseRequest) -> ApiResult<ExerciseResponse> {
        info!("Creating exercise: name={}", request.name);

        let name = validate_text(&request.name, "name")?;
        let muscle_group = validate_text(&request.muscle_group, "muscle group")?;

        let now = Utc::now().to_rfc3339();
        let exercise = Exercise {
            id: Uuid::new_v4().to_string(),
            name,
            muscle_group,
            difficulty: request.difficulty,
            description: request.description,
            video_url: request.video_url,
            created_at: now.clone(),
            updated_at: now,
        };

        self.db.store_exercise(&exercise).await?;
        info!("Created exercise {} ({})", exercise.id, exercise.name);

        Ok(ExerciseResponse {
            exercise,
            success_message: "Exercise created successfully".to_string(),
        })
    }

    /// Get an exercise by ID
    pub async fn get_exercise(&self, exercise_id: &str) -> ApiResult<Exercise> {
        self.db
            .get_exercise(exercise_id)
            .await?
            .ok_or(ApiError::ExerciseNotFound)
    }

    /// List the full library
    pub async fn list_exercises(&self) -> ApiResult<ExerciseListResponse> {
        let exercises = self.db.list_exercises().await?;
        Ok(ExerciseListResponse { exercises })
    }

    /// Update an exercise; only provided fields change
    pub async fn update_exercise(
        &self,
        exercise_id: &str,
        request: UpdateExerciseRequest,
    ) -> ApiResult<ExerciseResponse> {
        info!("Updating exercise: {}", exercise_id);

        let mut exercise = self.get_exercise(exercise_id).await?;

        if let Some(name) = request.name {
            exercise.name = validate_text(&name, "name")?;
        }
        if let Some(muscle_group) = request.muscle_group {
            exercise.muscle_group = validate_text(&muscle_group, "muscle group")?;
        }
        if let Some(difficulty) = request.difficulty {
            exercise.difficulty = difficulty;
        }
        exercise.description =
            super::merge_optional_text(request.description, exercise.description.take());
        exercise.video_url =
            super::merge_optional_text(request.video_url, exercise.video_url.take());
        exercise.updated_at = Utc::now().to_rfc3339();

        if !self.db.update_exercise(&exercise).await? {
            return Err(ApiError::ExerciseNotFound);
        }

        info!("Updated exercise {}", exercise.id);
        Ok(ExerciseResponse {
            exercise,
            success_message: "Exercise updated successfully".to_string(),
        })
    }

    /// Remove an exercise from the library
    pub async fn delete_exercise(&self, exercise_id: &str) -> ApiResult<()> {
        info!("Deleting exercise: {}", exercise_id);

        if !self.db.delete_exercise(exercise_id).await? {
            return Err(ApiError::ExerciseNotFound);
        }
        Ok(())
    }
}

fn validate_text(value: &str, field: &str) -> ApiResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Difficulty;

    async fn setup() -> ExerciseService {
        let db = DbConnection::init_test().await.expect("init test db");
        ExerciseService::new(db)
    }

    fn create_request(name: &str) -> CreateExerciseRequest {
        CreateExerciseRequest {
            name: name.to_string(),
            muscle_group: "back".to_string(),
            difficulty: Difficulty::Intermediate,
            description: Some("Keep the bar close".to_string()),
            video_url: None,
        }
    }

    #[tokio::test]
    async fn create_and_list() {
        let service = setup().await;

        service.create_exercise(create_request("Deadlift")).await.expect("create");
        service.create_exercise(create_request("Barbell Row")).await.expect("create");

        let listed = service.list_exercises().await.expect("list");
        assert_eq!(listed.exercises.len(), 2);
        // Ordered by muscle group then name
        assert_eq!(listed.exercises[0].name, "Barbell Row");
    }

    #[tokio::test]
    async fn update_then_delete() {
        let service = setup().await;
        let created = service.create_exercise(create_request("Squat")).await.expect("create");

        let updated = service
            .update_exercise(
                &created.exercise.id,
                UpdateExerciseRequest {
                    difficulty: Some(Difficulty::Advanced),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.exercise.difficulty, Difficulty::Advanced);
        assert_eq!(updated.exercise.name, "Squat");

        service.delete_exercise(&created.exercise.id).await.expect("delete");
        assert!(matches!(
            service.get_exercise(&created.exercise.id).await,
            Err(ApiError::ExerciseNotFound)
        ));
    }

    #[tokio::test]
    async fn update_sets_and_clears_optional_fields() {
        let service = setup().await;
        let created = service.create_exercise(create_request("Bench Press")).await.expect("create");
        assert!(created.exercise.description.is_some());

        let updated = service
            .update_exercise(
                &created.exercise.id,
                UpdateExerciseRequest {
                    description: Some("  ".to_string()),
                    video_url: Some("https://example.com/bench".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.exercise.description, None);
        assert_eq!(
            updated.exercise.video_url.as_deref(),
            Some("https://example.com/bench")
        );
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let service = setup().await;
        assert!(matches!(
            service.create_exercise(create_request("  ")).await,
            Err(ApiError::Validation(_))
        ));
    }
}
