use anyhow::{anyhow, Result};
use shared::{Difficulty, Exercise};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::DbConnection;

fn exercise_from_row(row: &SqliteRow) -> Result<Exercise> {
    let difficulty: String = row.get("difficulty");

    Ok(Exercise {
        id: row.get("id"),
        name: row.get("name"),
        muscle_group: row.get("muscle_group"),
        difficulty: Difficulty::from_str(&difficulty)
            .ok_or_else(|| anyhow!("bad difficulty value in db: {difficulty}"))?,
        description: row.get("description"),
        video_url: row.get("video_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

impl DbConnection {
    /// Store a new exercise
    pub async fn store_exercise(&self, exercise: &Exercise) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO exercises (id, name, muscle_group, difficulty, description, video_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&exercise.id)
        .bind(&exercise.name)
        .bind(&exercise.muscle_group)
        .bind(exercise.difficulty.as_str())
        .bind(&exercise.description)
        .bind(&exercise.video_url)
        .bind(&exercise.created_at)
        .bind(&exercise.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Get an exercise by ID
    pub async fn get_exercise(&self, exercise_id: &str) -> Result<Option<Exercise>> {
        let row = sqlx::query("SELECT * FROM exercises WHERE id = ?")
            .bind(exercise_id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(exercise_from_row).transpose()
    }

    /// List all exercises ordered by muscle group, then name
    pub async fn list_exercises(&self) -> Result<Vec<Exercise>> {
        let rows = sqlx::query("SELECT * FROM exercises ORDER BY muscle_group ASC, name ASC")
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(exercise_from_row).collect()
    }

    /// Update an exercise. Returns false when it does not exist.
    pub async fn update_exercise(&self, exercise: &Exercise) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE exercises
            SET name = ?, muscle_group = ?, difficulty = ?, description = ?, video_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&exercise.name)
        .bind(&exercise.muscle_group)
        .bind(exercise.difficulty.as_str())
        .bind(&exercise.description)
        .bind(&exercise.video_url)
        .bind(&exercise.updated_at)
        .bind(&exercise.id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an exercise. Returns false when it does not exist.
    pub async fn delete_exercise(&self, exercise_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM exercises WHERE id = ?")
            .bind(exercise_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
