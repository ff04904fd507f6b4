use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::DbConnection;

/// Stored guide metadata; the download URL is derived at the service layer.
#[derive(Debug, Clone)]
pub struct GuideRecord {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub filename: String,
    pub created_at: String,
}

fn guide_from_row(row: &SqliteRow) -> GuideRecord {
    GuideRecord {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        filename: row.get("filename"),
        created_at: row.get("created_at"),
    }
}

impl DbConnection {
    /// Store guide metadata
    pub async fn store_guide(&self, guide: &GuideRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO guides (id, title, description, filename, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&guide.id)
        .bind(&guide.title)
        .bind(&guide.description)
        .bind(&guide.filename)
        .bind(&guide.created_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Get guide metadata by ID
    pub async fn get_guide(&self, guide_id: &str) -> Result<Option<GuideRecord>> {
        let row = sqlx::query("SELECT * FROM guides WHERE id = ?")
            .bind(guide_id)
            .fetch_optional(self.pool())
            .await?;

        Ok(row.as_ref().map(guide_from_row))
    }

    /// List all guides ordered by title
    pub async fn list_guides(&self) -> Result<Vec<GuideRecord>> {
        let rows = sqlx::query("SELECT * FROM guides ORDER BY title ASC")
            .fetch_all(self.pool())
            .await?;

        Ok(rows.iter().map(guide_from_row).collect())
    }

    /// Update guide metadata. Returns false when it does not exist.
    pub async fn update_guide(&self, guide: &GuideRecord) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE guides SET title = ?, description = ?, filename = ? WHERE id = ?",
        )
        .bind(&guide.title)
        .bind(&guide.description)
        .bind(&guide.filename)
        .bind(&guide.id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete guide metadata. Returns false when it does not exist.
    pub async fn delete_guide(&self, guide_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM guides WHERE id = ?")
            .bind(guide_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
