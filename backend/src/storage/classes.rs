use anyhow::{anyhow, Result};
use shared::{ClassOffering, DayOfWeek};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::DbConnection;

/// Stored fields of a class offering; derived enrollment state is computed
/// per read in SQL.
#[derive(Debug, Clone)]
pub struct ClassRecord {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub day: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    pub instructor: String,
    pub capacity: u32,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

fn offering_from_row(row: &SqliteRow) -> Result<ClassOffering> {
    let day: String = row.get("day");
    let capacity = row.get::<i64, _>("capacity") as u32;
    let enrolled_count = row.get::<i64, _>("enrolled_count") as u32;

    Ok(ClassOffering {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        day: DayOfWeek::from_str(&day).ok_or_else(|| anyhow!("bad day value in db: {day}"))?,
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        instructor: row.get("instructor"),
        capacity,
        active: row.get("active"),
        enrolled_count,
        available: capacity.saturating_sub(enrolled_count),
        is_full: enrolled_count >= capacity,
        enrolled: row.get("viewer_enrolled"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

const OFFERING_SELECT: &str = r#"
    SELECT c.*,
           (SELECT COUNT(*) FROM enrollments e WHERE e.class_id = c.id) AS enrolled_count,
           EXISTS (
               SELECT 1 FROM enrollments e
               WHERE e.class_id = c.id AND e.member_id = ?
           ) AS viewer_enrolled
    FROM classes c
"#;

impl DbConnection {
    /// Store a new class offering
    pub async fn store_class(&self, class: &ClassRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO classes (id, name, description, day, start_time, end_time, instructor, capacity, active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&class.id)
        .bind(&class.name)
        .bind(&class.description)
        .bind(class.day.as_str())
        .bind(&class.start_time)
        .bind(&class.end_time)
        .bind(&class.instructor)
        .bind(class.capacity as i64)
        .bind(class.active)
        .bind(&class.created_at)
        .bind(&class.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Get a class offering with derived enrollment state. `viewer` sets the
    /// `enrolled` flag for the requesting member.
    pub async fn get_class(&self, class_id: &str, viewer: Option<&str>) -> Result<Option<ClassOffering>> {
        let sql = format!("{OFFERING_SELECT} WHERE c.id = ?");
        let row = sqlx::query(&sql)
            .bind(viewer.unwrap_or(""))
            .bind(class_id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(offering_from_row).transpose()
    }

    /// List all class offerings ordered by name
    pub async fn list_classes(&self, viewer: Option<&str>) -> Result<Vec<ClassOffering>> {
        let sql = format!("{OFFERING_SELECT} ORDER BY c.name ASC");
        let rows = sqlx::query(&sql)
            .bind(viewer.unwrap_or(""))
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(offering_from_row).collect()
    }

    /// Update the editable fields of a class (capacity is governed by the
    /// roster invariant and changes through its own conditional update).
    /// Returns false when the class does not exist.
    pub async fn update_class(&self, class: &ClassRecord) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE classes
            SET name = ?, description = ?, day = ?, start_time = ?, end_time = ?, instructor = ?, active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&class.name)
        .bind(&class.description)
        .bind(class.day.as_str())
        .bind(&class.start_time)
        .bind(&class.end_time)
        .bind(&class.instructor)
        .bind(class.active)
        .bind(&class.updated_at)
        .bind(&class.id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a class and its roster rows. Returns the number of members
    /// that were still enrolled, or None when the class does not exist.
    pub async fn delete_class(&self, class_id: &str) -> Result<Option<u64>> {
        let mut tx = self.pool().begin().await?;

        let exists = sqlx::query("SELECT 1 FROM classes WHERE id = ?")
            .bind(class_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let stranded = sqlx::query("DELETE FROM enrollments WHERE class_id = ?")
            .bind(class_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM classes WHERE id = ?")
            .bind(class_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(stranded))
    }
}
