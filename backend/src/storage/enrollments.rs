//! Roster write path.
//!
//! Enrollment and capacity changes are single conditional statements, so
//! two concurrent enrolls against one free place can never both append:
//! the capacity check and the insert execute atomically in the store.
//! When the conditional statement affects no rows, the failed precondition
//! is identified by reads inside the same transaction and reported as the
//! matching typed error.

use anyhow::{anyhow, Result};
use chrono::Utc;
use shared::{ClassSummary, DayOfWeek, RosterEntry};
use sqlx::{Row, Sqlite, Transaction};

use crate::error::{ApiError, ApiResult};

use super::DbConnection;

async fn class_summary(
    tx: &mut Transaction<'_, Sqlite>,
    class_id: &str,
) -> Result<ClassSummary> {
    let row = sqlx::query(
        r#"
        SELECT c.id, c.name, c.day, c.start_time, c.end_time, c.capacity,
               (SELECT COUNT(*) FROM enrollments e WHERE e.class_id = c.id) AS enrolled_count
        FROM classes c
        WHERE c.id = ?
        "#,
    )
    .bind(class_id)
    .fetch_one(&mut **tx)
    .await?;

    let day: String = row.get("day");
    let capacity = row.get::<i64, _>("capacity") as u32;
    let enrolled = row.get::<i64, _>("enrolled_count") as u32;

    Ok(ClassSummary {
        id: row.get("id"),
        name: row.get("name"),
        day: DayOfWeek::from_str(&day).ok_or_else(|| anyhow!("bad day value in db: {day}"))?,
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        available: capacity.saturating_sub(enrolled),
    })
}

/// Work out which enroll precondition failed, reading the same transaction
/// the conditional insert ran in.
async fn classify_enroll_failure(
    tx: &mut Transaction<'_, Sqlite>,
    class_id: &str,
    member_id: &str,
) -> Result<ApiError> {
    let class = sqlx::query(
        r#"
        SELECT active, capacity,
               (SELECT COUNT(*) FROM enrollments e WHERE e.class_id = classes.id) AS enrolled_count
        FROM classes
        WHERE id = ?
        "#,
    )
    .bind(class_id)
    .fetch_optional(&mut **tx)
    .await?;

    let Some(class) = class else {
        return Ok(ApiError::ClassNotFound);
    };

    if !class.get::<bool, _>("active") {
        return Ok(ApiError::ClassNotActive);
    }

    let member = sqlx::query("SELECT 1 FROM members WHERE id = ?")
        .bind(member_id)
        .fetch_optional(&mut **tx)
        .await?;
    if member.is_none() {
        return Ok(ApiError::MemberNotFound);
    }

    let already = sqlx::query("SELECT 1 FROM enrollments WHERE class_id = ? AND member_id = ?")
        .bind(class_id)
        .bind(member_id)
        .fetch_optional(&mut **tx)
        .await?;
    if already.is_some() {
        return Ok(ApiError::AlreadyEnrolled);
    }

    let capacity = class.get::<i64, _>("capacity") as u32;
    let current = class.get::<i64, _>("enrolled_count") as u32;
    if current >= capacity {
        return Ok(ApiError::ClassFull { capacity, current });
    }

    // Reachable only if the state moved between the statement and this read
    Ok(ApiError::Internal(anyhow!(
        "enrollment rejected but preconditions hold for class {class_id}"
    )))
}

impl DbConnection {
    /// Append a member to a class roster.
    ///
    /// The whole precondition set (class exists and is active, member
    /// exists, not already enrolled, roster below capacity) is evaluated by
    /// the store inside the insert itself.
    pub async fn enroll_member(&self, class_id: &str, member_id: &str) -> ApiResult<ClassSummary> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO enrollments (class_id, member_id, enrolled_at)
            SELECT c.id, m.id, ?
            FROM classes c
            JOIN members m ON m.id = ?
            WHERE c.id = ?
              AND c.active = 1
              AND NOT EXISTS (
                  SELECT 1 FROM enrollments e
                  WHERE e.class_id = c.id AND e.member_id = m.id
              )
              AND (SELECT COUNT(*) FROM enrollments e WHERE e.class_id = c.id) < c.capacity
            "#,
        )
        .bind(&now)
        .bind(member_id)
        .bind(class_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Transaction dropped unchanged; nothing to roll back
            return Err(classify_enroll_failure(&mut tx, class_id, member_id).await?);
        }

        let summary = class_summary(&mut tx, class_id).await?;
        tx.commit().await?;
        Ok(summary)
    }

    /// Remove a member from a class roster
    pub async fn unenroll_member(&self, class_id: &str, member_id: &str) -> ApiResult<ClassSummary> {
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query("DELETE FROM enrollments WHERE class_id = ? AND member_id = ?")
            .bind(class_id)
            .bind(member_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            let exists = sqlx::query("SELECT 1 FROM classes WHERE id = ?")
                .bind(class_id)
                .fetch_optional(&mut *tx)
                .await?;
            return Err(if exists.is_none() {
                ApiError::ClassNotFound
            } else {
                ApiError::NotEnrolled
            });
        }

        let summary = class_summary(&mut tx, class_id).await?;
        tx.commit().await?;
        Ok(summary)
    }

    /// Set a class capacity, rejecting any value below the current roster
    /// size. The floor check and the write are one conditional statement.
    pub async fn update_class_capacity(&self, class_id: &str, capacity: u32) -> ApiResult<()> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE classes
            SET capacity = ?1, updated_at = ?2
            WHERE id = ?3
              AND ?1 >= (SELECT COUNT(*) FROM enrollments e WHERE e.class_id = classes.id)
            "#,
        )
        .bind(capacity as i64)
        .bind(&now)
        .bind(class_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let roster = sqlx::query(
                r#"
                SELECT (SELECT COUNT(*) FROM enrollments e WHERE e.class_id = classes.id) AS enrolled_count
                FROM classes
                WHERE id = ?
                "#,
            )
            .bind(class_id)
            .fetch_optional(&mut *tx)
            .await?;

            return Err(match roster {
                None => ApiError::ClassNotFound,
                Some(row) => ApiError::CapacityBelowRoster {
                    requested: capacity,
                    roster: row.get::<i64, _>("enrolled_count") as u32,
                },
            });
        }

        tx.commit().await?;
        Ok(())
    }

    /// Pure membership test over the roster, by canonical string id
    pub async fn is_enrolled(&self, class_id: &str, member_id: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM enrollments WHERE class_id = ? AND member_id = ?")
            .bind(class_id)
            .bind(member_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.is_some())
    }

    /// The roster in enrollment order, expanded to member display fields
    pub async fn class_roster(&self, class_id: &str) -> ApiResult<Vec<RosterEntry>> {
        let exists = sqlx::query("SELECT 1 FROM classes WHERE id = ?")
            .bind(class_id)
            .fetch_optional(self.pool())
            .await?;
        if exists.is_none() {
            return Err(ApiError::ClassNotFound);
        }

        let rows = sqlx::query(
            r#"
            SELECT m.id AS member_id, m.name, m.email, m.goal, m.weekly_goal
            FROM enrollments e
            JOIN members m ON m.id = e.member_id
            WHERE e.class_id = ?
            ORDER BY e.id ASC
            "#,
        )
        .bind(class_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| {
                let goal: String = row.get("goal");
                Ok(RosterEntry {
                    member_id: row.get("member_id"),
                    name: row.get("name"),
                    email: row.get("email"),
                    goal: shared::FitnessGoal::from_str(&goal)
                        .ok_or_else(|| anyhow!("bad goal value in db: {goal}"))?,
                    weekly_goal: row.get::<i64, _>("weekly_goal") as u32,
                })
            })
            .collect::<Result<Vec<_>>>()
            .map_err(ApiError::from)
    }
}
