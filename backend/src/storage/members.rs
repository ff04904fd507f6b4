use anyhow::{anyhow, Result};
use chrono::Utc;
use shared::{FitnessGoal, Member, Role, Sex};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::DbConnection;

pub(crate) fn member_from_row(row: &SqliteRow) -> Result<Member> {
    let sex: String = row.get("sex");
    let goal: String = row.get("goal");
    let role: String = row.get("role");

    Ok(Member {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        age: row.get::<i64, _>("age") as u32,
        sex: Sex::from_str(&sex).ok_or_else(|| anyhow!("bad sex value in db: {sex}"))?,
        goal: FitnessGoal::from_str(&goal).ok_or_else(|| anyhow!("bad goal value in db: {goal}"))?,
        weekly_goal: row.get::<i64, _>("weekly_goal") as u32,
        role: Role::from_str(&role).ok_or_else(|| anyhow!("bad role value in db: {role}"))?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
    )
}

impl DbConnection {
    /// Store a new member. Returns false when the email is already taken
    /// (unique index violation).
    pub async fn store_member(&self, member: &Member, password_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO members (id, email, name, password_hash, age, sex, goal, weekly_goal, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&member.id)
        .bind(&member.email)
        .bind(&member.name)
        .bind(password_hash)
        .bind(member.age as i64)
        .bind(member.sex.as_str())
        .bind(member.goal.as_str())
        .bind(member.weekly_goal as i64)
        .bind(member.role.as_str())
        .bind(&member.created_at)
        .bind(&member.updated_at)
        .execute(self.pool())
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a member by ID
    pub async fn get_member(&self, member_id: &str) -> Result<Option<Member>> {
        let row = sqlx::query("SELECT * FROM members WHERE id = ?")
            .bind(member_id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(member_from_row).transpose()
    }

    /// Look up a member and their password hash by email (case-insensitive)
    pub async fn find_member_by_email(&self, email: &str) -> Result<Option<(Member, String)>> {
        let row = sqlx::query("SELECT * FROM members WHERE email = ?")
            .bind(email)
            .fetch_optional(self.pool())
            .await?;

        match row {
            Some(r) => {
                let hash: String = r.get("password_hash");
                Ok(Some((member_from_row(&r)?, hash)))
            }
            None => Ok(None),
        }
    }

    /// List all members ordered by name
    pub async fn list_members(&self) -> Result<Vec<Member>> {
        let rows = sqlx::query("SELECT * FROM members ORDER BY name ASC")
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(member_from_row).collect()
    }

    /// Update a member's profile fields. Returns false when the (changed)
    /// email collides with another account.
    pub async fn update_member(&self, member: &Member) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE members
            SET email = ?, name = ?, age = ?, sex = ?, goal = ?, weekly_goal = ?, role = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&member.email)
        .bind(&member.name)
        .bind(member.age as i64)
        .bind(member.sex.as_str())
        .bind(member.goal.as_str())
        .bind(member.weekly_goal as i64)
        .bind(member.role.as_str())
        .bind(&member.updated_at)
        .bind(&member.id)
        .execute(self.pool())
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn update_member_password(&self, member_id: &str, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE members SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now().to_rfc3339())
            .bind(member_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Delete a member and, in the same transaction, every roster row that
    /// references them, so rosters never hold dangling ids.
    pub async fn delete_member(&self, member_id: &str) -> Result<bool> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM enrollments WHERE member_id = ?")
            .bind(member_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(member_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
