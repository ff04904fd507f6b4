use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::storage::DbConnection;
use shared::{ClassResponse, EnrollmentResponse, RosterResponse};

/// The enrollment roster manager.
///
/// Sole owner of roster mutation: enroll, unenroll, and capacity changes go
/// through here and nowhere else, so the roster invariants (size never above
/// capacity, no duplicate members, capacity never below roster size) hold at
/// all times. The checks themselves execute atomically in storage; see
/// `storage::enrollments`.
#[derive(Clone)]
pub struct RosterService {
    db: DbConnection,
}

impl RosterService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Enroll a member into a class. Appends to the roster in enrollment
    /// order; fails with a typed error when the class is missing, inactive,
    /// or full, when the member is missing, or on double enrollment.
    pub async fn enroll(&self, class_id: &str, member_id: &str) -> ApiResult<EnrollmentResponse> {
        info!("Enrolling member {} into class {}", member_id, class_id);

        let class = self.db.enroll_member(class_id, member_id).await?;
        info!(
            "Enrolled member {} into class {} ({} place(s) left)",
            member_id, class_id, class.available
        );

        Ok(EnrollmentResponse {
            class,
            success_message: "Enrolled successfully".to_string(),
        })
    }

    /// Remove a member from a class roster
    pub async fn unenroll(&self, class_id: &str, member_id: &str) -> ApiResult<EnrollmentResponse> {
        info!("Unenrolling member {} from class {}", member_id, class_id);

        let class = self.db.unenroll_member(class_id, member_id).await?;
        info!("Unenrolled member {} from class {}", member_id, class_id);

        Ok(EnrollmentResponse {
            class,
            success_message: "Unenrolled successfully".to_string(),
        })
    }

    /// Set a class capacity (admin). Rejected when the new capacity is
    /// below the current roster size, reporting that size.
    pub async fn update_capacity(&self, class_id: &str, capacity: u32) -> ApiResult<ClassResponse> {
        info!("Setting capacity of class {} to {}", class_id, capacity);

        if capacity < 1 {
            return Err(ApiError::Validation("capacity must be at least 1".to_string()));
        }

        self.db.update_class_capacity(class_id, capacity).await?;

        let class = self
            .db
            .get_class(class_id, None)
            .await?
            .ok_or(ApiError::ClassNotFound)?;
        Ok(ClassResponse {
            class,
            success_message: "Capacity updated successfully".to_string(),
        })
    }

    /// The roster expanded to member display fields, in enrollment order
    pub async fn list_roster(&self, class_id: &str) -> ApiResult<RosterResponse> {
        let class = self
            .db
            .get_class(class_id, None)
            .await?
            .ok_or(ApiError::ClassNotFound)?;
        let members = self.db.class_roster(class_id).await?;

        Ok(RosterResponse {
            class_id: class.id,
            class_name: class.name,
            capacity: class.capacity,
            members,
        })
    }

    /// Pure membership test; ids compared by canonical string form
    pub async fn is_enrolled(&self, class_id: &str, member_id: &str) -> ApiResult<bool> {
        Ok(self.db.is_enrolled(class_id, member_id).await?)
    }
}
