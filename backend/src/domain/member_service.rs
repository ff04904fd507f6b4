use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, AuthConfig};
use crate::error::{ApiError, ApiResult};
use crate::storage::DbConnection;
use shared::{
    AuthResponse, CreateMemberRequest, LoginRequest, Member, MemberListResponse, MemberResponse,
    RegisterRequest, Role, UpdateMemberRequest, UpdateProfileRequest,
};

const MIN_AGE: u32 = 14;
const MAX_AGE: u32 = 100;
const MIN_WEEKLY_GOAL: u32 = 1;
const MAX_WEEKLY_GOAL: u32 = 10;
const DEFAULT_WEEKLY_GOAL: u32 = 4;
const MIN_PASSWORD_LEN: usize = 8;

/// Service for member accounts: registration, login, profile management
#[derive(Clone)]
pub struct MemberService {
    db: DbConnection,
    auth: AuthConfig,
}

impl MemberService {
    pub fn new(db: DbConnection, auth: AuthConfig) -> Self {
        Self { db, auth }
    }

    /// Self-registration; always creates a member-role account
    pub async fn register(&self, request: RegisterRequest) -> ApiResult<AuthResponse> {
        info!("Registering member: email={}", request.email);

        let member = self
            .create(
                request.email,
                request.name,
                request.password,
                request.age,
                request.sex,
                request.goal,
                request.weekly_goal,
                Role::Member,
            )
            .await?;

        let token = self.auth.issue_token(&member.id, member.role)?;
        Ok(AuthResponse { token, member })
    }

    /// Admin account creation; the role can be set explicitly
    pub async fn create_member(&self, request: CreateMemberRequest) -> ApiResult<MemberResponse> {
        info!("Admin creating member: email={}", request.email);

        let member = self
            .create(
                request.email,
                request.name,
                request.password,
                request.age,
                request.sex,
                request.goal,
                request.weekly_goal,
                request.role.unwrap_or(Role::Member),
            )
            .await?;

        Ok(MemberResponse {
            member,
            success_message: "Member created successfully".to_string(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn create(
        &self,
        email: String,
        name: String,
        password: String,
        age: u32,
        sex: shared::Sex,
        goal: shared::FitnessGoal,
        weekly_goal: Option<u32>,
        role: Role,
    ) -> ApiResult<Member> {
        let email = validate_email(&email)?;
        let name = validate_name(&name)?;
        validate_password(&password)?;
        validate_age(age)?;
        let weekly_goal = weekly_goal.unwrap_or(DEFAULT_WEEKLY_GOAL);
        validate_weekly_goal(weekly_goal)?;

        let password_hash = hash_password(&password)?;
        let now = Utc::now().to_rfc3339();

        let member = Member {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            age,
            sex,
            goal,
            weekly_goal,
            role,
            created_at: now.clone(),
            updated_at: now,
        };

        if !self.db.store_member(&member, &password_hash).await? {
            warn!("Registration rejected, email taken: {}", member.email);
            return Err(ApiError::EmailTaken);
        }

        info!("Created member {} ({})", member.id, member.email);
        Ok(member)
    }

    /// Verify credentials and issue a token
    pub async fn login(&self, request: LoginRequest) -> ApiResult<AuthResponse> {
        let email = request.email.trim().to_lowercase();
        info!("Login attempt: email={}", email);

        let Some((member, hash)) = self.db.find_member_by_email(&email).await? else {
            warn!("Login failed, unknown email: {}", email);
            return Err(ApiError::InvalidCredentials);
        };

        if !verify_password(&request.password, &hash) {
            warn!("Login failed, bad password: {}", email);
            return Err(ApiError::InvalidCredentials);
        }

        let token = self.auth.issue_token(&member.id, member.role)?;
        info!("Login ok: {} ({})", member.id, member.email);
        Ok(AuthResponse { token, member })
    }

    /// Get a member by ID
    pub async fn get_member(&self, member_id: &str) -> ApiResult<Member> {
        self.db
            .get_member(member_id)
            .await?
            .ok_or(ApiError::MemberNotFound)
    }

    /// List all members
    pub async fn list_members(&self) -> ApiResult<MemberListResponse> {
        let members = self.db.list_members().await?;
        Ok(MemberListResponse { members })
    }

    /// Self-service profile update; only provided fields change
    pub async fn update_profile(
        &self,
        member_id: &str,
        request: UpdateProfileRequest,
    ) -> ApiResult<MemberResponse> {
        info!("Updating profile: {}", member_id);

        self.apply_update(
            member_id,
            UpdateMemberRequest {
                email: None,
                name: request.name,
                age: request.age,
                sex: request.sex,
                goal: request.goal,
                weekly_goal: request.weekly_goal,
                password: request.password,
                role: None,
            },
        )
        .await
    }

    /// Admin update; may also change email and role
    pub async fn update_member(
        &self,
        member_id: &str,
        request: UpdateMemberRequest,
    ) -> ApiResult<MemberResponse> {
        info!("Admin updating member: {}", member_id);
        self.apply_update(member_id, request).await
    }

    async fn apply_update(
        &self,
        member_id: &str,
        request: UpdateMemberRequest,
    ) -> ApiResult<MemberResponse> {
        let mut member = self.get_member(member_id).await?;

        if let Some(email) = request.email {
            member.email = validate_email(&email)?;
        }
        if let Some(name) = request.name {
            member.name = validate_name(&name)?;
        }
        if let Some(age) = request.age {
            validate_age(age)?;
            member.age = age;
        }
        if let Some(sex) = request.sex {
            member.sex = sex;
        }
        if let Some(goal) = request.goal {
            member.goal = goal;
        }
        if let Some(weekly_goal) = request.weekly_goal {
            validate_weekly_goal(weekly_goal)?;
            member.weekly_goal = weekly_goal;
        }
        if let Some(role) = request.role {
            member.role = role;
        }
        member.updated_at = Utc::now().to_rfc3339();

        // Validate and hash before any write; a rejected password must leave
        // the whole profile unchanged
        let password_hash = match request.password {
            Some(password) => {
                validate_password(&password)?;
                Some(hash_password(&password)?)
            }
            None => None,
        };

        if !self.db.update_member(&member).await? {
            return Err(ApiError::EmailTaken);
        }

        if let Some(hash) = password_hash {
            self.db.update_member_password(&member.id, &hash).await?;
        }

        info!("Updated member {}", member.id);
        Ok(MemberResponse {
            member,
            success_message: "Member updated successfully".to_string(),
        })
    }

    /// Delete an account; enrollment rows go with it
    pub async fn delete_member(&self, member_id: &str) -> ApiResult<()> {
        info!("Deleting member: {}", member_id);

        if !self.db.delete_member(member_id).await? {
            return Err(ApiError::MemberNotFound);
        }

        info!("Deleted member {}", member_id);
        Ok(())
    }
}

fn validate_email(email: &str) -> ApiResult<String> {
    let email = email.trim().to_lowercase();
    if email.len() < 3 || !email.contains('@') {
        return Err(ApiError::Validation("invalid email address".to_string()));
    }
    Ok(email)
}

fn validate_name(name: &str) -> ApiResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("name must not be empty".to_string()));
    }
    Ok(name.to_string())
}

fn validate_password(password: &str) -> ApiResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_age(age: u32) -> ApiResult<()> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(ApiError::Validation(format!(
            "age must be between {MIN_AGE} and {MAX_AGE}"
        )));
    }
    Ok(())
}

fn validate_weekly_goal(goal: u32) -> ApiResult<()> {
    if !(MIN_WEEKLY_GOAL..=MAX_WEEKLY_GOAL).contains(&goal) {
        return Err(ApiError::Validation(format!(
            "weekly goal must be between {MIN_WEEKLY_GOAL} and {MAX_WEEKLY_GOAL}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{FitnessGoal, Sex};

    async fn setup() -> MemberService {
        let db = DbConnection::init_test().await.expect("init test db");
        MemberService::new(db, AuthConfig::new("test-secret".to_string()))
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            name: "Test Member".to_string(),
            password: "long enough password".to_string(),
            age: 30,
            sex: Sex::Other,
            goal: FitnessGoal::Recomposition,
            weekly_goal: None,
        }
    }

    #[tokio::test]
    async fn register_defaults_weekly_goal() {
        let service = setup().await;

        let response = service
            .register(register_request("a@example.com"))
            .await
            .expect("register");

        assert_eq!(response.member.weekly_goal, 4);
        assert_eq!(response.member.role, Role::Member);
        assert!(!response.token.is_empty());
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email_case_insensitively() {
        let service = setup().await;

        service
            .register(register_request("dup@example.com"))
            .await
            .expect("first register");

        let err = service
            .register(register_request("DUP@Example.COM"))
            .await
            .expect_err("second register must fail");
        assert!(matches!(err, ApiError::EmailTaken));
    }

    #[tokio::test]
    async fn register_validates_bounds() {
        let service = setup().await;

        let mut too_young = register_request("young@example.com");
        too_young.age = 13;
        assert!(matches!(
            service.register(too_young).await,
            Err(ApiError::Validation(_))
        ));

        let mut bad_goal = register_request("goal@example.com");
        bad_goal.weekly_goal = Some(11);
        assert!(matches!(
            service.register(bad_goal).await,
            Err(ApiError::Validation(_))
        ));

        let mut short_password = register_request("pw@example.com");
        short_password.password = "short".to_string();
        assert!(matches!(
            service.register(short_password).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn login_round_trip() {
        let service = setup().await;
        service
            .register(register_request("login@example.com"))
            .await
            .expect("register");

        let response = service
            .login(LoginRequest {
                email: "Login@Example.com".to_string(),
                password: "long enough password".to_string(),
            })
            .await
            .expect("login");
        assert_eq!(response.member.email, "login@example.com");

        let err = service
            .login(LoginRequest {
                email: "login@example.com".to_string(),
                password: "wrong password!".to_string(),
            })
            .await
            .expect_err("bad password");
        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn profile_update_changes_only_provided_fields() {
        let service = setup().await;
        let registered = service
            .register(register_request("update@example.com"))
            .await
            .expect("register");

        let updated = service
            .update_profile(
                &registered.member.id,
                UpdateProfileRequest {
                    weekly_goal: Some(6),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.member.weekly_goal, 6);
        assert_eq!(updated.member.name, "Test Member");
        assert_eq!(updated.member.email, "update@example.com");
    }

    #[tokio::test]
    async fn rejected_update_leaves_profile_untouched() {
        let service = setup().await;
        let registered = service
            .register(register_request("atomic@example.com"))
            .await
            .expect("register");

        let err = service
            .update_profile(
                &registered.member.id,
                UpdateProfileRequest {
                    name: Some("Changed Name".to_string()),
                    password: Some("short".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect_err("short password");
        assert!(matches!(err, ApiError::Validation(_)));

        let stored = service.get_member(&registered.member.id).await.expect("get");
        assert_eq!(stored.name, "Test Member");
        assert_eq!(stored.updated_at, registered.member.updated_at);

        // The old password still works
        service
            .login(LoginRequest {
                email: "atomic@example.com".to_string(),
                password: "long enough password".to_string(),
            })
            .await
            .expect("login with original password");
    }

    #[tokio::test]
    async fn password_change_touches_updated_at() {
        let db = DbConnection::init_test().await.expect("init test db");
        let service = MemberService::new(db.clone(), AuthConfig::new("test-secret".to_string()));
        let registered = service
            .register(register_request("touch@example.com"))
            .await
            .expect("register");

        db.update_member_password(&registered.member.id, "new-hash")
            .await
            .expect("password");

        let stored = db
            .get_member(&registered.member.id)
            .await
            .expect("get")
            .expect("member");
        assert_ne!(stored.updated_at, registered.member.updated_at);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let service = setup().await;
        let registered = service
            .register(register_request("gone@example.com"))
            .await
            .expect("register");

        service
            .delete_member(&registered.member.id)
            .await
            .expect("delete");

        assert!(matches!(
            service.get_member(&registered.member.id).await,
            Err(ApiError::MemberNotFound)
        ));
        assert!(matches!(
            service.delete_member(&registered.member.id).await,
            Err(ApiError::MemberNotFound)
        ));
    }
}
