//! Password hashing and bearer-token identity.
//!
//! Every request past the public endpoints is resolved to a
//! `{ member_id, role }` pair before it reaches a service; services trust
//! that resolution and perform no credential checks themselves.

use anyhow::{anyhow, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::Role;

use crate::error::ApiError;
use crate::rest::AppState;

/// Hash a password with a fresh random salt (Argon2id, default params)
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash; malformed hashes verify false
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Member id
    pub sub: String,
    pub role: Role,
    /// Expiry as unix seconds
    pub exp: i64,
}

/// Signing configuration for bearer tokens
#[derive(Clone)]
pub struct AuthConfig {
    secret: String,
}

impl AuthConfig {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Issue a token valid for 24 hours
    pub fn issue_token(&self, member_id: &str, role: Role) -> Result<String> {
        self.issue_token_with_expiry(member_id, role, Utc::now() + Duration::hours(24))
    }

    fn issue_token_with_expiry(
        &self,
        member_id: &str,
        role: Role,
        expires_at: chrono::DateTime<Utc>,
    ) -> Result<String> {
        let claims = Claims {
            sub: member_id.to_string(),
            role,
            exp: expires_at.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| anyhow!("token signing failed: {e}"))
    }

    /// Decode and validate a token; any failure is an Unauthorized outcome
    pub fn decode_token(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| ApiError::Unauthorized)
    }
}

/// The authenticated member behind a request
#[derive(Debug, Clone)]
pub struct AuthMember {
    pub member_id: String,
    pub role: Role,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthMember {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;
        let token = header.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;

        let claims = state.auth.decode_token(token)?;
        Ok(AuthMember {
            member_id: claims.sub,
            role: claims.role,
        })
    }
}

/// An authenticated member with the admin role
#[derive(Debug, Clone)]
pub struct AuthAdmin(pub AuthMember);

#[async_trait]
impl FromRequestParts<AppState> for AuthAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let member = AuthMember::from_request_parts(parts, state).await?;
        if member.role != Role::Admin {
            return Err(ApiError::Forbidden);
        }
        Ok(AuthAdmin(member))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hash = hash_password("correct horse battery").expect("hash");
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same password").expect("hash");
        let b = hash_password("same password").expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_verifies_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn token_round_trip() {
        let auth = AuthConfig::new("test-secret".to_string());
        let token = auth.issue_token("member-1", Role::Admin).expect("issue");

        let claims = auth.decode_token(&token).expect("decode");
        assert_eq!(claims.sub, "member-1");
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn garbage_token_is_unauthorized() {
        let auth = AuthConfig::new("test-secret".to_string());
        assert!(matches!(
            auth.decode_token("garbage"),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let issuer = AuthConfig::new("secret-a".to_string());
        let verifier = AuthConfig::new("secret-b".to_string());
        let token = issuer.issue_token("member-1", Role::Member).expect("issue");
        assert!(verifier.decode_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let auth = AuthConfig::new("test-secret".to_string());
        let token = auth
            .issue_token_with_expiry("member-1", Role::Member, Utc::now() - Duration::hours(1))
            .expect("issue");
        assert!(auth.decode_token(&token).is_err());
    }
}
