use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{AuthenticatedUser, TokenClaims, UserRole};
use shared_models::contact::Email;
use shared_models::UniqueId;

use crate::jwt::sign_token;

pub struct TestConfig {
    pub jwt_secret: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            jwt_secret: self.jwt_secret.clone(),
            seed_demo_data: false,
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub entity_id: String,
}

impl TestUser {
    pub fn new(role: UserRole, entity_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: format!("{}@example.com", entity_id),
            name: format!("Test {}", role),
            role,
            entity_id: entity_id.to_string(),
        }
    }

    pub fn patient(entity_id: &str) -> Self {
        Self::new(UserRole::Patient, entity_id)
    }

    pub fn provider(entity_id: &str) -> Self {
        Self::new(UserRole::Provider, entity_id)
    }

    pub fn admin() -> Self {
        Self::new(UserRole::Admin, "admin-1")
    }

    pub fn to_user(&self) -> AuthenticatedUser {
        AuthenticatedUser::new(
            UniqueId::new(self.id.clone()),
            Email::parse(&self.email).expect("test email is valid"),
            self.name.clone(),
            self.role,
            UniqueId::new(self.entity_id.clone()),
        )
    }

    pub fn claims(&self, exp_hours: i64) -> TokenClaims {
        let now = Utc::now();
        TokenClaims {
            sub: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            entity_id: self.entity_id.clone(),
            exp: Some((now + Duration::hours(exp_hours)).timestamp().max(0) as u64),
            iat: Some(now.timestamp() as u64),
        }
    }

    pub fn token(&self, secret: &str) -> String {
        sign_token(&self.claims(24), secret).expect("test claims serialize")
    }

    pub fn bearer(&self, secret: &str) -> String {
        format!("Bearer {}", self.token(secret))
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        sign_token(&user.claims(-1), secret).expect("test claims serialize")
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        user.token("wrong-secret")
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}
