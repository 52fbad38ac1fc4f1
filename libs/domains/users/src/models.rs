use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// User entity - matches the users table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    /// User email (unique)
    pub email: String,
    /// Display name
    pub full_name: String,
    /// Argon2 password hash (never exposed in API responses)
    #[serde(skip_serializing)]
    pub hashed_password: String,
    /// Account active status (soft-delete flag)
    pub is_active: bool,
    /// Admin console access
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new user (password must already be hashed by the service
    /// layer). The id is assigned by the repository on insert.
    pub fn new(email: String, full_name: String, hashed_password: String, is_admin: bool) -> Self {
        Self {
            id: 0,
            email,
            full_name,
            hashed_password,
            is_active: true,
            is_admin,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Apply the allow-listed mutable fields.
    pub fn apply_update(&mut self, update: UpdateUser) {
        if let Some(full_name) = update.full_name {
            self.full_name = full_name;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        if let Some(is_admin) = update.is_admin {
            self.is_admin = is_admin;
        }
        self.updated_at = Some(Utc::now());
    }
}

/// User response DTO (without hashed_password)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a user (admin console and maintenance tools)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// DTO for self-service registration (never grants admin)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    pub password: String,
}

/// DTO for user login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: String,
}

/// Bearer token issued on successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Allow-listed mutable fields for user updates. Unknown fields are
/// rejected at the boundary rather than silently ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100))]
    pub full_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_admin: Option<bool>,
}

/// Query filters for listing users
#[derive(Debug, Clone, Deserialize)]
pub struct UserFilter {
    pub is_active: Option<bool>,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for UserFilter {
    fn default() -> Self {
        Self {
            is_active: None,
            skip: 0,
            limit: default_limit(),
        }
    }
}

fn default_limit() -> u64 {
    100
}
