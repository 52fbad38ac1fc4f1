use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, UserFilter, UserResponse};
use crate::repository::UserRepository;

/// Service layer for user business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new user with password hashing
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        validate_password(&input.password)?;

        let hashed_password = hash_password(&input.password)?;
        let user = User::new(
            input.email.to_lowercase(),
            input.full_name,
            hashed_password,
            input.is_admin,
        );

        let created = self.repository.create(user).await?;
        Ok(created.into())
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: i32) -> UserResult<UserResponse> {
        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(user.into())
    }

    /// List users with pagination
    pub async fn list_users(&self, filter: UserFilter) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.list(filter).await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Apply allow-listed updates to a user
    pub async fn update_user(&self, id: i32, input: UpdateUser) -> UserResult<UserResponse> {
        let mut user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        user.apply_update(input);

        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    /// Hard-delete a user and its dependent rows
    pub async fn delete_user(&self, id: i32) -> UserResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(UserError::NotFound(id));
        }

        Ok(())
    }

    /// Verify credentials for login.
    ///
    /// The password check runs before the active check so a wrong password
    /// fails identically regardless of account state.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> UserResult<User> {
        let user = self
            .repository
            .get_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(password, &user.hashed_password)? {
            return Err(UserError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(UserError::InactiveUser);
        }

        Ok(user)
    }

    /// Resolve a bearer token's subject claim to a live, active user.
    ///
    /// A missing or deactivated account yields `None`; the caller maps
    /// that to an unauthenticated response. Always terminal, never a retry.
    pub async fn resolve_active_user(&self, email: &str) -> UserResult<Option<User>> {
        let user = self.repository.get_by_email(email).await?;
        Ok(user.filter(|u| u.is_active))
    }
}

// Password helpers

pub(crate) fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

pub(crate) fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn validate_password(password: &str) -> UserResult<()> {
    if password.len() < 6 {
        return Err(UserError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(UserError::Validation(
            "Password cannot exceed 128 characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryUserRepository;

    fn service() -> UserService<InMemoryUserRepository> {
        UserService::new(InMemoryUserRepository::new())
    }

    fn create_input(email: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            full_name: "A".to_string(),
            password: "secret1".to_string(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let service = service();
        let user = service.create_user(create_input("a@x.com")).await.unwrap();

        assert_eq!(user.email, "a@x.com");
        assert!(!user.is_admin);

        // The stored hash verifies against the original password
        let stored = service.repository.get_by_email("a@x.com").await.unwrap().unwrap();
        assert_ne!(stored.hashed_password, "secret1");
        assert!(verify_password("secret1", &stored.hashed_password).unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let service = service();
        service.create_user(create_input("a@x.com")).await.unwrap();

        let result = service.create_user(create_input("a@x.com")).await;
        assert!(matches!(result, Err(UserError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let service = service();
        let mut input = create_input("a@x.com");
        input.password = "abc".to_string();

        let result = service.create_user(input).await;
        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let service = service();
        service.create_user(create_input("a@x.com")).await.unwrap();

        let result = service.verify_credentials("a@x.com", "wrong").await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let service = service();
        let result = service.verify_credentials("nobody@x.com", "secret1").await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_inactive_user_rejected() {
        let service = service();
        let user = service.create_user(create_input("a@x.com")).await.unwrap();

        service
            .update_user(
                user.id,
                UpdateUser {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Correct password, inactive account
        let result = service.verify_credentials("a@x.com", "secret1").await;
        assert!(matches!(result, Err(UserError::InactiveUser)));

        // Wrong password on the same inactive account still reads as
        // bad credentials
        let result = service.verify_credentials("a@x.com", "wrong").await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_resolve_active_user_skips_inactive() {
        let service = service();
        let user = service.create_user(create_input("a@x.com")).await.unwrap();

        assert!(service
            .resolve_active_user("a@x.com")
            .await
            .unwrap()
            .is_some());

        service
            .update_user(
                user.id,
                UpdateUser {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(service
            .resolve_active_user("a@x.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_allow_list() {
        let service = service();
        let user = service.create_user(create_input("a@x.com")).await.unwrap();

        let updated = service
            .update_user(
                user.id,
                UpdateUser {
                    full_name: Some("Renamed".to_string()),
                    is_admin: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.full_name, "Renamed");
        assert!(updated.is_admin);
        // Email is not on the allow-list and never changes
        assert_eq!(updated.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let service = service();
        let result = service.delete_user(99).await;
        assert!(matches!(result, Err(UserError::NotFound(99))));
    }
}
