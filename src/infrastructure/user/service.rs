//! User service for registration, listing and authentication

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::user::{
    check_email, check_new_password, User, UserListParams, UserRepository, UsersList,
};
use crate::domain::{DomainError, Validator};

use super::password::PasswordHasher;

/// Request for creating a new user
#[derive(Debug, Clone, Default)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub admin: bool,
}

/// Raw paging values as they arrive from the query string
#[derive(Debug, Clone, Default)]
pub struct ListUsersRequest {
    pub page_number: Option<String>,
    pub page_size: Option<String>,
}

/// User service orchestrating validation, hashing and the store
#[derive(Debug, Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Create a new user service
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new user.
    ///
    /// All field failures are reported together; nothing is persisted unless
    /// every rule passes.
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        let existing = self.find_by_email(&request.email).await?;

        let mut v = Validator::new();
        check_email(&mut v, "email", &request.email, existing.is_some());
        check_new_password(&mut v, "password", &request.password);

        if v.has_errors() {
            debug!(field_errors = %v, "User creation failed validation");
            return Err(DomainError::FailedValidation(v));
        }

        let hashed_password = self.hash_password(request.password).await?;

        let user = self
            .repository
            .insert(&request.email, &hashed_password, Uuid::new_v4(), request.admin)
            .await
            .map_err(|err| match err {
                // Lost a race with a concurrent registration of the same email
                DomainError::UserExists => {
                    let mut v = Validator::new();
                    check_email(&mut v, "email", &request.email, true);
                    DomainError::FailedValidation(v)
                }
                other => other,
            })?;

        info!(user_id = %user.id(), admin = user.is_admin(), "User created");
        Ok(user)
    }

    /// List one page of users; missing or empty values fall back to defaults
    pub async fn list(&self, request: ListUsersRequest) -> Result<UsersList, DomainError> {
        let mut v = Validator::new();

        let page_size = parse_page_value(
            &mut v,
            "pageSize",
            request.page_size.as_deref(),
            UserListParams::DEFAULT_PAGE_SIZE,
        );
        let page_number = parse_page_value(
            &mut v,
            "pageNumber",
            request.page_number.as_deref(),
            UserListParams::DEFAULT_PAGE_NUMBER,
        );

        match (page_number, page_size) {
            (Some(page_number), Some(page_size)) if !v.has_errors() => {
                self.repository
                    .list(UserListParams::new(page_number, page_size))
                    .await
            }
            _ => {
                debug!(field_errors = %v, "User listing failed validation");
                Err(DomainError::FailedValidation(v))
            }
        }
    }

    /// Check credentials and return the matching user
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let user = self.find_by_email(email).await?;

        let mut v = Validator::new();
        v.check_field(!email.is_empty(), "email", "Email is required");
        v.check_field(user.is_some(), "email", "Email address could not be found");

        if let Some(user) = &user {
            let password_matches = self
                .verify_password(password.to_owned(), user.hashed_password().to_owned())
                .await?;

            v.check_field(!password.is_empty(), "password", "Password is required");
            v.check_field(password_matches, "password", "Password is incorrect");
        }

        match user {
            Some(user) if !v.has_errors() => Ok(user),
            _ => {
                debug!(field_errors = %v, "Authentication failed validation");
                Err(DomainError::FailedValidation(v))
            }
        }
    }

    /// Get a user by ID
    pub async fn get(&self, id: Uuid) -> Result<User, DomainError> {
        self.repository.retrieve(id).await
    }

    /// Replace a user's password after running the registration rules on it
    pub async fn update_password(&self, id: Uuid, new_password: String) -> Result<(), DomainError> {
        let mut v = Validator::new();
        check_new_password(&mut v, "password", &new_password);

        if v.has_errors() {
            return Err(DomainError::FailedValidation(v));
        }

        let hashed_password = self.hash_password(new_password).await?;
        self.repository.update_password(id, &hashed_password).await?;

        info!(user_id = %id, "Password updated");
        Ok(())
    }

    /// Grant or revoke the admin flag
    pub async fn update_admin(&self, id: Uuid, admin: bool) -> Result<(), DomainError> {
        self.repository.update_admin(id, admin).await?;

        info!(user_id = %id, admin, "Admin flag updated");
        Ok(())
    }

    /// Delete a user
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.repository.delete(id).await?;

        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Lookup where a missing user is an answer, not an error
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        match self.repository.retrieve_by_email(email).await {
            Ok(user) => Ok(Some(user)),
            Err(DomainError::UserNotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Argon2 is CPU-bound, so hashing and verification run on the blocking pool
    async fn hash_password(&self, password: String) -> Result<String, DomainError> {
        let hasher = Arc::clone(&self.hasher);

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, DomainError> {
        let hasher = Arc::clone(&self.hasher);

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| DomainError::internal(format!("Password check task failed: {}", e)))?
    }
}

/// Parse a positive page value, recording a field error on failure
fn parse_page_value(v: &mut Validator, field: &str, raw: Option<&str>, default: u32) -> Option<u32> {
    let message = format!("{} must be a positive integer", field);

    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Some(default),
    };

    let parsed = raw
        .parse::<i64>()
        .ok()
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok());

    v.check_field(parsed.is_some(), field, &message);
    parsed
}
