//! User store trait

use async_trait::async_trait;
use std::fmt::Debug;
use uuid::Uuid;

use super::entity::{User, UserListParams, UsersList};
use crate::domain::DomainError;

/// Persistence contract for users.
///
/// Missing rows surface as [`DomainError::UserNotFound`] and duplicate emails
/// as [`DomainError::UserExists`]; anything else is an infrastructure fault.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Persist a new user and return it with its creation timestamp
    async fn insert(
        &self,
        email: &str,
        hashed_password: &str,
        id: Uuid,
        admin: bool,
    ) -> Result<User, DomainError>;

    /// Return one page of users in a stable order
    async fn list(&self, params: UserListParams) -> Result<UsersList, DomainError>;

    async fn retrieve_by_email(&self, email: &str) -> Result<User, DomainError>;

    async fn retrieve(&self, id: Uuid) -> Result<User, DomainError>;

    async fn update_password(&self, id: Uuid, hashed_password: &str) -> Result<(), DomainError>;

    async fn update_admin(&self, id: Uuid, admin: bool) -> Result<(), DomainError>;

    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}
