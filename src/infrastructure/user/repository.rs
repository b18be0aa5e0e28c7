//! In-memory user repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::user::{User, UserListParams, UserRepository, UsersList};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository.
///
/// Users are kept in insertion order, which is the listing order.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(
        &self,
        email: &str,
        hashed_password: &str,
        id: Uuid,
        admin: bool,
    ) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.email() == email) {
            return Err(DomainError::UserExists);
        }

        let user = User::new(id, email, hashed_password, admin, Utc::now());
        users.push(user.clone());

        Ok(user)
    }

    async fn list(&self, params: UserListParams) -> Result<UsersList, DomainError> {
        let users = self.users.read().await;

        let total = users.len() as u64;
        let start = usize::try_from(params.offset()).unwrap_or(usize::MAX);

        let page: Vec<User> = users
            .iter()
            .skip(start)
            .take(params.page_size as usize)
            .cloned()
            .collect();

        Ok(UsersList::new(page, total, params))
    }

    async fn retrieve_by_email(&self, email: &str) -> Result<User, DomainError> {
        let users = self.users.read().await;

        users
            .iter()
            .find(|u| u.email() == email)
            .cloned()
            .ok_or(DomainError::UserNotFound)
    }

    async fn retrieve(&self, id: Uuid) -> Result<User, DomainError> {
        let users = self.users.read().await;

        users
            .iter()
            .find(|u| u.id() == id)
            .cloned()
            .ok_or(DomainError::UserNotFound)
    }

    async fn update_password(&self, id: Uuid, hashed_password: &str) -> Result<(), DomainError> {
        let mut users = self.users.write().await;

        let user = users
            .iter_mut()
            .find(|u| u.id() == id)
            .ok_or(DomainError::UserNotFound)?;

        user.set_hashed_password(hashed_password);
        Ok(())
    }

    async fn update_admin(&self, id: Uuid, admin: bool) -> Result<(), DomainError> {
        let mut users = self.users.write().await;

        let user = users
            .iter_mut()
            .find(|u| u.id() == id)
            .ok_or(DomainError::UserNotFound)?;

        user.set_admin(admin);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut users = self.users.write().await;

        let position = users
            .iter()
            .position(|u| u.id() == id)
            .ok_or(DomainError::UserNotFound)?;

        users.remove(position);
        Ok(())
    }
}
