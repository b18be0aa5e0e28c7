//! Application state for shared services

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{DomainError, User, UsersList};
use crate::infrastructure::auth::{IssuedToken, JwtClaims, JwtGenerator};
use crate::infrastructure::user::{CreateUserRequest, ListUsersRequest, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub jwt_service: Arc<dyn JwtServiceTrait>,
}

impl AppState {
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        jwt_service: Arc<dyn JwtServiceTrait>,
    ) -> Self {
        Self {
            user_service,
            jwt_service,
        }
    }
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError>;
    async fn list(&self, request: ListUsersRequest) -> Result<UsersList, DomainError>;
    async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError>;
    async fn get(&self, id: Uuid) -> Result<User, DomainError>;
    async fn update_password(&self, id: Uuid, new_password: String) -> Result<(), DomainError>;
    async fn update_admin(&self, id: Uuid, admin: bool) -> Result<(), DomainError>;
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}

#[async_trait::async_trait]
impl UserServiceTrait for UserService {
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        UserService::create(self, request).await
    }

    async fn list(&self, request: ListUsersRequest) -> Result<UsersList, DomainError> {
        UserService::list(self, request).await
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        UserService::authenticate(self, email, password).await
    }

    async fn get(&self, id: Uuid) -> Result<User, DomainError> {
        UserService::get(self, id).await
    }

    async fn update_password(&self, id: Uuid, new_password: String) -> Result<(), DomainError> {
        UserService::update_password(self, id, new_password).await
    }

    async fn update_admin(&self, id: Uuid, admin: bool) -> Result<(), DomainError> {
        UserService::update_admin(self, id, admin).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        UserService::delete(self, id).await
    }
}

/// Trait for authentication token operations
pub trait JwtServiceTrait: Send + Sync {
    fn generate(&self, user: &User) -> Result<IssuedToken, DomainError>;
    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError>;
}

impl<T: JwtGenerator> JwtServiceTrait for T {
    fn generate(&self, user: &User) -> Result<IssuedToken, DomainError> {
        JwtGenerator::generate(self, user)
    }

    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError> {
        JwtGenerator::validate(self, token)
    }
}
