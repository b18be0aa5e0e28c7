//! User infrastructure module
//!
//! Argon2 password hashing, the in-memory and PostgreSQL user stores,
//! and the service that ties validation, hashing and storage together.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{CreateUserRequest, ListUsersRequest, UserService};
