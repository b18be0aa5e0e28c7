//! Domain layer - entities, rules and store traits

pub mod error;
pub mod user;
pub mod validator;

pub use error::DomainError;
pub use user::{User, UserListParams, UserRepository, UsersList};
pub use validator::Validator;
