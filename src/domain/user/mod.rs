//! User domain
//!
//! This module provides the user entity, the paged listing envelope, the
//! registration rules and the store trait both repositories implement.

mod common_passwords;
mod entity;
mod repository;
mod validation;

pub use common_passwords::COMMON_PASSWORDS;
pub use entity::{total_pages, User, UserListParams, UsersList};
pub use repository::UserRepository;
pub use validation::{
    check_email, check_new_password, EMAIL_RX, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};

#[cfg(test)]
pub use repository::mock::FailingUserRepository;
