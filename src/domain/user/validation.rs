//! User input rules

use once_cell::sync::Lazy;
use regex::Regex;

use super::common_passwords::COMMON_PASSWORDS;
use crate::domain::validator::{matches, not_in, Validator};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 72;

/// Dotted-atom local part, hostname labels of at most 63 characters
pub static EMAIL_RX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// Validate an email for registration
pub fn check_email(v: &mut Validator, field: &str, email: &str, already_in_use: bool) {
    v.check_field(!email.is_empty(), field, "Email is required");
    v.check_field(matches(email, &EMAIL_RX), field, "Must be a valid email address");
    v.check_field(!already_in_use, field, "Email is already in use");
}

/// Validate a password that is about to be hashed and stored
pub fn check_new_password(v: &mut Validator, field: &str, password: &str) {
    let length = password.chars().count();

    v.check_field(!password.is_empty(), field, "Password is required");
    v.check_field(length >= MIN_PASSWORD_LENGTH, field, "Password is too short");
    v.check_field(length <= MAX_PASSWORD_LENGTH, field, "Password is too long");
    v.check_field(not_in(password, COMMON_PASSWORDS), field, "Password is too common");
}
