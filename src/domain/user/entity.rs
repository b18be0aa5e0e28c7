//! User entity and listing types

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Registered user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    email: String,
    id: Uuid,
    admin: bool,
    created: DateTime<Utc>,
    /// Argon2 PHC string - never exposed in serialization
    #[serde(skip_serializing)]
    hashed_password: String,
}

impl User {
    /// Create a user record as the store persists it
    pub fn new(
        id: Uuid,
        email: impl Into<String>,
        hashed_password: impl Into<String>,
        admin: bool,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            email: email.into(),
            id,
            admin,
            created,
            hashed_password: hashed_password.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn hashed_password(&self) -> &str {
        &self.hashed_password
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn set_hashed_password(&mut self, hashed_password: impl Into<String>) {
        self.hashed_password = hashed_password.into();
    }

    pub fn set_admin(&mut self, admin: bool) {
        self.admin = admin;
    }
}

/// Page descriptor for listing users; both values are 1-based and positive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserListParams {
    pub page_number: u32,
    pub page_size: u32,
}

impl UserListParams {
    pub const DEFAULT_PAGE_NUMBER: u32 = 1;
    pub const DEFAULT_PAGE_SIZE: u32 = 20;

    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// Number of rows preceding the requested page
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number.saturating_sub(1)) * u64::from(self.page_size)
    }
}

impl Default for UserListParams {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_NUMBER, Self::DEFAULT_PAGE_SIZE)
    }
}

/// One page of users plus totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsersList {
    pub data: Vec<User>,
    #[serde(rename = "total")]
    pub total_objects: u64,
    #[serde(rename = "pages")]
    pub total_pages: u64,
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
}

impl UsersList {
    /// Build the envelope, deriving the page count from the total
    pub fn new(data: Vec<User>, total_objects: u64, params: UserListParams) -> Self {
        Self {
            data,
            total_objects,
            total_pages: total_pages(total_objects, params.page_size),
            page: params.page_number,
            page_size: params.page_size,
        }
    }
}

/// ceil(total / page_size), zero for an empty page size
pub fn total_pages(total_objects: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }

    total_objects.div_ceil(u64::from(page_size))
}
