//! Authentication infrastructure module
//!
//! This module provides JWT authentication tokens for users.

mod jwt;

pub use jwt::{IssuedToken, JwtClaims, JwtConfig, JwtGenerator, JwtService, DEFAULT_JWT_SECRET};
