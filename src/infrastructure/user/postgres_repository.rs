//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::user::{User, UserListParams, UserRepository, UsersList};
use crate::domain::DomainError;
use crate::infrastructure::storage::with_transaction;

const USER_COLUMNS: &str = "id, email, hashed_password, admin, created";

/// PostgreSQL implementation of UserRepository.
///
/// Inserts, updates and deletes each run in their own transaction.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(
        &self,
        email: &str,
        hashed_password: &str,
        id: Uuid,
        admin: bool,
    ) -> Result<User, DomainError> {
        let email = email.to_owned();
        let hashed_password = hashed_password.to_owned();

        with_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let row = sqlx::query(&format!(
                    "INSERT INTO users (id, email, hashed_password, admin) \
                     VALUES ($1, $2, $3, $4) RETURNING {}",
                    USER_COLUMNS
                ))
                .bind(id)
                .bind(&email)
                .bind(&hashed_password)
                .bind(admin)
                .fetch_one(&mut *conn)
                .await
                .map_err(map_insert_error)?;

                row_to_user(&row)
            })
        })
        .await
    }

    async fn list(&self, params: UserListParams) -> Result<UsersList, DomainError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        let offset = i64::try_from(params.offset()).unwrap_or(i64::MAX);

        let rows = sqlx::query(&format!(
            "SELECT {} FROM users ORDER BY created, id LIMIT $1 OFFSET $2",
            USER_COLUMNS
        ))
        .bind(i64::from(params.page_size))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        let mut users = Vec::with_capacity(rows.len());

        for row in rows {
            users.push(row_to_user(&row)?);
        }

        Ok(UsersList::new(users, total.max(0) as u64, params))
    }

    async fn retrieve_by_email(&self, email: &str) -> Result<User, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        match row {
            Some(row) => row_to_user(&row),
            None => Err(DomainError::UserNotFound),
        }
    }

    async fn retrieve(&self, id: Uuid) -> Result<User, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        match row {
            Some(row) => row_to_user(&row),
            None => Err(DomainError::UserNotFound),
        }
    }

    async fn update_password(&self, id: Uuid, hashed_password: &str) -> Result<(), DomainError> {
        let hashed_password = hashed_password.to_owned();

        with_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let result = sqlx::query("UPDATE users SET hashed_password = $2 WHERE id = $1")
                    .bind(id)
                    .bind(&hashed_password)
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| {
                        DomainError::storage(format!("Failed to update password: {}", e))
                    })?;

                require_affected(result.rows_affected())
            })
        })
        .await
    }

    async fn update_admin(&self, id: Uuid, admin: bool) -> Result<(), DomainError> {
        with_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let result = sqlx::query("UPDATE users SET admin = $2 WHERE id = $1")
                    .bind(id)
                    .bind(admin)
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| {
                        DomainError::storage(format!("Failed to update admin flag: {}", e))
                    })?;

                require_affected(result.rows_affected())
            })
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        with_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let result = sqlx::query("DELETE FROM users WHERE id = $1")
                    .bind(id)
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

                require_affected(result.rows_affected())
            })
        })
        .await
    }
}

/// Zero affected rows is the only not-found signal on update/delete
fn require_affected(rows_affected: u64) -> Result<(), DomainError> {
    if rows_affected == 0 {
        return Err(DomainError::UserNotFound);
    }

    Ok(())
}

fn map_insert_error(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DomainError::UserExists,
        _ => DomainError::storage(format!("Failed to create user: {}", err)),
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let id: Uuid = row.try_get("id")?;
    let email: String = row.try_get("email")?;
    let hashed_password: String = row.try_get("hashed_password")?;
    let admin: bool = row.try_get("admin")?;
    let created: DateTime<Utc> = row.try_get("created")?;

    Ok(User::new(id, email, hashed_password, admin, created))
}
