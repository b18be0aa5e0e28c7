//! Scoped transactions for mutating store operations

use futures::future::BoxFuture;
use sqlx::{PgConnection, PgPool};
use tracing::warn;

use crate::domain::DomainError;

/// Run `work` inside a transaction.
///
/// Commits when the unit of work returns `Ok` and rolls back when it returns
/// `Err`. If the returned future is dropped before completion, the underlying
/// `sqlx::Transaction` rolls back on drop.
pub async fn with_transaction<T, F>(pool: &PgPool, work: F) -> Result<T, DomainError>
where
    T: Send,
    F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, DomainError>> + Send,
{
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

    match work(&mut *tx).await {
        Ok(value) => {
            tx.commit().await.map_err(|e| {
                DomainError::storage(format!("Failed to commit transaction: {}", e))
            })?;

            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Failed to roll back transaction");
            }

            Err(err)
        }
    }
}
