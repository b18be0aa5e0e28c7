//! Storage infrastructure - pools, transactions, migrations, store selection

mod factory;
pub mod migrations;
mod postgres;
mod transaction;

pub use factory::{StorageConfig, StorageFactory, StorageType};
pub use migrations::{run_migrations, Migration, Migrator, PostgresMigrator};
pub use postgres::{connect_pool, PostgresConfig};
pub use transaction::with_transaction;
