//! PostgreSQL user store tests.
//!
//! Need a reachable database: `DATABASE_URL=postgres://... cargo test -- --ignored`

use sqlx::PgPool;
use uuid::Uuid;

use guzei::domain::{DomainError, UserListParams, UserRepository};
use guzei::infrastructure::storage::{run_migrations, with_transaction, Migrator, PostgresMigrator};
use guzei::infrastructure::user::PostgresUserRepository;

async fn setup(pool: &PgPool) -> PostgresUserRepository {
    run_migrations(pool).await.unwrap();
    PostgresUserRepository::new(pool.clone())
}

#[sqlx::test(migrations = false)]
#[ignore]
async fn test_insert_and_retrieve(pool: PgPool) {
    let repo = setup(&pool).await;
    let id = Uuid::new_v4();

    let created = repo
        .insert("msyt@gmail.com", "hashed", id, true)
        .await
        .unwrap();

    assert_eq!(created.id(), id);
    assert_eq!(created.email(), "msyt@gmail.com");
    assert!(created.is_admin());

    let by_email = repo.retrieve_by_email("msyt@gmail.com").await.unwrap();
    assert_eq!(by_email.id(), id);
    assert_eq!(by_email.hashed_password(), "hashed");

    let by_id = repo.retrieve(id).await.unwrap();
    assert_eq!(by_id.email(), "msyt@gmail.com");
}

#[sqlx::test(migrations = false)]
#[ignore]
async fn test_duplicate_email(pool: PgPool) {
    let repo = setup(&pool).await;

    repo.insert("msyt@gmail.com", "hashed", Uuid::new_v4(), false)
        .await
        .unwrap();
    let err = repo
        .insert("msyt@gmail.com", "hashed", Uuid::new_v4(), false)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::UserExists));

    let list = repo.list(UserListParams::default()).await.unwrap();
    assert_eq!(list.total_objects, 1);
}

#[sqlx::test(migrations = false)]
#[ignore]
async fn test_list_paging(pool: PgPool) {
    let repo = setup(&pool).await;

    for n in 0..34 {
        repo.insert(&format!("msyt_{}@gmail.com", n), "hashed", Uuid::new_v4(), false)
            .await
            .unwrap();
    }

    let first = repo.list(UserListParams::new(1, 20)).await.unwrap();
    assert_eq!(first.data.len(), 20);
    assert_eq!(first.total_objects, 34);
    assert_eq!(first.total_pages, 2);

    let second = repo.list(UserListParams::new(2, 20)).await.unwrap();
    assert_eq!(second.data.len(), 14);

    let beyond = repo.list(UserListParams::new(5, 20)).await.unwrap();
    assert!(beyond.data.is_empty());
    assert_eq!(beyond.total_objects, 34);
}

#[sqlx::test(migrations = false)]
#[ignore]
async fn test_updates_and_delete(pool: PgPool) {
    let repo = setup(&pool).await;
    let id = Uuid::new_v4();
    repo.insert("msyt@gmail.com", "hashed", id, false)
        .await
        .unwrap();

    repo.update_password(id, "rehashed").await.unwrap();
    repo.update_admin(id, true).await.unwrap();

    let user = repo.retrieve(id).await.unwrap();
    assert_eq!(user.hashed_password(), "rehashed");
    assert!(user.is_admin());

    repo.delete(id).await.unwrap();
    assert!(matches!(repo.retrieve(id).await, Err(DomainError::UserNotFound)));
}

#[sqlx::test(migrations = false)]
#[ignore]
async fn test_missing_rows_are_not_found(pool: PgPool) {
    let repo = setup(&pool).await;
    let id = Uuid::new_v4();

    assert!(matches!(
        repo.update_password(id, "x").await,
        Err(DomainError::UserNotFound)
    ));
    assert!(matches!(
        repo.update_admin(id, true).await,
        Err(DomainError::UserNotFound)
    ));
    assert!(matches!(repo.delete(id).await, Err(DomainError::UserNotFound)));
    assert!(matches!(
        repo.retrieve_by_email("nobody@gmail.com").await,
        Err(DomainError::UserNotFound)
    ));
}

#[sqlx::test(migrations = false)]
#[ignore]
async fn test_failed_unit_of_work_rolls_back(pool: PgPool) {
    let repo = setup(&pool).await;

    let result: Result<(), DomainError> = with_transaction(&pool, |conn| {
        Box::pin(async move {
            sqlx::query("INSERT INTO users (id, email, hashed_password) VALUES ($1, $2, $3)")
                .bind(Uuid::new_v4())
                .bind("msyt@gmail.com")
                .bind("hashed")
                .execute(&mut *conn)
                .await?;

            Err(DomainError::internal("abort after insert"))
        })
    })
    .await;

    assert!(matches!(result, Err(DomainError::Internal { .. })));
    assert!(matches!(
        repo.retrieve_by_email("msyt@gmail.com").await,
        Err(DomainError::UserNotFound)
    ));
}

#[sqlx::test(migrations = false)]
#[ignore]
async fn test_migrate_revert(pool: PgPool) {
    let migrator = PostgresMigrator::new(pool.clone());

    migrator.run().await.unwrap();
    assert_eq!(migrator.version().await.unwrap(), Some(1));

    // Running twice is a no-op
    migrator.run().await.unwrap();

    migrator.revert().await.unwrap();
    assert_eq!(migrator.version().await.unwrap(), None);

    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM information_schema.tables WHERE table_name = 'users')",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(!exists);
}
