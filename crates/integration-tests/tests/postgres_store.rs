//! Registry behaviour against a real `PostgreSQL` database.
//!
//! These tests require a reachable database named by `TEST_DATABASE_URL`.
//! The schema is applied automatically.
//!
//! Run with: cargo test -p user-registry-integration-tests -- --ignored

use user_registry_core::{Email, UserId};
use user_registry_integration_tests::{TestContext, unique_email, user_input};
use user_registry_server::db::{RepositoryError, UserStore};
use user_registry_server::services::ServiceError;

async fn context() -> TestContext {
    TestContext::new()
        .await
        .expect("Failed to prepare test database")
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (set TEST_DATABASE_URL)"]
async fn test_create_and_read_back() {
    let ctx = context().await;
    ctx.delete_email("test@mail.com")
        .await
        .expect("Failed to clear fixture row");

    let created = ctx
        .registry
        .create_user(user_input("test@mail.com"))
        .await
        .expect("Failed to create user");
    assert_eq!(created.id.as_str().len(), UserId::LENGTH);
    assert_eq!(created.email.as_str(), "test@mail.com");
    assert_eq!(created.city, "Denver");
    assert_eq!(created.date_of_birth, "12/14/1993");

    let found = ctx
        .registry
        .get_user_by_email("TEST@mail.com")
        .await
        .expect("Failed to look up user");
    assert_eq!(found, created);

    let by_id = ctx
        .registry
        .get_user_by_id(created.id.as_str())
        .await
        .expect("Failed to look up user by id");
    assert_eq!(by_id, created);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (set TEST_DATABASE_URL)"]
async fn test_duplicate_email_is_rejected() {
    let ctx = context().await;
    let email = unique_email("dup");

    ctx.registry
        .create_user(user_input(&email))
        .await
        .expect("Failed to create user");

    let err = ctx
        .registry
        .create_user(user_input(&email.to_uppercase()))
        .await
        .expect_err("Duplicate email should conflict");
    assert!(matches!(err, ServiceError::EmailConflict));

    let parsed = Email::parse(&email).expect("Generated email is valid");
    let count = ctx
        .store
        .count_by_email(&parsed)
        .await
        .expect("Failed to count rows");
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (set TEST_DATABASE_URL)"]
async fn test_overlong_field_rolls_back() {
    let ctx = context().await;
    let email = unique_email("long");
    let mut input = user_input(&email);
    input.first_name = "x".repeat(51);

    let err = ctx
        .registry
        .create_user(input)
        .await
        .expect_err("Name longer than the column should fail");
    assert!(matches!(err, ServiceError::Storage(_)));

    let parsed = Email::parse(&email).expect("Generated email is valid");
    assert!(matches!(
        ctx.store.get_by_email(&parsed).await,
        Err(RepositoryError::NotFound)
    ));
    let count = ctx
        .store
        .count_by_email(&parsed)
        .await
        .expect("Failed to count rows");
    assert_eq!(count, 0);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (set TEST_DATABASE_URL)"]
async fn test_concurrent_creates_keep_one_row() {
    let ctx = context().await;
    let email = unique_email("race");

    let (a, b) = tokio::join!(
        ctx.registry.create_user(user_input(&email)),
        ctx.registry.create_user(user_input(&email)),
    );

    let succeeded = usize::from(a.is_ok()) + usize::from(b.is_ok());
    assert_eq!(succeeded, 1);
    assert!(
        matches!(a, Err(ServiceError::EmailConflict)) || matches!(b, Err(ServiceError::EmailConflict))
    );

    let parsed = Email::parse(&email).expect("Generated email is valid");
    let count = ctx
        .store
        .count_by_email(&parsed)
        .await
        .expect("Failed to count rows");
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (set TEST_DATABASE_URL)"]
async fn test_repeated_reads_match() {
    let ctx = context().await;
    let email = unique_email("read");
    ctx.registry
        .create_user(user_input(&email))
        .await
        .expect("Failed to create user");

    let parsed = Email::parse(&email).expect("Generated email is valid");
    let first = ctx.store.get_by_email(&parsed).await.expect("First read");
    let second = ctx.store.get_by_email(&parsed).await.expect("Second read");
    assert_eq!(first, second);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (set TEST_DATABASE_URL)"]
async fn test_missing_rows_are_not_found() {
    let ctx = context().await;

    let email = Email::parse(&unique_email("ghost")).expect("Generated email is valid");
    assert!(matches!(
        ctx.store.get_by_email(&email).await,
        Err(RepositoryError::NotFound)
    ));

    assert!(matches!(
        ctx.registry.get_user_by_id("zzzzzzzzzz").await,
        Err(ServiceError::NotFound)
    ));
}
