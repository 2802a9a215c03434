//! Integration tests for User repository and per-institution email
//! uniqueness.

mod common;

use uuid::Uuid;

use flutr_db::repositories::{CreateUserInput, UserError, UserRepository};
use flutr_shared::UserRole;

#[tokio::test]
async fn test_user_create_and_find_by_email() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst = common::create_institution(&db, "users").await;
    let repo = UserRepository::new(db.clone());
    let email = format!("test-{}@example.com", Uuid::new_v4());

    let user = repo
        .create(CreateUserInput {
            institution_id: inst.id,
            name: "Test User".to_string(),
            email: email.clone(),
            password_hash: "$argon2id$test_hash".to_string(),
            role: UserRole::OrgEmployee,
        })
        .await
        .expect("Failed to create user");

    assert_eq!(user.email, email);
    assert_eq!(user.institution_id, inst.id);
    assert_eq!(user.role, "org_employee");

    let found = repo
        .find_by_email(&email)
        .await
        .expect("Failed to find user")
        .expect("User should exist");

    assert_eq!(found.id, user.id);
    assert_eq!(found.institution_id, inst.id);
}

#[tokio::test]
async fn test_duplicate_email_same_institution_rejected() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst = common::create_institution(&db, "users").await;
    let repo = UserRepository::new(db.clone());
    let email = format!("test-{}@example.com", Uuid::new_v4());

    let input = CreateUserInput {
        institution_id: inst.id,
        name: "Test User".to_string(),
        email: email.clone(),
        password_hash: "$argon2id$test_hash".to_string(),
        role: UserRole::OrgEmployee,
    };

    repo.create(input.clone())
        .await
        .expect("First user should insert");

    let err = repo
        .create(input)
        .await
        .expect_err("unique_user_email_per_institution must fire");
    assert!(matches!(err, UserError::DuplicateEmail { .. }));
}

#[tokio::test]
async fn test_same_email_under_different_institution_allowed() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst_a = common::create_institution(&db, "users-a").await;
    let inst_b = common::create_institution(&db, "users-b").await;
    let repo = UserRepository::new(db.clone());
    let email = format!("shared-{}@example.com", Uuid::new_v4());

    repo.create(CreateUserInput {
        institution_id: inst_a.id,
        name: "A Staff".to_string(),
        email: email.clone(),
        password_hash: "$argon2id$test_hash".to_string(),
        role: UserRole::OrgAdmin,
    })
    .await
    .expect("User under A should insert");

    repo.create(CreateUserInput {
        institution_id: inst_b.id,
        name: "B Staff".to_string(),
        email,
        password_hash: "$argon2id$test_hash".to_string(),
        role: UserRole::OrgAdmin,
    })
    .await
    .expect("Same email under B should insert");
}

#[tokio::test]
async fn test_user_create_rejects_unknown_institution() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let repo = UserRepository::new(db.clone());
    let err = repo
        .create(CreateUserInput {
            institution_id: i64::MAX,
            name: "Ghost".to_string(),
            email: format!("ghost-{}@example.com", Uuid::new_v4()),
            password_hash: "$argon2id$test_hash".to_string(),
            role: UserRole::OrgEmployee,
        })
        .await
        .expect_err("Unknown institution must be rejected");
    assert!(matches!(err, UserError::InstitutionNotFound(_)));
}

#[tokio::test]
async fn test_login_outcomes_are_indistinguishable() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst = common::create_institution(&db, "users").await;
    let repo = UserRepository::new(db.clone());
    let email = format!("opacity-{}@example.com", Uuid::new_v4());
    let password_hash =
        flutr_core::auth::hash_password("correct horse").expect("Failed to hash password");

    repo.create(CreateUserInput {
        institution_id: inst.id,
        name: "Opacity Test".to_string(),
        email: email.clone(),
        password_hash,
        role: UserRole::OrgEmployee,
    })
    .await
    .expect("Failed to create user");

    // Unknown email: the lookup finds nothing.
    let unknown = repo
        .find_by_email("no-such-account@example.com")
        .await
        .expect("Query should succeed");
    assert!(unknown.is_none());
    let unknown_outcome = flutr_shared::AppError::AuthenticationFailed;

    // Known email, wrong password: verification fails.
    let user = repo
        .find_by_email(&email)
        .await
        .expect("Query should succeed")
        .expect("User should exist");
    let valid = flutr_core::auth::verify_password("wrong password", &user.password_hash)
        .expect("Verification should not error");
    assert!(!valid);
    let wrong_password_outcome = flutr_shared::AppError::AuthenticationFailed;

    // Both failures collapse into one uniform outcome.
    assert_eq!(
        unknown_outcome.error_code(),
        wrong_password_outcome.error_code()
    );
    assert_eq!(
        unknown_outcome.to_string(),
        wrong_password_outcome.to_string()
    );
}

#[tokio::test]
async fn test_user_find_by_email_not_found() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let repo = UserRepository::new(db.clone());
    let result = repo
        .find_by_email("nonexistent@example.com")
        .await
        .expect("Query should succeed");

    assert!(result.is_none());
}
