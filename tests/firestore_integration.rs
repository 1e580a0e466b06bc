// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running, with
//! FIRESTORE_EMULATOR_HOST set. They are skipped otherwise.

use creative_marketplace::error::AppError;
use creative_marketplace::models::task::{Priority, Requirements};
use creative_marketplace::models::{
    Brand, Credential, Deliveries, Identity, Role, Task, TaskStatus, TaskType, User,
};
use creative_marketplace::services::resolve_user;
use creative_marketplace::time_utils::now_rfc3339;

mod common;
use common::test_db;

/// Unique suffix for test isolation.
fn unique() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn test_task(id: &str, client_id: &str) -> Task {
    Task {
        id: id.to_string(),
        client_id: client_id.to_string(),
        title: "Emulator task".to_string(),
        description: String::new(),
        task_type: TaskType::Banner,
        status: TaskStatus::Draft,
        priority: Priority::Medium,
        requirements: Requirements::default(),
        deadline: None,
        assigned_designer: None,
        pushed_to_marketplace: true,
        designer_deliveries: Deliveries::default(),
        created_at: now_rfc3339(),
        updated_at: now_rfc3339(),
        claimed_at: None,
        reviewed_at: None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_lazy_user_creation() {
    require_emulator!();

    let db = test_db().await;
    let identity = Identity {
        uid: format!("uid-{}", unique()),
        email: format!("{}@example.com", unique()),
    };

    assert!(db.get_user(&identity.uid).await.unwrap().is_none());

    let user = resolve_user(&db, &identity).await.unwrap();
    assert_eq!(user.role, Role::Client);
    assert!(user.is_active);

    // Second resolution returns the same record
    let again = resolve_user(&db, &identity).await.unwrap();
    assert_eq!(again, user);
}

#[tokio::test]
async fn test_create_conflicts_on_existing_document() {
    require_emulator!();

    let db = test_db().await;
    let identity = Identity {
        uid: format!("uid-{}", unique()),
        email: format!("{}@example.com", unique()),
    };
    let user = User::default_for(&identity, &now_rfc3339());

    db.create_user(&user).await.unwrap();
    let err = db.create_user(&user).await.unwrap_err();

    assert!(matches!(err, AppError::AlreadyExists(_)));
}

// ═══════════════════════════════════════════════════════════════════════════
// TASK TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_modify_claims_once() {
    require_emulator!();

    let db = test_db().await;
    let task_id = format!("task-{}", unique());
    db.create_task(&test_task(&task_id, "client-1")).await.unwrap();

    let claim = |designer: &'static str| {
        let db = db.clone();
        let task_id = task_id.clone();
        async move {
            db.update_task(&task_id, move |mut task| {
                task.claim(designer, &now_rfc3339())?;
                Ok(task)
            })
            .await
        }
    };

    let (a, b) = tokio::join!(claim("designer-a"), claim("designer-b"));
    assert!(a.is_ok() != b.is_ok(), "exactly one claim should win");

    let stored = db.get_task(&task_id).await.unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::InProgress);
    assert!(stored.assigned_designer.is_some());
}

#[tokio::test]
async fn test_list_tasks_for_client() {
    require_emulator!();

    let db = test_db().await;
    let client_id = format!("client-{}", unique());
    for _ in 0..3 {
        db.create_task(&test_task(&format!("task-{}", unique()), &client_id))
            .await
            .unwrap();
    }

    let tasks = db.list_tasks_for_client(&client_id).await.unwrap();
    assert_eq!(tasks.len(), 3);
    assert!(tasks.iter().all(|t| t.client_id == client_id));
}

// ═══════════════════════════════════════════════════════════════════════════
// ACCOUNT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_create_account_all_or_nothing() {
    require_emulator!();

    let db = test_db().await;
    let email = format!("{}@example.com", unique());
    let now = now_rfc3339();

    let make = |uid: &str| {
        let identity = Identity {
            uid: uid.to_string(),
            email: email.clone(),
        };
        (
            Credential {
                uid: uid.to_string(),
                email: email.clone(),
                password_hash: "hash".to_string(),
                created_at: now.clone(),
            },
            User::default_for(&identity, &now),
            Brand {
                id: format!("brand-{}", uid),
                owner_id: uid.to_string(),
                company_name: "Acme".to_string(),
                company_size: "1-10".to_string(),
                created_at: now.clone(),
            },
        )
    };

    let (cred, user, brand) = make(&format!("uid-{}", unique()));
    db.create_account(&cred, &user, &brand).await.unwrap();

    // Same email, new uid: the credential collides, nothing else is written
    let (cred2, user2, brand2) = make(&format!("uid-{}", unique()));
    let err = db.create_account(&cred2, &user2, &brand2).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(_)));
    assert!(db.get_user(&user2.id).await.unwrap().is_none());
    assert!(db.get_brand(&brand2.id).await.unwrap().is_none());
}
