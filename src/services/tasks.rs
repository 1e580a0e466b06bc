// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Task service: creation, visibility and lifecycle operations.
//!
//! Every state change goes through the store's atomic `modify`, with the
//! transition rule evaluated on the freshly read task. Two designers
//! racing to claim the same task therefore cannot both win.

use serde::Deserialize;
use validator::Validate;

use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use crate::models::task::{Priority, Requirements, ReviewDecision};
use crate::models::{Deliveries, Role, Task, TaskEdit, TaskStatus, TaskType, User};
use crate::services::marketplace::{build_view, sort_newest_first, MarketplaceView};
use crate::time_utils::now_rfc3339;

/// New task request from a client.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub requirements: Requirements,
    #[serde(default)]
    pub deadline: Option<String>,
}

/// Admin changes to status and marketplace visibility.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminTaskUpdate {
    pub status: Option<TaskStatus>,
    pub pushed_to_marketplace: Option<bool>,
}

/// Whether `user` may see `task` at all.
pub fn can_view(task: &Task, user: &User) -> bool {
    match user.effective_role() {
        Some(Role::Admin) => true,
        Some(Role::Client) => task.client_id == user.id,
        Some(Role::Designer) => task.is_assigned_to(&user.id) || task.is_claimable(),
        None => false,
    }
}

/// Whether `user` may edit or review `task`.
pub fn can_manage(task: &Task, user: &User) -> bool {
    match user.effective_role() {
        Some(Role::Admin) => true,
        Some(Role::Client) => task.client_id == user.id,
        Some(Role::Designer) | None => false,
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Task {} not found", id))
}

/// Task operations over the document store.
#[derive(Clone)]
pub struct TaskService {
    db: DocumentStore,
}

impl TaskService {
    pub fn new(db: DocumentStore) -> Self {
        Self { db }
    }

    pub async fn create(&self, actor: &User, mut new_task: NewTask) -> Result<Task> {
        new_task.title = new_task.title.trim().to_string();
        new_task.validate()?;

        let now = now_rfc3339();
        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            client_id: actor.id.clone(),
            title: new_task.title,
            description: new_task.description,
            task_type: new_task.task_type,
            status: TaskStatus::Draft,
            priority: new_task.priority,
            requirements: new_task.requirements,
            deadline: new_task.deadline,
            assigned_designer: None,
            pushed_to_marketplace: false,
            designer_deliveries: Deliveries::default(),
            created_at: now.clone(),
            updated_at: now,
            claimed_at: None,
            reviewed_at: None,
        };

        self.db.create_task(&task).await?;
        tracing::info!(task_id = %task.id, client_id = %actor.id, "Task created");
        Ok(task)
    }

    /// Tasks relevant to the actor: owned (client), assigned (designer) or
    /// all (admin). Newest first.
    pub async fn list_visible(&self, actor: &User) -> Result<Vec<Task>> {
        let mut tasks = match actor.effective_role() {
            Some(Role::Admin) => self.db.list_tasks().await?,
            Some(Role::Client) => self.db.list_tasks_for_client(&actor.id).await?,
            Some(Role::Designer) => self
                .db
                .list_tasks()
                .await?
                .into_iter()
                .filter(|t| t.is_assigned_to(&actor.id))
                .collect(),
            None => Vec::new(),
        };
        sort_newest_first(&mut tasks);
        Ok(tasks)
    }

    pub async fn get(&self, actor: &User, id: &str) -> Result<Task> {
        let task = self.db.get_task(id).await?.ok_or_else(|| not_found(id))?;
        // Hide existence from users who cannot see the task.
        if !can_view(&task, actor) {
            return Err(not_found(id));
        }
        Ok(task)
    }

    /// Apply client edits. There is no status guard.
    pub async fn edit(&self, actor: &User, id: &str, mut edit: TaskEdit) -> Result<Task> {
        if let Some(title) = edit.title.as_mut() {
            *title = title.trim().to_string();
        }
        edit.validate()?;

        let now = now_rfc3339();
        let actor = actor.clone();
        self.db
            .update_task(id, move |mut task| {
                if !can_manage(&task, &actor) {
                    return Err(AppError::Forbidden(
                        "Only the task owner can edit this task".to_string(),
                    ));
                }
                task.apply_edit(edit, &now);
                Ok(task)
            })
            .await
            .map_err(|e| map_missing(e, id))
    }

    /// Claim a marketplace task for the acting designer.
    pub async fn claim(&self, actor: &User, id: &str) -> Result<Task> {
        let now = now_rfc3339();
        let designer_id = actor.id.clone();

        let task = self
            .db
            .update_task(id, move |mut task| {
                task.claim(&designer_id, &now)?;
                Ok(task)
            })
            .await
            .map_err(|e| map_missing(e, id))?;

        tracing::info!(task_id = %id, designer_id = %actor.id, "Task claimed");
        Ok(task)
    }

    /// Record work delivered by the assigned designer.
    pub async fn deliver(&self, actor: &User, id: &str, delivery: Deliveries) -> Result<Task> {
        let now = now_rfc3339();
        let designer_id = actor.id.clone();

        let task = self
            .db
            .update_task(id, move |mut task| {
                task.record_delivery(&designer_id, delivery, &now)?;
                Ok(task)
            })
            .await
            .map_err(|e| map_missing(e, id))?;

        tracing::info!(
            task_id = %id,
            designer_id = %actor.id,
            files = task.designer_deliveries.files.len(),
            links = task.designer_deliveries.links.len(),
            "Delivery recorded"
        );
        Ok(task)
    }

    /// Owner approves the delivery or sends it back.
    pub async fn review(&self, actor: &User, id: &str, decision: ReviewDecision) -> Result<Task> {
        let now = now_rfc3339();
        let actor = actor.clone();

        let task = self
            .db
            .update_task(id, move |mut task| {
                if !can_manage(&task, &actor) {
                    return Err(AppError::Forbidden(
                        "Only the task owner can review this task".to_string(),
                    ));
                }
                task.review(decision, &now)?;
                Ok(task)
            })
            .await
            .map_err(|e| map_missing(e, id))?;

        tracing::info!(task_id = %id, status = %task.status.label(), "Task reviewed");
        Ok(task)
    }

    /// Admin status and visibility changes.
    pub async fn admin_update(&self, id: &str, update: AdminTaskUpdate) -> Result<Task> {
        let now = now_rfc3339();
        self.db
            .update_task(id, move |mut task| {
                if let Some(status) = update.status {
                    task.status = status;
                }
                if let Some(pushed) = update.pushed_to_marketplace {
                    task.pushed_to_marketplace = pushed;
                }
                task.updated_at = now;
                Ok(task)
            })
            .await
            .map_err(|e| map_missing(e, id))
    }

    /// Completed tasks that have at least one delivered file or link.
    pub async fn completed_creatives(&self, actor: &User) -> Result<Vec<Task>> {
        let tasks = self.list_visible(actor).await?;
        Ok(tasks
            .into_iter()
            .filter(Task::is_complete_with_deliverables)
            .collect())
    }

    /// Marketplace view over the full task collection.
    pub async fn marketplace(&self, viewer: &User, search: Option<&str>) -> Result<MarketplaceView> {
        let tasks = self.db.list_tasks().await?;
        Ok(build_view(tasks, viewer, search))
    }
}

/// Turn the store's generic not-found into a task not-found.
fn map_missing(err: AppError, id: &str) -> AppError {
    match err {
        AppError::NotFound(_) => not_found(id),
        other => other,
    }
}
