// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role-specific dashboard summaries.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::DocumentStore;
use crate::error::Result;
use crate::models::{Role, Task, TaskStatus, User};

/// Number of tasks in one status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatusCount {
    pub status: TaskStatus,
    pub label: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum DashboardSummary {
    #[serde(rename_all = "camelCase")]
    Client {
        total_tasks: u32,
        completed_creatives: u32,
        by_status: Vec<StatusCount>,
    },
    #[serde(rename_all = "camelCase")]
    Designer {
        available: u32,
        in_progress: u32,
        completed: u32,
    },
    #[serde(rename_all = "camelCase")]
    Admin {
        users: u32,
        active_users: u32,
        total_tasks: u32,
        in_marketplace: u32,
        by_status: Vec<StatusCount>,
    },
}

/// Count tasks per status, in lifecycle order, omitting empty statuses.
pub fn status_counts(tasks: &[Task]) -> Vec<StatusCount> {
    TaskStatus::ALL
        .iter()
        .filter_map(|status| {
            let count = tasks.iter().filter(|t| t.status == *status).count() as u32;
            (count > 0).then(|| StatusCount {
                status: *status,
                label: status.label().to_string(),
                count,
            })
        })
        .collect()
}

/// Counts matching the designer's marketplace columns.
pub fn designer_summary(tasks: &[Task], designer_id: &str) -> DashboardSummary {
    let (mut available, mut in_progress, mut completed) = (0, 0, 0);
    for task in tasks {
        if task.is_assigned_to(designer_id) {
            if task.status == TaskStatus::Completed {
                completed += 1;
            } else {
                in_progress += 1;
            }
        } else if task.is_claimable() {
            available += 1;
        }
    }

    DashboardSummary::Designer {
        available,
        in_progress,
        completed,
    }
}

/// Build the summary for a user whose effective role is `role`.
pub async fn summarize(db: &DocumentStore, user: &User, role: Role) -> Result<DashboardSummary> {
    let summary = match role {
        Role::Client => {
            let tasks = db.list_tasks_for_client(&user.id).await?;
            DashboardSummary::Client {
                total_tasks: tasks.len() as u32,
                completed_creatives: tasks
                    .iter()
                    .filter(|t| t.is_complete_with_deliverables())
                    .count() as u32,
                by_status: status_counts(&tasks),
            }
        }
        Role::Designer => designer_summary(&db.list_tasks().await?, &user.id),
        Role::Admin => {
            let users = db.list_users().await?;
            let tasks = db.list_tasks().await?;
            DashboardSummary::Admin {
                users: users.len() as u32,
                active_users: users.iter().filter(|u| u.is_active).count() as u32,
                total_tasks: tasks.len() as u32,
                in_marketplace: tasks.iter().filter(|t| t.pushed_to_marketplace).count() as u32,
                by_status: status_counts(&tasks),
            }
        }
    };
    Ok(summary)
}
