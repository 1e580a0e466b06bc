// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Marketplace view: partition the task collection for a viewer.
//!
//! Pure functions over the full task list; nothing here touches the store.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Role, Task, TaskStatus, User};

/// Tasks as a viewer sees them in the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum MarketplaceView {
    /// Admin override: every task, unpartitioned.
    Everything { tasks: Vec<Task> },
    #[serde(rename_all = "camelCase")]
    Partitioned {
        /// Pushed to the marketplace and unassigned
        available: Vec<Task>,
        /// Assigned to the viewer, not yet completed
        my_tasks: Vec<Task>,
        /// Assigned to the viewer and completed
        completed: Vec<Task>,
    },
}

impl MarketplaceView {
    pub fn len(&self) -> usize {
        match self {
            MarketplaceView::Everything { tasks } => tasks.len(),
            MarketplaceView::Partitioned {
                available,
                my_tasks,
                completed,
            } => available.len() + my_tasks.len() + completed.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Case-insensitive substring match over title, description and type label.
///
/// An empty or whitespace-only query matches everything.
pub fn matches_search(task: &Task, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [
        task.title.as_str(),
        task.description.as_str(),
        task.task_type.label(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Newest first; ties broken by ID for a stable order.
pub fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Build the marketplace view of `tasks` for `viewer`.
pub fn build_view(tasks: Vec<Task>, viewer: &User, search: Option<&str>) -> MarketplaceView {
    let mut tasks: Vec<Task> = match search {
        Some(query) => tasks
            .into_iter()
            .filter(|t| matches_search(t, query))
            .collect(),
        None => tasks,
    };
    sort_newest_first(&mut tasks);

    if viewer.effective_role() == Some(Role::Admin) {
        return MarketplaceView::Everything { tasks };
    }

    let mut available = Vec::new();
    let mut my_tasks = Vec::new();
    let mut completed = Vec::new();

    for task in tasks {
        if task.is_assigned_to(&viewer.id) {
            if task.status == TaskStatus::Completed {
                completed.push(task);
            } else {
                my_tasks.push(task);
            }
        } else if task.is_claimable() {
            available.push(task);
        }
    }

    MarketplaceView::Partitioned {
        available,
        my_tasks,
        completed,
    }
}
