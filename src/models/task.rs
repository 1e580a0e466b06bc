// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Creative task model and its lifecycle transitions.
//!
//! Transitions are plain methods on [`Task`] so they can run inside the
//! store's atomic read-modify-write without touching I/O.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::error::AppError;

/// Category of requested creative work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum TaskType {
    SocialMedia,
    Logo,
    Banner,
    Illustration,
    Video,
    PrintDesign,
    Presentation,
    Other,
}

impl TaskType {
    pub fn label(&self) -> &'static str {
        match self {
            TaskType::SocialMedia => "Social Media",
            TaskType::Logo => "Logo",
            TaskType::Banner => "Banner",
            TaskType::Illustration => "Illustration",
            TaskType::Video => "Video",
            TaskType::PrintDesign => "Print Design",
            TaskType::Presentation => "Presentation",
            TaskType::Other => "Other",
        }
    }
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum TaskStatus {
    Draft,
    InProgress,
    Submitted,
    InReview,
    ReadyForReview,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Draft,
        TaskStatus::InProgress,
        TaskStatus::Submitted,
        TaskStatus::InReview,
        TaskStatus::ReadyForReview,
        TaskStatus::Completed,
    ];

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Draft => "Draft",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Submitted => "Submitted",
            TaskStatus::InReview => "In Review",
            TaskStatus::ReadyForReview => "Ready for Review",
            TaskStatus::Completed => "Completed",
        }
    }

    /// States in which the owner can review delivered work.
    pub fn awaiting_review(&self) -> bool {
        matches!(
            self,
            TaskStatus::Submitted | TaskStatus::InReview | TaskStatus::ReadyForReview
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// Reference to an uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FileRef {
    pub name: String,
    pub url: String,
}

/// What the client is asking for.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Requirements {
    pub content_types: Vec<String>,
    pub dimensions: Vec<String>,
    pub style: Option<String>,
    pub brand_guidelines: Option<String>,
    pub reference_links: Vec<String>,
    pub reference_files: Vec<FileRef>,
}

/// Files and links supplied by the assigned designer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Deliveries {
    pub files: Vec<FileRef>,
    pub links: Vec<String>,
    pub notes: Option<String>,
    pub delivered_at: Option<String>,
}

impl Deliveries {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.links.is_empty()
    }
}

/// Task record stored in the `tasks` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Task {
    pub id: String,
    /// Owning client's user ID
    pub client_id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub requirements: Requirements,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub assigned_designer: Option<String>,
    #[serde(default)]
    pub pushed_to_marketplace: bool,
    #[serde(default)]
    pub designer_deliveries: Deliveries,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub claimed_at: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<String>,
}

/// Client-initiated field changes. Absent fields are left alone.
/// Field limits match those applied at creation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskEdit {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
    pub priority: Option<Priority>,
    pub requirements: Option<Requirements>,
    /// `Some(None)` clears the deadline.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub deadline: Option<Option<String>>,
}

/// Distinguish an explicit `null` from an absent field.
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Owner's verdict on delivered work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    RequestChanges,
}

/// Lifecycle rule violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("Task is not available in the marketplace")]
    NotInMarketplace,

    #[error("Task is already assigned to a designer")]
    AlreadyAssigned,

    #[error("Only the assigned designer can deliver work for this task")]
    NotAssignee,

    #[error("A delivery needs at least one file or link")]
    EmptyDelivery,

    #[error("Task is not awaiting review (status: {0})")]
    NotAwaitingReview(&'static str),

    #[error("Task is not accepting deliveries (status: {0})")]
    NotDeliverable(&'static str),
}

impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotInMarketplace
            | TaskError::AlreadyAssigned
            | TaskError::NotDeliverable(_) => AppError::Conflict(err.to_string()),
            TaskError::NotAssignee => AppError::Forbidden(err.to_string()),
            TaskError::EmptyDelivery | TaskError::NotAwaitingReview(_) => {
                AppError::BadRequest(err.to_string())
            }
        }
    }
}

impl Task {
    /// Pushed to the marketplace and not yet taken.
    pub fn is_claimable(&self) -> bool {
        self.pushed_to_marketplace && self.assigned_designer.is_none()
    }

    pub fn is_assigned_to(&self, user_id: &str) -> bool {
        self.assigned_designer.as_deref() == Some(user_id)
    }

    pub fn has_deliverables(&self) -> bool {
        !self.designer_deliveries.is_empty()
    }

    /// Completed with at least one delivered file or link.
    pub fn is_complete_with_deliverables(&self) -> bool {
        self.status == TaskStatus::Completed && self.has_deliverables()
    }

    /// Assign this task to the claiming designer.
    pub fn claim(&mut self, designer_id: &str, now: &str) -> Result<(), TaskError> {
        if self.assigned_designer.is_some() {
            return Err(TaskError::AlreadyAssigned);
        }
        if !self.pushed_to_marketplace {
            return Err(TaskError::NotInMarketplace);
        }

        self.assigned_designer = Some(designer_id.to_string());
        self.status = TaskStatus::InProgress;
        self.claimed_at = Some(now.to_string());
        self.updated_at = now.to_string();
        Ok(())
    }

    /// Apply client edits. Permitted in every status.
    pub fn apply_edit(&mut self, edit: TaskEdit, now: &str) {
        if let Some(title) = edit.title {
            self.title = title;
        }
        if let Some(description) = edit.description {
            self.description = description;
        }
        if let Some(task_type) = edit.task_type {
            self.task_type = task_type;
        }
        if let Some(priority) = edit.priority {
            self.priority = priority;
        }
        if let Some(requirements) = edit.requirements {
            self.requirements = requirements;
        }
        if let Some(deadline) = edit.deadline {
            self.deadline = deadline;
        }
        self.updated_at = now.to_string();
    }

    /// Record work delivered by the assignee and hand it back for review.
    /// Only work in progress or still under review can receive deliveries.
    pub fn record_delivery(
        &mut self,
        designer_id: &str,
        delivery: Deliveries,
        now: &str,
    ) -> Result<(), TaskError> {
        if !self.is_assigned_to(designer_id) {
            return Err(TaskError::NotAssignee);
        }
        if !(self.status == TaskStatus::InProgress || self.status.awaiting_review()) {
            return Err(TaskError::NotDeliverable(self.status.label()));
        }
        if delivery.is_empty() {
            return Err(TaskError::EmptyDelivery);
        }

        let deliveries = &mut self.designer_deliveries;
        deliveries.files.extend(delivery.files);
        deliveries.links.extend(delivery.links);
        if delivery.notes.is_some() {
            deliveries.notes = delivery.notes;
        }
        deliveries.delivered_at = Some(now.to_string());

        self.status = TaskStatus::ReadyForReview;
        self.updated_at = now.to_string();
        Ok(())
    }

    /// Owner's review of delivered work.
    pub fn review(&mut self, decision: ReviewDecision, now: &str) -> Result<(), TaskError> {
        if !self.status.awaiting_review() {
            return Err(TaskError::NotAwaitingReview(self.status.label()));
        }

        self.status = match decision {
            ReviewDecision::Approve => TaskStatus::Completed,
            ReviewDecision::RequestChanges => TaskStatus::InProgress,
        };
        self.reviewed_at = Some(now.to_string());
        self.updated_at = now.to_string();
        Ok(())
    }
}
