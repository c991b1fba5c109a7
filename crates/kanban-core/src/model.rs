//! Core data types for kanban-core.
//!
//! Field names follow the remote API's camelCase JSON so task and status
//! payloads deserialize without an adapter layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task priority tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
    #[serde(untagged)]
    Custom(String),
}

impl Priority {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Urgent => "Urgent",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Custom(value) => value,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = crate::error::KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "urgent" => Ok(Self::Urgent),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            "" => Err(crate::error::KanbanError::InvalidPriority {
                priority: s.to_string(),
            }),
            _ => Ok(Self::Custom(s.trim().to_string())),
        }
    }
}

/// Task size tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskSize {
    #[serde(rename = "X-Large")]
    ExtraLarge,
    Large,
    Medium,
    Small,
    Tiny,
    #[serde(untagged)]
    Custom(String),
}

impl TaskSize {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ExtraLarge => "X-Large",
            Self::Large => "Large",
            Self::Medium => "Medium",
            Self::Small => "Small",
            Self::Tiny => "Tiny",
            Self::Custom(value) => value,
        }
    }
}

impl fmt::Display for TaskSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskSize {
    type Err = crate::error::KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "x-large" | "xlarge" | "xl" => Ok(Self::ExtraLarge),
            "large" => Ok(Self::Large),
            "medium" => Ok(Self::Medium),
            "small" => Ok(Self::Small),
            "tiny" => Ok(Self::Tiny),
            "" => Err(crate::error::KanbanError::validation("size", "cannot be empty")),
            _ => Ok(Self::Custom(s.trim().to_string())),
        }
    }
}

/// Issue type category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueType {
    Epic,
    Story,
    Task,
    Bug,
    #[serde(untagged)]
    Custom(String),
}

impl IssueType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Epic => "Epic",
            Self::Story => "Story",
            Self::Task => "Task",
            Self::Bug => "Bug",
            Self::Custom(value) => value,
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = crate::error::KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "epic" => Ok(Self::Epic),
            "story" => Ok(Self::Story),
            "task" => Ok(Self::Task),
            "bug" => Ok(Self::Bug),
            "" => Err(crate::error::KanbanError::validation(
                "issue_type",
                "cannot be empty",
            )),
            _ => Ok(Self::Custom(s.trim().to_string())),
        }
    }
}

/// A tag attached to tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A team member assigned to tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub full_name: String,
}

/// A task as served by the task source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,

    pub title: String,

    /// Column this task belongs to. Unknown or missing ids keep the task
    /// off the board.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_status_id: Option<String>,

    /// Denormalized column name.
    #[serde(default)]
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<TaskSize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<IssueType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Label>,

    /// Estimate in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<u64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Employee>,
}

impl Task {
    /// Point this task at a column, keeping the denormalized name in step.
    pub fn assign_status(&mut self, status: &Status) {
        self.task_status_id = Some(status.id.clone());
        self.status.clone_from(&status.name);
    }

    #[must_use]
    pub fn has_member(&self, full_name: &str) -> bool {
        self.members.iter().any(|m| m.full_name == full_name)
    }
}

/// A board column, which is also a task workflow state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: String,

    /// Unique per team: the board is keyed by name.
    pub name: String,

    #[serde(default)]
    pub order: i32,

    #[serde(default)]
    pub is_collapsed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Partial column update sent to the status source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_collapsed: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

impl StatusPatch {
    #[must_use]
    pub const fn collapsed(value: bool) -> Self {
        Self {
            is_collapsed: Some(value),
            order: None,
        }
    }

    #[must_use]
    pub const fn order(value: i32) -> Self {
        Self {
            is_collapsed: None,
            order: Some(value),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.is_collapsed.is_none() && self.order.is_none()
    }

    /// Write the set fields onto a status.
    pub fn apply_to(&self, status: &mut Status) {
        if let Some(collapsed) = self.is_collapsed {
            status.is_collapsed = collapsed;
        }
        if let Some(order) = self.order {
            status.order = order;
        }
    }
}

/// Response of a remote mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationOutcome {
    pub affected: u64,
}

impl MutationOutcome {
    #[must_use]
    pub const fn affected(affected: u64) -> Self {
        Self { affected }
    }

    /// A mutation only counts as applied when at least one record changed.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        self.affected > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_deserializes_camel_case() {
        let json = r#"{
            "id": "t1",
            "title": "Write docs",
            "taskStatusId": "s1",
            "status": "Todo",
            "priority": "High",
            "size": "X-Large",
            "issueType": "Bug",
            "tags": [{"id": "l1", "name": "docs"}],
            "estimate": 3600,
            "members": [{"id": "e1", "fullName": "Ada Lovelace"}]
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.task_status_id.as_deref(), Some("s1"));
        assert_eq!(task.priority, Some(Priority::High));
        assert_eq!(task.size, Some(TaskSize::ExtraLarge));
        assert_eq!(task.issue_type, Some(IssueType::Bug));
        assert_eq!(task.estimate, Some(3600));
        assert!(task.has_member("Ada Lovelace"));
    }

    #[test]
    fn test_unknown_tags_fall_back_to_custom() {
        let task: Task =
            serde_json::from_str(r#"{"id":"t1","title":"x","priority":"Someday"}"#).unwrap();
        assert_eq!(task.priority, Some(Priority::Custom("Someday".to_string())));
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("urgent".parse::<Priority>().unwrap(), Priority::Urgent);
        assert_eq!(" LOW ".parse::<Priority>().unwrap(), Priority::Low);
        assert!("".parse::<Priority>().is_err());
    }

    #[test]
    fn test_size_from_str_aliases() {
        assert_eq!("xl".parse::<TaskSize>().unwrap(), TaskSize::ExtraLarge);
        assert_eq!("X-Large".parse::<TaskSize>().unwrap(), TaskSize::ExtraLarge);
    }

    #[test]
    fn test_status_patch_serializes_only_set_fields() {
        let json = serde_json::to_string(&StatusPatch::collapsed(true)).unwrap();
        assert_eq!(json, r#"{"isCollapsed":true}"#);
    }

    #[test]
    fn test_status_patch_apply() {
        let mut status = Status {
            id: "s1".to_string(),
            name: "Todo".to_string(),
            ..Default::default()
        };
        StatusPatch::order(4).apply_to(&mut status);
        assert_eq!(status.order, 4);
        assert!(!status.is_collapsed);
    }

    #[test]
    fn test_assign_status_updates_name() {
        let mut task = Task::default();
        let done = Status {
            id: "s2".to_string(),
            name: "Done".to_string(),
            ..Default::default()
        };
        task.assign_status(&done);
        assert_eq!(task.task_status_id.as_deref(), Some("s2"));
        assert_eq!(task.status, "Done");
    }

    #[test]
    fn test_mutation_outcome_zero_is_not_applied() {
        assert!(!MutationOutcome::affected(0).is_applied());
        assert!(MutationOutcome::affected(1).is_applied());
    }
}
