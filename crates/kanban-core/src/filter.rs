//! Task filter criteria and the pure filtering pipeline that feeds the board.

use std::collections::HashSet;

use crate::model::{IssueType, Priority, Task, TaskSize};

/// Independent filter categories for board views.
///
/// Categories combine with AND; set-valued categories match when the task's
/// value is any member of the set. Empty or unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilters {
    /// Case-insensitive title substring.
    pub search_text: String,
    pub priorities: HashSet<Priority>,
    pub sizes: HashSet<TaskSize>,
    /// Label names; a task matches if any of its tags is listed.
    pub labels: HashSet<String>,
    /// Matched against the task's own id, not an epic/parent link.
    pub epic_ids: HashSet<String>,
    pub issue_type: Option<IssueType>,
    /// Restrict to tasks with a member of this full name.
    pub employee_name: Option<String>,
}

impl TaskFilters {
    /// True when no criterion narrows the task list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search_text.is_empty()
            && self.priorities.is_empty()
            && self.sizes.is_empty()
            && self.labels.is_empty()
            && self.epic_ids.is_empty()
            && self.issue_type.is_none()
            && self.employee_name.is_none()
    }

    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        // Title search
        if !self.search_text.is_empty()
            && !task
                .title
                .to_lowercase()
                .contains(&self.search_text.to_lowercase())
        {
            return false;
        }

        // Priority filtering
        if !self.priorities.is_empty()
            && !task
                .priority
                .as_ref()
                .is_some_and(|p| self.priorities.contains(p))
        {
            return false;
        }

        // Size filtering
        if !self.sizes.is_empty() && !task.size.as_ref().is_some_and(|s| self.sizes.contains(s)) {
            return false;
        }

        // Label filtering (OR)
        if !self.labels.is_empty() && !task.tags.iter().any(|tag| self.labels.contains(&tag.name))
        {
            return false;
        }

        // Epic filtering. This compares the task's own id; the task model has
        // no epic/parent link to compare against.
        if !self.epic_ids.is_empty() && !self.epic_ids.contains(&task.id) {
            return false;
        }

        if let Some(ref issue_type) = self.issue_type {
            if task.issue_type.as_ref() != Some(issue_type) {
                return false;
            }
        }

        // Single-employee board
        if let Some(ref name) = self.employee_name {
            if !task.has_member(name) {
                return false;
            }
        }

        true
    }
}

/// Apply the filters to a task list, keeping the input's relative order.
#[must_use]
pub fn filter_tasks<'a>(tasks: &'a [Task], filters: &TaskFilters) -> Vec<&'a Task> {
    if filters.is_empty() {
        return tasks.iter().collect();
    }
    tasks.iter().filter(|task| filters.matches(task)).collect()
}
