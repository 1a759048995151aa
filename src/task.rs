//! Task records and creation drafts.
//!
//! The wire shape matches the hosted table row exactly: `id`, `title`,
//! `description`, `completed`, `priority`, `due_date`, `user_id`,
//! `created_at`. The same shape is used for the local per-owner blobs so a
//! collection can move between backends without rewriting.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Closed priority scale for a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(Error::InvalidArgument(format!(
                "unknown priority: {other} (expected low, medium, or high)"
            ))),
        }
    }
}

/// A single to-do record owned by one user.
///
/// `id` and `created_at` are assigned by the backend at creation and never
/// change. `completed` is the only field mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Fields collected by the creation form.
///
/// Construct through [`TaskDraft::new`] so a draft is always trimmed and a
/// stored title can never be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskDraft {
    /// Validate and normalize creation input.
    ///
    /// Trims title and description; an empty or whitespace-only title is
    /// rejected before any backend is involved.
    pub fn new(
        title: &str,
        description: &str,
        priority: Priority,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation("title must not be empty".to_string()));
        }
        Ok(Self {
            title: title.to_string(),
            description: description.trim().to_string(),
            priority,
            due_date,
        })
    }
}
