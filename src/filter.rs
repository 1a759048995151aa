//! Pure filtering of a task collection for display.
//!
//! Three predicates ANDed together: case-insensitive substring match on
//! title or description, completion status, and priority. The source
//! collection is never mutated and its order is preserved.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::task::{Priority, Task};

fn normalize_text(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Completion-status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] =
        [StatusFilter::All, StatusFilter::Active, StatusFilter::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        }
    }

    fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" | "done" => Ok(StatusFilter::Completed),
            other => Err(Error::InvalidArgument(format!(
                "unknown status filter: {other} (expected all, active, or completed)"
            ))),
        }
    }
}

/// Priority filter; `All` matches every task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub const ALL: [PriorityFilter; 4] = [
        PriorityFilter::All,
        PriorityFilter::Only(Priority::Low),
        PriorityFilter::Only(Priority::Medium),
        PriorityFilter::Only(Priority::High),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityFilter::All => "all",
            PriorityFilter::Only(priority) => priority.as_str(),
        }
    }

    fn matches(&self, task: &Task) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(priority) => task.priority == *priority,
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(PriorityFilter::All);
        }
        Ok(PriorityFilter::Only(value.parse()?))
    }
}

fn text_matches(task: &Task, query_norm: &str) -> bool {
    if query_norm.is_empty() {
        return true;
    }
    normalize_text(&task.title).contains(query_norm)
        || normalize_text(&task.description).contains(query_norm)
}

/// Derive the visible subset of a collection.
///
/// Deterministic and side-effect-free; callers re-run it on every state
/// change rather than caching results.
pub fn visible<'a>(
    tasks: &'a [Task],
    query: &str,
    status: StatusFilter,
    priority: PriorityFilter,
) -> Vec<&'a Task> {
    let query_norm = normalize_text(query);
    tasks
        .iter()
        .filter(|task| {
            text_matches(task, &query_norm) && status.matches(task) && priority.matches(task)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: &str, title: &str, description: &str, completed: bool, priority: Priority) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            completed,
            priority,
            due_date: None,
            user_id: "alice".to_string(),
            created_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task("1", "Buy milk", "2 liters", false, Priority::Low),
            task("2", "Call bank", "about the Milk Co invoice", false, Priority::High),
            task("3", "Return books", "", true, Priority::Medium),
        ]
    }

    #[test]
    fn identity_case_returns_all_in_order() {
        let tasks = sample();
        let shown = visible(&tasks, "", StatusFilter::All, PriorityFilter::All);
        let ids: Vec<&str> = shown.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn text_match_covers_title_and_description_case_insensitive() {
        let tasks = sample();
        let shown = visible(&tasks, "MILK", StatusFilter::All, PriorityFilter::All);
        let ids: Vec<&str> = shown.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn predicates_are_anded() {
        let tasks = sample();
        let shown = visible(&tasks, "milk", StatusFilter::Active, PriorityFilter::Only(Priority::High));
        let ids: Vec<&str> = shown.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[test]
    fn status_filters_split_by_completed() {
        let tasks = sample();
        let active = visible(&tasks, "", StatusFilter::Active, PriorityFilter::All);
        assert_eq!(active.len(), 2);
        let completed = visible(&tasks, "", StatusFilter::Completed, PriorityFilter::All);
        let ids: Vec<&str> = completed.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["3"]);
    }

    #[test]
    fn priority_filter_matches_exactly() {
        let tasks = sample();
        let low = visible(&tasks, "", StatusFilter::All, PriorityFilter::Only(Priority::Low));
        let ids: Vec<&str> = low.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn filter_never_mutates_source() {
        let tasks = sample();
        let before = tasks.clone();
        let _ = visible(&tasks, "milk", StatusFilter::Active, PriorityFilter::All);
        assert_eq!(tasks, before);
    }

    #[test]
    fn filters_parse_from_str() {
        assert_eq!("Active".parse::<StatusFilter>().unwrap(), StatusFilter::Active);
        assert_eq!("done".parse::<StatusFilter>().unwrap(), StatusFilter::Completed);
        assert_eq!(
            "high".parse::<PriorityFilter>().unwrap(),
            PriorityFilter::Only(Priority::High)
        );
        assert_eq!("ALL".parse::<PriorityFilter>().unwrap(), PriorityFilter::All);
        assert!("sometimes".parse::<StatusFilter>().is_err());
    }
}
