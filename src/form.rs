//! Creation-form state machine.
//!
//! Holds the draft fields and a submission lock. Submission only proceeds
//! with a non-empty trimmed title and no outstanding submit; success resets
//! every field to its default, failure preserves them for retry.

use chrono::{DateTime, Utc};

use crate::backend::TaskBackend;
use crate::error::{Error, Result};
use crate::store::TaskList;
use crate::task::{Priority, TaskDraft};

#[derive(Debug, Default)]
pub struct NewTaskForm {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    submitting: bool,
}

impl NewTaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.title.trim().is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Submit the current fields as a new task.
    ///
    /// The lock is taken for the duration of the backend call; a concurrent
    /// submit while one is outstanding is rejected outright.
    pub fn submit(&mut self, list: &mut TaskList, backend: &dyn TaskBackend) -> Result<String> {
        if self.submitting {
            return Err(Error::InvalidArgument(
                "a submission is already in progress".to_string(),
            ));
        }
        let draft = TaskDraft::new(&self.title, &self.description, self.priority, self.due_date)?;

        self.submitting = true;
        let result = list.create(backend, &draft).map(|task| task.id.clone());
        self.submitting = false;

        match result {
            Ok(id) => {
                self.reset();
                Ok(id)
            }
            // Fields stay as typed so the user can retry.
            Err(err) => Err(err),
        }
    }

    /// Restore initial defaults.
    pub fn reset(&mut self) {
        self.title.clear();
        self.description.clear();
        self.priority = Priority::default();
        self.due_date = None;
    }
}
