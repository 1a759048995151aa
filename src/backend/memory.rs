//! In-process backend for tests and failure injection.
//!
//! Ids are a simple counter; errors can be scripted per operation to
//! exercise the store's rollback and no-phantom rules.

use std::cell::RefCell;
use std::collections::VecDeque;

use chrono::Utc;

use crate::error::{Error, Result};
use crate::task::{Task, TaskDraft};

use super::TaskBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    LoadAll,
    Create,
    UpdateCompleted,
    Delete,
}

#[derive(Default)]
struct Inner {
    tasks: Vec<Task>,
    next_id: u64,
    scripted_failures: VecDeque<(Op, Error)>,
    calls: Vec<Op>,
}

/// Backend holding everything in memory. Single-threaded, like its callers.
#[derive(Default)]
pub struct MemoryBackend {
    inner: RefCell<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an error for the next call of the given operation.
    pub fn fail_next(&self, op: Op, error: Error) {
        self.inner
            .borrow_mut()
            .scripted_failures
            .push_back((op, error));
    }

    /// Operations invoked so far, in order.
    pub fn calls(&self) -> Vec<Op> {
        self.inner.borrow().calls.clone()
    }

    /// Snapshot of the stored tasks, newest first, for one owner.
    pub fn stored(&self, owner: &str) -> Vec<Task> {
        self.inner
            .borrow()
            .tasks
            .iter()
            .filter(|task| task.user_id == owner)
            .cloned()
            .collect()
    }

    fn check(&self, op: Op) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(op);
        let pos = inner
            .scripted_failures
            .iter()
            .position(|(failing, _)| *failing == op);
        if let Some((_, error)) = pos.and_then(|pos| inner.scripted_failures.remove(pos)) {
            return Err(error);
        }
        Ok(())
    }
}

impl TaskBackend for MemoryBackend {
    fn load_all(&self, owner: &str) -> Result<Vec<Task>> {
        self.check(Op::LoadAll)?;
        Ok(self.stored(owner))
    }

    fn create(&self, draft: &TaskDraft, owner: &str) -> Result<Task> {
        self.check(Op::Create)?;
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let task = Task {
            id: format!("mem-{}", inner.next_id),
            title: draft.title.clone(),
            description: draft.description.clone(),
            completed: false,
            priority: draft.priority,
            due_date: draft.due_date,
            user_id: owner.to_string(),
            created_at: Utc::now(),
        };
        inner.tasks.insert(0, task.clone());
        Ok(task)
    }

    fn update_completed(&self, id: &str, completed: bool) -> Result<()> {
        self.check(Op::UpdateCompleted)?;
        let mut inner = self.inner.borrow_mut();
        match inner.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.completed = completed;
                Ok(())
            }
            None => Err(Error::NotFound(id.to_string())),
        }
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.check(Op::Delete)?;
        let mut inner = self.inner.borrow_mut();
        match inner.tasks.iter().position(|task| task.id == id) {
            Some(idx) => {
                inner.tasks.remove(idx);
                Ok(())
            }
            None => Err(Error::NotFound(id.to_string())),
        }
    }
}
