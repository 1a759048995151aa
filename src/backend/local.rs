//! Local persistence: one JSON blob per owner.
//!
//! Layout under the data dir:
//!
//! ```text
//! tasks/
//!   <owner>.json        # newest-first array of wire-format tasks
//!   <owner>.json.lock   # flock guard for multi-process use
//! ```
//!
//! Owner names are sanitized before they become file names, so switching
//! accounts can never read or merge another owner's blob.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::error::Result;
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::task::{Task, TaskDraft};

use super::TaskBackend;

pub struct LocalBackend {
    tasks_dir: PathBuf,
}

impl LocalBackend {
    pub fn new(tasks_dir: PathBuf) -> Self {
        Self { tasks_dir }
    }

    fn blob_path(&self, owner: &str) -> PathBuf {
        self.tasks_dir.join(format!("{}.json", owner_key(owner)))
    }

    fn lock_path(&self, owner: &str) -> PathBuf {
        self.tasks_dir.join(format!("{}.json.lock", owner_key(owner)))
    }

    fn read_blob(&self, path: &Path) -> Result<Vec<Task>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let tasks: Vec<Task> = serde_json::from_str(&content)?;
        Ok(tasks)
    }

    fn write_blob(&self, path: &Path, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks)?;
        lock::write_atomic(path, json.as_bytes())
    }

    /// Read-modify-write one owner's blob under its lock.
    fn update_owner_of<T, F>(&self, owner: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Task>) -> Result<T>,
    {
        let _lock = FileLock::acquire(self.lock_path(owner), DEFAULT_LOCK_TIMEOUT_MS)?;
        let path = self.blob_path(owner);
        let mut tasks = self.read_blob(&path)?;
        let result = f(&mut tasks)?;
        self.write_blob(&path, &tasks)?;
        Ok(result)
    }

    /// Mutations address tasks by id alone, so locate the owning blob first.
    fn update_by_id<T, F>(&self, id: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Task>, usize) -> Result<T>,
    {
        for owner in self.owners()? {
            let _lock = FileLock::acquire(self.lock_path(&owner), DEFAULT_LOCK_TIMEOUT_MS)?;
            let path = self.blob_path(&owner);
            let mut tasks = self.read_blob(&path)?;
            if let Some(idx) = tasks.iter().position(|task| task.id == id) {
                let result = f(&mut tasks, idx)?;
                self.write_blob(&path, &tasks)?;
                return Ok(result);
            }
        }
        Err(crate::error::Error::NotFound(id.to_string()))
    }

    fn owners(&self) -> Result<Vec<String>> {
        if !self.tasks_dir.exists() {
            return Ok(Vec::new());
        }
        let mut owners = Vec::new();
        for entry in fs::read_dir(&self.tasks_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".json") {
                owners.push(stem.to_string());
            }
        }
        owners.sort();
        Ok(owners)
    }
}

impl TaskBackend for LocalBackend {
    fn load_all(&self, owner: &str) -> Result<Vec<Task>> {
        let _lock = FileLock::acquire(self.lock_path(owner), DEFAULT_LOCK_TIMEOUT_MS)?;
        self.read_blob(&self.blob_path(owner))
    }

    fn create(&self, draft: &TaskDraft, owner: &str) -> Result<Task> {
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            completed: false,
            priority: draft.priority,
            due_date: draft.due_date,
            user_id: owner.to_string(),
            created_at: Utc::now(),
        };
        self.update_owner_of(owner, |tasks| {
            tasks.insert(0, task.clone());
            Ok(())
        })?;
        Ok(task)
    }

    fn update_completed(&self, id: &str, completed: bool) -> Result<()> {
        self.update_by_id(id, |tasks, idx| {
            tasks[idx].completed = completed;
            Ok(())
        })
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.update_by_id(id, |tasks, idx| {
            tasks.remove(idx);
            Ok(())
        })
    }
}

/// Map an owner identity onto a safe file stem.
fn owner_key(owner: &str) -> String {
    let mut key = String::new();
    for ch in owner.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' {
            key.push(ch);
        } else {
            key.push('_');
        }
    }
    if key.is_empty() {
        "_".to_string()
    } else {
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::task::Priority;
    use tempfile::TempDir;

    fn backend() -> (TempDir, LocalBackend) {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path().join("tasks"));
        (temp, backend)
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft::new(title, "", Priority::Medium, None).unwrap()
    }

    #[test]
    fn create_then_load_round_trips_newest_first() {
        let (_temp, backend) = backend();
        let first = backend.create(&draft("first"), "alice").unwrap();
        let second = backend.create(&draft("second"), "alice").unwrap();
        assert_ne!(first.id, second.id);

        let tasks = backend.load_all("alice").unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "first"]);
        assert!(tasks.iter().all(|t| t.user_id == "alice"));
    }

    #[test]
    fn owners_never_mix() {
        let (_temp, backend) = backend();
        backend.create(&draft("for alice"), "alice").unwrap();
        backend.create(&draft("for bob"), "bob").unwrap();

        let alice = backend.load_all("alice").unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].title, "for alice");

        let bob = backend.load_all("bob").unwrap();
        assert_eq!(bob.len(), 1);
        assert_eq!(bob[0].title, "for bob");
    }

    #[test]
    fn update_completed_persists() {
        let (_temp, backend) = backend();
        let task = backend.create(&draft("flip me"), "alice").unwrap();
        backend.update_completed(&task.id, true).unwrap();

        let tasks = backend.load_all("alice").unwrap();
        assert!(tasks[0].completed);
    }

    #[test]
    fn delete_removes_and_missing_id_is_not_found() {
        let (_temp, backend) = backend();
        let task = backend.create(&draft("gone soon"), "alice").unwrap();
        backend.delete(&task.id).unwrap();
        assert!(backend.load_all("alice").unwrap().is_empty());

        let err = backend.delete(&task.id).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn load_for_unknown_owner_is_empty() {
        let (_temp, backend) = backend();
        assert!(backend.load_all("nobody").unwrap().is_empty());
    }

    #[test]
    fn owner_key_sanitizes_path_separators() {
        assert_eq!(owner_key("alice@example.com"), "alice_example.com");
        assert_eq!(owner_key("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(owner_key(""), "_");
    }
}
