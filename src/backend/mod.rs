//! Persistence backends for task collections.
//!
//! The core depends only on the [`TaskBackend`] trait; durability and
//! identifier assignment are backend properties. The store accepts whatever
//! id a backend returns and never assumes a generation scheme.

use crate::config::{BackendKind, Config};
use crate::error::Result;
use crate::task::{Task, TaskDraft};

mod local;
mod memory;
mod remote;

pub use local::LocalBackend;
pub use memory::{MemoryBackend, Op};
pub use remote::RemoteBackend;

/// External collaborator holding the durable copy of every collection.
///
/// Single-record operations only; the core never assumes atomicity beyond
/// one record.
pub trait TaskBackend {
    /// Fetch all tasks for one owner, newest first.
    fn load_all(&self, owner: &str) -> Result<Vec<Task>>;

    /// Persist a new task and return it with its assigned id.
    fn create(&self, draft: &TaskDraft, owner: &str) -> Result<Task>;

    /// Mirror a completed-flag change.
    fn update_completed(&self, id: &str, completed: bool) -> Result<()>;

    /// Remove a task.
    fn delete(&self, id: &str) -> Result<()>;
}

/// Build the backend selected by configuration.
pub fn from_config(config: &Config) -> Box<dyn TaskBackend> {
    match config.backend {
        BackendKind::Local => Box::new(LocalBackend::new(config.tasks_dir())),
        BackendKind::Remote => Box::new(RemoteBackend::new(
            config.remote.url.clone(),
            config.remote.api_key.clone(),
            config.remote.token.clone(),
        )),
    }
}
