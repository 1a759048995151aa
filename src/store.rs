//! In-memory collection state for one owner's tasks.
//!
//! `TaskList` is the single authoritative copy the UI renders from. Every
//! mutation follows validate-before-commit: the backend call must succeed
//! before (create, delete) or the local change is rolled back (toggle), so
//! the displayed list never drifts silently from the persisted one.
//!
//! Loads are tagged with a generation and the owner they were issued for;
//! a result arriving after a newer load has started is discarded, so an
//! owner switch mid-flight can never clobber the new owner's collection.

use tracing::{debug, warn};

use crate::backend::TaskBackend;
use crate::error::{Error, Result};
use crate::task::{Task, TaskDraft};

/// Handle for an in-flight load. Finishing with a superseded ticket is a
/// no-op on the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    owner: String,
    generation: u64,
}

/// Outcome of finishing a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result was installed.
    Applied,
    /// A newer load superseded this one; the result was dropped.
    Stale,
}

#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    owner: Option<String>,
    generation: u64,
    loading: bool,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks currently held, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    // =========================================================================
    // Load
    // =========================================================================

    /// Start a load for an owner, superseding any load still in flight.
    pub fn begin_load(&mut self, owner: &str) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket {
            owner: owner.to_string(),
            generation: self.generation,
        }
    }

    /// Install a fetched collection if the ticket is still current.
    ///
    /// A fetch error for a current ticket degrades to an empty collection;
    /// the error is returned for surfacing but the list stays usable.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Task>>,
    ) -> Result<LoadOutcome> {
        if ticket.generation != self.generation {
            debug!(owner = %ticket.owner, "discarding stale load result");
            return Ok(LoadOutcome::Stale);
        }

        self.loading = false;
        self.owner = Some(ticket.owner);
        match result {
            Ok(tasks) => {
                self.tasks = tasks;
                Ok(LoadOutcome::Applied)
            }
            Err(err) => {
                warn!(error = %err, "load failed; showing empty collection");
                self.tasks = Vec::new();
                Err(err)
            }
        }
    }

    /// Synchronous load: begin and finish in one call.
    pub fn load(&mut self, backend: &dyn TaskBackend, owner: &str) -> Result<()> {
        let ticket = self.begin_load(owner);
        let result = backend.load_all(owner);
        self.finish_load(ticket, result).map(|_| ())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a task from a validated draft.
    ///
    /// The backend call happens first; only a confirmed task is prepended,
    /// so a failed create never leaves a phantom row without a backing id.
    pub fn create(&mut self, backend: &dyn TaskBackend, draft: &TaskDraft) -> Result<&Task> {
        let owner = self.require_owner()?.to_string();
        let task = backend.create(draft, &owner)?;
        debug!(id = %task.id, "task created");
        self.tasks.insert(0, task);
        Ok(&self.tasks[0])
    }

    /// Flip a task's completed flag and mirror it to the backend.
    ///
    /// Returns the new value, or `None` for an unknown id (no-op). A failed
    /// mirror rolls the flip back before the error surfaces. If the backend
    /// reports the task gone, the local row is pruned instead.
    pub fn toggle(&mut self, backend: &dyn TaskBackend, id: &str) -> Result<Option<bool>> {
        let Some(idx) = self.tasks.iter().position(|task| task.id == id) else {
            return Ok(None);
        };

        self.tasks[idx].completed = !self.tasks[idx].completed;
        let completed = self.tasks[idx].completed;

        match backend.update_completed(id, completed) {
            Ok(()) => Ok(Some(completed)),
            Err(err) if err.is_not_found() => {
                warn!(id, "task gone on backend; pruning local row");
                self.tasks.remove(idx);
                Ok(None)
            }
            Err(err) => {
                self.tasks[idx].completed = !completed;
                Err(err)
            }
        }
    }

    /// Delete a task. Unknown ids are a no-op; a backend that no longer has
    /// the row counts as success.
    pub fn delete(&mut self, backend: &dyn TaskBackend, id: &str) -> Result<bool> {
        let Some(idx) = self.tasks.iter().position(|task| task.id == id) else {
            return Ok(false);
        };

        match backend.delete(id) {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                debug!(id, "delete target already gone on backend");
            }
            Err(err) => return Err(err),
        }

        self.tasks.remove(idx);
        Ok(true)
    }

    /// Sign-out: drop the collection and owner, and invalidate in-flight
    /// loads so the prior owner's rows can never leak into the next session.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.owner = None;
        self.generation += 1;
        self.loading = false;
    }

    fn require_owner(&self) -> Result<&str> {
        self.owner
            .as_deref()
            .ok_or_else(|| Error::Auth("no owner loaded".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, Op};
    use crate::task::Priority;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft::new(title, "", Priority::Medium, None).unwrap()
    }

    fn loaded_list(backend: &MemoryBackend) -> TaskList {
        let mut list = TaskList::new();
        list.load(backend, "alice").unwrap();
        list
    }

    #[test]
    fn creates_are_newest_first_with_unique_ids() {
        let backend = MemoryBackend::new();
        let mut list = loaded_list(&backend);

        for title in ["one", "two", "three"] {
            list.create(&backend, &draft(title)).unwrap();
        }

        assert_eq!(list.len(), 3);
        let titles: Vec<&str> = list.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["three", "two", "one"]);

        let mut ids: Vec<&str> = list.tasks().iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn failed_create_leaves_collection_unchanged() {
        let backend = MemoryBackend::new();
        let mut list = loaded_list(&backend);
        list.create(&backend, &draft("keeper")).unwrap();

        backend.fail_next(Op::Create, Error::Connection("down".into()));
        let err = list.create(&backend, &draft("phantom")).unwrap_err();
        assert!(matches!(err, Error::Connection(_)));

        assert_eq!(list.len(), 1);
        assert_eq!(list.tasks()[0].title, "keeper");
        assert_eq!(backend.stored("alice").len(), 1);
    }

    #[test]
    fn toggle_twice_restores_original_value() {
        let backend = MemoryBackend::new();
        let mut list = loaded_list(&backend);
        let id = list.create(&backend, &draft("flip")).unwrap().id.clone();

        assert_eq!(list.toggle(&backend, &id).unwrap(), Some(true));
        assert_eq!(list.toggle(&backend, &id).unwrap(), Some(false));
        assert!(!list.get(&id).unwrap().completed);
    }

    #[test]
    fn toggle_mirror_failure_rolls_back() {
        let backend = MemoryBackend::new();
        let mut list = loaded_list(&backend);
        let id = list.create(&backend, &draft("flip")).unwrap().id.clone();

        backend.fail_next(Op::UpdateCompleted, Error::Connection("down".into()));
        let err = list.toggle(&backend, &id).unwrap_err();
        assert!(matches!(err, Error::Connection(_)));

        // Rolled back locally, still unset on the backend.
        assert!(!list.get(&id).unwrap().completed);
        assert!(!backend.stored("alice")[0].completed);
    }

    #[test]
    fn toggle_prunes_row_gone_on_backend() {
        let backend = MemoryBackend::new();
        let mut list = loaded_list(&backend);
        let id = list.create(&backend, &draft("ghost")).unwrap().id.clone();

        backend.fail_next(Op::UpdateCompleted, Error::NotFound(id.clone()));
        assert_eq!(list.toggle(&backend, &id).unwrap(), None);
        assert!(list.get(&id).is_none());
    }

    #[test]
    fn toggle_and_delete_on_unknown_id_are_no_ops() {
        let backend = MemoryBackend::new();
        let mut list = loaded_list(&backend);
        list.create(&backend, &draft("only")).unwrap();

        assert_eq!(list.toggle(&backend, "missing").unwrap(), None);
        assert!(!list.delete(&backend, "missing").unwrap());
        assert_eq!(list.len(), 1);
        // Neither no-op reached the backend.
        assert!(!backend.calls().contains(&Op::UpdateCompleted));
        assert!(!backend.calls().contains(&Op::Delete));
    }

    #[test]
    fn delete_confirms_with_backend_first() {
        let backend = MemoryBackend::new();
        let mut list = loaded_list(&backend);
        let id = list.create(&backend, &draft("doomed")).unwrap().id.clone();

        backend.fail_next(Op::Delete, Error::Connection("down".into()));
        let err = list.delete(&backend, &id).unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
        assert!(list.get(&id).is_some());

        assert!(list.delete(&backend, &id).unwrap());
        assert!(list.is_empty());
    }

    #[test]
    fn delete_treats_backend_not_found_as_success() {
        let backend = MemoryBackend::new();
        let mut list = loaded_list(&backend);
        let id = list.create(&backend, &draft("gone")).unwrap().id.clone();

        backend.fail_next(Op::Delete, Error::NotFound(id.clone()));
        assert!(list.delete(&backend, &id).unwrap());
        assert!(list.is_empty());
    }

    #[test]
    fn spec_scenario_create_toggle_filter_delete() {
        use crate::filter::{visible, PriorityFilter, StatusFilter};

        let backend = MemoryBackend::new();
        let mut list = loaded_list(&backend);
        let a = list
            .create(&backend, &TaskDraft::new("Buy milk", "", Priority::Low, None).unwrap())
            .unwrap()
            .id
            .clone();
        let b = list
            .create(&backend, &TaskDraft::new("Call bank", "", Priority::High, None).unwrap())
            .unwrap()
            .id
            .clone();

        // B first, most recent.
        let titles: Vec<&str> = list.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Call bank", "Buy milk"]);

        list.toggle(&backend, &a).unwrap();
        assert!(list.get(&a).unwrap().completed);

        let completed = visible(list.tasks(), "", StatusFilter::Completed, PriorityFilter::All);
        let ids: Vec<&str> = completed.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str()]);

        list.delete(&backend, &b).unwrap();
        let ids: Vec<&str> = list.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str()]);
    }

    #[test]
    fn stale_load_for_previous_owner_is_discarded() {
        let backend = MemoryBackend::new();
        backend.create(&draft("for alice"), "alice").unwrap();
        backend.create(&draft("for bob"), "bob").unwrap();

        let mut list = TaskList::new();

        // Alice's load starts, then Bob's supersedes it before it lands.
        let alice_ticket = list.begin_load("alice");
        let bob_ticket = list.begin_load("bob");

        let bob_result = backend.load_all("bob");
        assert_eq!(
            list.finish_load(bob_ticket, bob_result).unwrap(),
            LoadOutcome::Applied
        );

        let alice_result = backend.load_all("alice");
        assert_eq!(
            list.finish_load(alice_ticket, alice_result).unwrap(),
            LoadOutcome::Stale
        );

        assert_eq!(list.owner(), Some("bob"));
        assert_eq!(list.len(), 1);
        assert_eq!(list.tasks()[0].title, "for bob");
    }

    #[test]
    fn load_failure_degrades_to_empty_collection() {
        let backend = MemoryBackend::new();
        backend.create(&draft("x"), "alice").unwrap();

        let mut list = loaded_list(&backend);
        assert_eq!(list.len(), 1);

        backend.fail_next(Op::LoadAll, Error::Connection("down".into()));
        let err = list.load(&backend, "alice").unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
        assert!(list.is_empty());
        assert!(!list.is_loading());
    }

    #[test]
    fn clear_drops_owner_and_invalidates_inflight_loads() {
        let backend = MemoryBackend::new();
        backend.create(&draft("private"), "alice").unwrap();

        let mut list = loaded_list(&backend);
        let ticket = list.begin_load("alice");
        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.owner(), None);
        let late = backend.load_all("alice");
        assert_eq!(list.finish_load(ticket, late).unwrap(), LoadOutcome::Stale);
        assert!(list.is_empty());
    }

    #[test]
    fn create_without_owner_is_auth_error() {
        let backend = MemoryBackend::new();
        let mut list = TaskList::new();
        let err = list.create(&backend, &draft("x")).unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }
}
