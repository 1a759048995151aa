//! tsk task command implementations: add, list, toggle, done, rm.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::backend::{self, TaskBackend};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::filter::{visible, PriorityFilter, StatusFilter};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::session;
use crate::store::TaskList;
use crate::task::{Priority, Task, TaskDraft};

pub struct AddOptions {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub due: Option<String>,
    pub owner: Option<String>,
    pub config: Config,
    pub options: OutputOptions,
}

pub struct ListOptions {
    pub query: String,
    pub status: String,
    pub priority: String,
    pub owner: Option<String>,
    pub config: Config,
    pub options: OutputOptions,
}

#[derive(Serialize)]
struct TaskReport<'a> {
    task: &'a Task,
}

#[derive(Serialize)]
struct ListReport<'a> {
    owner: &'a str,
    total: usize,
    shown: usize,
    tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
struct ToggleReport<'a> {
    id: &'a str,
    completed: Option<bool>,
}

#[derive(Serialize)]
struct RmReport<'a> {
    id: &'a str,
    removed: bool,
}

/// Resolve owner, build the configured backend, and load the collection.
fn load_collection(
    owner: Option<&str>,
    config: &Config,
) -> Result<(String, Box<dyn TaskBackend>, TaskList)> {
    let (owner, _) = session::resolve_owner(&config.session_file(), owner)?;
    let backend = backend::from_config(config);
    let mut list = TaskList::new();
    list.load(backend.as_ref(), &owner)?;
    Ok((owner, backend, list))
}

/// Expand an id or unique id prefix against the loaded collection.
///
/// An ambiguous prefix is an error; an unknown one is passed through so the
/// store can apply its no-op rule.
fn resolve_id(list: &TaskList, id: &str) -> Result<String> {
    if list.get(id).is_some() {
        return Ok(id.to_string());
    }
    let matches: Vec<&str> = list
        .tasks()
        .iter()
        .filter(|task| task.id.starts_with(id))
        .map(|task| task.id.as_str())
        .collect();
    match matches.as_slice() {
        [only] => Ok(only.to_string()),
        [] => Ok(id.to_string()),
        _ => Err(Error::InvalidArgument(format!(
            "id prefix '{id}' is ambiguous ({} matches)",
            matches.len()
        ))),
    }
}

fn parse_due(due: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let Some(raw) = due else {
        return Ok(None);
    };
    let parsed = DateTime::parse_from_rfc3339(raw.trim())
        .map_err(|err| Error::InvalidArgument(format!("invalid due date '{raw}': {err}")))?;
    Ok(Some(parsed.with_timezone(&Utc)))
}

fn describe(task: &Task) -> String {
    let mut parts = vec![format!(
        "[{}] {} ({})",
        if task.completed { "x" } else { " " },
        task.title,
        task.priority
    )];
    if let Some(due) = task.due_date {
        parts.push(format!("due {}", due.format("%Y-%m-%d")));
    }
    parts.join(", ")
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let priority: Priority = options.priority.parse()?;
    let due_date = parse_due(options.due.as_deref())?;
    let draft = TaskDraft::new(&options.title, &options.description, priority, due_date)?;

    let (_, backend, mut list) = load_collection(options.owner.as_deref(), &options.config)?;
    let task = list.create(backend.as_ref(), &draft)?.clone();

    let mut human = HumanOutput::new(format!("Task created: {}", task.title));
    human.push_summary("id", task.id.clone());
    human.push_summary("priority", task.priority.to_string());
    if let Some(due) = task.due_date {
        human.push_summary("due", due.format("%Y-%m-%d").to_string());
    }

    emit_success(options.options, "add", &TaskReport { task: &task }, Some(&human))
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let status: StatusFilter = options.status.parse()?;
    let priority: PriorityFilter = options.priority.parse()?;

    let (owner, _, list) = load_collection(options.owner.as_deref(), &options.config)?;
    let shown = visible(list.tasks(), &options.query, status, priority);

    let report = ListReport {
        owner: &owner,
        total: list.len(),
        shown: shown.len(),
        tasks: shown.clone(),
    };

    let mut human = HumanOutput::new(format!(
        "Tasks for {owner}: {} of {}",
        shown.len(),
        list.len()
    ));
    for task in &shown {
        human.push_detail(format!("{}  {}", short_id(&task.id), describe(task)));
    }

    emit_success(options.options, "list", &report, Some(&human))
}

pub fn run_toggle(
    id: &str,
    owner: Option<String>,
    config: Config,
    options: OutputOptions,
) -> Result<()> {
    let (_, backend, mut list) = load_collection(owner.as_deref(), &config)?;
    let id = resolve_id(&list, id)?;
    let completed = list.toggle(backend.as_ref(), &id)?;

    let header = match completed {
        Some(true) => format!("Task completed: {id}"),
        Some(false) => format!("Task reopened: {id}"),
        None => format!("No such task: {id}"),
    };
    let mut human = HumanOutput::new(header);
    if completed.is_none() {
        human.push_warning("nothing to do; the task does not exist".to_string());
    }

    emit_success(options, "toggle", &ToggleReport { id: &id, completed }, Some(&human))
}

pub fn run_done(
    id: &str,
    owner: Option<String>,
    config: Config,
    options: OutputOptions,
) -> Result<()> {
    let (_, backend, mut list) = load_collection(owner.as_deref(), &config)?;
    let id = resolve_id(&list, id)?;

    // Already-completed tasks are left alone.
    let completed = match list.get(&id) {
        Some(task) if task.completed => Some(true),
        Some(_) => list.toggle(backend.as_ref(), &id)?,
        None => None,
    };

    let header = match completed {
        Some(_) => format!("Task completed: {id}"),
        None => format!("No such task: {id}"),
    };
    let mut human = HumanOutput::new(header);
    if completed.is_none() {
        human.push_warning("nothing to do; the task does not exist".to_string());
    }

    emit_success(options, "done", &ToggleReport { id: &id, completed }, Some(&human))
}

pub fn run_rm(
    id: &str,
    owner: Option<String>,
    config: Config,
    options: OutputOptions,
) -> Result<()> {
    let (_, backend, mut list) = load_collection(owner.as_deref(), &config)?;
    let id = resolve_id(&list, id)?;
    let removed = list.delete(backend.as_ref(), &id)?;

    let header = if removed {
        format!("Task removed: {id}")
    } else {
        format!("No such task: {id}")
    };
    let mut human = HumanOutput::new(header);
    if !removed {
        human.push_warning("nothing to do; the task does not exist".to_string());
    }

    emit_success(options, "rm", &RmReport { id: &id, removed }, Some(&human))
}

fn short_id(id: &str) -> &str {
    // Ids are backend-assigned and may not be ASCII.
    id.char_indices().nth(8).map_or(id, |(idx, _)| &id[..idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    fn list_with(titles: &[&str]) -> (MemoryBackend, TaskList) {
        let backend = MemoryBackend::new();
        let mut list = TaskList::new();
        list.load(&backend, "alice").unwrap();
        for title in titles {
            let draft = TaskDraft::new(title, "", Priority::Medium, None).unwrap();
            list.create(&backend, &draft).unwrap();
        }
        (backend, list)
    }

    #[test]
    fn id_prefix_resolution() {
        let (_backend, list) = list_with(&["a", "b"]);
        // Memory ids are mem-1, mem-2.
        assert_eq!(resolve_id(&list, "mem-1").unwrap(), "mem-1");
        assert_eq!(resolve_id(&list, "mem-2").unwrap(), "mem-2");
        assert!(resolve_id(&list, "mem-").is_err());
        // Unknown ids pass through for the store's no-op rule.
        assert_eq!(resolve_id(&list, "zzz").unwrap(), "zzz");
    }

    #[test]
    fn short_id_respects_char_boundaries() {
        assert_eq!(short_id("0d267f4e-4e0a"), "0d267f4e");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("日本語のタスクの識別子"), "日本語のタスクの");
    }

    #[test]
    fn due_date_parsing() {
        assert!(parse_due(None).unwrap().is_none());
        let parsed = parse_due(Some("2026-09-01T12:00:00Z")).unwrap().unwrap();
        assert_eq!(parsed.format("%Y-%m-%d").to_string(), "2026-09-01");
        assert!(parse_due(Some("next tuesday")).is_err());
    }
}
