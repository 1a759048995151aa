//! Interactive task list: state and event loop.
//!
//! Single-threaded and event-driven: every mutation happens in response to a
//! key press, and backend calls complete before the next render. Errors
//! surface on the status line; the view always stays interactive.

use std::io;
use std::time::Duration;

use chrono::{NaiveDate, TimeZone, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::backend::{self, TaskBackend};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::filter::{visible, PriorityFilter, StatusFilter};
use crate::form::NewTaskForm;
use crate::session;
use crate::store::TaskList;
use crate::task::Priority;

const EVENT_POLL_MS: u64 = 120;

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Title,
    Description,
    Due,
    Priority,
}

/// Creation form plus its UI focus and the raw due-date buffer.
pub(crate) struct FormState {
    pub(crate) form: NewTaskForm,
    pub(crate) due_text: String,
    pub(crate) focus: FormField,
}

impl FormState {
    fn new() -> Self {
        Self {
            form: NewTaskForm::new(),
            due_text: String::new(),
            focus: FormField::Title,
        }
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.form.title),
            FormField::Description => Some(&mut self.form.description),
            FormField::Due => Some(&mut self.due_text),
            FormField::Priority => None,
        }
    }

    fn next_field(&mut self) {
        self.focus = match self.focus {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Due,
            FormField::Due => FormField::Priority,
            FormField::Priority => FormField::Title,
        };
    }

    fn prev_field(&mut self) {
        self.focus = match self.focus {
            FormField::Title => FormField::Priority,
            FormField::Description => FormField::Title,
            FormField::Due => FormField::Description,
            FormField::Priority => FormField::Due,
        };
    }

    fn cycle_priority(&mut self) {
        self.form.priority = match self.form.priority {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        };
    }
}

pub(crate) struct DeleteConfirmState {
    pub(crate) task_id: String,
    pub(crate) title: String,
}

pub struct AppState {
    pub(crate) list: TaskList,
    pub(crate) owner: String,
    pub(crate) query: String,
    pub(crate) filter_active: bool,
    pub(crate) status_filter: StatusFilter,
    pub(crate) priority_filter: PriorityFilter,
    pub(crate) visible_ids: Vec<String>,
    pub(crate) selected: usize,
    pub(crate) form: Option<FormState>,
    pub(crate) delete_confirm: Option<DeleteConfirmState>,
    pub(crate) status_message: Option<(String, StatusKind)>,
    backend: Box<dyn TaskBackend>,
}

impl AppState {
    fn new(backend: Box<dyn TaskBackend>, owner: String) -> Self {
        Self {
            list: TaskList::new(),
            owner,
            query: String::new(),
            filter_active: false,
            status_filter: StatusFilter::All,
            priority_filter: PriorityFilter::All,
            visible_ids: Vec::new(),
            selected: 0,
            form: None,
            delete_confirm: None,
            status_message: None,
            backend,
        }
    }

    /// Re-derive the visible rows after any state change. Selection follows
    /// the row index, clamped to the new length.
    pub(crate) fn refresh_visible(&mut self) {
        self.visible_ids = visible(
            self.list.tasks(),
            &self.query,
            self.status_filter,
            self.priority_filter,
        )
        .into_iter()
        .map(|task| task.id.clone())
        .collect();
        if self.selected >= self.visible_ids.len() {
            self.selected = self.visible_ids.len().saturating_sub(1);
        }
    }

    pub(crate) fn selected_id(&self) -> Option<&str> {
        self.visible_ids.get(self.selected).map(String::as_str)
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), StatusKind::Error));
    }

    fn set_info(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), StatusKind::Info));
    }

    fn reload(&mut self) {
        let owner = self.owner.clone();
        match self.list.load(self.backend.as_ref(), &owner) {
            Ok(()) => {}
            Err(err) => self.set_error(err.to_string()),
        }
        self.refresh_visible();
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id().map(str::to_string) else {
            return;
        };
        match self.list.toggle(self.backend.as_ref(), &id) {
            Ok(Some(true)) => self.set_info("completed"),
            Ok(Some(false)) => self.set_info("reopened"),
            Ok(None) => self.set_info("task already gone"),
            Err(err) => self.set_error(err.to_string()),
        }
        self.refresh_visible();
    }

    fn confirm_delete(&mut self) {
        let Some(confirm) = self.delete_confirm.take() else {
            return;
        };
        match self.list.delete(self.backend.as_ref(), &confirm.task_id) {
            Ok(true) => self.set_info(format!("removed: {}", confirm.title)),
            Ok(false) => self.set_info("task already gone"),
            Err(err) => self.set_error(err.to_string()),
        }
        self.refresh_visible();
    }

    fn submit_form(&mut self) {
        let Some(mut state) = self.form.take() else {
            return;
        };

        match parse_due_text(&state.due_text) {
            Ok(due) => state.form.due_date = due,
            Err(err) => {
                self.set_error(err.to_string());
                self.form = Some(state);
                return;
            }
        }

        if !state.form.can_submit() {
            self.set_error("title must not be empty");
            self.form = Some(state);
            return;
        }

        match state.form.submit(&mut self.list, self.backend.as_ref()) {
            // Success dismisses the form; fields are already reset.
            Ok(_) => {
                self.selected = 0;
                self.set_info("task created");
            }
            // Fields stay as typed; the form remains open for retry.
            Err(err) => {
                self.set_error(err.to_string());
                self.form = Some(state);
            }
        }
        self.refresh_visible();
    }

    fn cycle_status_filter(&mut self) {
        let pos = StatusFilter::ALL
            .iter()
            .position(|f| *f == self.status_filter)
            .unwrap_or(0);
        self.status_filter = StatusFilter::ALL[(pos + 1) % StatusFilter::ALL.len()];
        self.refresh_visible();
    }

    fn cycle_priority_filter(&mut self) {
        let pos = PriorityFilter::ALL
            .iter()
            .position(|f| *f == self.priority_filter)
            .unwrap_or(0);
        self.priority_filter = PriorityFilter::ALL[(pos + 1) % PriorityFilter::ALL.len()];
        self.refresh_visible();
    }
}

/// Parse the form's due-date buffer: empty means no deadline.
fn parse_due_text(text: &str) -> Result<Option<chrono::DateTime<Utc>>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| Error::Validation(format!("invalid due date '{text}' (use YYYY-MM-DD)")))?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
        Error::Validation(format!("invalid due date '{text}'"))
    })?;
    Ok(Some(Utc.from_utc_datetime(&midnight)))
}

pub fn run(cli_owner: Option<String>, config: Config) -> Result<()> {
    let (owner, _) = session::resolve_owner(&config.session_file(), cli_owner.as_deref())?;
    let backend = backend::from_config(&config);

    let mut app = AppState::new(backend, owner);
    app.reload();

    run_terminal(&mut app)
}

fn run_terminal(app: &mut AppState) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| super::view::render(frame, app))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key(app, key) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(_, _) => {
                    dirty = true;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// Handle one key press. Returns true to quit.
fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if app.form.is_some() {
        handle_form_key(app, key);
        return false;
    }

    if app.delete_confirm.is_some() {
        handle_confirm_key(app, key);
        return false;
    }

    if app.filter_active {
        handle_filter_key(app, key);
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => {
            if app.selected + 1 < app.visible_ids.len() {
                app.selected += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.selected = app.selected.saturating_sub(1);
        }
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),
        KeyCode::Char('d') => {
            if let Some(id) = app.selected_id().map(str::to_string) {
                let title = app
                    .list
                    .get(&id)
                    .map(|task| task.title.clone())
                    .unwrap_or_default();
                app.delete_confirm = Some(DeleteConfirmState { task_id: id, title });
            }
        }
        KeyCode::Char('n') => {
            app.form = Some(FormState::new());
        }
        KeyCode::Char('/') => {
            app.filter_active = true;
        }
        KeyCode::Char('s') => app.cycle_status_filter(),
        KeyCode::Char('p') => app.cycle_priority_filter(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Esc => {
            app.query.clear();
            app.status_filter = StatusFilter::All;
            app.priority_filter = PriorityFilter::All;
            app.status_message = None;
            app.refresh_visible();
        }
        _ => {}
    }
    false
}

fn handle_filter_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            app.filter_active = false;
        }
        KeyCode::Backspace => {
            app.query.pop();
            app.refresh_visible();
        }
        KeyCode::Char(ch) => {
            app.query.push(ch);
            app.refresh_visible();
        }
        _ => {}
    }
}

fn handle_confirm_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            app.delete_confirm = None;
        }
        _ => {}
    }
}

fn handle_form_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.form = None;
            return;
        }
        KeyCode::Enter => {
            app.submit_form();
            return;
        }
        _ => {}
    }

    let Some(state) = app.form.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Tab | KeyCode::Down => state.next_field(),
        KeyCode::BackTab | KeyCode::Up => state.prev_field(),
        KeyCode::Backspace => {
            if let Some(text) = state.focused_text() {
                text.pop();
            }
        }
        KeyCode::Left | KeyCode::Right => {
            if state.focus == FormField::Priority {
                state.cycle_priority();
            }
        }
        KeyCode::Char(ch) => {
            if state.focus == FormField::Priority {
                if ch == ' ' {
                    state.cycle_priority();
                }
            } else if let Some(text) = state.focused_text() {
                text.push(ch);
            }
        }
        _ => {}
    }
}
