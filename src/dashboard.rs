//! Session controller: owns the loaded collections and the view selection,
//! turns user intents into store calls and reloads after every write.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::{self, Habit, HabitLog, HabitPatch, LogStatus, Task, TaskPatch, DEFAULT_HABIT_COLOR};
use crate::store::{ErrorKind, HabitStore, StoreError};
use crate::utils::shift_days;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Overview,
    DailyFocus,
    Weekly,
    Badges,
}

impl View {
    pub const ALL: [View; 4] = [View::Overview, View::DailyFocus, View::Weekly, View::Badges];

    pub fn title(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::DailyFocus => "Daily Focus",
            View::Weekly => "Weekly",
            View::Badges => "Badges",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            View::Overview => 0,
            View::DailyFocus => 1,
            View::Weekly => 2,
            View::Badges => 3,
        }
    }

    pub fn next(&self) -> View {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    pub fn previous(&self) -> View {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Load,
    LogStatus,
    AddHabit,
    EditHabit,
    DeleteHabit,
    AddTask,
    ToggleTask,
    DeleteTask,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::Load => "load your data",
            Operation::LogStatus => "log the habit",
            Operation::AddHabit => "add the habit",
            Operation::EditHabit => "edit the habit",
            Operation::DeleteHabit => "delete the habit",
            Operation::AddTask => "add the task",
            Operation::ToggleTask => "update the task",
            Operation::DeleteTask => "delete the task",
        };
        f.write_str(label)
    }
}

/// A failed controller operation, kept in state for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("could not {operation} ({kind}): {message}")]
pub struct OperationError {
    pub operation: Operation,
    pub kind: ErrorKind,
    pub message: String,
}

impl OperationError {
    fn from_store(operation: Operation, err: &StoreError) -> Self {
        Self {
            operation,
            kind: err.kind(),
            message: err.detail().to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// One-line message for the status bar
    pub fn user_message(&self) -> String {
        match self.kind {
            ErrorKind::Unauthorized => {
                format!("Not authorized to {}. Check the signed-in user.", self.operation)
            }
            ErrorKind::Connectivity | ErrorKind::Timeout => {
                format!("Could not {}: {} (press r to retry)", self.operation, self.kind)
            }
            ErrorKind::Constraint => format!("Could not {}: {}", self.operation, self.message),
            ErrorKind::NotFound => format!("Could not {}: it no longer exists", self.operation),
        }
    }
}

/// A user request that may touch the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Load,
    LogStatus { habit_id: i64, date: NaiveDate, status: LogStatus },
    AddHabit { name: String, description: Option<String>, color: Option<String> },
    EditHabit { id: i64, patch: HabitPatch },
    DeleteHabit { id: i64 },
    AddTask { title: String, date: NaiveDate },
    ToggleTask { id: i64, completed: bool },
    DeleteTask { id: i64 },
}

impl Intent {
    pub fn operation(&self) -> Operation {
        match self {
            Intent::Load => Operation::Load,
            Intent::LogStatus { .. } => Operation::LogStatus,
            Intent::AddHabit { .. } => Operation::AddHabit,
            Intent::EditHabit { .. } => Operation::EditHabit,
            Intent::DeleteHabit { .. } => Operation::DeleteHabit,
            Intent::AddTask { .. } => Operation::AddTask,
            Intent::ToggleTask { .. } => Operation::ToggleTask,
            Intent::DeleteTask { .. } => Operation::DeleteTask,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState {
    pub habits: Vec<Habit>,
    pub logs: Vec<HabitLog>,
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub view: View,
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
    pub last_error: Option<OperationError>,
}

impl DashboardState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            habits: Vec::new(),
            logs: Vec::new(),
            tasks: Vec::new(),
            loading: false,
            view: View::Overview,
            selected_date: today,
            today,
            last_error: None,
        }
    }
}

pub struct Dashboard<S: HabitStore> {
    store: S,
    state: DashboardState,
    failed_intent: Option<Intent>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Trimmed color, rejected before it reaches the store when malformed
fn checked_color(color: Option<&str>) -> Result<Option<String>, StoreError> {
    match non_blank(color) {
        Some(color) if !models::is_valid_color(&color) => {
            Err(StoreError::Constraint(format!("'{}' is not a color (use #RRGGBB or a name)", color)))
        }
        color => Ok(color),
    }
}

impl<S: HabitStore> Dashboard<S> {
    /// Create a controller with empty collections; call [`Dashboard::load`] next
    pub fn new(store: S, today: NaiveDate) -> Self {
        Self {
            store,
            state: DashboardState::new(today),
            failed_intent: None,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load(&mut self) -> Result<(), OperationError> {
        self.dispatch(Intent::Load)
    }

    pub fn log_status(&mut self, habit_id: i64, date: NaiveDate, status: LogStatus) -> Result<(), OperationError> {
        self.dispatch(Intent::LogStatus { habit_id, date, status })
    }

    /// Blank names are ignored
    pub fn add_habit(
        &mut self,
        name: &str,
        description: Option<&str>,
        color: Option<&str>,
    ) -> Result<(), OperationError> {
        self.dispatch(Intent::AddHabit {
            name: name.to_string(),
            description: description.map(str::to_string),
            color: color.map(str::to_string),
        })
    }

    pub fn edit_habit(&mut self, id: i64, patch: HabitPatch) -> Result<(), OperationError> {
        self.dispatch(Intent::EditHabit { id, patch })
    }

    pub fn delete_habit(&mut self, id: i64) -> Result<(), OperationError> {
        self.dispatch(Intent::DeleteHabit { id })
    }

    /// Blank titles are ignored without contacting the store
    pub fn add_task(&mut self, title: &str, date: NaiveDate) -> Result<(), OperationError> {
        self.dispatch(Intent::AddTask { title: title.to_string(), date })
    }

    pub fn toggle_task(&mut self, id: i64, completed: bool) -> Result<(), OperationError> {
        self.dispatch(Intent::ToggleTask { id, completed })
    }

    pub fn delete_task(&mut self, id: i64) -> Result<(), OperationError> {
        self.dispatch(Intent::DeleteTask { id })
    }

    /// Run an intent: write (if any), then reload everything.
    ///
    /// On failure nothing in memory changes except `last_error`.
    pub fn dispatch(&mut self, intent: Intent) -> Result<(), OperationError> {
        let wrote = match self.write(&intent) {
            Ok(wrote) => wrote,
            Err(err) => return Err(self.fail(intent, &err)),
        };

        if wrote || intent == Intent::Load {
            if let Err(err) = self.reload() {
                // The write itself landed; only the refresh needs repeating
                return Err(self.fail(Intent::Load, &err));
            }
        }

        self.state.last_error = None;
        self.failed_intent = None;
        Ok(())
    }

    /// Repeat the last failed intent if its error was transient.
    /// Returns `Ok(false)` when there is nothing to retry.
    pub fn retry(&mut self) -> Result<bool, OperationError> {
        match self.failed_intent.take() {
            Some(intent) => {
                tracing::info!(operation = ?intent.operation(), "retrying");
                self.dispatch(intent).map(|_| true)
            }
            None => Ok(false),
        }
    }

    pub fn can_retry(&self) -> bool {
        self.failed_intent.is_some()
    }

    pub fn dismiss_error(&mut self) {
        self.state.last_error = None;
    }

    /// Move the selected date by whole days and return the new date
    pub fn change_date(&mut self, delta_days: i64) -> NaiveDate {
        if let Some(date) = shift_days(self.state.selected_date, delta_days) {
            self.state.selected_date = date;
        }
        self.state.selected_date
    }

    pub fn go_to_today(&mut self) {
        self.state.selected_date = self.state.today;
    }

    /// Advance the injected clock. A selection that was following today keeps following it.
    pub fn set_today(&mut self, today: NaiveDate) {
        if self.state.today == today {
            return;
        }
        if self.state.selected_date == self.state.today {
            self.state.selected_date = today;
        }
        self.state.today = today;
    }

    /// Collections are loaded eagerly, so switching views never fetches
    pub fn select_view(&mut self, view: View) {
        self.state.view = view;
    }

    pub fn next_view(&mut self) {
        self.state.view = self.state.view.next();
    }

    pub fn previous_view(&mut self) {
        self.state.view = self.state.view.previous();
    }

    fn fail(&mut self, intent: Intent, err: &StoreError) -> OperationError {
        let error = OperationError::from_store(intent.operation(), err);
        tracing::warn!(operation = ?error.operation, kind = ?error.kind, message = %error.message, "operation failed");
        self.failed_intent = if error.is_retryable() { Some(intent) } else { None };
        self.state.last_error = Some(error.clone());
        error
    }

    /// Perform the store write for an intent. `Ok(false)` means nothing was written.
    fn write(&self, intent: &Intent) -> Result<bool, StoreError> {
        match intent {
            Intent::Load => Ok(false),
            Intent::LogStatus { habit_id, date, status } => {
                self.store.upsert_log(&HabitLog::new(*habit_id, *date, *status))?;
                tracing::info!(habit_id, date = %date, status = %status, "logged habit");
                Ok(true)
            }
            Intent::AddHabit { name, description, color } => {
                let name = name.trim();
                if name.is_empty() {
                    return Ok(false);
                }
                let color = checked_color(color.as_deref())?;
                let mut habit = Habit::new(name.to_string());
                habit.description = non_blank(description.as_deref());
                habit.color = color.unwrap_or_else(|| DEFAULT_HABIT_COLOR.to_string());
                let id = self.store.insert_habit(&habit)?;
                tracing::info!(id, name, "added habit");
                Ok(true)
            }
            Intent::EditHabit { id, patch } => {
                let patch = HabitPatch {
                    name: non_blank(patch.name.as_deref()),
                    description: patch.description.as_ref().map(|d| non_blank(d.as_deref())),
                    color: checked_color(patch.color.as_deref())?,
                };
                if patch == HabitPatch::default() {
                    return Ok(false);
                }
                self.store.update_habit(*id, &patch)?;
                tracing::info!(id, "edited habit");
                Ok(true)
            }
            Intent::DeleteHabit { id } => {
                self.store.delete_habit(*id)?;
                tracing::info!(id, "deleted habit");
                Ok(true)
            }
            Intent::AddTask { title, date } => {
                let title = title.trim();
                if title.is_empty() {
                    return Ok(false);
                }
                let id = self.store.insert_task(&Task::new(title.to_string(), *date))?;
                tracing::info!(id, date = %date, "added task");
                Ok(true)
            }
            Intent::ToggleTask { id, completed } => {
                let patch = TaskPatch {
                    completed: Some(*completed),
                    ..Default::default()
                };
                self.store.update_task(*id, &patch)?;
                Ok(true)
            }
            Intent::DeleteTask { id } => {
                self.store.delete_task(*id)?;
                tracing::info!(id, "deleted task");
                Ok(true)
            }
        }
    }

    /// Fetch all three collections and swap them in together
    fn reload(&mut self) -> Result<(), StoreError> {
        if self.state.loading {
            tracing::debug!("load already in flight, ignoring");
            return Ok(());
        }
        self.state.loading = true;
        let fetched = self.fetch_all();
        self.state.loading = false;

        let (habits, logs, tasks) = fetched?;
        tracing::debug!(habits = habits.len(), logs = logs.len(), tasks = tasks.len(), "loaded collections");
        self.state.habits = habits;
        self.state.logs = logs;
        self.state.tasks = tasks;
        Ok(())
    }

    fn fetch_all(&self) -> Result<(Vec<Habit>, Vec<HabitLog>, Vec<Task>), StoreError> {
        let habits = self.store.list_habits()?;
        let logs = self.store.list_logs()?;
        let tasks = self.store.list_tasks()?;
        Ok((habits, logs, tasks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogPatch;
    use crate::store::Session;
    use std::cell::{Cell, RefCell};

    /// In-memory store that can be told to fail its next calls
    struct FakeStore {
        session: Session,
        habits: RefCell<Vec<Habit>>,
        logs: RefCell<Vec<HabitLog>>,
        tasks: RefCell<Vec<Task>>,
        next_id: Cell<i64>,
        fail_writes: RefCell<Option<StoreError>>,
        fail_lists: RefCell<Option<StoreError>>,
        writes: Cell<usize>,
    }

    impl FakeStore {
        fn new() -> Self {
            Self {
                session: Session::new("tester").unwrap(),
                habits: RefCell::new(Vec::new()),
                logs: RefCell::new(Vec::new()),
                tasks: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
                fail_writes: RefCell::new(None),
                fail_lists: RefCell::new(None),
                writes: Cell::new(0),
            }
        }

        fn id(&self) -> i64 {
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            id
        }

        fn check_write(&self) -> Result<(), StoreError> {
            if let Some(err) = self.fail_writes.borrow().clone() {
                return Err(err);
            }
            self.writes.set(self.writes.get() + 1);
            Ok(())
        }

        fn check_list(&self) -> Result<(), StoreError> {
            match self.fail_lists.borrow().clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    impl HabitStore for FakeStore {
        fn session(&self) -> &Session {
            &self.session
        }

        fn list_habits(&self) -> Result<Vec<Habit>, StoreError> {
            self.check_list()?;
            Ok(self.habits.borrow().iter().rev().cloned().collect())
        }

        fn insert_habit(&self, habit: &Habit) -> Result<i64, StoreError> {
            self.check_write()?;
            let id = self.id();
            let mut habit = habit.clone();
            habit.id = Some(id);
            habit.user_id = self.session.user_id().to_string();
            self.habits.borrow_mut().push(habit);
            Ok(id)
        }

        fn update_habit(&self, id: i64, patch: &HabitPatch) -> Result<(), StoreError> {
            self.check_write()?;
            let mut habits = self.habits.borrow_mut();
            let habit = habits
                .iter_mut()
                .find(|h| h.id == Some(id))
                .ok_or_else(|| StoreError::NotFound(format!("habit {}", id)))?;
            if let Some(ref name) = patch.name {
                habit.name = name.clone();
            }
            if let Some(ref color) = patch.color {
                habit.color = color.clone();
            }
            Ok(())
        }

        fn delete_habit(&self, id: i64) -> Result<(), StoreError> {
            self.check_write()?;
            let mut habits = self.habits.borrow_mut();
            let before = habits.len();
            habits.retain(|h| h.id != Some(id));
            if habits.len() == before {
                return Err(StoreError::NotFound(format!("habit {}", id)));
            }
            Ok(())
        }

        fn list_logs(&self) -> Result<Vec<HabitLog>, StoreError> {
            self.check_list()?;
            Ok(self.logs.borrow().clone())
        }

        fn insert_log(&self, log: &HabitLog) -> Result<i64, StoreError> {
            self.check_write()?;
            let id = self.id();
            let mut log = log.clone();
            log.id = Some(id);
            self.logs.borrow_mut().push(log);
            Ok(id)
        }

        fn update_log(&self, _id: i64, _patch: &LogPatch) -> Result<(), StoreError> {
            self.check_write()
        }

        fn delete_log(&self, id: i64) -> Result<(), StoreError> {
            self.check_write()?;
            self.logs.borrow_mut().retain(|l| l.id != Some(id));
            Ok(())
        }

        fn upsert_log(&self, log: &HabitLog) -> Result<(), StoreError> {
            self.check_write()?;
            let mut logs = self.logs.borrow_mut();
            match logs.iter_mut().find(|l| l.habit_id == log.habit_id && l.date == log.date) {
                Some(existing) => existing.status = log.status,
                None => {
                    let mut log = log.clone();
                    log.id = Some(self.id());
                    logs.push(log);
                }
            }
            Ok(())
        }

        fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
            self.check_list()?;
            Ok(self.tasks.borrow().clone())
        }

        fn insert_task(&self, task: &Task) -> Result<i64, StoreError> {
            self.check_write()?;
            let id = self.id();
            let mut task = task.clone();
            task.id = Some(id);
            self.tasks.borrow_mut().push(task);
            Ok(id)
        }

        fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<(), StoreError> {
            self.check_write()?;
            let mut tasks = self.tasks.borrow_mut();
            let task = tasks
                .iter_mut()
                .find(|t| t.id == Some(id))
                .ok_or_else(|| StoreError::NotFound(format!("task {}", id)))?;
            if let Some(completed) = patch.completed {
                task.completed = completed;
            }
            Ok(())
        }

        fn delete_task(&self, id: i64) -> Result<(), StoreError> {
            self.check_write()?;
            self.tasks.borrow_mut().retain(|t| t.id != Some(id));
            Ok(())
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dashboard() -> Dashboard<FakeStore> {
        let mut dashboard = Dashboard::new(FakeStore::new(), d(2024, 2, 29));
        dashboard.load().unwrap();
        dashboard
    }

    #[test]
    fn starts_on_overview_with_today_selected() {
        let dashboard = dashboard();
        let state = dashboard.state();
        assert_eq!(state.view, View::Overview);
        assert_eq!(state.selected_date, d(2024, 2, 29));
        assert!(!state.loading);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn writes_reload_collections() {
        let mut dashboard = dashboard();
        dashboard.add_habit("  Read  ", Some(""), None).unwrap();
        let habit = dashboard.state().habits[0].clone();
        assert_eq!(habit.name, "Read");
        assert_eq!(habit.description, None);
        assert_eq!(habit.color, DEFAULT_HABIT_COLOR);

        let id = habit.id.unwrap();
        dashboard.log_status(id, d(2024, 2, 29), LogStatus::Missed).unwrap();
        dashboard.log_status(id, d(2024, 2, 29), LogStatus::Completed).unwrap();
        let logs = &dashboard.state().logs;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, LogStatus::Completed);
    }

    #[test]
    fn whitespace_task_is_not_created() {
        let mut dashboard = dashboard();
        dashboard.add_task("  ", d(2024, 2, 29)).unwrap();
        assert!(dashboard.state().tasks.is_empty());
        assert_eq!(dashboard.store().writes.get(), 0);

        dashboard.add_task(" Water plants ", d(2024, 2, 29)).unwrap();
        assert_eq!(dashboard.state().tasks[0].title, "Water plants");
    }

    #[test]
    fn toggle_and_delete_task() {
        let mut dashboard = dashboard();
        dashboard.add_task("Call mom", d(2024, 2, 29)).unwrap();
        let id = dashboard.state().tasks[0].id.unwrap();

        dashboard.toggle_task(id, true).unwrap();
        assert!(dashboard.state().tasks[0].completed);
        dashboard.toggle_task(id, false).unwrap();
        assert!(!dashboard.state().tasks[0].completed);

        dashboard.delete_task(id).unwrap();
        assert!(dashboard.state().tasks.is_empty());
    }

    #[test]
    fn failed_write_leaves_state_untouched_and_surfaces_error() {
        let mut dashboard = dashboard();
        dashboard.add_habit("Read", None, None).unwrap();
        let before = dashboard.state().clone();

        *dashboard.store().fail_writes.borrow_mut() = Some(StoreError::Unauthorized("denied".to_string()));
        let err = dashboard.add_habit("Walk", None, None).unwrap_err();

        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.operation, Operation::AddHabit);
        assert!(err.user_message().starts_with("Not authorized"));
        assert_eq!(dashboard.state().habits, before.habits);
        assert_eq!(dashboard.state().last_error, Some(err));
        assert!(!dashboard.can_retry());
    }

    #[test]
    fn connectivity_failure_can_be_retried() {
        let mut dashboard = dashboard();
        *dashboard.store().fail_writes.borrow_mut() = Some(StoreError::Connectivity("offline".to_string()));
        let err = dashboard.add_task("Stretch", d(2024, 2, 29)).unwrap_err();
        assert!(err.is_retryable());
        assert!(err.user_message().contains("retry"));
        assert!(dashboard.state().tasks.is_empty());

        *dashboard.store().fail_writes.borrow_mut() = None;
        assert!(dashboard.retry().unwrap());
        assert_eq!(dashboard.state().tasks.len(), 1);
        assert!(dashboard.state().last_error.is_none());
        assert!(!dashboard.retry().unwrap());
    }

    #[test]
    fn malformed_color_is_rejected_before_the_store() {
        let mut dashboard = dashboard();
        dashboard.add_habit("Read", None, Some("#22C55E")).unwrap();
        let writes = dashboard.store().writes.get();

        let err = dashboard.add_habit("Walk", None, Some("#1é234")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Constraint);
        assert_eq!(err.operation, Operation::AddHabit);
        assert!(err.user_message().contains("#1é234"));

        let id = dashboard.state().habits[0].id.unwrap();
        let patch = HabitPatch {
            color: Some("#é1".to_string()),
            ..Default::default()
        };
        let err = dashboard.edit_habit(id, patch).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Constraint);

        assert_eq!(dashboard.store().writes.get(), writes);
        assert_eq!(dashboard.state().habits.len(), 1);
        assert_eq!(dashboard.state().habits[0].color, "#22C55E");
        assert!(!dashboard.can_retry());
    }

    #[test]
    fn failed_reload_keeps_previous_collections() {
        let mut dashboard = dashboard();
        dashboard.add_habit("Read", None, None).unwrap();

        *dashboard.store().fail_lists.borrow_mut() = Some(StoreError::Timeout("busy".to_string()));
        let err = dashboard.add_habit("Walk", None, None).unwrap_err();

        // The insert went through; only the refresh failed
        assert_eq!(err.operation, Operation::Load);
        assert_eq!(dashboard.state().habits.len(), 1);
        assert!(!dashboard.state().loading);

        *dashboard.store().fail_lists.borrow_mut() = None;
        assert!(dashboard.retry().unwrap());
        assert_eq!(dashboard.state().habits.len(), 2);
    }

    #[test]
    fn delete_missing_habit_is_not_found() {
        let mut dashboard = dashboard();
        let err = dashboard.delete_habit(42).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(!err.is_retryable());
    }

    #[test]
    fn blank_edit_is_a_no_op() {
        let mut dashboard = dashboard();
        dashboard.add_habit("Read", None, None).unwrap();
        let id = dashboard.state().habits[0].id.unwrap();
        let writes = dashboard.store().writes.get();

        let patch = HabitPatch { name: Some("  ".to_string()), ..Default::default() };
        dashboard.edit_habit(id, patch).unwrap();
        assert_eq!(dashboard.store().writes.get(), writes);

        let patch = HabitPatch { name: Some("Read more".to_string()), ..Default::default() };
        dashboard.edit_habit(id, patch).unwrap();
        assert_eq!(dashboard.state().habits[0].name, "Read more");
    }

    #[test]
    fn change_date_rolls_over_leap_day() {
        let mut dashboard = dashboard();
        assert_eq!(dashboard.change_date(1), d(2024, 3, 1));
        assert_eq!(dashboard.change_date(-2), d(2024, 2, 28));
        assert_eq!(dashboard.change_date(-365), d(2023, 2, 28));
        dashboard.go_to_today();
        assert_eq!(dashboard.state().selected_date, d(2024, 2, 29));
    }

    #[test]
    fn selection_follows_today_across_midnight() {
        let mut dashboard = dashboard();
        dashboard.set_today(d(2024, 3, 1));
        assert_eq!(dashboard.state().selected_date, d(2024, 3, 1));

        dashboard.change_date(-3);
        dashboard.set_today(d(2024, 3, 2));
        assert_eq!(dashboard.state().selected_date, d(2024, 2, 27));
        assert_eq!(dashboard.state().today, d(2024, 3, 2));
    }

    #[test]
    fn views_are_fully_connected() {
        let mut dashboard = dashboard();
        for from in View::ALL {
            for to in View::ALL {
                dashboard.select_view(from);
                dashboard.select_view(to);
                assert_eq!(dashboard.state().view, to);
            }
        }
        dashboard.select_view(View::Badges);
        dashboard.next_view();
        assert_eq!(dashboard.state().view, View::Overview);
        dashboard.previous_view();
        assert_eq!(dashboard.state().view, View::Badges);
    }

    #[test]
    fn state_serializes() {
        let dashboard = dashboard();
        let json = serde_json::to_string(dashboard.state()).unwrap();
        let back: DashboardState = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, dashboard.state());
    }
}
