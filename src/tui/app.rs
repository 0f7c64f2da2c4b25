use crate::dashboard::{Dashboard, OperationError, View};
use crate::database::Database;
use crate::metrics;
use crate::models::{Habit, LogStatus, Task};
use crate::tui::error::TuiError;
use crate::utils::{self, parse_key_binding};
use crate::Config;
use ratatui::widgets::ListState;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Help,
    Input,
    ConfirmDelete,
}

/// Which list receives selection keys in the daily focus view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Habits,
    Tasks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Habit,
    Task,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
}

impl FormField {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
        }
    }
}

/// Single-line fields shown in the add popup
#[derive(Debug, Clone)]
pub struct InputForm {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub current_field: usize,
}

impl InputForm {
    pub fn habit() -> Self {
        Self {
            kind: FormKind::Habit,
            fields: vec![
                FormField::new("Name"),
                FormField::new("Description"),
                FormField::new("Color"),
            ],
            current_field: 0,
        }
    }

    pub fn task() -> Self {
        Self {
            kind: FormKind::Task,
            fields: vec![FormField::new("Title")],
            current_field: 0,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            FormKind::Habit => "New Habit",
            FormKind::Task => "New Task",
        }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.current_field) {
            field.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.current_field) {
            field.value.pop();
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % self.fields.len();
    }

    pub fn previous_field(&mut self) {
        self.current_field = (self.current_field + self.fields.len() - 1) % self.fields.len();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Habit { id: i64, name: String },
    Task { id: i64, title: String },
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub mode: Mode,
    pub focus: Focus,
    pub habit_index: usize,
    pub task_index: usize,
    pub habit_list_state: ListState,
    pub task_list_state: ListState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: Mode::View,
            focus: Focus::Habits,
            habit_index: 0,
            task_index: 0,
            habit_list_state: ListState::default(),
            task_list_state: ListState::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

pub struct App {
    pub config: Config,
    pub dashboard: Dashboard<Database>,
    pub ui: UiState,
    pub form: Option<InputForm>,
    pub delete_confirmation: Option<DeleteTarget>,
    pub status: StatusState,
}

impl App {
    /// Build the app and run the first load. A failed load is not fatal; it
    /// shows up in the status bar and can be retried.
    pub fn new(config: Config, dashboard: Dashboard<Database>) -> Result<Self, TuiError> {
        validate_key_bindings(&config)?;

        let mut app = Self {
            config,
            dashboard,
            ui: UiState::default(),
            form: None,
            delete_confirmation: None,
            status: StatusState::default(),
        };
        app.reload();
        Ok(app)
    }

    /// Called once per event loop pass
    pub fn tick(&mut self) {
        self.dashboard.set_today(utils::today());
        self.check_status_message_timeout();
    }

    pub fn reload(&mut self) {
        let result = self.dashboard.load();
        self.apply(result, None);
    }

    pub fn retry(&mut self) {
        match self.dashboard.retry() {
            Ok(true) => self.set_status_message("Retry succeeded".to_string()),
            Ok(false) => self.set_status_message("Nothing to retry".to_string()),
            Err(_) => {}
        }
        self.clamp_selection();
    }

    /// Shared tail of every store-backed action: report success, keep selection in range.
    /// Failures are already recorded in the dashboard's `last_error`.
    fn apply(&mut self, result: Result<(), OperationError>, success: Option<String>) {
        match result {
            Ok(()) => {
                if let Some(message) = success {
                    self.set_status_message(message);
                }
            }
            Err(_) => self.clear_status_message(),
        }
        self.clamp_selection();
    }

    pub fn view(&self) -> View {
        self.dashboard.state().view
    }

    pub fn select_view(&mut self, view: View) {
        self.dashboard.select_view(view);
    }

    /// Task focus only exists in the daily focus view
    pub fn active_focus(&self) -> Focus {
        if self.view() == View::DailyFocus {
            self.ui.focus
        } else {
            Focus::Habits
        }
    }

    pub fn switch_focus(&mut self) {
        if self.view() == View::DailyFocus {
            self.ui.focus = match self.ui.focus {
                Focus::Habits => Focus::Tasks,
                Focus::Tasks => Focus::Habits,
            };
        }
    }

    pub fn selected_habit(&self) -> Option<&Habit> {
        self.dashboard.state().habits.get(self.ui.habit_index)
    }

    /// Tasks of the selected date, in display order
    pub fn day_tasks(&self) -> Vec<&Task> {
        let state = self.dashboard.state();
        metrics::tasks_on(&state.tasks, state.selected_date)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.day_tasks().get(self.ui.task_index).copied()
    }

    pub fn sync_list_state(&mut self) {
        let habits = self.dashboard.state().habits.len();
        let tasks = self.day_tasks().len();
        self.ui
            .habit_list_state
            .select(if habits == 0 { None } else { Some(self.ui.habit_index) });
        self.ui
            .task_list_state
            .select(if tasks == 0 { None } else { Some(self.ui.task_index) });
    }

    pub fn clamp_selection(&mut self) {
        let habits = self.dashboard.state().habits.len();
        let tasks = self.day_tasks().len();
        self.ui.habit_index = self.ui.habit_index.min(habits.saturating_sub(1));
        self.ui.task_index = self.ui.task_index.min(tasks.saturating_sub(1));
        self.sync_list_state();
    }

    pub fn move_selection_up(&mut self) {
        match self.active_focus() {
            Focus::Habits => self.ui.habit_index = self.ui.habit_index.saturating_sub(1),
            Focus::Tasks => self.ui.task_index = self.ui.task_index.saturating_sub(1),
        }
        self.sync_list_state();
    }

    pub fn move_selection_down(&mut self) {
        match self.active_focus() {
            Focus::Habits => self.ui.habit_index += 1,
            Focus::Tasks => self.ui.task_index += 1,
        }
        self.clamp_selection();
    }

    /// Record a status for the selected habit on the selected date
    pub fn log_selected(&mut self, status: LogStatus) {
        let Some((id, name)) = self
            .selected_habit()
            .and_then(|habit| habit.id.map(|id| (id, habit.name.clone())))
        else {
            self.set_status_message("No habit selected".to_string());
            return;
        };
        let date = self.dashboard.state().selected_date;
        let result = self.dashboard.log_status(id, date, status);
        self.apply(result, Some(format!("{}: {} on {}", name, status, date)));
    }

    pub fn toggle_selected_task(&mut self) {
        let Some((id, completed)) = self
            .selected_task()
            .and_then(|task| task.id.map(|id| (id, task.completed)))
        else {
            return;
        };
        let result = self.dashboard.toggle_task(id, !completed);
        self.apply(result, None);
    }

    pub fn change_date(&mut self, delta_days: i64) {
        self.dashboard.change_date(delta_days);
        self.ui.task_index = 0;
        self.clamp_selection();
    }

    pub fn go_to_today(&mut self) {
        self.dashboard.go_to_today();
        self.ui.task_index = 0;
        self.clamp_selection();
    }

    pub fn enter_add_habit(&mut self) {
        self.form = Some(InputForm::habit());
        self.ui.mode = Mode::Input;
    }

    pub fn enter_add_task(&mut self) {
        self.form = Some(InputForm::task());
        self.ui.mode = Mode::Input;
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.ui.mode = Mode::View;
    }

    pub fn submit_form(&mut self) {
        self.ui.mode = Mode::View;
        let Some(form) = self.form.take() else {
            return;
        };

        match form.kind {
            FormKind::Habit => {
                let name = form.value(0).trim().to_string();
                if name.is_empty() {
                    self.set_status_message("Habit name is empty".to_string());
                    return;
                }
                let result = self
                    .dashboard
                    .add_habit(&name, Some(form.value(1)), Some(form.value(2)));
                if result.is_ok() {
                    // Newest habit sorts first
                    self.ui.habit_index = 0;
                }
                self.apply(result, Some(format!("Added habit {}", name)));
            }
            FormKind::Task => {
                let title = form.value(0).trim().to_string();
                if title.is_empty() {
                    self.set_status_message("Task title is empty".to_string());
                    return;
                }
                let date = self.dashboard.state().selected_date;
                let result = self.dashboard.add_task(&title, date);
                self.apply(result, Some(format!("Added task for {}", date)));
            }
        }
    }

    /// Ask before deleting whatever the focused list has selected
    pub fn request_delete(&mut self) {
        let target = match self.active_focus() {
            Focus::Habits => self.selected_habit().and_then(|habit| {
                habit.id.map(|id| DeleteTarget::Habit {
                    id,
                    name: habit.name.clone(),
                })
            }),
            Focus::Tasks => self.selected_task().and_then(|task| {
                task.id.map(|id| DeleteTarget::Task {
                    id,
                    title: task.title.clone(),
                })
            }),
        };
        if let Some(target) = target {
            self.delete_confirmation = Some(target);
            self.ui.mode = Mode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        self.ui.mode = Mode::View;
        match self.delete_confirmation.take() {
            Some(DeleteTarget::Habit { id, name }) => {
                let result = self.dashboard.delete_habit(id);
                self.apply(result, Some(format!("Deleted habit {}", name)));
            }
            Some(DeleteTarget::Task { id, title }) => {
                let result = self.dashboard.delete_task(id);
                self.apply(result, Some(format!("Deleted task {}", title)));
            }
            None => {}
        }
    }

    pub fn cancel_delete(&mut self) {
        self.delete_confirmation = None;
        self.ui.mode = Mode::View;
    }

    pub fn enter_help_mode(&mut self) {
        self.ui.mode = Mode::Help;
    }

    pub fn exit_help_mode(&mut self) {
        self.ui.mode = Mode::View;
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Check if status message should be auto-cleared (after 3 seconds)
    pub fn check_status_message_timeout(&mut self) {
        const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }
}

fn validate_key_bindings(config: &Config) -> Result<(), TuiError> {
    let bindings = &config.key_bindings;
    let all = [
        ("quit", &bindings.quit),
        ("help", &bindings.help),
        ("view_left", &bindings.view_left),
        ("view_right", &bindings.view_right),
        ("view_overview", &bindings.view_overview),
        ("view_daily", &bindings.view_daily),
        ("view_weekly", &bindings.view_weekly),
        ("view_badges", &bindings.view_badges),
        ("list_up", &bindings.list_up),
        ("list_down", &bindings.list_down),
        ("switch_focus", &bindings.switch_focus),
        ("log_completed", &bindings.log_completed),
        ("log_skipped", &bindings.log_skipped),
        ("log_missed", &bindings.log_missed),
        ("new_habit", &bindings.new_habit),
        ("new_task", &bindings.new_task),
        ("toggle_task", &bindings.toggle_task),
        ("delete", &bindings.delete),
        ("previous_day", &bindings.previous_day),
        ("next_day", &bindings.next_day),
        ("today", &bindings.today),
        ("retry", &bindings.retry),
        ("reload", &bindings.reload),
    ];
    for (name, binding) in all {
        parse_key_binding(binding)
            .map_err(|e| TuiError::KeyBindingError(format!("{}: {}", name, e)))?;
    }
    Ok(())
}
