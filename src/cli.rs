use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

use crate::badges::{self, Badge, BadgeState};
use crate::config::{Config, ConfigError};
use crate::dashboard::{Dashboard, OperationError};
use crate::metrics::{self, DaySummary, Kpis, WeekProgress};
use crate::models::{HabitPatch, LogStatus};
use crate::store::HabitStore;
use crate::utils::{parse_date, week_start};

#[derive(Parser)]
#[command(name = "habitgrid")]
#[command(about = "Habit and daily task tracker for the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Database file to use for this run instead of the configured one
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Act as this user instead of the configured one
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long, global = true)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Create a habit
    AddHabit {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Hex color such as #22C55E
        #[arg(long)]
        color: Option<String>,
    },
    /// Rename or recolor a habit
    EditHabit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a habit and its logs
    DeleteHabit { id: i64 },
    /// List habits with today's status and the last seven days
    Habits,
    /// Record completed, skipped or missed for a habit
    Log {
        habit_id: i64,
        status: String,
        /// Day to log (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Quickly add a task for a day
    AddTask {
        title: String,
        /// Day of the task (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Print progress figures and badges
    Stats {
        /// Reference day (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Switch the color theme
    Theme { name: String },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{}", .0.user_message())]
    Operation(#[from] OperationError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("Nothing to change for habit {0}; pass --name, --description or --color")]
    EmptyEdit(i64),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything `stats` reports for one reference day
#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub date: NaiveDate,
    pub kpis: Kpis,
    pub day: DaySummary,
    pub week: WeekProgress,
    pub badges: Vec<Badge>,
}

impl StatsReport {
    pub fn build<S: HabitStore>(dashboard: &Dashboard<S>, date: NaiveDate) -> Self {
        let state = dashboard.state();
        let habit_count = state.habits.len();
        Self {
            date,
            kpis: Kpis::compute(habit_count, &state.logs, date),
            day: metrics::day_summary(habit_count, &state.logs, &state.tasks, date),
            week: metrics::weekly_aggregate(habit_count, &state.logs, week_start(date)),
            badges: badges::evaluate(&state.habits),
        }
    }
}

fn date_or(date: Option<String>, default: NaiveDate) -> Result<NaiveDate, CliError> {
    match date {
        Some(date_str) => parse_date(&date_str)
            .map_err(|e| CliError::DateParseError(format!("Invalid date format '{}': {}", date_str, e))),
        None => Ok(default),
    }
}

/// Handle the add-habit command
pub fn handle_add_habit<S: HabitStore>(
    name: String,
    description: Option<String>,
    color: Option<String>,
    dashboard: &mut Dashboard<S>,
) -> Result<(), CliError> {
    if name.trim().is_empty() {
        println!("Habit name is empty, nothing created");
        return Ok(());
    }
    dashboard.add_habit(&name, description.as_deref(), color.as_deref())?;

    // Newest habit sorts first after the reload
    match dashboard.state().habits.first().and_then(|habit| habit.id) {
        Some(id) => println!("Habit created successfully (ID: {})", id),
        None => println!("Habit created successfully"),
    }
    Ok(())
}

pub fn handle_edit_habit<S: HabitStore>(
    id: i64,
    name: Option<String>,
    description: Option<String>,
    color: Option<String>,
    dashboard: &mut Dashboard<S>,
) -> Result<(), CliError> {
    let is_blank = |value: &Option<String>| value.as_deref().is_none_or(|v| v.trim().is_empty());
    if is_blank(&name) && is_blank(&color) && description.is_none() {
        return Err(CliError::EmptyEdit(id));
    }
    let patch = HabitPatch {
        name,
        description: description.map(Some),
        color,
    };
    dashboard.edit_habit(id, patch)?;
    println!("Habit {} updated", id);
    Ok(())
}

pub fn handle_delete_habit<S: HabitStore>(id: i64, dashboard: &mut Dashboard<S>) -> Result<(), CliError> {
    dashboard.delete_habit(id)?;
    println!("Habit {} deleted", id);
    Ok(())
}

/// Handle the habits command
pub fn handle_list_habits<S: HabitStore>(dashboard: &Dashboard<S>) -> Result<(), CliError> {
    let state = dashboard.state();
    if state.habits.is_empty() {
        println!("No habits yet. Add one with `habitgrid add-habit NAME`.");
        return Ok(());
    }

    println!("{:>4}  {:<5}  {:<7}  NAME", "ID", "TODAY", "LAST 7");
    for habit in &state.habits {
        let Some(id) = habit.id else { continue };
        let today = metrics::status_for(id, state.today, &state.logs)
            .map(|status| status.glyph())
            .unwrap_or("·");
        let series: String = metrics::weekly_series(id, &state.logs, state.today)
            .into_iter()
            .map(|status| status.map(|s| s.glyph()).unwrap_or("·"))
            .collect();
        println!("{:>4}  {:<5}  {:<7}  {}", id, today, series, habit.name);
    }
    Ok(())
}

/// Handle the log command
pub fn handle_log<S: HabitStore>(
    habit_id: i64,
    status: String,
    date: Option<String>,
    dashboard: &mut Dashboard<S>,
) -> Result<(), CliError> {
    let status: LogStatus = status.parse().map_err(CliError::InvalidStatus)?;
    let date = date_or(date, dashboard.state().today)?;
    dashboard.log_status(habit_id, date, status)?;
    println!("Logged habit {} as {} on {}", habit_id, status, date);
    Ok(())
}

/// Handle the add-task command
pub fn handle_add_task<S: HabitStore>(
    title: String,
    date: Option<String>,
    dashboard: &mut Dashboard<S>,
) -> Result<(), CliError> {
    let date = date_or(date, dashboard.state().today)?;
    if title.trim().is_empty() {
        println!("Task title is empty, nothing created");
        return Ok(());
    }
    dashboard.add_task(&title, date)?;
    println!("Task added for {}", date);
    Ok(())
}

/// Handle the stats command
pub fn handle_stats<S: HabitStore>(
    date: Option<String>,
    json: bool,
    dashboard: &Dashboard<S>,
) -> Result<(), CliError> {
    let date = date_or(date, dashboard.state().today)?;
    let report = StatsReport::build(dashboard, date);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let kpis = &report.kpis;
    println!("Stats for {}", report.date);
    println!(
        "  Completed:      {}/{} ({}%)",
        kpis.completed_today, kpis.total_habits, kpis.completion_rate
    );
    println!("  Current streak: {} day(s)", kpis.current_streak);
    println!("  Last 30 days:   {}%", kpis.monthly_rate);
    println!(
        "  Tasks done:     {}/{}",
        report.day.tasks_completed, report.day.tasks_total
    );
    println!(
        "  This week:      {}/{} ({}%)",
        report.week.completed, report.week.total, report.week.percentage
    );
    println!("Badges");
    for badge in &report.badges {
        let mark = match badge.state {
            BadgeState::Earned => "[x]",
            BadgeState::Locked => "[ ]",
            BadgeState::NotComputed => "[?]",
        };
        println!("  {} {} - {}", mark, badge.title, badge.description);
    }
    Ok(())
}

/// Handle the theme command, persisting the choice to `config_path`
pub fn handle_theme(name: String, config: &mut Config, config_path: &Path) -> Result<(), CliError> {
    config.set_theme(&name)?;
    config.save_to_path(config_path)?;
    println!("Theme set to {}", name);
    Ok(())
}
